use actix_web::{http::StatusCode, web, HttpResponse};
use serde::{Deserialize, Serialize};
use tracing::{info, info_span, Instrument};

use crate::{
    commons::{
        dates::parse_window,
        errors::{MessageResponse, ServiceError},
    },
    models::hotel::HotelDto,
    reservations::{dto::reservation_dto::DateRangeQuery, reservation_service::ReservationService},
    services::hotel_service::HotelService,
};

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct AvailabilityResponse {
    pub hotel_id: i32,
    pub available: bool,
}

#[actix_web::post("/hotel")]
async fn insert_hotel(
    hotel_service: web::Data<HotelService>,
    body: Result<web::Json<HotelDto>, actix_web::Error>,
) -> HttpResponse {
    let span = info_span!("create-hotel-api", correlation_id = %uuid::Uuid::new_v4());
    async move {
        let request = match body {
            Ok(body) => body.into_inner(),
            Err(e) => {
                info!(error = %e, "malformed hotel body");
                return ServiceError::CreationFailed("hotel").respond(StatusCode::BAD_REQUEST);
            }
        };

        match hotel_service.insert_hotel(request).await {
            Ok(hotel) => HttpResponse::Created().json(hotel),
            Err(e) => e.respond(StatusCode::BAD_REQUEST),
        }
    }
    .instrument(span)
    .await
}

#[actix_web::get("/hotel")]
async fn get_hotels(hotel_service: web::Data<HotelService>) -> HttpResponse {
    match hotel_service.get_hotels().await {
        Ok(hotels) => HttpResponse::Ok().json(hotels),
        Err(e) => e.respond(StatusCode::INTERNAL_SERVER_ERROR),
    }
}

#[actix_web::get("/hotel/{id}")]
async fn get_hotel_by_id(hotel_service: web::Data<HotelService>, path: web::Path<i32>) -> HttpResponse {
    match hotel_service.get_hotel_by_id(path.into_inner()).await {
        Ok(hotel) => HttpResponse::Ok().json(hotel),
        Err(e @ ServiceError::HotelNotFound) => e.respond(StatusCode::NOT_FOUND),
        Err(e) => e.respond(StatusCode::INTERNAL_SERVER_ERROR),
    }
}

#[actix_web::put("/hotel/{id}")]
async fn update_hotel(
    hotel_service: web::Data<HotelService>,
    path: web::Path<i32>,
    body: Result<web::Json<HotelDto>, actix_web::Error>,
) -> HttpResponse {
    let id = path.into_inner();
    let span = info_span!(
        "update-hotel-api",
        correlation_id = %uuid::Uuid::new_v4(),
        hotel_id = id
    );
    async move {
        let Ok(request) = body else {
            return ServiceError::UpdateFailed("hotel").respond(StatusCode::BAD_REQUEST);
        };

        match hotel_service.update_hotel(id, request.into_inner()).await {
            Ok(hotel) => HttpResponse::Ok().json(hotel),
            Err(e) => e.respond(StatusCode::BAD_REQUEST),
        }
    }
    .instrument(span)
    .await
}

#[actix_web::delete("/hotel/{id}")]
async fn delete_hotel(hotel_service: web::Data<HotelService>, path: web::Path<i32>) -> HttpResponse {
    let id = path.into_inner();
    let span = info_span!(
        "delete-hotel-api",
        correlation_id = %uuid::Uuid::new_v4(),
        hotel_id = id
    );
    async move {
        match hotel_service.delete_hotel(id).await {
            Ok(()) => HttpResponse::Ok().json(MessageResponse::new("Hotel deleted")),
            Err(e) => e.respond(StatusCode::BAD_REQUEST),
        }
    }
    .instrument(span)
    .await
}

/// Single-hotel availability. An unknown hotel is reported as unavailable.
#[actix_web::get("/hotel/{id}/availability")]
async fn check_availability(
    reservation_service: web::Data<ReservationService>,
    path: web::Path<i32>,
    query: Result<web::Query<DateRangeQuery>, actix_web::Error>,
) -> HttpResponse {
    let hotel_id = path.into_inner();
    let window = match query.map_err(|_| ServiceError::InvalidDateRange).and_then(|q| {
        parse_window(&q.start_date, &q.end_date)
    }) {
        Ok(window) => window,
        Err(e) => return e.respond(StatusCode::BAD_REQUEST),
    };

    match reservation_service
        .check_availability_by_id(hotel_id, window.start, window.end)
        .await
    {
        Ok(available) => HttpResponse::Ok().json(AvailabilityResponse { hotel_id, available }),
        Err(e) => e.respond(StatusCode::INTERNAL_SERVER_ERROR),
    }
}

pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.service(insert_hotel)
        .service(get_hotels)
        .service(get_hotel_by_id)
        .service(update_hotel)
        .service(delete_hotel)
        .service(check_availability);
}
