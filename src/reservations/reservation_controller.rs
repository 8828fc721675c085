use actix_web::{http::StatusCode, web, HttpResponse};
use std::collections::HashMap;
use tracing::{info, info_span, Instrument};

use crate::{
    commons::errors::{MessageResponse, ServiceError},
    reservations::{
        dto::reservation_dto::{DateRangeQuery, ReservationDto},
        reservation_service::ReservationService,
    },
    services::metrics_service::MetricsService,
};

fn tags(endpoint: &str) -> HashMap<String, String> {
    let mut tags = HashMap::new();
    tags.insert("endpoint".to_string(), endpoint.to_string());
    tags
}

fn error_tag(e: &ServiceError) -> &'static str {
    match e {
        ServiceError::UserNotFound | ServiceError::HotelNotFound | ServiceError::ReservationNotFound => "not_found",
        ServiceError::InvalidDateRange => "invalid_range",
        ServiceError::NoRoomsAvailable => "no_rooms",
        ServiceError::CancellationWindowClosed => "cancellation_window",
        _ => "system_error",
    }
}

#[actix_web::post("/reserve")]
async fn insert_reservation(
    service: web::Data<ReservationService>,
    metrics: web::Data<MetricsService>,
    body: Result<web::Json<ReservationDto>, actix_web::Error>,
) -> HttpResponse {
    let span = info_span!("reserve-api", correlation_id = %uuid::Uuid::new_v4());
    async move {
        let start = std::time::Instant::now();
        let mut tags = tags("reserve");

        let request = match body {
            Ok(body) => body.into_inner(),
            Err(e) => {
                info!(error = %e, "malformed reservation body");
                return ServiceError::CreationFailed("reservation").respond(StatusCode::BAD_REQUEST);
            }
        };

        match service.insert_reservation(request).await {
            Ok(reservation) => {
                metrics.increment("reservation.create.success", Some(tags.clone()));
                metrics.timing("reservation.create.duration", start.elapsed(), Some(tags));
                HttpResponse::Created().json(reservation)
            }
            Err(e) => {
                tags.insert("error".to_string(), error_tag(&e).to_string());
                metrics.increment("reservation.create.failed", Some(tags.clone()));
                metrics.timing("reservation.create.duration", start.elapsed(), Some(tags));
                e.respond(StatusCode::BAD_REQUEST)
            }
        }
    }
    .instrument(span)
    .await
}

#[actix_web::get("/reservation/{id}")]
async fn get_reservation_by_id(
    service: web::Data<ReservationService>,
    path: web::Path<i32>,
) -> HttpResponse {
    match service.get_reservation_by_id(path.into_inner()).await {
        Ok(reservation) => HttpResponse::Ok().json(reservation),
        Err(e @ ServiceError::ReservationNotFound) => e.respond(StatusCode::NOT_FOUND),
        Err(e) => e.respond(StatusCode::INTERNAL_SERVER_ERROR),
    }
}

#[actix_web::get("/reservation")]
async fn get_reservations(service: web::Data<ReservationService>) -> HttpResponse {
    match service.get_reservations().await {
        Ok(reservations) => HttpResponse::Ok().json(reservations),
        Err(e) => e.respond(StatusCode::INTERNAL_SERVER_ERROR),
    }
}

#[actix_web::get("/user/reservations/{id}")]
async fn get_reservations_by_user(
    service: web::Data<ReservationService>,
    path: web::Path<i32>,
) -> HttpResponse {
    match service.get_reservations_by_user(path.into_inner()).await {
        Ok(reservations) => HttpResponse::Ok().json(reservations),
        Err(e @ ServiceError::UserNotFound) => e.respond(StatusCode::NOT_FOUND),
        Err(e) => e.respond(StatusCode::INTERNAL_SERVER_ERROR),
    }
}

#[actix_web::get("/user/reservations/{id}/range")]
async fn get_reservations_by_user_range(
    service: web::Data<ReservationService>,
    path: web::Path<i32>,
    query: Result<web::Query<DateRangeQuery>, actix_web::Error>,
) -> HttpResponse {
    let Ok(query) = query else {
        return ServiceError::InvalidDateRange.respond(StatusCode::BAD_REQUEST);
    };

    match service
        .get_reservations_by_user_range(path.into_inner(), &query.start_date, &query.end_date)
        .await
    {
        Ok(reservations) => HttpResponse::Ok().json(reservations),
        Err(e @ ServiceError::InvalidDateRange) => e.respond(StatusCode::BAD_REQUEST),
        Err(e) => e.respond(StatusCode::INTERNAL_SERVER_ERROR),
    }
}

#[actix_web::get("/hotel/reservations/{id}")]
async fn get_reservations_by_hotel(
    service: web::Data<ReservationService>,
    path: web::Path<i32>,
) -> HttpResponse {
    match service.get_reservations_by_hotel(path.into_inner()).await {
        Ok(reservations) => HttpResponse::Ok().json(reservations),
        Err(e @ ServiceError::HotelNotFound) => e.respond(StatusCode::NOT_FOUND),
        Err(e) => e.respond(StatusCode::INTERNAL_SERVER_ERROR),
    }
}

#[actix_web::delete("/reservation/{id}")]
async fn delete_reservation(
    service: web::Data<ReservationService>,
    metrics: web::Data<MetricsService>,
    path: web::Path<i32>,
) -> HttpResponse {
    let id = path.into_inner();
    let span = info_span!(
        "cancel-reservation-api",
        correlation_id = %uuid::Uuid::new_v4(),
        reservation_id = id
    );
    async move {
        let mut tags = tags("cancel_reservation");

        match service.delete_reservation(id).await {
            Ok(()) => {
                metrics.increment("reservation.cancel.success", Some(tags));
                HttpResponse::Ok().json(MessageResponse::new("Reservation deleted"))
            }
            Err(e) => {
                tags.insert("error".to_string(), error_tag(&e).to_string());
                metrics.increment("reservation.cancel.failed", Some(tags));
                e.respond(StatusCode::BAD_REQUEST)
            }
        }
    }
    .instrument(span)
    .await
}

#[actix_web::get("/availability")]
async fn check_all_availability(
    service: web::Data<ReservationService>,
    query: Result<web::Query<DateRangeQuery>, actix_web::Error>,
) -> HttpResponse {
    let Ok(query) = query else {
        return ServiceError::InvalidDateRange.respond(StatusCode::BAD_REQUEST);
    };

    match service
        .check_all_availability(&query.start_date, &query.end_date)
        .await
    {
        Ok(hotels) => HttpResponse::Ok().json(hotels),
        Err(e @ ServiceError::InvalidDateRange) => e.respond(StatusCode::BAD_REQUEST),
        Err(e) => e.respond(StatusCode::INTERNAL_SERVER_ERROR),
    }
}

pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.service(insert_reservation)
        .service(get_reservation_by_id)
        .service(get_reservations)
        .service(get_reservations_by_user)
        .service(get_reservations_by_user_range)
        .service(get_reservations_by_hotel)
        .service(delete_reservation)
        .service(check_all_availability);
}
