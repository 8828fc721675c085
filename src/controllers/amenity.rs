use actix_web::{http::StatusCode, web, HttpResponse};
use tracing::info;

use crate::{
    commons::errors::ServiceError, models::hotel::AmenityDto,
    services::amenity_service::AmenityService,
};

#[actix_web::post("/amenity")]
async fn insert_amenity(
    amenity_service: web::Data<AmenityService>,
    body: Result<web::Json<AmenityDto>, actix_web::Error>,
) -> HttpResponse {
    let request = match body {
        Ok(body) => body.into_inner(),
        Err(e) => {
            info!(error = %e, "malformed amenity body");
            return ServiceError::CreationFailed("amenity").respond(StatusCode::BAD_REQUEST);
        }
    };

    match amenity_service.insert_amenity(request).await {
        Ok(amenity) => HttpResponse::Created().json(amenity),
        Err(e) => e.respond(StatusCode::BAD_REQUEST),
    }
}

#[actix_web::get("/amenity")]
async fn get_amenities(amenity_service: web::Data<AmenityService>) -> HttpResponse {
    match amenity_service.get_amenities().await {
        Ok(amenities) => HttpResponse::Ok().json(amenities),
        Err(e) => e.respond(StatusCode::INTERNAL_SERVER_ERROR),
    }
}

#[actix_web::get("/amenity/{id}")]
async fn get_amenity_by_id(
    amenity_service: web::Data<AmenityService>,
    path: web::Path<i32>,
) -> HttpResponse {
    match amenity_service.get_amenity_by_id(path.into_inner()).await {
        Ok(amenity) => HttpResponse::Ok().json(amenity),
        Err(e @ ServiceError::AmenityNotFound) => e.respond(StatusCode::NOT_FOUND),
        Err(e) => e.respond(StatusCode::INTERNAL_SERVER_ERROR),
    }
}

pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.service(insert_amenity)
        .service(get_amenities)
        .service(get_amenity_by_id);
}
