use actix_web::{http::StatusCode, web, HttpResponse};

use crate::{
    commons::errors::ServiceError, models::hotel::ImageDto, services::image_service::ImageService,
};

#[actix_web::post("/hotel/{id}/images")]
async fn insert_images(
    image_service: web::Data<ImageService>,
    path: web::Path<i32>,
    body: Result<web::Json<Vec<ImageDto>>, actix_web::Error>,
) -> HttpResponse {
    let Ok(images) = body else {
        return ServiceError::ImagesInsertFailed.respond(StatusCode::BAD_REQUEST);
    };

    match image_service.insert_images(path.into_inner(), images.into_inner()).await {
        Ok(images) => HttpResponse::Created().json(images),
        Err(e) => e.respond(StatusCode::BAD_REQUEST),
    }
}

#[actix_web::get("/hotel/{id}/images")]
async fn get_images_by_hotel(
    image_service: web::Data<ImageService>,
    path: web::Path<i32>,
) -> HttpResponse {
    match image_service.get_images_by_hotel(path.into_inner()).await {
        Ok(images) => HttpResponse::Ok().json(images),
        Err(e @ ServiceError::HotelNotFound) => e.respond(StatusCode::NOT_FOUND),
        Err(e) => e.respond(StatusCode::INTERNAL_SERVER_ERROR),
    }
}

#[actix_web::get("/image/{id}")]
async fn get_image_by_id(image_service: web::Data<ImageService>, path: web::Path<i32>) -> HttpResponse {
    match image_service.get_image_by_id(path.into_inner()).await {
        Ok(image) => HttpResponse::Ok().json(image),
        Err(e @ ServiceError::ImageNotFound) => e.respond(StatusCode::NOT_FOUND),
        Err(e) => e.respond(StatusCode::INTERNAL_SERVER_ERROR),
    }
}

pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.service(insert_images)
        .service(get_images_by_hotel)
        .service(get_image_by_id);
}
