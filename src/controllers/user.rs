use actix_web::{http::StatusCode, web, HttpResponse};

use crate::{commons::errors::ServiceError, services::user_service::UserService};

#[actix_web::get("/user")]
async fn get_users(user_service: web::Data<UserService>) -> HttpResponse {
    match user_service.get_users().await {
        Ok(users) => HttpResponse::Ok().json(users),
        Err(e) => e.respond(StatusCode::INTERNAL_SERVER_ERROR),
    }
}

#[actix_web::get("/user/{id}")]
async fn get_user_by_id(user_service: web::Data<UserService>, path: web::Path<i32>) -> HttpResponse {
    match user_service.get_user_by_id(path.into_inner()).await {
        Ok(user) => HttpResponse::Ok().json(user),
        Err(e @ ServiceError::UserNotFound) => e.respond(StatusCode::NOT_FOUND),
        Err(e) => e.respond(StatusCode::INTERNAL_SERVER_ERROR),
    }
}

pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.service(get_users).service(get_user_by_id);
}
