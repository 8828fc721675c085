use actix_web::{http::StatusCode, web, HttpResponse};
use std::collections::HashMap;
use tracing::{info, info_span, Instrument};

use crate::{
    commons::errors::ServiceError,
    models::user::{LoginRequest, UserDto},
    services::{auth_service::AuthService, metrics_service::MetricsService},
};

#[actix_web::post("/user")]
async fn register(
    auth_service: web::Data<AuthService>,
    metrics: web::Data<MetricsService>,
    body: Result<web::Json<UserDto>, actix_web::Error>,
) -> HttpResponse {
    let span = info_span!("register-api", correlation_id = %uuid::Uuid::new_v4());
    async move {
        let start = std::time::Instant::now();
        let mut tags = HashMap::new();
        tags.insert("endpoint".to_string(), "register".to_string());

        let request = match body {
            Ok(body) => body.into_inner(),
            Err(e) => {
                info!(error = %e, "malformed user body");
                metrics.increment("auth.validation.failed", Some(tags));
                return ServiceError::CreationFailed("user").respond(StatusCode::BAD_REQUEST);
            }
        };

        match auth_service.register(request).await {
            Ok(user) => {
                metrics.increment("auth.register.success", Some(tags.clone()));
                metrics.timing("auth.register.duration", start.elapsed(), Some(tags));
                HttpResponse::Created().json(user)
            }
            Err(e) => {
                tags.insert("error".to_string(), "creation_failed".to_string());
                metrics.increment("auth.register.failed", Some(tags.clone()));
                metrics.timing("auth.register.duration", start.elapsed(), Some(tags));
                e.respond(StatusCode::BAD_REQUEST)
            }
        }
    }
    .instrument(span)
    .await
}

#[actix_web::post("/login")]
async fn login(
    auth_service: web::Data<AuthService>,
    metrics: web::Data<MetricsService>,
    body: Result<web::Json<LoginRequest>, actix_web::Error>,
) -> HttpResponse {
    let span = info_span!("login-api", correlation_id = %uuid::Uuid::new_v4());
    async move {
        let start = std::time::Instant::now();
        let mut tags = HashMap::new();
        tags.insert("endpoint".to_string(), "login".to_string());

        let Ok(request) = body else {
            metrics.increment("auth.validation.failed", Some(tags));
            return ServiceError::UserNotRegistered.respond(StatusCode::BAD_REQUEST);
        };

        match auth_service.login(request.into_inner()).await {
            Ok(response) => {
                metrics.increment("auth.login.success", Some(tags.clone()));
                metrics.timing("auth.login.duration", start.elapsed(), Some(tags));
                HttpResponse::Ok().json(response)
            }
            Err(e) => {
                let cause = match e {
                    ServiceError::IncorrectPassword => "invalid_credentials",
                    _ => "unknown_user",
                };
                tags.insert("error".to_string(), cause.to_string());
                metrics.increment("auth.login.failed", Some(tags.clone()));
                metrics.timing("auth.login.duration", start.elapsed(), Some(tags));
                e.respond(StatusCode::BAD_REQUEST)
            }
        }
    }
    .instrument(span)
    .await
}

pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.service(register).service(login);
}
