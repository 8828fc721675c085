use actix_cors::Cors;
use actix_web::{web, App, HttpServer};
use anyhow::Context;
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::{
    commons::{clock::SystemClock, errors::path_error_handler},
    config::Config,
    repositories::{PgAmenityRepository, PgHotelRepository, PgImageRepository, PgUserRepository},
    reservations::{reservation_repository::PgReservationRepository, reservation_service::ReservationService},
    services::{
        amenity_service::AmenityService, auth_service::AuthService, hotel_service::HotelService,
        image_service::ImageService, metrics_service::MetricsService, user_service::UserService,
    },
};

mod commons;
mod config;
mod controllers;
mod models;
mod repositories;
mod reservations;
mod services;
#[cfg(test)]
mod testing;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    // Initialize tracing with JSON format
    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer().json())
        .init();

    let config = Config::from_env()?;

    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .connect(&config.database_url)
        .await
        .context("failed to create pool")?;

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("failed to run migrations")?;

    let users = Arc::new(PgUserRepository::new(pool.clone()));
    let hotels = Arc::new(PgHotelRepository::new(pool.clone()));
    let amenities = Arc::new(PgAmenityRepository::new(pool.clone()));
    let images = Arc::new(PgImageRepository::new(pool.clone()));
    let reservations = Arc::new(PgReservationRepository::new(pool));

    let metrics_service = web::Data::new(MetricsService::new(config.statsd.as_ref()));
    let reservation_service = web::Data::new(ReservationService::new(
        reservations,
        users.clone(),
        hotels.clone(),
        Arc::new(SystemClock),
    ));
    let hotel_service = web::Data::new(HotelService::new(hotels.clone(), amenities.clone()));
    let amenity_service = web::Data::new(AmenityService::new(amenities));
    let image_service = web::Data::new(ImageService::new(images, hotels));
    let user_service = web::Data::new(UserService::new(users.clone()));
    let auth_service = web::Data::new(AuthService::new(users, config.jwt_secret.clone()));

    info!(host = %config.host, port = config.port, "starting server");

    HttpServer::new(move || {
        App::new()
            .wrap(Cors::permissive())
            .app_data(web::PathConfig::default().error_handler(path_error_handler))
            .app_data(metrics_service.clone())
            .app_data(reservation_service.clone())
            .app_data(hotel_service.clone())
            .app_data(amenity_service.clone())
            .app_data(image_service.clone())
            .app_data(user_service.clone())
            .app_data(auth_service.clone())
            .configure(reservations::reservation_controller::routes)
            .configure(controllers::auth::routes)
            .configure(controllers::user::routes)
            .configure(controllers::hotel::routes)
            .configure(controllers::amenity::routes)
            .configure(controllers::image::routes)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await?;

    Ok(())
}
