pub mod amenity_service;
pub mod auth_service;
pub mod hotel_service;
pub mod image_service;
pub mod metrics_service;
pub mod user_service;
