pub mod amenity;
pub mod auth;
pub mod hotel;
pub mod image;
pub mod user;
