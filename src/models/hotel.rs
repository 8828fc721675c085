use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

#[derive(Debug, Clone, PartialEq, Default, FromRow)]
pub struct Hotel {
    pub id: i32,
    pub name: String,
    pub room_amount: i32,
    pub description: String,
    pub street_name: String,
    pub street_number: i32,
    pub rate: f64,
    #[sqlx(skip)]
    pub amenities: Vec<Amenity>,
    #[sqlx(skip)]
    pub images: Vec<Image>,
}

/// Column values of a hotel row, used for inserts and in-place updates.
#[derive(Debug, Clone, PartialEq)]
pub struct NewHotel {
    pub name: String,
    pub room_amount: i32,
    pub description: String,
    pub street_name: String,
    pub street_number: i32,
    pub rate: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct Amenity {
    pub id: i32,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct Image {
    pub id: i32,
    pub path: String,
    pub hotel_id: i32,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct HotelDto {
    pub id: i32,
    #[validate(length(min = 1, message = "Name cannot be empty"))]
    pub name: String,
    #[validate(range(min = 0, message = "Room amount cannot be negative"))]
    pub room_amount: i32,
    pub description: String,
    pub street_name: String,
    pub street_number: i32,
    #[validate(range(min = 0.0, message = "Rate cannot be negative"))]
    pub rate: f64,
    /// Amenity names.
    pub amenities: Vec<String>,
    pub images: Vec<ImageDto>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct AmenityDto {
    pub id: i32,
    #[validate(length(min = 1, message = "Name cannot be empty"))]
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageDto {
    pub id: i32,
    pub path: String,
    pub hotel_id: i32,
}
