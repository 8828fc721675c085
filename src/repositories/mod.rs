use async_trait::async_trait;

use crate::models::{
    hotel::{Amenity, Hotel, Image, NewHotel},
    user::{NewUser, User},
};

pub mod amenity_repository;
pub mod hotel_repository;
pub mod image_repository;
pub mod user_repository;

pub use amenity_repository::PgAmenityRepository;
pub use hotel_repository::PgHotelRepository;
pub use image_repository::PgImageRepository;
pub use user_repository::PgUserRepository;

#[derive(Debug, Clone, PartialEq)]
pub enum HotelUpdate {
    Updated(Hotel),
    NotFound,
    /// `peak` reservations overlap at some instant.
    Overbooked { peak: usize },
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create(&self, user: NewUser) -> Result<User, sqlx::Error>;
    async fn find_by_id(&self, id: i32) -> Result<Option<User>, sqlx::Error>;
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, sqlx::Error>;
    async fn find_all(&self) -> Result<Vec<User>, sqlx::Error>;
}

/// Hotels are always returned with their amenities and images loaded.
#[async_trait]
pub trait HotelRepository: Send + Sync {
    async fn create(&self, hotel: NewHotel, amenity_ids: &[i32]) -> Result<Hotel, sqlx::Error>;
    async fn find_by_id(&self, id: i32) -> Result<Option<Hotel>, sqlx::Error>;
    async fn find_all(&self) -> Result<Vec<Hotel>, sqlx::Error>;
    /// Replaces the hotel columns and its amenity set, unless the new room
    /// amount is below what the hotel's reservations already need.
    async fn update(
        &self,
        id: i32,
        hotel: NewHotel,
        amenity_ids: &[i32],
    ) -> Result<HotelUpdate, sqlx::Error>;
    /// Deletes the hotel along with its images and amenity links. `false` when nothing was deleted.
    async fn delete(&self, id: i32) -> Result<bool, sqlx::Error>;
}

#[async_trait]
pub trait AmenityRepository: Send + Sync {
    async fn create(&self, name: &str) -> Result<Amenity, sqlx::Error>;
    async fn find_by_id(&self, id: i32) -> Result<Option<Amenity>, sqlx::Error>;
    async fn find_by_name(&self, name: &str) -> Result<Option<Amenity>, sqlx::Error>;
    async fn find_by_names(&self, names: &[String]) -> Result<Vec<Amenity>, sqlx::Error>;
    async fn find_all(&self) -> Result<Vec<Amenity>, sqlx::Error>;
}

#[async_trait]
pub trait ImageRepository: Send + Sync {
    async fn create_many(&self, hotel_id: i32, paths: &[String]) -> Result<Vec<Image>, sqlx::Error>;
    async fn find_by_id(&self, id: i32) -> Result<Option<Image>, sqlx::Error>;
    async fn find_by_hotel(&self, hotel_id: i32) -> Result<Vec<Image>, sqlx::Error>;
}
