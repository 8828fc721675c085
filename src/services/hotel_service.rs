use std::sync::Arc;

use tracing::{error, info, warn};
use validator::Validate;

use crate::{
    commons::errors::ServiceError,
    models::hotel::{HotelDto, NewHotel},
    repositories::{AmenityRepository, HotelRepository, HotelUpdate},
};

pub struct HotelService {
    hotel_repository: Arc<dyn HotelRepository>,
    amenity_repository: Arc<dyn AmenityRepository>,
}

impl HotelService {
    pub fn new(
        hotel_repository: Arc<dyn HotelRepository>,
        amenity_repository: Arc<dyn AmenityRepository>,
    ) -> Self {
        Self {
            hotel_repository,
            amenity_repository,
        }
    }

    pub async fn insert_hotel(&self, request: HotelDto) -> Result<HotelDto, ServiceError> {
        let creation_failed = ServiceError::CreationFailed("hotel");

        if let Err(e) = request.validate() {
            info!(error = %e, "rejected hotel");
            return Err(creation_failed);
        }

        let amenity_ids = self
            .amenity_ids(&request.amenities)
            .await
            .map_err(|_| creation_failed.clone())?;

        let hotel = self
            .hotel_repository
            .create(NewHotel::from(&request), &amenity_ids)
            .await
            .map_err(|e| {
                error!(error = %e, "failed to insert hotel");
                creation_failed.clone()
            })?;

        info!(hotel_id = hotel.id, "hotel created");
        Ok(hotel.into())
    }

    pub async fn get_hotel_by_id(&self, id: i32) -> Result<HotelDto, ServiceError> {
        let hotel = self
            .hotel_repository
            .find_by_id(id)
            .await
            .map_err(|e| {
                error!(error = %e, hotel_id = id, "failed to fetch hotel");
                ServiceError::FetchFailed("hotel")
            })?
            .ok_or(ServiceError::HotelNotFound)?;

        Ok(hotel.into())
    }

    pub async fn get_hotels(&self) -> Result<Vec<HotelDto>, ServiceError> {
        let hotels = self.hotel_repository.find_all().await.map_err(|e| {
            error!(error = %e, "failed to fetch hotels");
            ServiceError::FetchFailed("hotels")
        })?;

        Ok(hotels.into_iter().map(HotelDto::from).collect())
    }

    /// Replaces every attribute of hotel `id`, amenity set included. Images are kept.
    /// The room amount cannot drop below the hotel's peak of overlapping reservations.
    pub async fn update_hotel(&self, id: i32, request: HotelDto) -> Result<HotelDto, ServiceError> {
        let update_failed = ServiceError::UpdateFailed("hotel");

        if let Err(e) = request.validate() {
            info!(error = %e, hotel_id = id, "rejected hotel update");
            return Err(update_failed);
        }

        let amenity_ids = self
            .amenity_ids(&request.amenities)
            .await
            .map_err(|_| update_failed.clone())?;

        let outcome = self
            .hotel_repository
            .update(id, NewHotel::from(&request), &amenity_ids)
            .await
            .map_err(|e| {
                error!(error = %e, hotel_id = id, "failed to update hotel");
                update_failed.clone()
            })?;

        match outcome {
            HotelUpdate::Updated(hotel) => {
                info!(hotel_id = id, "hotel updated");
                Ok(hotel.into())
            }
            HotelUpdate::NotFound => Err(ServiceError::HotelNotFound),
            HotelUpdate::Overbooked { peak } => {
                warn!(
                    hotel_id = id,
                    peak,
                    room_amount = request.room_amount,
                    "room amount below booked rooms"
                );
                Err(update_failed)
            }
        }
    }

    /// Fails while the hotel still has reservations.
    pub async fn delete_hotel(&self, id: i32) -> Result<(), ServiceError> {
        match self.hotel_repository.delete(id).await {
            Ok(true) => {
                info!(hotel_id = id, "hotel deleted");
                Ok(())
            }
            Ok(false) => Err(ServiceError::HotelNotFound),
            Err(e) => {
                error!(error = %e, hotel_id = id, "failed to delete hotel");
                Err(ServiceError::HotelDeleteFailed)
            }
        }
    }

    // Unknown names are dropped.
    async fn amenity_ids(&self, names: &[String]) -> Result<Vec<i32>, sqlx::Error> {
        if names.is_empty() {
            return Ok(vec![]);
        }
        let amenities = self
            .amenity_repository
            .find_by_names(names)
            .await
            .map_err(|e| {
                error!(error = %e, "failed to resolve amenities");
                e
            })?;
        Ok(amenities.into_iter().map(|a| a.id).collect())
    }
}
