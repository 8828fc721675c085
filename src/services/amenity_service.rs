use std::sync::Arc;

use tracing::{error, info};
use validator::Validate;

use crate::{commons::errors::ServiceError, models::hotel::AmenityDto, repositories::AmenityRepository};

pub struct AmenityService {
    amenity_repository: Arc<dyn AmenityRepository>,
}

impl AmenityService {
    pub fn new(amenity_repository: Arc<dyn AmenityRepository>) -> Self {
        Self { amenity_repository }
    }

    /// Amenity names are unique; a second insert of the same name fails.
    pub async fn insert_amenity(&self, request: AmenityDto) -> Result<AmenityDto, ServiceError> {
        let creation_failed = ServiceError::CreationFailed("amenity");

        if request.validate().is_err() {
            return Err(creation_failed);
        }

        let name = request.name.trim();
        let existing = self
            .amenity_repository
            .find_by_name(name)
            .await
            .map_err(|e| {
                error!(error = %e, "failed to look up amenity");
                creation_failed.clone()
            })?;
        if existing.is_some() {
            info!(amenity = name, "amenity already exists");
            return Err(creation_failed);
        }

        let amenity = self.amenity_repository.create(name).await.map_err(|e| {
            error!(error = %e, "failed to insert amenity");
            creation_failed.clone()
        })?;

        Ok(amenity.into())
    }

    pub async fn get_amenity_by_id(&self, id: i32) -> Result<AmenityDto, ServiceError> {
        let amenity = self
            .amenity_repository
            .find_by_id(id)
            .await
            .map_err(|e| {
                error!(error = %e, amenity_id = id, "failed to fetch amenity");
                ServiceError::FetchFailed("amenity")
            })?
            .ok_or(ServiceError::AmenityNotFound)?;

        Ok(amenity.into())
    }

    pub async fn get_amenities(&self) -> Result<Vec<AmenityDto>, ServiceError> {
        let amenities = self.amenity_repository.find_all().await.map_err(|e| {
            error!(error = %e, "failed to fetch amenities");
            ServiceError::FetchFailed("amenities")
        })?;

        Ok(amenities.into_iter().map(AmenityDto::from).collect())
    }
}
