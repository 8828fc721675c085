use std::sync::Arc;

use tracing::{error, info};

use crate::{
    commons::errors::ServiceError,
    models::hotel::ImageDto,
    repositories::{HotelRepository, ImageRepository},
};

pub struct ImageService {
    image_repository: Arc<dyn ImageRepository>,
    hotel_repository: Arc<dyn HotelRepository>,
}

impl ImageService {
    pub fn new(
        image_repository: Arc<dyn ImageRepository>,
        hotel_repository: Arc<dyn HotelRepository>,
    ) -> Self {
        Self {
            image_repository,
            hotel_repository,
        }
    }

    /// Appends images to a hotel, keeping the order of `images`.
    pub async fn insert_images(
        &self,
        hotel_id: i32,
        images: Vec<ImageDto>,
    ) -> Result<Vec<ImageDto>, ServiceError> {
        self.ensure_hotel(hotel_id).await?;

        let paths: Vec<String> = images.into_iter().map(|i| i.path.trim().to_string()).collect();
        if paths.is_empty() || paths.iter().any(|p| p.is_empty()) {
            return Err(ServiceError::ImagesInsertFailed);
        }

        let created = self
            .image_repository
            .create_many(hotel_id, &paths)
            .await
            .map_err(|e| {
                error!(error = %e, hotel_id, "failed to insert images");
                ServiceError::ImagesInsertFailed
            })?;

        info!(hotel_id, count = created.len(), "images added");
        Ok(created.into_iter().map(ImageDto::from).collect())
    }

    pub async fn get_image_by_id(&self, id: i32) -> Result<ImageDto, ServiceError> {
        let image = self
            .image_repository
            .find_by_id(id)
            .await
            .map_err(|e| {
                error!(error = %e, image_id = id, "failed to fetch image");
                ServiceError::FetchFailed("image")
            })?
            .ok_or(ServiceError::ImageNotFound)?;

        Ok(image.into())
    }

    pub async fn get_images_by_hotel(&self, hotel_id: i32) -> Result<Vec<ImageDto>, ServiceError> {
        self.ensure_hotel(hotel_id).await?;

        let images = self
            .image_repository
            .find_by_hotel(hotel_id)
            .await
            .map_err(|e| {
                error!(error = %e, hotel_id, "failed to fetch images");
                ServiceError::FetchFailed("images")
            })?;

        Ok(images.into_iter().map(ImageDto::from).collect())
    }

    async fn ensure_hotel(&self, hotel_id: i32) -> Result<(), ServiceError> {
        let hotel = self.hotel_repository.find_by_id(hotel_id).await.map_err(|e| {
            error!(error = %e, hotel_id, "failed to fetch hotel");
            ServiceError::FetchFailed("hotel")
        })?;
        match hotel {
            Some(_) => Ok(()),
            None => Err(ServiceError::HotelNotFound),
        }
    }
}
