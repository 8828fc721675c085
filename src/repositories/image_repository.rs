use async_trait::async_trait;
use sqlx::PgPool;

use crate::{models::hotel::Image, repositories::ImageRepository};

pub struct PgImageRepository {
    pool: PgPool,
}

impl PgImageRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ImageRepository for PgImageRepository {
    async fn create_many(&self, hotel_id: i32, paths: &[String]) -> Result<Vec<Image>, sqlx::Error> {
        let mut tx = self.pool.begin().await?;
        let mut images = Vec::with_capacity(paths.len());

        for path in paths {
            let image = sqlx::query_as::<_, Image>(
                "INSERT INTO images (path, hotel_id) VALUES ($1, $2) RETURNING id, path, hotel_id",
            )
            .bind(path)
            .bind(hotel_id)
            .fetch_one(&mut *tx)
            .await?;
            images.push(image);
        }

        tx.commit().await?;

        log::debug!("Images created for hotel {}: {}", hotel_id, images.len());
        Ok(images)
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Image>, sqlx::Error> {
        sqlx::query_as::<_, Image>("SELECT id, path, hotel_id FROM images WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
    }

    async fn find_by_hotel(&self, hotel_id: i32) -> Result<Vec<Image>, sqlx::Error> {
        sqlx::query_as::<_, Image>(
            "SELECT id, path, hotel_id FROM images WHERE hotel_id = $1 ORDER BY id",
        )
        .bind(hotel_id)
        .fetch_all(&self.pool)
        .await
    }
}
