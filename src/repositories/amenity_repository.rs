use async_trait::async_trait;
use sqlx::PgPool;

use crate::{models::hotel::Amenity, repositories::AmenityRepository};

pub struct PgAmenityRepository {
    pool: PgPool,
}

impl PgAmenityRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AmenityRepository for PgAmenityRepository {
    async fn create(&self, name: &str) -> Result<Amenity, sqlx::Error> {
        let amenity = sqlx::query_as::<_, Amenity>(
            "INSERT INTO amenities (name) VALUES ($1) RETURNING id, name",
        )
        .bind(name)
        .fetch_one(&self.pool)
        .await?;

        log::debug!("Amenity created: {}", amenity.id);
        Ok(amenity)
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Amenity>, sqlx::Error> {
        sqlx::query_as::<_, Amenity>("SELECT id, name FROM amenities WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Amenity>, sqlx::Error> {
        sqlx::query_as::<_, Amenity>("SELECT id, name FROM amenities WHERE name = $1")
            .bind(name)
            .fetch_optional(&self.pool)
            .await
    }

    async fn find_by_names(&self, names: &[String]) -> Result<Vec<Amenity>, sqlx::Error> {
        if names.is_empty() {
            return Ok(Vec::new());
        }

        sqlx::query_as::<_, Amenity>("SELECT id, name FROM amenities WHERE name = ANY($1) ORDER BY id")
            .bind(names.to_vec())
            .fetch_all(&self.pool)
            .await
    }

    async fn find_all(&self) -> Result<Vec<Amenity>, sqlx::Error> {
        sqlx::query_as::<_, Amenity>("SELECT id, name FROM amenities ORDER BY id")
            .fetch_all(&self.pool)
            .await
    }
}
