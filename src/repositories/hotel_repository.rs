use async_trait::async_trait;
use chrono::NaiveDateTime;
use sqlx::{PgPool, Postgres, Transaction};

use crate::{
    models::hotel::{Amenity, Hotel, Image, NewHotel},
    repositories::{HotelRepository, HotelUpdate},
    reservations::availability,
};

pub struct PgHotelRepository {
    pool: PgPool,
}

impl PgHotelRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn load_relations(&self, mut hotel: Hotel) -> Result<Hotel, sqlx::Error> {
        hotel.amenities = sqlx::query_as::<_, Amenity>(
            r#"
            SELECT a.id, a.name
            FROM amenities a
            JOIN hotel_amenities ha ON ha.amenity_id = a.id
            WHERE ha.hotel_id = $1
            ORDER BY a.id
            "#,
        )
        .bind(hotel.id)
        .fetch_all(&self.pool)
        .await?;

        // insertion order
        hotel.images = sqlx::query_as::<_, Image>(
            "SELECT id, path, hotel_id FROM images WHERE hotel_id = $1 ORDER BY id",
        )
        .bind(hotel.id)
        .fetch_all(&self.pool)
        .await?;

        Ok(hotel)
    }
}

async fn link_amenities(
    tx: &mut Transaction<'_, Postgres>,
    hotel_id: i32,
    amenity_ids: &[i32],
) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM hotel_amenities WHERE hotel_id = $1")
        .bind(hotel_id)
        .execute(&mut **tx)
        .await?;

    if amenity_ids.is_empty() {
        return Ok(());
    }

    sqlx::query(
        r#"
        INSERT INTO hotel_amenities (hotel_id, amenity_id)
        SELECT $1, amenity_id FROM UNNEST($2::int[]) AS amenity_id
        ON CONFLICT DO NOTHING
        "#,
    )
    .bind(hotel_id)
    .bind(amenity_ids.to_vec())
    .execute(&mut **tx)
    .await?;

    Ok(())
}

#[async_trait]
impl HotelRepository for PgHotelRepository {
    async fn create(&self, hotel: NewHotel, amenity_ids: &[i32]) -> Result<Hotel, sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        let created = sqlx::query_as::<_, Hotel>(
            r#"
            INSERT INTO hotels (name, room_amount, description, street_name, street_number, rate)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, name, room_amount, description, street_name, street_number, rate
            "#,
        )
        .bind(&hotel.name)
        .bind(hotel.room_amount)
        .bind(&hotel.description)
        .bind(&hotel.street_name)
        .bind(hotel.street_number)
        .bind(hotel.rate)
        .fetch_one(&mut *tx)
        .await?;

        link_amenities(&mut tx, created.id, amenity_ids).await?;
        tx.commit().await?;

        log::debug!("Hotel created: {}", created.id);
        self.load_relations(created).await
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Hotel>, sqlx::Error> {
        let hotel = sqlx::query_as::<_, Hotel>(
            r#"
            SELECT id, name, room_amount, description, street_name, street_number, rate
            FROM hotels
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        match hotel {
            Some(hotel) => Ok(Some(self.load_relations(hotel).await?)),
            None => Ok(None),
        }
    }

    async fn find_all(&self) -> Result<Vec<Hotel>, sqlx::Error> {
        let hotels = sqlx::query_as::<_, Hotel>(
            r#"
            SELECT id, name, room_amount, description, street_name, street_number, rate
            FROM hotels
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        let mut loaded = Vec::with_capacity(hotels.len());
        for hotel in hotels {
            loaded.push(self.load_relations(hotel).await?);
        }

        log::debug!("Hotels: {}", loaded.len());
        Ok(loaded)
    }

    async fn update(
        &self,
        id: i32,
        hotel: NewHotel,
        amenity_ids: &[i32],
    ) -> Result<HotelUpdate, sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        // serializes with create_if_available on the same hotel
        let locked: Option<i32> = sqlx::query_scalar("SELECT id FROM hotels WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;
        if locked.is_none() {
            return Ok(HotelUpdate::NotFound);
        }

        let stays = sqlx::query_as::<_, (NaiveDateTime, NaiveDateTime)>(
            "SELECT start_date, end_date FROM reservations WHERE hotel_id = $1",
        )
        .bind(id)
        .fetch_all(&mut *tx)
        .await?;

        let peak = availability::peak_concurrency(stays.into_iter().map(|(start, end)| start..end));
        if peak > hotel.room_amount.max(0) as usize {
            log::debug!("Hotel {} keeps {} overlapping reservations", id, peak);
            return Ok(HotelUpdate::Overbooked { peak });
        }

        let updated = sqlx::query_as::<_, Hotel>(
            r#"
            UPDATE hotels
            SET name = $2,
                room_amount = $3,
                description = $4,
                street_name = $5,
                street_number = $6,
                rate = $7
            WHERE id = $1
            RETURNING id, name, room_amount, description, street_name, street_number, rate
            "#,
        )
        .bind(id)
        .bind(&hotel.name)
        .bind(hotel.room_amount)
        .bind(&hotel.description)
        .bind(&hotel.street_name)
        .bind(hotel.street_number)
        .bind(hotel.rate)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(updated) = updated else {
            return Ok(HotelUpdate::NotFound);
        };

        link_amenities(&mut tx, id, amenity_ids).await?;
        tx.commit().await?;

        Ok(HotelUpdate::Updated(self.load_relations(updated).await?))
    }

    async fn delete(&self, id: i32) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM hotels WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
