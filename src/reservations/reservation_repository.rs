use async_trait::async_trait;
use chrono::NaiveDateTime;
use sqlx::PgPool;

use crate::{
    models::reservation::{NewReservation, Reservation},
    reservations::availability,
};

#[async_trait]
pub trait ReservationRepository: Send + Sync {
    /// Inserts the reservation only if the hotel still has a free room for the
    /// whole stay, evaluated atomically with the insert.
    ///
    /// `Ok(None)` means the hotel is full (or gone).
    async fn create_if_available(
        &self,
        reservation: NewReservation,
    ) -> Result<Option<Reservation>, sqlx::Error>;
    async fn find_by_id(&self, id: i32) -> Result<Option<Reservation>, sqlx::Error>;
    async fn find_all(&self) -> Result<Vec<Reservation>, sqlx::Error>;
    async fn find_by_user(&self, user_id: i32) -> Result<Vec<Reservation>, sqlx::Error>;
    async fn find_by_hotel(&self, hotel_id: i32) -> Result<Vec<Reservation>, sqlx::Error>;
    /// Reservations of the user starting inside `[from, to]`.
    async fn find_by_user_starting_between(
        &self,
        user_id: i32,
        from: NaiveDateTime,
        to: NaiveDateTime,
    ) -> Result<Vec<Reservation>, sqlx::Error>;
    async fn delete(&self, id: i32) -> Result<bool, sqlx::Error>;
}

pub struct PgReservationRepository {
    pool: PgPool,
}

impl PgReservationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const RESERVATION_COLUMNS: &str = "id, start_date, end_date, user_id, hotel_id, amount";

#[async_trait]
impl ReservationRepository for PgReservationRepository {
    async fn create_if_available(
        &self,
        reservation: NewReservation,
    ) -> Result<Option<Reservation>, sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        // the row lock serializes concurrent bookings of the same hotel
        let room_amount: Option<i32> =
            sqlx::query_scalar("SELECT room_amount FROM hotels WHERE id = $1 FOR UPDATE")
                .bind(reservation.hotel_id)
                .fetch_optional(&mut *tx)
                .await?;

        let Some(room_amount) = room_amount else {
            return Ok(None);
        };

        let booked = sqlx::query_as::<_, Reservation>(&format!(
            "SELECT {} FROM reservations WHERE hotel_id = $1 AND end_date > $2 AND start_date < $3",
            RESERVATION_COLUMNS
        ))
        .bind(reservation.hotel_id)
        .bind(reservation.start_date)
        .bind(reservation.end_date)
        .fetch_all(&mut *tx)
        .await?;

        let requested = reservation.start_date..reservation.end_date;
        if !availability::is_available(room_amount, booked.iter().map(Reservation::stay), &requested) {
            log::debug!("Hotel {} is full for {:?}", reservation.hotel_id, requested);
            return Ok(None);
        }

        let created = sqlx::query_as::<_, Reservation>(&format!(
            r#"
            INSERT INTO reservations (start_date, end_date, user_id, hotel_id, amount)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {}
            "#,
            RESERVATION_COLUMNS
        ))
        .bind(reservation.start_date)
        .bind(reservation.end_date)
        .bind(reservation.user_id)
        .bind(reservation.hotel_id)
        .bind(reservation.amount)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        log::debug!("Reservation created: {}", created.id);
        Ok(Some(created))
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Reservation>, sqlx::Error> {
        sqlx::query_as::<_, Reservation>(&format!(
            "SELECT {} FROM reservations WHERE id = $1",
            RESERVATION_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
    }

    async fn find_all(&self) -> Result<Vec<Reservation>, sqlx::Error> {
        sqlx::query_as::<_, Reservation>(&format!(
            "SELECT {} FROM reservations ORDER BY id",
            RESERVATION_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await
    }

    async fn find_by_user(&self, user_id: i32) -> Result<Vec<Reservation>, sqlx::Error> {
        sqlx::query_as::<_, Reservation>(&format!(
            "SELECT {} FROM reservations WHERE user_id = $1 ORDER BY start_date, id",
            RESERVATION_COLUMNS
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
    }

    async fn find_by_hotel(&self, hotel_id: i32) -> Result<Vec<Reservation>, sqlx::Error> {
        sqlx::query_as::<_, Reservation>(&format!(
            "SELECT {} FROM reservations WHERE hotel_id = $1 ORDER BY start_date, id",
            RESERVATION_COLUMNS
        ))
        .bind(hotel_id)
        .fetch_all(&self.pool)
        .await
    }

    async fn find_by_user_starting_between(
        &self,
        user_id: i32,
        from: NaiveDateTime,
        to: NaiveDateTime,
    ) -> Result<Vec<Reservation>, sqlx::Error> {
        sqlx::query_as::<_, Reservation>(&format!(
            r#"
            SELECT {}
            FROM reservations
            WHERE user_id = $1 AND start_date >= $2 AND start_date <= $3
            ORDER BY start_date, id
            "#,
            RESERVATION_COLUMNS
        ))
        .bind(user_id)
        .bind(from)
        .bind(to)
        .fetch_all(&self.pool)
        .await
    }

    async fn delete(&self, id: i32) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM reservations WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
