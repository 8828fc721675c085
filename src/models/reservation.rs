use std::ops::Range;

use chrono::NaiveDateTime;
use sqlx::FromRow;

#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct Reservation {
    pub id: i32,
    pub start_date: NaiveDateTime,
    pub end_date: NaiveDateTime,
    pub user_id: i32,
    pub hotel_id: i32,
    pub amount: f64,
}

impl Reservation {
    /// The booked interval, half-open.
    pub fn stay(&self) -> Range<NaiveDateTime> {
        self.start_date..self.end_date
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewReservation {
    pub start_date: NaiveDateTime,
    pub end_date: NaiveDateTime,
    pub user_id: i32,
    pub hotel_id: i32,
    pub amount: f64,
}
