use serde::{Deserialize, Serialize};

/// Transport form of a reservation. Dates use the `dd-MM-yyyy HH:mm` format.
///
/// `amount` is ignored on input and recomputed from the hotel rate.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ReservationDto {
    pub id: i32,
    pub start_date: String,
    pub end_date: String,
    pub user_id: i32,
    pub hotel_id: i32,
    pub amount: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct UserReservationsDto {
    pub user_id: i32,
    pub reservations: Vec<ReservationDto>,
}

/// Reservations of a hotel along with the hotel's current attributes.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct HotelReservationsDto {
    pub hotel_id: i32,
    pub hotel_name: String,
    pub hotel_room_amount: i32,
    pub hotel_description: String,
    pub hotel_street_name: String,
    pub hotel_street_number: i32,
    pub hotel_rate: f64,
    pub reservations: Vec<ReservationDto>,
}

#[derive(Debug, Deserialize)]
pub struct DateRangeQuery {
    pub start_date: String,
    pub end_date: String,
}
