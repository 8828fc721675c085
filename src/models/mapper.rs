use crate::{
    commons::dates::format_date,
    models::{
        hotel::{Amenity, AmenityDto, Hotel, HotelDto, Image, ImageDto, NewHotel},
        reservation::Reservation,
        user::{User, UserDto},
    },
    reservations::dto::reservation_dto::{HotelReservationsDto, ReservationDto},
};

impl From<Amenity> for AmenityDto {
    fn from(amenity: Amenity) -> Self {
        Self {
            id: amenity.id,
            name: amenity.name,
        }
    }
}

impl From<Image> for ImageDto {
    fn from(image: Image) -> Self {
        Self {
            id: image.id,
            path: image.path,
            hotel_id: image.hotel_id,
        }
    }
}

impl From<Hotel> for HotelDto {
    fn from(hotel: Hotel) -> Self {
        Self {
            id: hotel.id,
            name: hotel.name,
            room_amount: hotel.room_amount,
            description: hotel.description,
            street_name: hotel.street_name,
            street_number: hotel.street_number,
            rate: hotel.rate,
            amenities: hotel.amenities.into_iter().map(|a| a.name).collect(),
            images: hotel.images.into_iter().map(ImageDto::from).collect(),
        }
    }
}

impl From<&HotelDto> for NewHotel {
    fn from(dto: &HotelDto) -> Self {
        Self {
            name: dto.name.clone(),
            room_amount: dto.room_amount,
            description: dto.description.clone(),
            street_name: dto.street_name.clone(),
            street_number: dto.street_number,
            rate: dto.rate,
        }
    }
}

/// The password hash never leaves the service.
impl From<User> for UserDto {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            last_name: user.last_name,
            dni: user.dni,
            email: user.email,
            password: String::new(),
            role: user.role,
        }
    }
}

impl From<Reservation> for ReservationDto {
    fn from(reservation: Reservation) -> Self {
        Self {
            id: reservation.id,
            start_date: format_date(&reservation.start_date),
            end_date: format_date(&reservation.end_date),
            user_id: reservation.user_id,
            hotel_id: reservation.hotel_id,
            amount: reservation.amount,
        }
    }
}

pub fn reservations_to_dto(reservations: Vec<Reservation>) -> Vec<ReservationDto> {
    reservations.into_iter().map(ReservationDto::from).collect()
}

impl HotelReservationsDto {
    pub fn new(hotel: Hotel, reservations: Vec<Reservation>) -> Self {
        Self {
            hotel_id: hotel.id,
            hotel_name: hotel.name,
            hotel_room_amount: hotel.room_amount,
            hotel_description: hotel.description,
            hotel_street_name: hotel.street_name,
            hotel_street_number: hotel.street_number,
            hotel_rate: hotel.rate,
            reservations: reservations_to_dto(reservations),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn hotel() -> Hotel {
        Hotel {
            id: 1,
            name: "Hotel 1".to_string(),
            room_amount: 2,
            description: "Hotel 1 Description".to_string(),
            street_name: "Hotel 1 Street".to_string(),
            street_number: 10,
            rate: 10000.0,
            amenities: vec![],
            images: vec![
                Image { id: 5, path: "b.jpg".to_string(), hotel_id: 1 },
                Image { id: 2, path: "a.jpg".to_string(), hotel_id: 1 },
            ],
        }
    }

    #[test]
    fn user_payload_should_never_contain_password() {
        let user = User {
            id: 1,
            name: "John".to_string(),
            last_name: "Doe".to_string(),
            dni: "123456".to_string(),
            email: "johndoe@email.com".to_string(),
            password_hash: "$argon2id$v=19$secret".to_string(),
            role: "Customer".to_string(),
        };

        let json = serde_json::to_value(UserDto::from(user)).unwrap();
        let object = json.as_object().unwrap();

        assert!(!object.contains_key("password"));
        assert!(!object.contains_key("password_hash"));
        assert!(!json.to_string().contains("argon2"));
        assert_eq!(json["role"], "Customer");
    }

    #[test]
    fn hotel_should_keep_image_order_and_empty_amenities() {
        let dto = HotelDto::from(hotel());
        let json = serde_json::to_value(&dto).unwrap();

        assert_eq!(json["amenities"], serde_json::json!([]));
        let paths: Vec<&str> = dto.images.iter().map(|i| i.path.as_str()).collect();
        assert_eq!(paths, vec!["b.jpg", "a.jpg"]);
    }

    #[test]
    fn reservation_dates_should_use_wire_format() {
        let reservation = Reservation {
            id: 3,
            start_date: NaiveDate::from_ymd_opt(2024, 2, 1).unwrap().and_hms_opt(10, 0, 0).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2024, 2, 11).unwrap().and_hms_opt(10, 0, 0).unwrap(),
            user_id: 1,
            hotel_id: 1,
            amount: 100000.0,
        };

        let dto = ReservationDto::from(reservation);
        assert_eq!(dto.start_date, "01-02-2024 10:00");
        assert_eq!(dto.end_date, "11-02-2024 10:00");
    }

    #[test]
    fn hotel_reservations_should_snapshot_hotel() {
        let dto = HotelReservationsDto::new(hotel(), vec![]);
        assert_eq!(dto.hotel_id, 1);
        assert_eq!(dto.hotel_name, "Hotel 1");
        assert_eq!(dto.hotel_room_amount, 2);
        assert_eq!(dto.hotel_rate, 10000.0);
        assert!(dto.reservations.is_empty());
    }
}
