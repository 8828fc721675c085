use std::{ops::Range, sync::Arc};

use chrono::{Duration, NaiveDateTime};
use tracing::{error, info, warn};

use crate::{
    commons::{
        clock::Clock,
        dates::{parse_stay, parse_window},
        errors::ServiceError,
    },
    models::{
        hotel::{Hotel, HotelDto},
        mapper::reservations_to_dto,
        reservation::NewReservation,
    },
    repositories::{HotelRepository, UserRepository},
    reservations::{
        availability,
        dto::reservation_dto::{HotelReservationsDto, ReservationDto, UserReservationsDto},
        reservation_repository::ReservationRepository,
    },
};

/// Minimum notice required to cancel a reservation.
pub const CANCELLATION_NOTICE_HOURS: i64 = 48;

pub struct ReservationService {
    reservations: Arc<dyn ReservationRepository>,
    users: Arc<dyn UserRepository>,
    hotels: Arc<dyn HotelRepository>,
    clock: Arc<dyn Clock>,
}

impl ReservationService {
    pub fn new(
        reservations: Arc<dyn ReservationRepository>,
        users: Arc<dyn UserRepository>,
        hotels: Arc<dyn HotelRepository>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            reservations,
            users,
            hotels,
            clock,
        }
    }

    pub async fn insert_reservation(
        &self,
        request: ReservationDto,
    ) -> Result<ReservationDto, ServiceError> {
        if !self.user_exists(request.user_id).await? {
            return Err(ServiceError::UserNotFound);
        }

        let hotel = self
            .find_hotel(request.hotel_id)
            .await?
            .ok_or(ServiceError::HotelNotFound)?;

        let stay = parse_stay(&request.start_date, &request.end_date)?;

        if !self.check_availability(&hotel, &stay).await? {
            return Err(ServiceError::NoRoomsAvailable);
        }

        let amount = availability::amount(hotel.rate, &stay);

        let created = self
            .reservations
            .create_if_available(NewReservation {
                start_date: stay.start,
                end_date: stay.end,
                user_id: request.user_id,
                hotel_id: hotel.id,
                amount,
            })
            .await
            .map_err(|e| {
                error!(error = %e, hotel_id = hotel.id, "failed to insert reservation");
                ServiceError::CreationFailed("reservation")
            })?
            // lost a race for the last room
            .ok_or(ServiceError::NoRoomsAvailable)?;

        info!(reservation_id = created.id, hotel_id = hotel.id, amount, "reservation created");
        Ok(created.into())
    }

    pub async fn get_reservation_by_id(&self, id: i32) -> Result<ReservationDto, ServiceError> {
        let reservation = self
            .reservations
            .find_by_id(id)
            .await
            .map_err(|e| self.fetch_failed(e))?
            .ok_or(ServiceError::ReservationNotFound)?;

        Ok(reservation.into())
    }

    pub async fn get_reservations(&self) -> Result<Vec<ReservationDto>, ServiceError> {
        let reservations = self
            .reservations
            .find_all()
            .await
            .map_err(|e| self.fetch_failed(e))?;

        Ok(reservations_to_dto(reservations))
    }

    pub async fn get_reservations_by_user(
        &self,
        user_id: i32,
    ) -> Result<UserReservationsDto, ServiceError> {
        if !self.user_exists(user_id).await? {
            return Err(ServiceError::UserNotFound);
        }

        let reservations = self
            .reservations
            .find_by_user(user_id)
            .await
            .map_err(|e| self.fetch_failed(e))?;

        Ok(UserReservationsDto {
            user_id,
            reservations: reservations_to_dto(reservations),
        })
    }

    pub async fn get_reservations_by_user_range(
        &self,
        user_id: i32,
        start_date: &str,
        end_date: &str,
    ) -> Result<Vec<ReservationDto>, ServiceError> {
        let window = parse_window(start_date, end_date)?;

        let reservations = self
            .reservations
            .find_by_user_starting_between(user_id, window.start, window.end)
            .await
            .map_err(|e| self.fetch_failed(e))?;

        Ok(reservations_to_dto(reservations))
    }

    pub async fn get_reservations_by_hotel(
        &self,
        hotel_id: i32,
    ) -> Result<HotelReservationsDto, ServiceError> {
        let hotel = self
            .find_hotel(hotel_id)
            .await?
            .ok_or(ServiceError::HotelNotFound)?;

        let reservations = self
            .reservations
            .find_by_hotel(hotel_id)
            .await
            .map_err(|e| self.fetch_failed(e))?;

        Ok(HotelReservationsDto::new(hotel, reservations))
    }

    /// Whether `hotel_id` has a free room for the whole `[start, end]` window.
    pub async fn check_availability_by_id(
        &self,
        hotel_id: i32,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<bool, ServiceError> {
        match self.find_hotel(hotel_id).await? {
            Some(hotel) => self.check_availability(&hotel, &(start..end)).await,
            None => Ok(false),
        }
    }

    pub async fn check_all_availability(
        &self,
        start_date: &str,
        end_date: &str,
    ) -> Result<Vec<HotelDto>, ServiceError> {
        let window = parse_window(start_date, end_date)?;

        let hotels = self.hotels.find_all().await.map_err(|e| {
            error!(error = %e, "failed to fetch hotels");
            ServiceError::FetchFailed("hotels")
        })?;

        let mut available = Vec::new();
        for hotel in hotels {
            if self.check_availability(&hotel, &window).await? {
                available.push(HotelDto::from(hotel));
            }
        }

        Ok(available)
    }

    pub async fn delete_reservation(&self, id: i32) -> Result<(), ServiceError> {
        let reservation = self
            .reservations
            .find_by_id(id)
            .await
            .map_err(|e| self.fetch_failed(e))?
            .ok_or(ServiceError::ReservationNotFound)?;

        let deadline = self.clock.now() + Duration::hours(CANCELLATION_NOTICE_HOURS);
        if reservation.start_date < deadline {
            warn!(reservation_id = id, "cancellation requested inside notice window");
            return Err(ServiceError::CancellationWindowClosed);
        }

        match self.reservations.delete(id).await {
            Ok(true) => {
                info!(reservation_id = id, "reservation deleted");
                Ok(())
            }
            Ok(false) => Err(ServiceError::ReservationDeleteFailed),
            Err(e) => {
                error!(error = %e, reservation_id = id, "failed to delete reservation");
                Err(ServiceError::ReservationDeleteFailed)
            }
        }
    }

    async fn check_availability(
        &self,
        hotel: &Hotel,
        window: &Range<NaiveDateTime>,
    ) -> Result<bool, ServiceError> {
        let booked = self
            .reservations
            .find_by_hotel(hotel.id)
            .await
            .map_err(|e| self.fetch_failed(e))?;

        Ok(availability::is_available(
            hotel.room_amount,
            booked.iter().map(|r| r.stay()),
            window,
        ))
    }

    async fn user_exists(&self, id: i32) -> Result<bool, ServiceError> {
        let user = self.users.find_by_id(id).await.map_err(|e| {
            error!(error = %e, user_id = id, "failed to fetch user");
            ServiceError::FetchFailed("user")
        })?;
        Ok(user.is_some())
    }

    async fn find_hotel(&self, id: i32) -> Result<Option<Hotel>, ServiceError> {
        self.hotels.find_by_id(id).await.map_err(|e| {
            error!(error = %e, hotel_id = id, "failed to fetch hotel");
            ServiceError::FetchFailed("hotel")
        })
    }

    fn fetch_failed(&self, e: sqlx::Error) -> ServiceError {
        error!(error = %e, "failed to fetch reservations");
        ServiceError::FetchFailed("reservations")
    }
}
