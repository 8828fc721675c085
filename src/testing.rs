//! In-memory persistence and a fixed clock for unit and handler tests.

use std::{
    fmt,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc, Mutex, MutexGuard, OnceLock,
    },
};

use actix_web::web;
use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use tracing::{
    field::{Field, Visit},
    Event, Subscriber,
};
use tracing_subscriber::{
    layer::{Context, SubscriberExt},
    registry::LookupSpan,
    Layer,
};

use crate::{
    commons::{clock::Clock, dates::parse_date, errors::path_error_handler},
    models::{
        hotel::{Amenity, Hotel, Image, NewHotel},
        reservation::{NewReservation, Reservation},
        user::{NewUser, User, DEFAULT_ROLE},
    },
    repositories::{AmenityRepository, HotelRepository, HotelUpdate, ImageRepository, UserRepository},
    reservations::{
        availability, reservation_repository::ReservationRepository,
        reservation_service::ReservationService,
    },
    services::{
        amenity_service::AmenityService,
        auth_service::{hash_password, AuthService},
        hotel_service::HotelService,
        image_service::ImageService,
        metrics_service::MetricsService,
        user_service::UserService,
    },
};

pub const JWT_SECRET: &str = "test-secret";
pub const PASSWORD: &str = "password1";

/// The instant every test runs at.
pub fn now() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2023, 6, 1)
        .and_then(|d| d.and_hms_opt(12, 0, 0))
        .unwrap()
}

/// Hashed once, argon2 is slow in debug builds.
fn password_hash() -> &'static str {
    static HASH: OnceLock<String> = OnceLock::new();
    HASH.get_or_init(|| hash_password(PASSWORD).unwrap())
}

pub struct FixedClock(pub NaiveDateTime);

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}

#[derive(Default)]
struct Tables {
    last_id: i32,
    users: Vec<User>,
    hotels: Vec<Hotel>,
    amenities: Vec<Amenity>,
    hotel_amenities: Vec<(i32, i32)>,
    images: Vec<Image>,
    reservations: Vec<Reservation>,
}

impl Tables {
    fn next_id(&mut self) -> i32 {
        self.last_id += 1;
        self.last_id
    }

    fn hotel_with_relations(&self, hotel: &Hotel) -> Hotel {
        let id = hotel.id;
        let mut hotel = hotel.clone();
        hotel.amenities = self
            .amenities
            .iter()
            .filter(|a| self.hotel_amenities.contains(&(id, a.id)))
            .cloned()
            .collect();
        hotel.images = self
            .images
            .iter()
            .filter(|i| i.hotel_id == id)
            .cloned()
            .collect();
        hotel
    }

    fn link(&mut self, hotel_id: i32, amenity_ids: &[i32]) {
        self.hotel_amenities.retain(|(h, _)| *h != hotel_id);
        for id in amenity_ids {
            if !self.hotel_amenities.contains(&(hotel_id, *id)) {
                self.hotel_amenities.push((hotel_id, *id));
            }
        }
    }
}

/// One shared store behind every repository trait, so cross-table
/// operations stay atomic under a single lock.
#[derive(Default)]
pub struct InMemoryDb {
    tables: Mutex<Tables>,
    failing: AtomicBool,
}

impl InMemoryDb {
    /// Every later write fails with a database error.
    pub fn fail_writes(&self) {
        self.failing.store(true, Ordering::SeqCst);
    }

    fn tables(&self) -> MutexGuard<'_, Tables> {
        self.tables.lock().unwrap()
    }

    fn check_writable(&self) -> Result<(), sqlx::Error> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(sqlx::Error::Protocol("write rejected".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl UserRepository for InMemoryDb {
    async fn create(&self, user: NewUser) -> Result<User, sqlx::Error> {
        self.check_writable()?;
        let mut tables = self.tables();
        if tables.users.iter().any(|u| u.email == user.email) {
            return Err(sqlx::Error::Protocol("duplicate email".to_string()));
        }
        let user = User {
            id: tables.next_id(),
            name: user.name,
            last_name: user.last_name,
            dni: user.dni,
            email: user.email,
            password_hash: user.password_hash,
            role: user.role,
        };
        tables.users.push(user.clone());
        Ok(user)
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<User>, sqlx::Error> {
        Ok(self.tables().users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, sqlx::Error> {
        Ok(self.tables().users.iter().find(|u| u.email == email).cloned())
    }

    async fn find_all(&self) -> Result<Vec<User>, sqlx::Error> {
        Ok(self.tables().users.clone())
    }
}

#[async_trait]
impl HotelRepository for InMemoryDb {
    async fn create(&self, hotel: NewHotel, amenity_ids: &[i32]) -> Result<Hotel, sqlx::Error> {
        self.check_writable()?;
        let mut tables = self.tables();
        let hotel = Hotel {
            id: tables.next_id(),
            name: hotel.name,
            room_amount: hotel.room_amount,
            description: hotel.description,
            street_name: hotel.street_name,
            street_number: hotel.street_number,
            rate: hotel.rate,
            amenities: vec![],
            images: vec![],
        };
        tables.hotels.push(hotel.clone());
        tables.link(hotel.id, amenity_ids);
        Ok(tables.hotel_with_relations(&hotel))
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Hotel>, sqlx::Error> {
        let tables = self.tables();
        Ok(tables
            .hotels
            .iter()
            .find(|h| h.id == id)
            .map(|h| tables.hotel_with_relations(h)))
    }

    async fn find_all(&self) -> Result<Vec<Hotel>, sqlx::Error> {
        let tables = self.tables();
        Ok(tables.hotels.iter().map(|h| tables.hotel_with_relations(h)).collect())
    }

    async fn update(
        &self,
        id: i32,
        hotel: NewHotel,
        amenity_ids: &[i32],
    ) -> Result<HotelUpdate, sqlx::Error> {
        self.check_writable()?;
        let mut tables = self.tables();
        if !tables.hotels.iter().any(|h| h.id == id) {
            return Ok(HotelUpdate::NotFound);
        }

        let peak = availability::peak_concurrency(
            tables
                .reservations
                .iter()
                .filter(|r| r.hotel_id == id)
                .map(Reservation::stay),
        );
        if peak > hotel.room_amount.max(0) as usize {
            return Ok(HotelUpdate::Overbooked { peak });
        }

        let Some(stored) = tables.hotels.iter_mut().find(|h| h.id == id) else {
            return Ok(HotelUpdate::NotFound);
        };
        stored.name = hotel.name;
        stored.room_amount = hotel.room_amount;
        stored.description = hotel.description;
        stored.street_name = hotel.street_name;
        stored.street_number = hotel.street_number;
        stored.rate = hotel.rate;
        let updated = stored.clone();
        tables.link(id, amenity_ids);
        Ok(HotelUpdate::Updated(tables.hotel_with_relations(&updated)))
    }

    async fn delete(&self, id: i32) -> Result<bool, sqlx::Error> {
        self.check_writable()?;
        let mut tables = self.tables();
        if tables.reservations.iter().any(|r| r.hotel_id == id) {
            return Err(sqlx::Error::Protocol("hotel is referenced by reservations".to_string()));
        }
        let before = tables.hotels.len();
        tables.hotels.retain(|h| h.id != id);
        if tables.hotels.len() == before {
            return Ok(false);
        }
        tables.images.retain(|i| i.hotel_id != id);
        tables.hotel_amenities.retain(|(h, _)| *h != id);
        Ok(true)
    }
}

#[async_trait]
impl AmenityRepository for InMemoryDb {
    async fn create(&self, name: &str) -> Result<Amenity, sqlx::Error> {
        self.check_writable()?;
        let mut tables = self.tables();
        if tables.amenities.iter().any(|a| a.name == name) {
            return Err(sqlx::Error::Protocol("duplicate amenity".to_string()));
        }
        let amenity = Amenity {
            id: tables.next_id(),
            name: name.to_string(),
        };
        tables.amenities.push(amenity.clone());
        Ok(amenity)
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Amenity>, sqlx::Error> {
        Ok(self.tables().amenities.iter().find(|a| a.id == id).cloned())
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Amenity>, sqlx::Error> {
        Ok(self.tables().amenities.iter().find(|a| a.name == name).cloned())
    }

    async fn find_by_names(&self, names: &[String]) -> Result<Vec<Amenity>, sqlx::Error> {
        Ok(self
            .tables()
            .amenities
            .iter()
            .filter(|a| names.contains(&a.name))
            .cloned()
            .collect())
    }

    async fn find_all(&self) -> Result<Vec<Amenity>, sqlx::Error> {
        Ok(self.tables().amenities.clone())
    }
}

#[async_trait]
impl ImageRepository for InMemoryDb {
    async fn create_many(&self, hotel_id: i32, paths: &[String]) -> Result<Vec<Image>, sqlx::Error> {
        self.check_writable()?;
        let mut tables = self.tables();
        let mut created = Vec::with_capacity(paths.len());
        for path in paths {
            let image = Image {
                id: tables.next_id(),
                path: path.clone(),
                hotel_id,
            };
            tables.images.push(image.clone());
            created.push(image);
        }
        Ok(created)
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Image>, sqlx::Error> {
        Ok(self.tables().images.iter().find(|i| i.id == id).cloned())
    }

    async fn find_by_hotel(&self, hotel_id: i32) -> Result<Vec<Image>, sqlx::Error> {
        Ok(self
            .tables()
            .images
            .iter()
            .filter(|i| i.hotel_id == hotel_id)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl ReservationRepository for InMemoryDb {
    async fn create_if_available(
        &self,
        reservation: NewReservation,
    ) -> Result<Option<Reservation>, sqlx::Error> {
        self.check_writable()?;
        let mut tables = self.tables();
        let Some(room_amount) = tables
            .hotels
            .iter()
            .find(|h| h.id == reservation.hotel_id)
            .map(|h| h.room_amount)
        else {
            return Ok(None);
        };

        let requested = reservation.start_date..reservation.end_date;
        let booked = tables
            .reservations
            .iter()
            .filter(|r| r.hotel_id == reservation.hotel_id)
            .map(Reservation::stay);
        if !availability::is_available(room_amount, booked, &requested) {
            return Ok(None);
        }

        let created = Reservation {
            id: tables.next_id(),
            start_date: reservation.start_date,
            end_date: reservation.end_date,
            user_id: reservation.user_id,
            hotel_id: reservation.hotel_id,
            amount: reservation.amount,
        };
        tables.reservations.push(created.clone());
        Ok(Some(created))
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Reservation>, sqlx::Error> {
        Ok(self.tables().reservations.iter().find(|r| r.id == id).cloned())
    }

    async fn find_all(&self) -> Result<Vec<Reservation>, sqlx::Error> {
        Ok(self.tables().reservations.clone())
    }

    async fn find_by_user(&self, user_id: i32) -> Result<Vec<Reservation>, sqlx::Error> {
        Ok(self
            .tables()
            .reservations
            .iter()
            .filter(|r| r.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn find_by_hotel(&self, hotel_id: i32) -> Result<Vec<Reservation>, sqlx::Error> {
        Ok(self
            .tables()
            .reservations
            .iter()
            .filter(|r| r.hotel_id == hotel_id)
            .cloned()
            .collect())
    }

    async fn find_by_user_starting_between(
        &self,
        user_id: i32,
        from: NaiveDateTime,
        to: NaiveDateTime,
    ) -> Result<Vec<Reservation>, sqlx::Error> {
        Ok(self
            .tables()
            .reservations
            .iter()
            .filter(|r| r.user_id == user_id && r.start_date >= from && r.start_date <= to)
            .cloned()
            .collect())
    }

    async fn delete(&self, id: i32) -> Result<bool, sqlx::Error> {
        self.check_writable()?;
        let mut tables = self.tables();
        let before = tables.reservations.len();
        tables.reservations.retain(|r| r.id != id);
        Ok(tables.reservations.len() < before)
    }
}

pub struct Fixture {
    pub db: Arc<InMemoryDb>,
    pub clock: Arc<FixedClock>,
}

impl Fixture {
    pub fn empty() -> Self {
        Self {
            db: Arc::new(InMemoryDb::default()),
            clock: Arc::new(FixedClock(now())),
        }
    }

    /// Users 1 and 2 plus four hotels: hotel 1 has 2 rooms at 10000,
    /// hotel 2 has 10 rooms, hotel 3 a single room and hotel 4 none.
    pub fn seeded() -> Self {
        let fixture = Self::empty();
        fixture.add_user("John", "johndoe@email.com");
        fixture.add_user("Jane", "janedoe@email.com");
        fixture.add_hotel("Hotel 1", 2, 10000.0);
        fixture.add_hotel("Hotel 2", 10, 10000.0);
        fixture.add_hotel("Hotel 3", 1, 5000.0);
        fixture.add_hotel("Hotel 4", 0, 5000.0);
        fixture
    }

    pub fn add_user(&self, name: &str, email: &str) -> i32 {
        let mut tables = self.db.tables();
        let id = tables.users.len() as i32 + 1;
        tables.users.push(User {
            id,
            name: name.to_string(),
            last_name: "Doe".to_string(),
            dni: format!("{}", 123456 * id),
            email: email.to_string(),
            password_hash: password_hash().to_string(),
            role: DEFAULT_ROLE.to_string(),
        });
        tables.last_id = tables.last_id.max(id);
        id
    }

    pub fn add_hotel(&self, name: &str, room_amount: i32, rate: f64) -> i32 {
        let mut tables = self.db.tables();
        let id = tables.hotels.len() as i32 + 1;
        tables.hotels.push(Hotel {
            id,
            name: name.to_string(),
            room_amount,
            description: format!("{} Description", name),
            street_name: format!("{} Street", name),
            street_number: 10,
            rate,
            amenities: vec![],
            images: vec![],
        });
        tables.last_id = tables.last_id.max(id);
        id
    }

    /// Stores a reservation directly, skipping every check.
    pub fn book(&self, hotel_id: i32, user_id: i32, start: &str, end: &str) -> i32 {
        self.book_at(
            hotel_id,
            user_id,
            parse_date(start).unwrap(),
            parse_date(end).unwrap(),
        )
    }

    pub fn book_at(
        &self,
        hotel_id: i32,
        user_id: i32,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> i32 {
        let mut tables = self.db.tables();
        let id = 100 + tables.reservations.len() as i32 + 1;
        tables.reservations.push(Reservation {
            id,
            start_date: start,
            end_date: end,
            user_id,
            hotel_id,
            amount: 0.0,
        });
        tables.last_id = tables.last_id.max(id);
        id
    }

    pub fn reservation_service(&self) -> ReservationService {
        ReservationService::new(
            self.db.clone(),
            self.db.clone(),
            self.db.clone(),
            self.clock.clone(),
        )
    }

    pub fn hotel_service(&self) -> HotelService {
        HotelService::new(self.db.clone(), self.db.clone())
    }

    pub fn amenity_service(&self) -> AmenityService {
        AmenityService::new(self.db.clone())
    }

    pub fn image_service(&self) -> ImageService {
        ImageService::new(self.db.clone(), self.db.clone())
    }

    pub fn user_service(&self) -> UserService {
        UserService::new(self.db.clone())
    }

    pub fn auth_service(&self) -> AuthService {
        AuthService::new(self.db.clone(), JWT_SECRET.to_string())
    }

    /// Registers every service over this fixture's store, with metrics disabled.
    pub fn register(&self, cfg: &mut web::ServiceConfig) {
        cfg.app_data(web::Data::new(self.reservation_service()))
            .app_data(web::Data::new(self.hotel_service()))
            .app_data(web::Data::new(self.amenity_service()))
            .app_data(web::Data::new(self.image_service()))
            .app_data(web::Data::new(self.user_service()))
            .app_data(web::Data::new(self.auth_service()))
            .app_data(web::Data::new(MetricsService::disabled()))
            .app_data(web::PathConfig::default().error_handler(path_error_handler));
    }
}

/// Records, per log message, the names of the spans it was emitted in.
#[derive(Clone, Default)]
pub struct SpanRecorder(Arc<Mutex<Vec<(String, Vec<String>)>>>);

impl SpanRecorder {
    /// Installs the recorder as this thread's subscriber until the guard drops.
    pub fn install(&self) -> tracing::subscriber::DefaultGuard {
        tracing::subscriber::set_default(tracing_subscriber::registry().with(self.clone()))
    }

    pub fn spans_of(&self, message: &str) -> Option<Vec<String>> {
        self.0
            .lock()
            .unwrap()
            .iter()
            .find(|(m, _)| m == message)
            .map(|(_, spans)| spans.clone())
    }
}

impl<S> Layer<S> for SpanRecorder
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_event(&self, event: &Event<'_>, ctx: Context<'_, S>) {
        let mut message = MessageField::default();
        event.record(&mut message);
        let spans = ctx
            .event_scope(event)
            .map(|scope| scope.from_root().map(|span| span.name().to_string()).collect())
            .unwrap_or_default();
        self.0.lock().unwrap().push((message.0, spans));
    }
}

#[derive(Default)]
struct MessageField(String);

impl Visit for MessageField {
    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            self.0 = format!("{value:?}");
        }
    }
}
