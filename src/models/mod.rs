pub mod hotel;
pub mod mapper;
pub mod reservation;
pub mod user;
