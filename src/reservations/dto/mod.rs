pub mod reservation_dto;
