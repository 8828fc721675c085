pub mod availability;
pub mod dto;
pub mod reservation_controller;
pub mod reservation_repository;
pub mod reservation_service;
