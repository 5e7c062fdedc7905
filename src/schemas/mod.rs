//! Request/response DTOs

pub mod availability;
pub mod booking;
pub mod reservation;
