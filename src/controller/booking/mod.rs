pub mod booking_service;
pub mod http_handlers;

pub use booking_service::*;
