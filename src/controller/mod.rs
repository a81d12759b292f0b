pub mod booking;
pub mod caddie;
pub mod context;
pub mod locks;
pub mod scoring;
pub mod seed;

pub use context::{ClubContext, ServiceSettings};
