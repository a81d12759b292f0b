pub mod assignment;
pub mod http_handlers;

pub use assignment::*;
