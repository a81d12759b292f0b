pub mod args;
pub mod controller;
pub mod error;
pub mod logging;
pub mod model;
pub mod router;
pub mod storage;

pub use controller::{ClubContext, ServiceSettings};
pub use error::{ClubError, ClubResult};
