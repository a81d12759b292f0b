pub mod booking;
pub mod caddie;
pub mod member;
pub mod scorecard;
pub mod utils;

pub use booking::*;
pub use caddie::*;
pub use member::*;
pub use scorecard::*;
pub use utils::*;
