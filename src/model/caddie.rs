use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct HandicapRange {
    pub min: f64,
    pub max: f64,
}

impl HandicapRange {
    #[must_use]
    pub fn contains(&self, handicap: f64) -> bool {
        handicap >= self.min && handicap <= self.max
    }
}

/// A caddie on the club roster. `available` is the roster flag (on duty, not on
/// leave); whether the caddie is free for a given slot is derived from claims.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Caddie {
    pub id: String,
    pub name: String,
    pub rating: f32,
    pub years_experience: u32,
    pub specialty: HandicapRange,
    /// Per player, in cents.
    pub rate_cents: i64,
    pub available: bool,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CaddieAvailability {
    pub caddie: Caddie,
    pub available: bool,
    /// Booking currently holding an overlapping claim, if any.
    pub claimed_by: Option<i64>,
}
