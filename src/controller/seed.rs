use serde::Deserialize;
use serde_json::Value;

use crate::error::{ClubError, ClubResult};
use crate::model::{Caddie, Member};
use crate::storage::Storage;

/// Roster loaded at startup. Format:
/// `{ "members": [{ "id", "name", "handicapIndex", "loyaltyTier", "membershipStatus" }],
///    "caddies": [{ "id", "name", "rating", "yearsExperience",
///                  "specialty": { "min", "max" }, "rateCents", "available" }] }`
#[derive(Deserialize, Debug, Clone, Default)]
pub struct RosterSeed {
    #[serde(default)]
    pub members: Vec<Member>,
    #[serde(default)]
    pub caddies: Vec<Caddie>,
}

impl RosterSeed {
    /// # Errors
    ///
    /// `Validation` when the json does not describe a roster.
    pub fn from_json(json: &Value) -> ClubResult<Self> {
        let seed: RosterSeed = serde_json::from_value(json.clone())?;
        seed.validate()?;
        Ok(seed)
    }

    fn validate(&self) -> ClubResult<()> {
        for member in &self.members {
            if member.id.trim().is_empty() {
                return Err(ClubError::validation("member id cannot be blank"));
            }
            if !member.handicap_index.is_finite() {
                return Err(ClubError::validation(format!(
                    "member {} has no usable handicap index",
                    member.id
                )));
            }
        }
        for caddie in &self.caddies {
            if caddie.id.trim().is_empty() {
                return Err(ClubError::validation("caddie id cannot be blank"));
            }
            if caddie.rate_cents < 0 {
                return Err(ClubError::validation(format!(
                    "caddie {} has a negative rate",
                    caddie.id
                )));
            }
            if caddie.specialty.min > caddie.specialty.max {
                return Err(ClubError::validation(format!(
                    "caddie {} specialty range is inverted",
                    caddie.id
                )));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedSummary {
    pub members: usize,
    pub caddies: usize,
}

/// Upserts every member and caddie in `json`. Running it twice is harmless.
///
/// # Errors
///
/// `Validation` for malformed json, storage failures otherwise.
pub async fn seed_roster(storage: &dyn Storage, json: &Value) -> ClubResult<SeedSummary> {
    let seed = RosterSeed::from_json(json)?;
    for member in &seed.members {
        storage.upsert_member(member).await?;
    }
    for caddie in &seed.caddies {
        storage.upsert_caddie(caddie).await?;
    }
    let summary = SeedSummary {
        members: seed.members.len(),
        caddies: seed.caddies.len(),
    };
    tracing::info!(
        members = summary.members,
        caddies = summary.caddies,
        "roster seeded"
    );
    Ok(summary)
}
