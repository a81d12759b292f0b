use serde::{Deserialize, Serialize};
use std::fmt;

/// Club member as handed to us by the identity side. The core only reads these.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    pub id: String,
    pub name: String,
    pub handicap_index: f64,
    pub loyalty_tier: LoyaltyTier,
    pub membership_status: MembershipStatus,
}

impl Member {
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.membership_status == MembershipStatus::Active
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum LoyaltyTier {
    Bronze,
    Silver,
    Gold,
    Platinum,
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MembershipStatus {
    Active,
    Suspended,
    Inactive,
}

impl LoyaltyTier {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            LoyaltyTier::Bronze => "bronze",
            LoyaltyTier::Silver => "silver",
            LoyaltyTier::Gold => "gold",
            LoyaltyTier::Platinum => "platinum",
        }
    }

    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "bronze" => Some(LoyaltyTier::Bronze),
            "silver" => Some(LoyaltyTier::Silver),
            "gold" => Some(LoyaltyTier::Gold),
            "platinum" => Some(LoyaltyTier::Platinum),
            _ => None,
        }
    }
}

impl MembershipStatus {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            MembershipStatus::Active => "active",
            MembershipStatus::Suspended => "suspended",
            MembershipStatus::Inactive => "inactive",
        }
    }

    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "active" => Some(MembershipStatus::Active),
            "suspended" => Some(MembershipStatus::Suspended),
            "inactive" => Some(MembershipStatus::Inactive),
            _ => None,
        }
    }
}

impl fmt::Display for MembershipStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
