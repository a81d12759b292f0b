use chrono::NaiveDateTime;
use std::sync::Arc;

use crate::controller::locks::EntityLocks;
use crate::error::{ClubError, ClubResult};
use crate::model::{Booking, Caddie, Member};
use crate::storage::Storage;

pub const DEFAULT_ROUND_MINUTES: i64 = 240;

pub type Clock = fn() -> NaiveDateTime;

/// Club-local wall clock.
#[must_use]
pub fn local_now() -> NaiveDateTime {
    chrono::Local::now().naive_local()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServiceSettings {
    /// How long a caddie is tied up by one tee time.
    pub round_minutes: i64,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            round_minutes: DEFAULT_ROUND_MINUTES,
        }
    }
}

/// Shared by every request: the store, the per-booking writer locks and the
/// settings the components read.
#[derive(Clone)]
pub struct ClubContext {
    pub storage: Arc<dyn Storage>,
    pub locks: EntityLocks,
    pub settings: ServiceSettings,
    pub clock: Clock,
}

impl ClubContext {
    pub fn new(storage: Arc<dyn Storage>, settings: ServiceSettings) -> Self {
        Self {
            storage,
            locks: EntityLocks::new(),
            settings,
            clock: local_now,
        }
    }

    #[must_use]
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    #[must_use]
    pub fn now(&self) -> NaiveDateTime {
        (self.clock)()
    }

    /// # Errors
    ///
    /// `NotFound` for an unknown booking.
    pub async fn booking(&self, booking_id: i64) -> ClubResult<Booking> {
        self.storage
            .get_booking(booking_id)
            .await?
            .ok_or_else(|| ClubError::not_found(format!("booking {booking_id}")))
    }

    /// # Errors
    ///
    /// `NotFound` for an unknown member.
    pub async fn member(&self, member_id: &str) -> ClubResult<Member> {
        self.storage
            .get_member(member_id)
            .await?
            .ok_or_else(|| ClubError::not_found(format!("member {member_id}")))
    }

    /// Like [`ClubContext::member`] but the member must also be active.
    ///
    /// # Errors
    ///
    /// `NotFound` for an unknown member, `State` for a suspended or inactive one.
    pub async fn active_member(&self, member_id: &str) -> ClubResult<Member> {
        let member = self.member(member_id).await?;
        if !member.is_active() {
            return Err(ClubError::state(format!(
                "member {member_id} is {}",
                member.membership_status
            )));
        }
        Ok(member)
    }

    /// # Errors
    ///
    /// `NotFound` for an unknown caddie.
    pub async fn caddie(&self, caddie_id: &str) -> ClubResult<Caddie> {
        self.storage
            .get_caddie(caddie_id)
            .await?
            .ok_or_else(|| ClubError::not_found(format!("caddie {caddie_id}")))
    }
}
