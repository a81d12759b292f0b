use async_trait::async_trait;
use chrono::NaiveDate;
use thiserror::Error;

use crate::model::{
    Booking, BookingStatus, Caddie, CaddieAssignment, Member, NewBooking, Scorecard, TeeSlot,
};

pub mod sqlite;

pub use sqlite::SqliteStorage;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StorageError {
    #[error("db error: {0}")]
    Db(String),
    #[error("constraint violated: {0}")]
    UniqueViolation(String),
}

impl From<String> for StorageError {
    fn from(value: String) -> Self {
        Self::Db(value)
    }
}

impl From<&str> for StorageError {
    fn from(value: &str) -> Self {
        Self::Db(value.to_string())
    }
}

impl From<rusqlite::Error> for StorageError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(e, _)
                if e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
                    || e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_PRIMARYKEY =>
            {
                Self::UniqueViolation(err.to_string())
            }
            _ => Self::Db(err.to_string()),
        }
    }
}

impl From<serde_json::Error> for StorageError {
    fn from(err: serde_json::Error) -> Self {
        Self::Db(format!("json column: {err}"))
    }
}

/// A caddie held by a booking that is not cancelled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaddieClaim {
    pub caddie_id: String,
    pub booking_id: i64,
    pub slot: TeeSlot,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClaimOutcome {
    Claimed,
    /// Roster flag is off.
    OffRoster,
    /// Another booking holds an overlapping claim.
    SlotTaken { booking_id: i64 },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TeeTimeFilter {
    pub date: Option<NaiveDate>,
    pub status: Option<BookingStatus>,
}

/// Every call is one transaction; implementations serialize writers.
#[async_trait]
pub trait Storage: Send + Sync {
    async fn apply_schema(&self) -> Result<(), StorageError>;
    async fn execute_batch(&self, sql: &str) -> Result<(), StorageError>;

    async fn upsert_member(&self, member: &Member) -> Result<(), StorageError>;
    async fn get_member(&self, member_id: &str) -> Result<Option<Member>, StorageError>;

    async fn upsert_caddie(&self, caddie: &Caddie) -> Result<(), StorageError>;
    async fn get_caddie(&self, caddie_id: &str) -> Result<Option<Caddie>, StorageError>;
    async fn list_caddies(&self) -> Result<Vec<Caddie>, StorageError>;
    async fn active_claims(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<CaddieClaim>, StorageError>;

    async fn insert_booking(&self, booking: NewBooking) -> Result<Booking, StorageError>;
    async fn get_booking(&self, booking_id: i64) -> Result<Option<Booking>, StorageError>;
    async fn list_bookings(&self, filter: &TeeTimeFilter) -> Result<Vec<Booking>, StorageError>;
    /// Writes status and invitees. Caddie claims only move through
    /// `claim_caddie`, `release_caddie` and `cancel_booking`.
    async fn save_booking(&self, booking: &Booking) -> Result<(), StorageError>;
    /// Checks the roster flag and overlapping claims, then records the claim.
    async fn claim_caddie(
        &self,
        booking: &Booking,
        assignment: &CaddieAssignment,
        round_minutes: i64,
    ) -> Result<ClaimOutcome, StorageError>;
    async fn release_caddie(&self, booking_id: i64, caddie_id: &str) -> Result<(), StorageError>;
    /// Persists the cancelled status and drops every claim together.
    async fn cancel_booking(&self, booking: &Booking) -> Result<(), StorageError>;

    async fn get_scorecard(&self, booking_id: i64) -> Result<Option<Scorecard>, StorageError>;
    async fn insert_scorecard(&self, scorecard: &Scorecard) -> Result<(), StorageError>;
    async fn save_scorecard(&self, scorecard: &Scorecard) -> Result<(), StorageError>;
    /// Persists the completed booking and scorecard together.
    async fn complete_round(
        &self,
        booking: &Booking,
        scorecard: &Scorecard,
    ) -> Result<(), StorageError>;
}
