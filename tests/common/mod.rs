#![allow(dead_code)]

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use std::sync::Arc;

use rusty_teesheet::controller::booking::{self, CreateBookingRequest};
use rusty_teesheet::model::Booking;
use rusty_teesheet::storage::sqlite::DROP_TABLES;
use rusty_teesheet::storage::{SqliteStorage, Storage, StorageError};
use rusty_teesheet::{ClubContext, ServiceSettings};

pub const CLUB_FIXTURE: &str = include_str!("../fixtures/club.sql");

pub struct TestContext {
    pub ctx: ClubContext,
    pub storage: Arc<SqliteStorage>,
}

/// Two weeks before the fixture tee times.
pub fn fixed_now() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 3, 1)
        .unwrap()
        .and_hms_opt(8, 0, 0)
        .unwrap()
}

pub fn play_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, 15).unwrap()
}

pub fn at(hour: u32, minute: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, minute, 0).unwrap()
}

pub async fn setup_test_context(fixture_sql: &str) -> Result<TestContext, StorageError> {
    let storage = Arc::new(SqliteStorage::open(":memory:")?);
    storage.execute_batch(DROP_TABLES).await?;
    storage.apply_schema().await?;
    storage.execute_batch(fixture_sql).await?;

    let ctx = ClubContext::new(storage.clone(), ServiceSettings::default()).with_clock(fixed_now);
    Ok(TestContext { ctx, storage })
}

pub fn booking_request(host: &str, party_size: u32, time_slot: NaiveTime) -> CreateBookingRequest {
    CreateBookingRequest {
        date: play_date(),
        time_slot,
        course: "Championship".to_string(),
        party_size,
        host_member_id: host.to_string(),
    }
}

pub async fn book(ctx: &ClubContext, host: &str, party_size: u32, time_slot: NaiveTime) -> Booking {
    booking::create_booking(ctx, booking_request(host, party_size, time_slot))
        .await
        .unwrap()
}

/// A booking hosted by M1 with M2 accepted, already on the course.
pub async fn round_in_progress(ctx: &ClubContext) -> Booking {
    let b = book(ctx, "M1", 2, at(9, 0)).await;
    booking::invite_member(ctx, b.id, "M2").await.unwrap();
    booking::respond_to_invite(
        ctx,
        b.id,
        "M2",
        rusty_teesheet::model::InviteResponse::Accepted,
    )
    .await
    .unwrap();
    booking::start_round(ctx, b.id).await.unwrap()
}
