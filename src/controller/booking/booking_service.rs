use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::controller::context::ClubContext;
use crate::error::{ClubError, ClubResult};
use crate::model::{
    Booking, BookingStatus, InviteResponse, MAX_PARTY_SIZE, NewBooking, TeeSlot, time_slot_format,
};
use crate::storage::TeeTimeFilter;

#[derive(Deserialize, Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookingRequest {
    pub date: NaiveDate,
    #[serde(with = "time_slot_format")]
    pub time_slot: NaiveTime,
    pub course: String,
    pub party_size: u32,
    pub host_member_id: String,
}

/// Booking as returned to callers, with derived figures alongside.
#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct BookingView {
    #[serde(flatten)]
    pub booking: Booking,
    pub total_cost_cents: i64,
    pub assigned_players: u32,
}

impl From<Booking> for BookingView {
    fn from(booking: Booking) -> Self {
        Self {
            total_cost_cents: booking.total_cost_cents(),
            assigned_players: booking.assigned_player_count(),
            booking,
        }
    }
}

/// # Errors
///
/// `Validation` for a bad party size, blank course or a slot in the past;
/// `NotFound`/`State` when the host is unknown or not active.
pub async fn create_booking(ctx: &ClubContext, req: CreateBookingRequest) -> ClubResult<Booking> {
    if req.party_size < 1 {
        return Err(ClubError::validation("party size must be at least 1"));
    }
    if req.party_size > MAX_PARTY_SIZE {
        return Err(ClubError::validation(format!(
            "party size must be at most {MAX_PARTY_SIZE}, got {}",
            req.party_size
        )));
    }
    let course = req.course.trim();
    if course.is_empty() {
        return Err(ClubError::validation("course is required"));
    }
    let slot = TeeSlot {
        date: req.date,
        time_slot: req.time_slot,
    };
    let now = ctx.now();
    if slot.starts_at() < now {
        return Err(ClubError::validation(format!(
            "tee time {} {} is in the past",
            req.date,
            crate::model::format_time_slot(req.time_slot)
        )));
    }
    ctx.active_member(&req.host_member_id).await?;

    let booking = ctx
        .storage
        .insert_booking(NewBooking {
            date: req.date,
            time_slot: req.time_slot,
            course: course.to_string(),
            party_size: req.party_size,
            host_member_id: req.host_member_id,
            created_at: now,
        })
        .await?;
    tracing::info!(
        booking_id = booking.id,
        date = %booking.date,
        course = %booking.course,
        party_size = booking.party_size,
        "tee time booked"
    );
    Ok(booking)
}

/// # Errors
///
/// `NotFound` for an unknown booking or member, `Conflict` for a duplicate or
/// a full party, `State` when the booking is no longer scheduled.
pub async fn invite_member(
    ctx: &ClubContext,
    booking_id: i64,
    member_id: &str,
) -> ClubResult<Booking> {
    let _guard = ctx.locks.lock(booking_id).await;
    let mut booking = ctx.booking(booking_id).await?;
    ctx.active_member(member_id).await?;
    booking.invite(member_id)?;
    ctx.storage.save_booking(&booking).await?;
    tracing::info!(booking_id, member_id, "member invited");
    Ok(booking)
}

/// Repeating the current answer changes nothing and is not an error.
///
/// # Errors
///
/// `NotFound` when the member was not invited, `State` once the booking is
/// cancelled or completed, `Conflict` when accepting into a full party.
pub async fn respond_to_invite(
    ctx: &ClubContext,
    booking_id: i64,
    member_id: &str,
    response: InviteResponse,
) -> ClubResult<Booking> {
    let _guard = ctx.locks.lock(booking_id).await;
    let mut booking = ctx.booking(booking_id).await?;
    if booking.respond(member_id, response)? {
        ctx.storage.save_booking(&booking).await?;
        tracing::info!(booking_id, member_id, ?response, "invite answered");
    }
    Ok(booking)
}

/// Cancels the booking and releases every caddie claim in one transaction.
/// Refunds belong to billing.
///
/// # Errors
///
/// `NotFound` for an unknown booking, `State` once cancelled or completed.
pub async fn cancel_booking(ctx: &ClubContext, booking_id: i64) -> ClubResult<Booking> {
    let _guard = ctx.locks.lock(booking_id).await;
    let mut booking = ctx.booking(booking_id).await?;
    let released = booking.cancel()?;
    ctx.storage.cancel_booking(&booking).await?;
    let released: Vec<&str> = released.iter().map(|a| a.caddie_id.as_str()).collect();
    tracing::info!(booking_id, ?released, "booking cancelled");
    Ok(booking)
}

/// Sum of rate times assigned players. Reads only.
///
/// # Errors
///
/// `NotFound` for an unknown booking.
pub async fn compute_total_cost(ctx: &ClubContext, booking_id: i64) -> ClubResult<i64> {
    Ok(ctx.booking(booking_id).await?.total_cost_cents())
}

/// # Errors
///
/// `NotFound` for an unknown booking.
pub async fn get_booking(ctx: &ClubContext, booking_id: i64) -> ClubResult<Booking> {
    ctx.booking(booking_id).await
}

/// # Errors
///
/// Storage failures only.
pub async fn list_tee_times(ctx: &ClubContext, filter: &TeeTimeFilter) -> ClubResult<Vec<Booking>> {
    Ok(ctx.storage.list_bookings(filter).await?)
}

/// Moves a scheduled booking to in progress; the scorecard opens on first use.
///
/// # Errors
///
/// `NotFound` for an unknown booking, `State` unless scheduled.
pub async fn start_round(ctx: &ClubContext, booking_id: i64) -> ClubResult<Booking> {
    let _guard = ctx.locks.lock(booking_id).await;
    let mut booking = ctx.booking(booking_id).await?;
    booking.start()?;
    ctx.storage.save_booking(&booking).await?;
    tracing::info!(booking_id, status = %BookingStatus::InProgress, "round started");
    Ok(booking)
}
