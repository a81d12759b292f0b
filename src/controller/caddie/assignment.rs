use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::controller::context::ClubContext;
use crate::error::{ClubError, ClubResult};
use crate::model::{Booking, Caddie, CaddieAssignment, CaddieAvailability, TeeSlot};
use crate::storage::{CaddieClaim, ClaimOutcome};

#[derive(Deserialize, Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct AssignCaddieRequest {
    pub caddie_id: String,
    pub player_count: u32,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CaddieSuggestion {
    pub caddie: Caddie,
    /// The caddie's specialty range covers the party's average handicap.
    pub covers_handicap: bool,
}

/// Claims `caddie_id` for `player_count` players of the booking at the rate
/// the caddie charges right now.
///
/// # Errors
///
/// `NotFound` for an unknown booking or caddie, `Validation` for an empty
/// count, `State` unless the booking is scheduled, `Conflict` when the caddie
/// is off the roster, already claimed for an overlapping slot, already on this
/// booking, or when the party size would be exceeded.
pub async fn assign_caddie(
    ctx: &ClubContext,
    booking_id: i64,
    caddie_id: &str,
    player_count: u32,
) -> ClubResult<Booking> {
    let _guard = ctx.locks.lock(booking_id).await;
    let mut booking = ctx.booking(booking_id).await?;
    let caddie = ctx.caddie(caddie_id).await?;
    let assignment = CaddieAssignment {
        caddie_id: caddie.id.clone(),
        player_count,
        rate_cents: caddie.rate_cents,
    };
    booking.add_assignment(assignment.clone())?;

    match ctx
        .storage
        .claim_caddie(&booking, &assignment, ctx.settings.round_minutes)
        .await?
    {
        ClaimOutcome::Claimed => {}
        ClaimOutcome::OffRoster => {
            return Err(ClubError::conflict(format!(
                "caddie {caddie_id} is not available"
            )));
        }
        ClaimOutcome::SlotTaken { booking_id: holder } => {
            tracing::warn!(booking_id, caddie_id, holder, "caddie double booking refused");
            return Err(ClubError::conflict(format!(
                "caddie {caddie_id} is already assigned to booking {holder} at an overlapping time"
            )));
        }
    }
    tracing::info!(
        booking_id,
        caddie_id,
        player_count,
        rate_cents = assignment.rate_cents,
        "caddie assigned"
    );
    Ok(booking)
}

/// # Errors
///
/// `NotFound` for an unknown booking or a caddie not on it, `State` for a
/// completed booking.
pub async fn release_caddie(
    ctx: &ClubContext,
    booking_id: i64,
    caddie_id: &str,
) -> ClubResult<Booking> {
    let _guard = ctx.locks.lock(booking_id).await;
    let mut booking = ctx.booking(booking_id).await?;
    booking.remove_assignment(caddie_id)?;
    ctx.storage.release_caddie(booking_id, caddie_id).await?;
    tracing::info!(booking_id, caddie_id, "caddie released");
    Ok(booking)
}

fn overlapping_claim(
    claims: &[CaddieClaim],
    caddie_id: &str,
    slot: &TeeSlot,
    round_minutes: i64,
) -> Option<i64> {
    claims
        .iter()
        .find(|c| c.caddie_id == caddie_id && c.slot.overlaps(slot, round_minutes))
        .map(|c| c.booking_id)
}

async fn roster_for(ctx: &ClubContext, slot: &TeeSlot) -> ClubResult<Vec<CaddieAvailability>> {
    let (from, to) = slot.overlap_window(ctx.settings.round_minutes);
    let claims = ctx.storage.active_claims(from, to).await?;
    let roster = ctx.storage.list_caddies().await?;
    Ok(roster
        .into_iter()
        .map(|caddie| {
            let claimed_by =
                overlapping_claim(&claims, &caddie.id, slot, ctx.settings.round_minutes);
            CaddieAvailability {
                available: caddie.available && claimed_by.is_none(),
                claimed_by,
                caddie,
            }
        })
        .collect())
}

/// Every roster caddie with whether they can be claimed for the slot.
///
/// # Errors
///
/// Storage failures only.
pub async fn caddie_availability(
    ctx: &ClubContext,
    date: NaiveDate,
    time_slot: NaiveTime,
) -> ClubResult<Vec<CaddieAvailability>> {
    roster_for(ctx, &TeeSlot { date, time_slot }).await
}

fn rank(a: &CaddieSuggestion, b: &CaddieSuggestion) -> Ordering {
    b.covers_handicap
        .cmp(&a.covers_handicap)
        .then_with(|| b.caddie.rating.total_cmp(&a.caddie.rating))
        .then_with(|| b.caddie.years_experience.cmp(&a.caddie.years_experience))
        .then_with(|| a.caddie.id.cmp(&b.caddie.id))
}

/// Free caddies for the booking's slot, best fit first: specialty covering
/// the party's average handicap, then rating, then experience.
///
/// # Errors
///
/// `NotFound` for an unknown booking.
pub async fn suggest_caddies(
    ctx: &ClubContext,
    booking_id: i64,
) -> ClubResult<Vec<CaddieSuggestion>> {
    let booking = ctx.booking(booking_id).await?;
    let mut handicaps = Vec::new();
    for player_id in booking.player_ids() {
        if let Some(member) = ctx.storage.get_member(&player_id).await? {
            handicaps.push(member.handicap_index);
        }
    }
    #[allow(clippy::cast_precision_loss)]
    let average = if handicaps.is_empty() {
        None
    } else {
        Some(handicaps.iter().sum::<f64>() / handicaps.len() as f64)
    };

    let mut suggestions: Vec<CaddieSuggestion> = roster_for(ctx, &booking.slot())
        .await?
        .into_iter()
        .filter(|a| a.available)
        .filter(|a| !booking.caddies.iter().any(|c| c.caddie_id == a.caddie.id))
        .map(|a| CaddieSuggestion {
            covers_handicap: average.is_some_and(|h| a.caddie.specialty.contains(h)),
            caddie: a.caddie,
        })
        .collect();
    suggestions.sort_by(rank);
    Ok(suggestions)
}
