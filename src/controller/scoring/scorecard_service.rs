use chrono::NaiveDateTime;
use serde::Serialize;

use crate::controller::context::ClubContext;
use crate::error::{ClubError, ClubResult};
use crate::model::{
    Booking, BookingStatus, PlayerScoreRecord, ScoreEntry, Scorecard, ScorecardStatus,
};

#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct PlayerScoreView {
    #[serde(flatten)]
    pub record: PlayerScoreRecord,
    pub total: u32,
    pub holes_played: usize,
    pub verified: bool,
}

#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ScorecardView {
    pub booking_id: i64,
    pub status: ScorecardStatus,
    pub players: Vec<PlayerScoreView>,
    pub opened_at: NaiveDateTime,
    pub completed_at: Option<NaiveDateTime>,
}

impl From<Scorecard> for ScorecardView {
    fn from(card: Scorecard) -> Self {
        let status = card.status();
        Self {
            booking_id: card.booking_id,
            status,
            players: card
                .players
                .into_iter()
                .map(|record| PlayerScoreView {
                    total: record.total(),
                    holes_played: record.holes_played(),
                    verified: record.verified(),
                    record,
                })
                .collect(),
            opened_at: card.opened_at,
            completed_at: card.completed_at,
        }
    }
}

/// Loads the booking's card, opening it on first use once the round is under
/// way. Callers hold the booking lock.
async fn load_or_open(ctx: &ClubContext, booking: &Booking) -> ClubResult<Scorecard> {
    if let Some(card) = ctx.storage.get_scorecard(booking.id).await? {
        return Ok(card);
    }
    if booking.status != BookingStatus::InProgress {
        return Err(ClubError::state(format!(
            "booking {} is {}; scoring opens once the round is in progress",
            booking.id, booking.status
        )));
    }
    let mut members = Vec::new();
    for player_id in booking.player_ids() {
        members.push(ctx.member(&player_id).await?);
    }
    let card = Scorecard::open(booking.id, &members, ctx.now());
    ctx.storage.insert_scorecard(&card).await?;
    tracing::info!(
        booking_id = booking.id,
        players = card.players.len(),
        "scorecard opened"
    );
    Ok(card)
}

/// Loads the card for a change. Scores and verifications only move while the
/// booking is in progress; a cancelled or completed round keeps its card as is.
pub(crate) async fn load_for_update(
    ctx: &ClubContext,
    booking: &Booking,
) -> ClubResult<Scorecard> {
    if booking.status != BookingStatus::InProgress {
        return Err(ClubError::state(format!(
            "booking {} is {}; scores only change while the round is in progress",
            booking.id, booking.status
        )));
    }
    load_or_open(ctx, booking).await
}

/// Opening an already open card returns it unchanged.
///
/// # Errors
///
/// `NotFound` for an unknown booking, `State` unless the round is in progress.
pub async fn open_scorecard(ctx: &ClubContext, booking_id: i64) -> ClubResult<Scorecard> {
    let _guard = ctx.locks.lock(booking_id).await;
    let booking = ctx.booking(booking_id).await?;
    load_or_open(ctx, &booking).await
}

/// # Errors
///
/// Same as [`open_scorecard`].
pub async fn get_scorecard(ctx: &ClubContext, booking_id: i64) -> ClubResult<Scorecard> {
    open_scorecard(ctx, booking_id).await
}

/// `strokes` of `None` clears the hole. Editing a verified player's scores
/// withdraws their verification.
///
/// # Errors
///
/// `Validation` for a bad hole or stroke count, `NotFound` for an unknown
/// booking or a player outside the round, `State` when the round is not in
/// progress or already completed.
pub async fn record_hole_score(
    ctx: &ClubContext,
    booking_id: i64,
    player_id: &str,
    hole: u8,
    strokes: Option<u32>,
) -> ClubResult<Scorecard> {
    let _guard = ctx.locks.lock(booking_id).await;
    let booking = ctx.booking(booking_id).await?;
    let mut card = load_for_update(ctx, &booking).await?;
    card.record(player_id, hole, strokes)?;
    ctx.storage.save_scorecard(&card).await?;
    tracing::debug!(booking_id, player_id, hole, ?strokes, "hole recorded");
    Ok(card)
}

/// Saves several holes at once; one bad entry rejects the whole batch.
///
/// # Errors
///
/// Same as [`record_hole_score`].
pub async fn record_scores(
    ctx: &ClubContext,
    booking_id: i64,
    entries: &[ScoreEntry],
) -> ClubResult<Scorecard> {
    let _guard = ctx.locks.lock(booking_id).await;
    let booking = ctx.booking(booking_id).await?;
    let mut card = load_for_update(ctx, &booking).await?;
    if entries.is_empty() {
        return Ok(card);
    }
    card.record_all(entries)?;
    ctx.storage.save_scorecard(&card).await?;
    tracing::info!(booking_id, entries = entries.len(), "scores saved");
    Ok(card)
}

/// Completes the booking and locks the card. Every player must be verified.
///
/// # Errors
///
/// `NotFound` for an unknown booking, `State` unless the round is in progress
/// with every player verified.
pub async fn complete_round(ctx: &ClubContext, booking_id: i64) -> ClubResult<Scorecard> {
    let _guard = ctx.locks.lock(booking_id).await;
    let mut booking = ctx.booking(booking_id).await?;
    booking.complete()?;
    let mut card = match ctx.storage.get_scorecard(booking_id).await? {
        Some(card) => card,
        None => {
            return Err(ClubError::state(format!(
                "booking {booking_id} has no scores to complete"
            )));
        }
    };
    card.complete(ctx.now())?;
    ctx.storage.complete_round(&booking, &card).await?;
    tracing::info!(booking_id, "round completed");
    Ok(card)
}
