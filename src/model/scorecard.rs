use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::error::{ClubError, ClubResult};
use crate::model::member::Member;

pub const HOLES_PER_ROUND: u8 = 18;
pub const MAX_CODE_LEN: usize = 32;

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct HoleScore {
    pub hole: u8,
    pub strokes: Option<u32>,
}

/// Where a player's score set stands in the verification handshake.
///
/// The outstanding code never leaves the service in a response body; it is
/// handed out once by `request_verification`.
#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum VerificationState {
    Unverified,
    #[serde(rename_all = "camelCase")]
    Pending {
        #[serde(skip_serializing)]
        code: String,
        requested_at: NaiveDateTime,
        failed_attempts: u32,
    },
    #[serde(rename_all = "camelCase")]
    Verified {
        verified_at: NaiveDateTime,
        verified_by: Option<String>,
    },
}

#[derive(Serialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ScorecardStatus {
    NotStarted,
    InProgress,
    PendingVerification,
    Verified,
    Completed,
}

#[derive(Serialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PlayerScoreRecord {
    pub player_id: String,
    pub name: String,
    pub handicap: f64,
    pub holes: Vec<HoleScore>,
    pub verification: VerificationState,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerificationOutcome {
    Verified,
    Rejected { failed_attempts: u32 },
}

/// One hole entry of a bulk save.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ScoreEntry {
    pub player_id: String,
    pub hole: u8,
    pub strokes: Option<u32>,
}

/// # Errors
///
/// `Validation` for a hole outside 1..=18 or a zero stroke count.
pub fn validate_hole_entry(hole: u8, strokes: Option<u32>) -> ClubResult<()> {
    if !(1..=HOLES_PER_ROUND).contains(&hole) {
        return Err(ClubError::validation(format!(
            "hole number must be between 1 and {HOLES_PER_ROUND}, got {hole}"
        )));
    }
    if strokes == Some(0) {
        return Err(ClubError::validation(format!(
            "strokes on hole {hole} must be a positive integer"
        )));
    }
    Ok(())
}

impl PlayerScoreRecord {
    #[must_use]
    pub fn new(member: &Member) -> Self {
        Self {
            player_id: member.id.clone(),
            name: member.name.clone(),
            handicap: member.handicap_index,
            holes: (1..=HOLES_PER_ROUND)
                .map(|hole| HoleScore { hole, strokes: None })
                .collect(),
            verification: VerificationState::Unverified,
        }
    }

    /// Derived on every read, never stored.
    #[must_use]
    pub fn total(&self) -> u32 {
        self.holes.iter().filter_map(|h| h.strokes).sum()
    }

    #[must_use]
    pub fn verified(&self) -> bool {
        matches!(self.verification, VerificationState::Verified { .. })
    }

    #[must_use]
    pub fn holes_played(&self) -> usize {
        self.holes.iter().filter(|h| h.strokes.is_some()).count()
    }

    fn set_hole(&mut self, hole: u8, strokes: Option<u32>) -> ClubResult<()> {
        validate_hole_entry(hole, strokes)?;
        let slot = self
            .holes
            .iter_mut()
            .find(|h| h.hole == hole)
            .ok_or_else(|| ClubError::validation(format!("hole {hole} missing from card")))?;
        if slot.strokes == strokes {
            return Ok(());
        }
        slot.strokes = strokes;
        // A verification attests the score set it was given, nothing later.
        if self.verified() {
            self.verification = VerificationState::Unverified;
        }
        Ok(())
    }
}

#[derive(Serialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Scorecard {
    pub booking_id: i64,
    pub players: Vec<PlayerScoreRecord>,
    pub opened_at: NaiveDateTime,
    pub completed_at: Option<NaiveDateTime>,
}

impl Scorecard {
    #[must_use]
    pub fn open(booking_id: i64, players: &[Member], now: NaiveDateTime) -> Self {
        Self {
            booking_id,
            players: players.iter().map(PlayerScoreRecord::new).collect(),
            opened_at: now,
            completed_at: None,
        }
    }

    #[must_use]
    pub fn status(&self) -> ScorecardStatus {
        if self.completed_at.is_some() {
            ScorecardStatus::Completed
        } else if self.players.iter().all(PlayerScoreRecord::verified) {
            ScorecardStatus::Verified
        } else if self
            .players
            .iter()
            .any(|p| matches!(p.verification, VerificationState::Pending { .. }))
        {
            ScorecardStatus::PendingVerification
        } else {
            ScorecardStatus::InProgress
        }
    }

    #[must_use]
    pub fn player(&self, player_id: &str) -> Option<&PlayerScoreRecord> {
        self.players.iter().find(|p| p.player_id == player_id)
    }

    fn ensure_open(&self) -> ClubResult<()> {
        if self.completed_at.is_some() {
            return Err(ClubError::state(format!(
                "scorecard for booking {} is completed and can no longer change",
                self.booking_id
            )));
        }
        Ok(())
    }

    fn player_mut(&mut self, player_id: &str) -> ClubResult<&mut PlayerScoreRecord> {
        let booking_id = self.booking_id;
        self.players
            .iter_mut()
            .find(|p| p.player_id == player_id)
            .ok_or_else(|| {
                ClubError::not_found(format!(
                    "player {player_id} is not on the scorecard for booking {booking_id}"
                ))
            })
    }

    /// # Errors
    ///
    /// `State` once completed, `NotFound` for a player not in the round,
    /// `Validation` for a bad hole or stroke count.
    pub fn record(&mut self, player_id: &str, hole: u8, strokes: Option<u32>) -> ClubResult<()> {
        self.ensure_open()?;
        self.player_mut(player_id)?.set_hole(hole, strokes)
    }

    /// Applies a batch only after every entry has been checked.
    ///
    /// # Errors
    ///
    /// Same as [`Scorecard::record`]; on error nothing is applied.
    pub fn record_all(&mut self, entries: &[ScoreEntry]) -> ClubResult<()> {
        self.ensure_open()?;
        for entry in entries {
            validate_hole_entry(entry.hole, entry.strokes)?;
            if self.player(&entry.player_id).is_none() {
                return Err(ClubError::not_found(format!(
                    "player {} is not on the scorecard for booking {}",
                    entry.player_id, self.booking_id
                )));
            }
        }
        for entry in entries {
            self.player_mut(&entry.player_id)?
                .set_hole(entry.hole, entry.strokes)?;
        }
        Ok(())
    }

    /// Attaches `code` as the player's single outstanding code, replacing any
    /// earlier one.
    ///
    /// # Errors
    ///
    /// `State` once completed or when the player is already verified.
    pub fn request_verification(
        &mut self,
        player_id: &str,
        code: String,
        now: NaiveDateTime,
    ) -> ClubResult<()> {
        self.ensure_open()?;
        let player = self.player_mut(player_id)?;
        if player.verified() {
            return Err(ClubError::state(format!(
                "scores for player {player_id} are already verified"
            )));
        }
        player.verification = VerificationState::Pending {
            code,
            requested_at: now,
            failed_attempts: 0,
        };
        Ok(())
    }

    /// A wrong code is counted but leaves the outstanding code usable; there
    /// is no lockout. A matching code verifies and is consumed.
    ///
    /// # Errors
    ///
    /// `Auth` when no code is outstanding, `State` once completed,
    /// `NotFound` for an unknown player.
    pub fn verify(
        &mut self,
        target_player_id: &str,
        supplied_code: &str,
        verified_by: Option<String>,
        now: NaiveDateTime,
    ) -> ClubResult<VerificationOutcome> {
        self.ensure_open()?;
        let player = self.player_mut(target_player_id)?;
        let VerificationState::Pending {
            code,
            failed_attempts,
            ..
        } = &mut player.verification
        else {
            return Err(ClubError::auth(format!(
                "no outstanding verification code for player {target_player_id}"
            )));
        };
        if code.as_str() != supplied_code.trim() {
            *failed_attempts += 1;
            return Ok(VerificationOutcome::Rejected {
                failed_attempts: *failed_attempts,
            });
        }
        player.verification = VerificationState::Verified {
            verified_at: now,
            verified_by,
        };
        Ok(VerificationOutcome::Verified)
    }

    /// # Errors
    ///
    /// `State` when already completed or while any player is unverified.
    pub fn complete(&mut self, now: NaiveDateTime) -> ClubResult<()> {
        self.ensure_open()?;
        let unverified: Vec<&str> = self
            .players
            .iter()
            .filter(|p| !p.verified())
            .map(|p| p.player_id.as_str())
            .collect();
        if !unverified.is_empty() {
            return Err(ClubError::state(format!(
                "round cannot complete; unverified players: {}",
                unverified.join(", ")
            )));
        }
        self.completed_at = Some(now);
        Ok(())
    }
}
