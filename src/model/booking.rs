use chrono::{Days, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{ClubError, ClubResult};
use crate::model::utils::time_slot_format;

/// Foursome limit for a single tee time.
pub const MAX_PARTY_SIZE: u32 = 4;

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    Scheduled,
    InProgress,
    Completed,
    Cancelled,
}

impl BookingStatus {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            BookingStatus::Scheduled => "scheduled",
            BookingStatus::InProgress => "in_progress",
            BookingStatus::Completed => "completed",
            BookingStatus::Cancelled => "cancelled",
        }
    }

    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "scheduled" => Some(BookingStatus::Scheduled),
            "in_progress" => Some(BookingStatus::InProgress),
            "completed" => Some(BookingStatus::Completed),
            "cancelled" => Some(BookingStatus::Cancelled),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_closed(self) -> bool {
        matches!(self, BookingStatus::Completed | BookingStatus::Cancelled)
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RsvpStatus {
    Pending,
    Accepted,
    Declined,
}

impl RsvpStatus {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            RsvpStatus::Pending => "pending",
            RsvpStatus::Accepted => "accepted",
            RsvpStatus::Declined => "declined",
        }
    }

    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(RsvpStatus::Pending),
            "accepted" => Some(RsvpStatus::Accepted),
            "declined" => Some(RsvpStatus::Declined),
            _ => None,
        }
    }
}

/// What an invitee may answer. `Pending` is only ever set by the invite itself.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum InviteResponse {
    Accepted,
    Declined,
}

impl From<InviteResponse> for RsvpStatus {
    fn from(value: InviteResponse) -> Self {
        match value {
            InviteResponse::Accepted => RsvpStatus::Accepted,
            InviteResponse::Declined => RsvpStatus::Declined,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Invitee {
    pub member_id: String,
    pub status: RsvpStatus,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CaddieAssignment {
    pub caddie_id: String,
    pub player_count: u32,
    /// Rate per player captured when the caddie was claimed, in cents.
    pub rate_cents: i64,
}

impl CaddieAssignment {
    #[must_use]
    pub fn cost_cents(&self) -> i64 {
        self.rate_cents * i64::from(self.player_count)
    }
}

/// A (date, start time) pair a caddie can be claimed for.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TeeSlot {
    pub date: NaiveDate,
    #[serde(with = "time_slot_format")]
    pub time_slot: NaiveTime,
}

impl TeeSlot {
    #[must_use]
    pub fn starts_at(&self) -> NaiveDateTime {
        self.date.and_time(self.time_slot)
    }

    /// Two slots overlap when their start times are closer than one round.
    #[must_use]
    pub fn overlaps(&self, other: &TeeSlot, round_minutes: i64) -> bool {
        (self.starts_at() - other.starts_at()).num_minutes().abs() < round_minutes
    }

    /// Inclusive play-date range that can hold a slot overlapping this one.
    #[must_use]
    pub fn overlap_window(&self, round_minutes: i64) -> (NaiveDate, NaiveDate) {
        let reach = Days::new(round_minutes.max(1).unsigned_abs().div_ceil(1440));
        (
            self.date.checked_sub_days(reach).unwrap_or(NaiveDate::MIN),
            self.date.checked_add_days(reach).unwrap_or(NaiveDate::MAX),
        )
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: i64,
    pub date: NaiveDate,
    #[serde(with = "time_slot_format")]
    pub time_slot: NaiveTime,
    pub course: String,
    pub party_size: u32,
    pub host_member_id: String,
    pub caddies: Vec<CaddieAssignment>,
    pub invitees: Vec<Invitee>,
    pub status: BookingStatus,
    pub created_at: NaiveDateTime,
}

/// Fields of a booking before storage hands out an id.
#[derive(Clone, Debug)]
pub struct NewBooking {
    pub date: NaiveDate,
    pub time_slot: NaiveTime,
    pub course: String,
    pub party_size: u32,
    pub host_member_id: String,
    pub created_at: NaiveDateTime,
}

impl NewBooking {
    #[must_use]
    pub fn into_booking(self, id: i64) -> Booking {
        Booking {
            id,
            date: self.date,
            time_slot: self.time_slot,
            course: self.course,
            party_size: self.party_size,
            host_member_id: self.host_member_id,
            caddies: Vec::new(),
            invitees: Vec::new(),
            status: BookingStatus::Scheduled,
            created_at: self.created_at,
        }
    }
}

impl Booking {
    #[must_use]
    pub fn slot(&self) -> TeeSlot {
        TeeSlot {
            date: self.date,
            time_slot: self.time_slot,
        }
    }

    #[must_use]
    pub fn total_cost_cents(&self) -> i64 {
        self.caddies.iter().map(CaddieAssignment::cost_cents).sum()
    }

    #[must_use]
    pub fn assigned_player_count(&self) -> u32 {
        self.caddies.iter().map(|a| a.player_count).sum()
    }

    /// Seats taken: the host plus everyone who has not declined.
    #[must_use]
    pub fn seats_taken(&self) -> u32 {
        let invited = self
            .invitees
            .iter()
            .filter(|i| i.status != RsvpStatus::Declined)
            .count();
        1 + u32::try_from(invited).unwrap_or(u32::MAX)
    }

    /// Players who will appear on the scorecard, host first.
    #[must_use]
    pub fn player_ids(&self) -> Vec<String> {
        std::iter::once(self.host_member_id.clone())
            .chain(
                self.invitees
                    .iter()
                    .filter(|i| i.status == RsvpStatus::Accepted)
                    .map(|i| i.member_id.clone()),
            )
            .collect()
    }

    #[must_use]
    pub fn has_player(&self, member_id: &str) -> bool {
        self.player_ids().iter().any(|p| p == member_id)
    }

    fn require_status(&self, wanted: BookingStatus, action: &str) -> ClubResult<()> {
        if self.status == wanted {
            Ok(())
        } else {
            Err(ClubError::state(format!(
                "cannot {action} booking {} while it is {}",
                self.id, self.status
            )))
        }
    }

    /// # Errors
    ///
    /// `State` unless scheduled, `Conflict` when the member is already part of
    /// the party or the party is full.
    pub fn invite(&mut self, member_id: &str) -> ClubResult<()> {
        self.require_status(BookingStatus::Scheduled, "invite to")?;
        if member_id == self.host_member_id {
            return Err(ClubError::conflict(format!(
                "member {member_id} is hosting booking {}",
                self.id
            )));
        }
        if self.invitees.iter().any(|i| i.member_id == member_id) {
            return Err(ClubError::conflict(format!(
                "member {member_id} is already invited to booking {}",
                self.id
            )));
        }
        if self.seats_taken() >= self.party_size {
            return Err(ClubError::conflict(format!(
                "booking {} is full (party size {})",
                self.id, self.party_size
            )));
        }
        self.invitees.push(Invitee {
            member_id: member_id.to_string(),
            status: RsvpStatus::Pending,
        });
        Ok(())
    }

    /// Returns `false` when the response repeats the current status.
    ///
    /// # Errors
    ///
    /// `State` once the round has started or the booking is closed, `NotFound`
    /// if the member was never invited, `Conflict` when accepting into a full
    /// party.
    pub fn respond(&mut self, member_id: &str, response: InviteResponse) -> ClubResult<bool> {
        if self.status != BookingStatus::Scheduled {
            return Err(ClubError::state(format!(
                "booking {} is {}; invitations are closed",
                self.id, self.status
            )));
        }
        let seats_taken = self.seats_taken();
        let party_size = self.party_size;
        let booking_id = self.id;
        let invitee = self
            .invitees
            .iter_mut()
            .find(|i| i.member_id == member_id)
            .ok_or_else(|| {
                ClubError::not_found(format!(
                    "member {member_id} is not invited to booking {booking_id}"
                ))
            })?;
        let next = RsvpStatus::from(response);
        if invitee.status == next {
            return Ok(false);
        }
        if invitee.status == RsvpStatus::Declined && seats_taken >= party_size {
            return Err(ClubError::conflict(format!(
                "booking {booking_id} is full (party size {party_size})"
            )));
        }
        invitee.status = next;
        Ok(true)
    }

    /// Records a caddie claim on this booking. The cross-booking slot check is
    /// storage's job; this only guards what one booking can know.
    ///
    /// # Errors
    ///
    /// `Validation` for an empty count, `State` unless scheduled, `Conflict`
    /// for a duplicate caddie or when the party size would be exceeded.
    pub fn add_assignment(&mut self, assignment: CaddieAssignment) -> ClubResult<()> {
        if assignment.player_count < 1 {
            return Err(ClubError::validation("player count must be at least 1"));
        }
        self.require_status(BookingStatus::Scheduled, "assign caddies to")?;
        if self
            .caddies
            .iter()
            .any(|a| a.caddie_id == assignment.caddie_id)
        {
            return Err(ClubError::conflict(format!(
                "caddie {} is already assigned to booking {}",
                assignment.caddie_id, self.id
            )));
        }
        let requested = self.assigned_player_count() + assignment.player_count;
        if requested > self.party_size {
            return Err(ClubError::conflict(format!(
                "party size exceeded: {requested} players assigned to caddies, party size is {}",
                self.party_size
            )));
        }
        self.caddies.push(assignment);
        Ok(())
    }

    /// # Errors
    ///
    /// `State` for a completed booking, `NotFound` if the caddie holds no claim.
    pub fn remove_assignment(&mut self, caddie_id: &str) -> ClubResult<CaddieAssignment> {
        if self.status == BookingStatus::Completed {
            return Err(ClubError::state(format!(
                "booking {} is completed; caddie claims are final",
                self.id
            )));
        }
        let idx = self
            .caddies
            .iter()
            .position(|a| a.caddie_id == caddie_id)
            .ok_or_else(|| {
                ClubError::not_found(format!(
                    "caddie {caddie_id} is not assigned to booking {}",
                    self.id
                ))
            })?;
        Ok(self.caddies.remove(idx))
    }

    /// Cancels and drops every caddie claim, returning the released ones.
    ///
    /// # Errors
    ///
    /// `State` once cancelled or completed.
    pub fn cancel(&mut self) -> ClubResult<Vec<CaddieAssignment>> {
        if self.status.is_closed() {
            return Err(ClubError::state(format!(
                "booking {} is already {}",
                self.id, self.status
            )));
        }
        self.status = BookingStatus::Cancelled;
        Ok(std::mem::take(&mut self.caddies))
    }

    /// # Errors
    ///
    /// `State` unless scheduled.
    pub fn start(&mut self) -> ClubResult<()> {
        self.require_status(BookingStatus::Scheduled, "start")?;
        self.status = BookingStatus::InProgress;
        Ok(())
    }

    /// # Errors
    ///
    /// `State` unless in progress.
    pub fn complete(&mut self) -> ClubResult<()> {
        self.require_status(BookingStatus::InProgress, "complete")?;
        self.status = BookingStatus::Completed;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn booking(party_size: u32) -> Booking {
        NewBooking {
            date: NaiveDate::from_ymd_opt(2025, 3, 15).unwrap(),
            time_slot: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            course: "Championship".to_string(),
            party_size,
            host_member_id: "M1".to_string(),
            created_at: NaiveDate::from_ymd_opt(2025, 3, 1)
                .unwrap()
                .and_hms_opt(8, 0, 0)
                .unwrap(),
        }
        .into_booking(1)
    }

    fn assignment(caddie_id: &str, player_count: u32, rate_cents: i64) -> CaddieAssignment {
        CaddieAssignment {
            caddie_id: caddie_id.to_string(),
            player_count,
            rate_cents,
        }
    }

    #[test]
    fn party_size_bounds_caddie_assignments() {
        let mut b = booking(4);
        b.add_assignment(assignment("C1", 2, 5000)).unwrap();
        b.add_assignment(assignment("C2", 2, 6000)).unwrap();
        assert_eq!(b.total_cost_cents(), 2 * 5000 + 2 * 6000);

        let err = b.add_assignment(assignment("C3", 1, 4000)).unwrap_err();
        assert!(matches!(err, ClubError::Conflict(_)));
        assert_eq!(b.caddies.len(), 2);
        assert_eq!(b.assigned_player_count(), 4);
    }

    #[test]
    fn declined_invitees_free_their_seat() {
        let mut b = booking(2);
        b.invite("M2").unwrap();
        assert!(matches!(b.invite("M3"), Err(ClubError::Conflict(_))));

        assert!(b.respond("M2", InviteResponse::Declined).unwrap());
        b.invite("M3").unwrap();

        // M2 changing their mind now finds the party full.
        assert!(matches!(
            b.respond("M2", InviteResponse::Accepted),
            Err(ClubError::Conflict(_))
        ));
    }

    #[test]
    fn answers_freeze_once_the_round_starts() {
        let mut b = booking(4);
        b.invite("M2").unwrap();
        b.invite("M3").unwrap();
        b.respond("M2", InviteResponse::Accepted).unwrap();
        b.start().unwrap();

        assert!(matches!(
            b.respond("M3", InviteResponse::Accepted),
            Err(ClubError::State(_))
        ));
        assert!(matches!(
            b.respond("M2", InviteResponse::Declined),
            Err(ClubError::State(_))
        ));
        assert_eq!(b.player_ids(), vec!["M1".to_string(), "M2".to_string()]);
    }

    #[test]
    fn repeated_response_is_a_no_op() {
        let mut b = booking(4);
        b.invite("M2").unwrap();
        assert!(b.respond("M2", InviteResponse::Accepted).unwrap());
        assert!(!b.respond("M2", InviteResponse::Accepted).unwrap());
        assert_eq!(b.player_ids(), vec!["M1".to_string(), "M2".to_string()]);
    }

    #[test]
    fn slots_overlap_within_one_round() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 15).unwrap();
        let at = |h, m| TeeSlot {
            date,
            time_slot: NaiveTime::from_hms_opt(h, m, 0).unwrap(),
        };
        assert!(at(9, 0).overlaps(&at(9, 0), 240));
        assert!(at(9, 0).overlaps(&at(12, 59), 240));
        assert!(!at(9, 0).overlaps(&at(13, 0), 240));
        let next_day = TeeSlot {
            date: date.succ_opt().unwrap(),
            time_slot: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
        };
        assert!(!at(9, 0).overlaps(&next_day, 240));
    }

    #[test]
    fn overlap_window_grows_with_the_round() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 15).unwrap();
        let slot = TeeSlot {
            date,
            time_slot: NaiveTime::from_hms_opt(23, 30, 0).unwrap(),
        };
        let day = |d| NaiveDate::from_ymd_opt(2025, 3, d).unwrap();
        assert_eq!(slot.overlap_window(240), (day(14), day(16)));
        assert_eq!(slot.overlap_window(1440), (day(14), day(16)));
        assert_eq!(slot.overlap_window(3000), (day(12), day(18)));

        let two_days_on = TeeSlot {
            date: day(17),
            time_slot: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
        };
        assert!(slot.overlaps(&two_days_on, 3000));
        let (from, to) = slot.overlap_window(3000);
        assert!((from..=to).contains(&two_days_on.date));
    }

    #[test]
    fn cancel_takes_every_claim() {
        let mut b = booking(4);
        b.add_assignment(assignment("C1", 2, 5000)).unwrap();
        let released = b.cancel().unwrap();
        assert_eq!(released.len(), 1);
        assert!(b.caddies.is_empty());
        assert_eq!(b.total_cost_cents(), 0);
        assert!(matches!(b.cancel(), Err(ClubError::State(_))));
    }
}
