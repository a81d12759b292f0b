use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::NaiveDate;
use rusqlite::{Connection, OptionalExtension, Row, params};

use super::{CaddieClaim, ClaimOutcome, Storage, StorageError, TeeTimeFilter};
use crate::model::{
    Booking, BookingStatus, Caddie, CaddieAssignment, HandicapRange, HoleScore, Invitee,
    LoyaltyTier, Member, MembershipStatus, NewBooking, PlayerScoreRecord, RsvpStatus, Scorecard,
    TeeSlot, VerificationState, format_time_slot, format_timestamp, parse_date, parse_time_slot,
    parse_timestamp,
};

pub const SCHEMA: [&str; 7] = [
    include_str!("sql/schema/sqlite/01_member.sql"),
    include_str!("sql/schema/sqlite/02_caddie.sql"),
    include_str!("sql/schema/sqlite/03_booking.sql"),
    include_str!("sql/schema/sqlite/04_booking_invitee.sql"),
    include_str!("sql/schema/sqlite/05_caddie_assignment.sql"),
    include_str!("sql/schema/sqlite/06_scorecard.sql"),
    include_str!("sql/schema/sqlite/07_player_score.sql"),
];

pub const DROP_TABLES: &str = include_str!("sql/schema/sqlite/00_table_drop.sql");

/// SQLite-backed storage. One connection behind a mutex; every call runs on
/// the blocking pool inside its own transaction.
#[derive(Clone)]
pub struct SqliteStorage {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteStorage {
    /// Opens (or creates) the database file; `:memory:` gives a private
    /// in-memory database.
    ///
    /// # Errors
    ///
    /// Will return `Err` if the file cannot be opened.
    pub fn open(db_name: &str) -> Result<Self, StorageError> {
        let conn = if db_name == ":memory:" {
            Connection::open_in_memory()?
        } else {
            Connection::open(db_name)?
        };
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    async fn interact<F, T>(&self, f: F) -> Result<T, StorageError>
    where
        F: FnOnce(&Connection) -> Result<T, StorageError> + Send + 'static,
        T: Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || {
            let mut guard = conn
                .lock()
                .map_err(|_| StorageError::from("sqlite connection mutex poisoned"))?;
            let tx = guard.transaction()?;
            let out = f(&tx)?;
            tx.commit()?;
            Ok::<_, StorageError>(out)
        })
        .await
        .map_err(|e| StorageError::Db(format!("storage task failed: {e}")))?
    }
}

fn bad_column(what: &str, raw: &str) -> StorageError {
    StorageError::Db(format!("unreadable {what} '{raw}' in database"))
}

fn read_date(raw: &str) -> Result<NaiveDate, StorageError> {
    parse_date(raw).ok_or_else(|| bad_column("date", raw))
}

fn read_timestamp(raw: &str) -> Result<chrono::NaiveDateTime, StorageError> {
    parse_timestamp(raw).ok_or_else(|| bad_column("timestamp", raw))
}

fn read_member(row: &Row<'_>) -> rusqlite::Result<(Member, String, String)> {
    let loyalty_tier: String = row.get("loyalty_tier")?;
    let membership_status: String = row.get("membership_status")?;
    Ok((
        Member {
            id: row.get("member_id")?,
            name: row.get("name")?,
            handicap_index: row.get("handicap_index")?,
            loyalty_tier: LoyaltyTier::Bronze,
            membership_status: MembershipStatus::Active,
        },
        loyalty_tier,
        membership_status,
    ))
}

fn finish_member(
    (mut member, tier, status): (Member, String, String),
) -> Result<Member, StorageError> {
    member.loyalty_tier = LoyaltyTier::parse(&tier).ok_or_else(|| bad_column("loyalty tier", &tier))?;
    member.membership_status = MembershipStatus::parse(&status)
        .ok_or_else(|| bad_column("membership status", &status))?;
    Ok(member)
}

fn read_caddie(row: &Row<'_>) -> rusqlite::Result<Caddie> {
    let rating: f64 = row.get("rating")?;
    #[allow(clippy::cast_possible_truncation)]
    let rating = rating as f32;
    Ok(Caddie {
        id: row.get("caddie_id")?,
        name: row.get("name")?,
        rating,
        years_experience: row.get("years_experience")?,
        specialty: HandicapRange {
            min: row.get("specialty_min")?,
            max: row.get("specialty_max")?,
        },
        rate_cents: row.get("rate_cents")?,
        available: row.get("available")?,
    })
}

const CADDIE_COLUMNS: &str = "caddie_id, name, rating, years_experience, specialty_min, \
     specialty_max, rate_cents, available";

struct BookingRow {
    id: i64,
    play_date: String,
    time_slot: String,
    course: String,
    party_size: u32,
    host_member_id: String,
    status: String,
    created_at: String,
}

const BOOKING_COLUMNS: &str =
    "booking_id, play_date, time_slot, course, party_size, host_member_id, status, created_at";

impl BookingRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("booking_id")?,
            play_date: row.get("play_date")?,
            time_slot: row.get("time_slot")?,
            course: row.get("course")?,
            party_size: row.get("party_size")?,
            host_member_id: row.get("host_member_id")?,
            status: row.get("status")?,
            created_at: row.get("created_at")?,
        })
    }

    fn hydrate(self, conn: &Connection) -> Result<Booking, StorageError> {
        Ok(Booking {
            id: self.id,
            date: read_date(&self.play_date)?,
            time_slot: parse_time_slot(&self.time_slot)
                .ok_or_else(|| bad_column("time slot", &self.time_slot))?,
            course: self.course,
            party_size: self.party_size,
            host_member_id: self.host_member_id,
            caddies: load_assignments(conn, self.id)?,
            invitees: load_invitees(conn, self.id)?,
            status: BookingStatus::parse(&self.status)
                .ok_or_else(|| bad_column("booking status", &self.status))?,
            created_at: read_timestamp(&self.created_at)?,
        })
    }
}

fn load_invitees(conn: &Connection, booking_id: i64) -> Result<Vec<Invitee>, StorageError> {
    let mut stmt = conn.prepare(
        "SELECT member_id, rsvp_status FROM booking_invitee WHERE booking_id = ?1 ORDER BY seq",
    )?;
    let rows = stmt
        .query_map(params![booking_id], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?
        .collect::<Result<Vec<_>, _>>()?;
    rows.into_iter()
        .map(|(member_id, status)| {
            Ok(Invitee {
                member_id,
                status: RsvpStatus::parse(&status).ok_or_else(|| bad_column("rsvp", &status))?,
            })
        })
        .collect()
}

fn load_assignments(
    conn: &Connection,
    booking_id: i64,
) -> Result<Vec<CaddieAssignment>, StorageError> {
    let mut stmt = conn.prepare(
        "SELECT caddie_id, player_count, rate_cents FROM caddie_assignment \
         WHERE booking_id = ?1 ORDER BY seq",
    )?;
    let rows = stmt
        .query_map(params![booking_id], |row| {
            Ok(CaddieAssignment {
                caddie_id: row.get(0)?,
                player_count: row.get(1)?,
                rate_cents: row.get(2)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

fn load_booking(conn: &Connection, booking_id: i64) -> Result<Option<Booking>, StorageError> {
    let raw = conn
        .query_row(
            &format!("SELECT {BOOKING_COLUMNS} FROM booking WHERE booking_id = ?1"),
            params![booking_id],
            BookingRow::from_row,
        )
        .optional()?;
    raw.map(|r| r.hydrate(conn)).transpose()
}

fn write_booking(conn: &Connection, booking: &Booking) -> Result<(), StorageError> {
    let updated = conn.execute(
        "UPDATE booking SET play_date = ?2, time_slot = ?3, course = ?4, party_size = ?5, \
         status = ?6 WHERE booking_id = ?1",
        params![
            booking.id,
            booking.date.to_string(),
            format_time_slot(booking.time_slot),
            booking.course,
            booking.party_size,
            booking.status.as_str(),
        ],
    )?;
    if updated == 0 {
        return Err(StorageError::Db(format!("booking {} does not exist", booking.id)));
    }
    conn.execute(
        "DELETE FROM booking_invitee WHERE booking_id = ?1",
        params![booking.id],
    )?;
    let mut stmt = conn.prepare(
        "INSERT INTO booking_invitee (booking_id, member_id, seq, rsvp_status) \
         VALUES (?1, ?2, ?3, ?4)",
    )?;
    for (seq, invitee) in booking.invitees.iter().enumerate() {
        stmt.execute(params![
            booking.id,
            invitee.member_id,
            i64::try_from(seq).unwrap_or(i64::MAX),
            invitee.status.as_str(),
        ])?;
    }
    Ok(())
}

fn claims_between(
    conn: &Connection,
    from: NaiveDate,
    to: NaiveDate,
    caddie_id: Option<&str>,
) -> Result<Vec<CaddieClaim>, StorageError> {
    let mut stmt = conn.prepare(
        "SELECT a.caddie_id, a.booking_id, a.play_date, a.time_slot \
         FROM caddie_assignment a JOIN booking b ON b.booking_id = a.booking_id \
         WHERE b.status != 'cancelled' AND a.play_date BETWEEN ?1 AND ?2 \
         AND (?3 IS NULL OR a.caddie_id = ?3) \
         ORDER BY a.play_date, a.time_slot, a.booking_id",
    )?;
    let rows = stmt
        .query_map(
            params![from.to_string(), to.to_string(), caddie_id],
            |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, i64>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, String>(3)?,
                ))
            },
        )?
        .collect::<Result<Vec<_>, _>>()?;
    rows.into_iter()
        .map(|(caddie_id, booking_id, date, slot)| {
            Ok(CaddieClaim {
                caddie_id,
                booking_id,
                slot: TeeSlot {
                    date: read_date(&date)?,
                    time_slot: parse_time_slot(&slot)
                        .ok_or_else(|| bad_column("time slot", &slot))?,
                },
            })
        })
        .collect()
}

fn verification_columns(
    state: &VerificationState,
) -> (
    &'static str,
    Option<String>,
    Option<String>,
    u32,
    Option<String>,
    Option<String>,
) {
    match state {
        VerificationState::Unverified => ("unverified", None, None, 0, None, None),
        VerificationState::Pending {
            code,
            requested_at,
            failed_attempts,
        } => (
            "pending",
            Some(code.clone()),
            Some(format_timestamp(*requested_at)),
            *failed_attempts,
            None,
            None,
        ),
        VerificationState::Verified {
            verified_at,
            verified_by,
        } => (
            "verified",
            None,
            None,
            0,
            Some(format_timestamp(*verified_at)),
            verified_by.clone(),
        ),
    }
}

fn write_players(conn: &Connection, scorecard: &Scorecard) -> Result<(), StorageError> {
    conn.execute(
        "DELETE FROM player_score WHERE booking_id = ?1",
        params![scorecard.booking_id],
    )?;
    let mut stmt = conn.prepare(
        "INSERT INTO player_score (booking_id, player_id, seq, name, handicap, holes, \
         verification_state, verification_code, requested_at, failed_attempts, verified_at, \
         verified_by) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
    )?;
    for (seq, player) in scorecard.players.iter().enumerate() {
        let holes_json = serde_json::to_string(&player.holes)?;
        let (state, code, requested_at, failed_attempts, verified_at, verified_by) =
            verification_columns(&player.verification);
        stmt.execute(params![
            scorecard.booking_id,
            player.player_id,
            i64::try_from(seq).unwrap_or(i64::MAX),
            player.name,
            player.handicap,
            holes_json,
            state,
            code,
            requested_at,
            failed_attempts,
            verified_at,
            verified_by,
        ])?;
    }
    Ok(())
}

fn write_scorecard(conn: &Connection, scorecard: &Scorecard) -> Result<(), StorageError> {
    let updated = conn.execute(
        "UPDATE scorecard SET completed_at = ?2 WHERE booking_id = ?1",
        params![
            scorecard.booking_id,
            scorecard.completed_at.map(format_timestamp),
        ],
    )?;
    if updated == 0 {
        return Err(StorageError::Db(format!(
            "scorecard for booking {} does not exist",
            scorecard.booking_id
        )));
    }
    write_players(conn, scorecard)
}

struct PlayerRow {
    player_id: String,
    name: String,
    handicap: f64,
    holes: String,
    state: String,
    code: Option<String>,
    requested_at: Option<String>,
    failed_attempts: u32,
    verified_at: Option<String>,
    verified_by: Option<String>,
}

impl PlayerRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            player_id: row.get("player_id")?,
            name: row.get("name")?,
            handicap: row.get("handicap")?,
            holes: row.get("holes")?,
            state: row.get("verification_state")?,
            code: row.get("verification_code")?,
            requested_at: row.get("requested_at")?,
            failed_attempts: row.get("failed_attempts")?,
            verified_at: row.get("verified_at")?,
            verified_by: row.get("verified_by")?,
        })
    }

    fn into_record(self) -> Result<PlayerScoreRecord, StorageError> {
        let holes: Vec<HoleScore> = serde_json::from_str(&self.holes)?;
        let verification = match self.state.as_str() {
            "unverified" => VerificationState::Unverified,
            "pending" => VerificationState::Pending {
                code: self
                    .code
                    .ok_or_else(|| bad_column("verification code", "NULL"))?,
                requested_at: read_timestamp(self.requested_at.as_deref().unwrap_or_default())?,
                failed_attempts: self.failed_attempts,
            },
            "verified" => VerificationState::Verified {
                verified_at: read_timestamp(self.verified_at.as_deref().unwrap_or_default())?,
                verified_by: self.verified_by,
            },
            other => return Err(bad_column("verification state", other)),
        };
        Ok(PlayerScoreRecord {
            player_id: self.player_id,
            name: self.name,
            handicap: self.handicap,
            holes,
            verification,
        })
    }
}

#[async_trait]
impl Storage for SqliteStorage {
    async fn apply_schema(&self) -> Result<(), StorageError> {
        let ddl = SCHEMA.join("\n");
        self.interact(move |conn| Ok(conn.execute_batch(&ddl)?))
            .await
    }

    async fn execute_batch(&self, sql: &str) -> Result<(), StorageError> {
        let sql = sql.to_owned();
        self.interact(move |conn| Ok(conn.execute_batch(&sql)?))
            .await
    }

    async fn upsert_member(&self, member: &Member) -> Result<(), StorageError> {
        let member = member.clone();
        self.interact(move |conn| {
            conn.execute(
                "INSERT INTO member (member_id, name, handicap_index, loyalty_tier, membership_status) \
                 VALUES (?1, ?2, ?3, ?4, ?5) \
                 ON CONFLICT (member_id) DO UPDATE SET name = excluded.name, \
                 handicap_index = excluded.handicap_index, loyalty_tier = excluded.loyalty_tier, \
                 membership_status = excluded.membership_status",
                params![
                    member.id,
                    member.name,
                    member.handicap_index,
                    member.loyalty_tier.as_str(),
                    member.membership_status.as_str(),
                ],
            )?;
            Ok(())
        })
        .await
    }

    async fn get_member(&self, member_id: &str) -> Result<Option<Member>, StorageError> {
        let member_id = member_id.to_owned();
        self.interact(move |conn| {
            conn.query_row(
                "SELECT member_id, name, handicap_index, loyalty_tier, membership_status \
                 FROM member WHERE member_id = ?1",
                params![member_id],
                read_member,
            )
            .optional()?
            .map(finish_member)
            .transpose()
        })
        .await
    }

    async fn upsert_caddie(&self, caddie: &Caddie) -> Result<(), StorageError> {
        let caddie = caddie.clone();
        self.interact(move |conn| {
            conn.execute(
                "INSERT INTO caddie (caddie_id, name, rating, years_experience, specialty_min, \
                 specialty_max, rate_cents, available) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8) \
                 ON CONFLICT (caddie_id) DO UPDATE SET name = excluded.name, \
                 rating = excluded.rating, years_experience = excluded.years_experience, \
                 specialty_min = excluded.specialty_min, specialty_max = excluded.specialty_max, \
                 rate_cents = excluded.rate_cents, available = excluded.available",
                params![
                    caddie.id,
                    caddie.name,
                    f64::from(caddie.rating),
                    caddie.years_experience,
                    caddie.specialty.min,
                    caddie.specialty.max,
                    caddie.rate_cents,
                    caddie.available,
                ],
            )?;
            Ok(())
        })
        .await
    }

    async fn get_caddie(&self, caddie_id: &str) -> Result<Option<Caddie>, StorageError> {
        let caddie_id = caddie_id.to_owned();
        self.interact(move |conn| {
            Ok(conn
                .query_row(
                    &format!("SELECT {CADDIE_COLUMNS} FROM caddie WHERE caddie_id = ?1"),
                    params![caddie_id],
                    read_caddie,
                )
                .optional()?)
        })
        .await
    }

    async fn list_caddies(&self) -> Result<Vec<Caddie>, StorageError> {
        self.interact(|conn| {
            let mut stmt =
                conn.prepare(&format!("SELECT {CADDIE_COLUMNS} FROM caddie ORDER BY caddie_id"))?;
            let caddies = stmt
                .query_map([], read_caddie)?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(caddies)
        })
        .await
    }

    async fn active_claims(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<CaddieClaim>, StorageError> {
        self.interact(move |conn| claims_between(conn, from, to, None))
            .await
    }

    async fn insert_booking(&self, booking: NewBooking) -> Result<Booking, StorageError> {
        self.interact(move |conn| {
            conn.execute(
                "INSERT INTO booking (play_date, time_slot, course, party_size, host_member_id, \
                 status, created_at) VALUES (?1, ?2, ?3, ?4, ?5, 'scheduled', ?6)",
                params![
                    booking.date.to_string(),
                    format_time_slot(booking.time_slot),
                    booking.course,
                    booking.party_size,
                    booking.host_member_id,
                    format_timestamp(booking.created_at),
                ],
            )?;
            Ok(booking.into_booking(conn.last_insert_rowid()))
        })
        .await
    }

    async fn get_booking(&self, booking_id: i64) -> Result<Option<Booking>, StorageError> {
        self.interact(move |conn| load_booking(conn, booking_id))
            .await
    }

    async fn list_bookings(&self, filter: &TeeTimeFilter) -> Result<Vec<Booking>, StorageError> {
        let date = filter.date.map(|d| d.to_string());
        let status = filter.status.map(|s| s.as_str());
        self.interact(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {BOOKING_COLUMNS} FROM booking \
                 WHERE (?1 IS NULL OR play_date = ?1) AND (?2 IS NULL OR status = ?2) \
                 ORDER BY play_date, time_slot, booking_id"
            ))?;
            let rows = stmt
                .query_map(params![date, status], BookingRow::from_row)?
                .collect::<Result<Vec<_>, _>>()?;
            rows.into_iter().map(|r| r.hydrate(conn)).collect()
        })
        .await
    }

    async fn save_booking(&self, booking: &Booking) -> Result<(), StorageError> {
        let booking = booking.clone();
        self.interact(move |conn| write_booking(conn, &booking))
            .await
    }

    async fn claim_caddie(
        &self,
        booking: &Booking,
        assignment: &CaddieAssignment,
        round_minutes: i64,
    ) -> Result<ClaimOutcome, StorageError> {
        let booking_id = booking.id;
        let slot = booking.slot();
        let assignment = assignment.clone();
        self.interact(move |conn| {
            let on_roster: Option<bool> = conn
                .query_row(
                    "SELECT available FROM caddie WHERE caddie_id = ?1",
                    params![assignment.caddie_id],
                    |row| row.get(0),
                )
                .optional()?;
            match on_roster {
                None => {
                    return Err(StorageError::Db(format!(
                        "caddie {} does not exist",
                        assignment.caddie_id
                    )));
                }
                Some(false) => return Ok(ClaimOutcome::OffRoster),
                Some(true) => {}
            }

            let (from, to) = slot.overlap_window(round_minutes);
            let clash = claims_between(conn, from, to, Some(assignment.caddie_id.as_str()))?
                .into_iter()
                .find(|c| c.booking_id != booking_id && c.slot.overlaps(&slot, round_minutes));
            if let Some(claim) = clash {
                return Ok(ClaimOutcome::SlotTaken {
                    booking_id: claim.booking_id,
                });
            }

            conn.execute(
                "INSERT INTO caddie_assignment (booking_id, caddie_id, seq, player_count, \
                 rate_cents, play_date, time_slot) \
                 VALUES (?1, ?2, (SELECT COALESCE(MAX(seq), -1) + 1 FROM caddie_assignment \
                 WHERE booking_id = ?1), ?3, ?4, ?5, ?6)",
                params![
                    booking_id,
                    assignment.caddie_id,
                    assignment.player_count,
                    assignment.rate_cents,
                    slot.date.to_string(),
                    format_time_slot(slot.time_slot),
                ],
            )?;
            Ok(ClaimOutcome::Claimed)
        })
        .await
    }

    async fn release_caddie(&self, booking_id: i64, caddie_id: &str) -> Result<(), StorageError> {
        let caddie_id = caddie_id.to_owned();
        self.interact(move |conn| {
            conn.execute(
                "DELETE FROM caddie_assignment WHERE booking_id = ?1 AND caddie_id = ?2",
                params![booking_id, caddie_id],
            )?;
            Ok(())
        })
        .await
    }

    async fn cancel_booking(&self, booking: &Booking) -> Result<(), StorageError> {
        let booking = booking.clone();
        self.interact(move |conn| {
            write_booking(conn, &booking)?;
            conn.execute(
                "DELETE FROM caddie_assignment WHERE booking_id = ?1",
                params![booking.id],
            )?;
            Ok(())
        })
        .await
    }

    async fn get_scorecard(&self, booking_id: i64) -> Result<Option<Scorecard>, StorageError> {
        self.interact(move |conn| {
            let header = conn
                .query_row(
                    "SELECT opened_at, completed_at FROM scorecard WHERE booking_id = ?1",
                    params![booking_id],
                    |row| Ok((row.get::<_, String>(0)?, row.get::<_, Option<String>>(1)?)),
                )
                .optional()?;
            let Some((opened_at, completed_at)) = header else {
                return Ok(None);
            };

            let mut stmt = conn.prepare(
                "SELECT player_id, name, handicap, holes, verification_state, verification_code, \
                 requested_at, failed_attempts, verified_at, verified_by \
                 FROM player_score WHERE booking_id = ?1 ORDER BY seq",
            )?;
            let players = stmt
                .query_map(params![booking_id], PlayerRow::from_row)?
                .collect::<Result<Vec<_>, _>>()?
                .into_iter()
                .map(PlayerRow::into_record)
                .collect::<Result<Vec<_>, _>>()?;

            Ok(Some(Scorecard {
                booking_id,
                players,
                opened_at: read_timestamp(&opened_at)?,
                completed_at: completed_at.as_deref().map(read_timestamp).transpose()?,
            }))
        })
        .await
    }

    async fn insert_scorecard(&self, scorecard: &Scorecard) -> Result<(), StorageError> {
        let scorecard = scorecard.clone();
        self.interact(move |conn| {
            conn.execute(
                "INSERT INTO scorecard (booking_id, opened_at, completed_at) VALUES (?1, ?2, ?3)",
                params![
                    scorecard.booking_id,
                    format_timestamp(scorecard.opened_at),
                    scorecard.completed_at.map(format_timestamp),
                ],
            )?;
            write_players(conn, &scorecard)
        })
        .await
    }

    async fn save_scorecard(&self, scorecard: &Scorecard) -> Result<(), StorageError> {
        let scorecard = scorecard.clone();
        self.interact(move |conn| write_scorecard(conn, &scorecard))
            .await
    }

    async fn complete_round(
        &self,
        booking: &Booking,
        scorecard: &Scorecard,
    ) -> Result<(), StorageError> {
        let booking = booking.clone();
        let scorecard = scorecard.clone();
        self.interact(move |conn| {
            write_booking(conn, &booking)?;
            write_scorecard(conn, &scorecard)
        })
        .await
    }
}
