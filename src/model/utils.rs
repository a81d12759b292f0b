use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

pub const TIME_SLOT_FORMAT: &str = "%H:%M";
pub const DATE_FORMAT: &str = "%Y-%m-%d";
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[must_use]
pub fn format_time_slot(slot: NaiveTime) -> String {
    slot.format(TIME_SLOT_FORMAT).to_string()
}

/// Accepts `HH:MM` and, for callers that echo chrono's default, `HH:MM:SS`.
#[must_use]
pub fn parse_time_slot(s: &str) -> Option<NaiveTime> {
    let s = s.trim();
    NaiveTime::parse_from_str(s, TIME_SLOT_FORMAT)
        .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M:%S"))
        .ok()
}

#[must_use]
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), DATE_FORMAT).ok()
}

#[must_use]
pub fn format_timestamp(ts: NaiveDateTime) -> String {
    ts.format(TIMESTAMP_FORMAT).to_string()
}

#[must_use]
pub fn parse_timestamp(s: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(s, TIMESTAMP_FORMAT).ok()
}

/// Serde adapter keeping tee time slots as `HH:MM` on the wire.
pub mod time_slot_format {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    pub fn serialize<S: Serializer>(slot: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::format_time_slot(*slot))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        super::parse_time_slot(&raw)
            .ok_or_else(|| D::Error::custom(format!("time slot '{raw}' is not HH:MM")))
    }
}
