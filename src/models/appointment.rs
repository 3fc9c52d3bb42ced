use chrono::{Datelike, Duration, NaiveDateTime, Timelike, Utc};
use chrono_tz::Europe::Rome;
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Recurrence interval applied when a record carries no usable value.
pub const DEFAULT_FREQUENCY_DAYS: i64 = 28;

/// The shop runs on Italian local time; "now" comparisons use it.
pub const SHOP_TZ: Tz = Rome;

pub fn now_local() -> NaiveDateTime {
    Utc::now().with_timezone(&SHOP_TZ).naive_local()
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub enum AppointmentStatus {
    // Stored records predate this implementation and carry Italian wire values.
    #[serde(rename = "PRESO")]
    Planned,
    #[serde(rename = "EFFETTUATO")]
    Completed,
}

impl AppointmentStatus {
    pub fn toggled(self) -> Self {
        match self {
            AppointmentStatus::Planned => AppointmentStatus::Completed,
            AppointmentStatus::Completed => AppointmentStatus::Planned,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    pub id: String,
    #[serde(with = "datetime_local")]
    pub date: NaiveDateTime,
    pub status: AppointmentStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frequency_days: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Appointment {
    pub fn new(date: NaiveDateTime, frequency_days: i64) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            date,
            status: AppointmentStatus::Planned,
            frequency_days: Some(frequency_days),
            notes: None,
        }
    }

    /// The stored interval, or 28 when absent or non-positive.
    pub fn effective_frequency(&self) -> i64 {
        self.frequency_days
            .filter(|days| *days > 0)
            .unwrap_or(DEFAULT_FREQUENCY_DAYS)
    }

    /// Next suggested date, derived at read time and never stored. An
    /// interval too large to represent projects no further than the
    /// appointment itself rather than failing.
    pub fn projected_next_date(&self) -> NaiveDateTime {
        Duration::try_days(self.effective_frequency())
            .and_then(|interval| self.date.checked_add_signed(interval))
            .unwrap_or(self.date)
    }

    /// Planned and already in the past. Presentational only; nothing
    /// transitions status automatically.
    pub fn is_overdue(&self, now: NaiveDateTime) -> bool {
        self.status == AppointmentStatus::Planned && self.date < now
    }
}

/// Parses the datetime-local shapes older records were saved with, plus
/// RFC 3339 for good measure.
pub fn parse_date(input: &str) -> Option<NaiveDateTime> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return None;
    }
    for format in [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M",
    ] {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Some(parsed);
        }
    }
    chrono::DateTime::parse_from_rfc3339(trimmed)
        .ok()
        .map(|parsed| parsed.naive_local())
}

pub fn format_date(date: &NaiveDateTime) -> String {
    if date.second() == 0 && date.nanosecond() == 0 {
        date.format("%Y-%m-%dT%H:%M").to_string()
    } else {
        date.format("%Y-%m-%dT%H:%M:%S").to_string()
    }
}

mod datetime_local {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        date: &NaiveDateTime,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::format_date(date))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<NaiveDateTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        super::parse_date(&raw)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid appointment date: {}", raw)))
    }
}

/// Keeps the collection ordered ascending by date; callers re-sort after
/// every insertion.
pub fn sort_by_date(appointments: &mut [Appointment]) {
    appointments.sort_by_key(|appointment| appointment.date);
}

pub fn is_weekend(date: &NaiveDateTime) -> bool {
    matches!(
        date.weekday(),
        chrono::Weekday::Sat | chrono::Weekday::Sun
    )
}
