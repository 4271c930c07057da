//! Timestamp helpers shared by the domain and the store adapters.

use chrono::{DateTime, NaiveTime, SecondsFormat, SubsecRound, TimeDelta, TimeZone, Timelike, Utc};

/// Drop sub-millisecond precision.
///
/// Stored timestamps are millisecond-precise so that `expires_at - created_at`
/// survives every adapter round trip unchanged.
pub fn truncate_to_millis(at: DateTime<Utc>) -> DateTime<Utc> {
    at.trunc_subsecs(3)
}

/// Start of the calendar day containing `now`, as observed in `tz`.
///
/// If midnight does not exist in `tz` on that day (DST gap), the day starts at
/// `now` minus the wall-clock time elapsed since 00:00.
pub fn start_of_day<Tz: TimeZone>(now: DateTime<Utc>, tz: &Tz) -> DateTime<Utc> {
    let local = now.with_timezone(tz);
    let midnight = local.date_naive().and_time(NaiveTime::MIN);

    match tz.from_local_datetime(&midnight).earliest() {
        Some(start) => start.with_timezone(&Utc),
        None => {
            let elapsed = TimeDelta::seconds(i64::from(local.num_seconds_from_midnight()))
                + TimeDelta::nanoseconds(i64::from(local.nanosecond()));
            now - elapsed
        }
    }
}

/// Render a timestamp the way the wire format does (`2024-01-01T12:00:00.000Z`).
pub fn format_millis(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Serde adapter for [`format_millis`].
pub mod rfc3339_millis {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(at: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::format_millis(*at))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|at| at.with_timezone(&Utc))
            .map_err(serde::de::Error::custom)
    }
}
