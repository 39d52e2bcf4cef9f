//! Time utilities: one fixed frame of reference for calendar days.
//!
//! Every "day" in momentum is a `NaiveDate` in the user's configured IANA
//! timezone. Instants are stored in UTC and projected into that zone only
//! when a calendar day is needed.

use anyhow::Result;
use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;

/// Parse an IANA timezone name like "America/Chicago".
pub fn parse_timezone(tz: &str) -> Result<Tz> {
    tz.parse()
        .map_err(|_| anyhow::anyhow!("invalid timezone: {tz}"))
}

/// Parse a local time like "2026-02-20 09:30" in `tz`, returning UTC.
pub fn parse_local_to_utc(local: &str, tz: Tz) -> Result<DateTime<Utc>> {
    let ndt = NaiveDateTime::parse_from_str(local, "%Y-%m-%d %H:%M")
        .map_err(|e| anyhow::anyhow!("invalid local datetime '{local}': {e}"))?;

    let local_dt = tz
        .from_local_datetime(&ndt)
        .single()
        .ok_or_else(|| anyhow::anyhow!("ambiguous or invalid local time (DST?): {local} {tz}"))?;

    Ok(local_dt.with_timezone(&Utc))
}

/// Parse a calendar day in `YYYY-MM-DD` form.
pub fn parse_day(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|e| anyhow::anyhow!("invalid date '{s}' (expected YYYY-MM-DD): {e}"))
}

/// Calendar day of `instant` as seen in `tz`.
pub fn day_of(instant: DateTime<Utc>, tz: Tz) -> NaiveDate {
    instant.with_timezone(&tz).date_naive()
}

/// Today's calendar day in `tz`.
pub fn today_in(tz: Tz) -> NaiveDate {
    day_of(Utc::now(), tz)
}
