//! Spreadsheet serial dates
//!
//! A serial number counts days since 1899-12-30 00:00; the fractional part is
//! the time of day. Sheets and Excel (1900 system, after 1900-03-01) both use
//! this encoding for date cells.

use chrono::{DateTime, Duration, FixedOffset, NaiveDate, NaiveDateTime, TimeZone, Utc};

use crate::cell::Cell;
use crate::error::{Error, Result};

const MICROS_PER_DAY: f64 = 86_400_000_000.0;

/// Floats above this are Unix seconds rather than serial numbers
///
/// 946684800 is 2000-01-01T00:00:00Z. No serial number in practical use is
/// anywhere near it (serial 946684800 lies millions of years out).
pub const UNIX_THRESHOLD: f64 = 946_684_800.0;

/// Returned by [`normalize`] for input it cannot interpret
pub const UNRECOGNIZED: f64 = -1.0;

/// The serial epoch, 1899-12-30T00:00:00, without an offset
pub fn epoch() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(1899, 12, 30)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .unwrap_or_default()
}

/// Convert a serial number to a UTC timestamp
///
/// The integer part (floored, so negative serials count backwards) is a day
/// count and the fraction a share of 24 hours, rounded to the microsecond.
pub fn to_datetime(serial: f64) -> Result<DateTime<Utc>> {
    if !serial.is_finite() {
        return Err(Error::SerialOutOfRange(serial));
    }

    let days = serial.floor();
    let micros = ((serial - days) * MICROS_PER_DAY).round();

    if days.abs() > i32::MAX as f64 {
        return Err(Error::SerialOutOfRange(serial));
    }

    let naive = Duration::try_days(days as i64)
        .and_then(|d| epoch().checked_add_signed(d))
        .and_then(|t| t.checked_add_signed(Duration::microseconds(micros as i64)))
        .ok_or(Error::SerialOutOfRange(serial))?;

    Ok(Utc.from_utc_datetime(&naive))
}

/// Convert a timestamp to a serial number
///
/// The epoch is taken in the timestamp's own offset, so the serial encodes
/// the wall-clock date and time the timestamp shows.
pub fn from_datetime<Tz: TimeZone>(ts: &DateTime<Tz>) -> f64 {
    let delta = ts.naive_local() - epoch();

    let days = delta.num_days();
    let within_day = delta - Duration::days(days);
    let micros = within_day.num_microseconds().unwrap_or(0);

    // Negative deltas leave a negative remainder; keep the fraction in [0, 1)
    let (days, micros) = if micros < 0 {
        (days - 1, micros + MICROS_PER_DAY as i64)
    } else {
        (days, micros)
    };

    days as f64 + micros as f64 / MICROS_PER_DAY
}

/// Convert Unix seconds to a serial number, reading the wall clock in `tz`
pub fn from_timestamp<Tz: TimeZone>(unix: i64, tz: &Tz) -> Result<f64> {
    let ts = tz
        .timestamp_opt(unix, 0)
        .single()
        .ok_or(Error::TimestampOutOfRange(unix))?;
    Ok(from_datetime(&ts))
}

/// Current time as a serial number (UTC wall clock)
pub fn now() -> f64 {
    from_datetime(&Utc::now())
}

/// Input accepted by [`normalize`]
#[derive(Debug, Clone, PartialEq)]
pub enum TimeValue {
    /// Always Unix seconds
    Int(i64),
    /// Unix seconds above [`UNIX_THRESHOLD`], a serial number otherwise
    Float(f64),
    /// A calendar timestamp
    DateTime(DateTime<FixedOffset>),
    /// Anything else, e.g. a text or boolean cell
    Unrecognized,
}

impl From<i64> for TimeValue {
    fn from(n: i64) -> Self {
        TimeValue::Int(n)
    }
}

impl From<i32> for TimeValue {
    fn from(n: i32) -> Self {
        TimeValue::Int(n as i64)
    }
}

impl From<f64> for TimeValue {
    fn from(n: f64) -> Self {
        TimeValue::Float(n)
    }
}

impl<Tz: TimeZone> From<DateTime<Tz>> for TimeValue {
    fn from(ts: DateTime<Tz>) -> Self {
        TimeValue::DateTime(ts.fixed_offset())
    }
}

impl From<&Cell> for TimeValue {
    fn from(cell: &Cell) -> Self {
        match cell {
            Cell::Int(n) => TimeValue::Int(*n),
            Cell::Number(n) => TimeValue::Float(*n),
            _ => TimeValue::Unrecognized,
        }
    }
}

/// Coerce a time-like value to a serial number
///
/// | input | result |
/// |---|---|
/// | integer | Unix seconds, converted (UTC) |
/// | float > [`UNIX_THRESHOLD`] | Unix seconds, converted (UTC) |
/// | float ≤ [`UNIX_THRESHOLD`] | already a serial number, unchanged |
/// | timestamp | [`from_datetime`] |
/// | anything else | [`UNRECOGNIZED`] |
pub fn normalize<V: Into<TimeValue>>(value: V) -> f64 {
    match value.into() {
        TimeValue::Int(unix) => from_timestamp(unix, &Utc).unwrap_or(UNRECOGNIZED),
        TimeValue::Float(n) if n > UNIX_THRESHOLD => from_unix_float(n).unwrap_or(UNRECOGNIZED),
        TimeValue::Float(n) if n.is_finite() => n,
        TimeValue::DateTime(ts) => from_datetime(&ts),
        _ => UNRECOGNIZED,
    }
}

fn from_unix_float(unix: f64) -> Option<f64> {
    if !unix.is_finite() || unix > i64::MAX as f64 {
        return None;
    }
    let secs = unix.floor();
    let nanos = ((unix - secs) * 1e9).round().min(999_999_999.0) as u32;
    Utc.timestamp_opt(secs as i64, nanos)
        .single()
        .map(|ts| from_datetime(&ts))
}
