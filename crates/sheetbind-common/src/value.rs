use chrono::{Duration as ChronoDur, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use std::fmt::{self, Display};

use crate::CellErrorKind;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/* ─────────────── Excel date-serial utilities ───────────────
Excel's serial date system:
  Serial 1  = 1900-01-01
  Serial 59 = 1900-02-28
  Serial 60 = 1900-02-29  (phantom – doesn't exist, but Excel thinks it does)
  Serial 61 = 1900-03-01
Base date = 1899-12-31 so that serial 1 = base + 1 day = 1900-01-01.
Time is stored as fractional days (no timezone).
------------------------------------------------------------------- */

const SECONDS_PER_DAY: i64 = 86_400;

/// `strftime` pattern for the canonical textual form of a date-time cell
/// (`yyyy-MM-dd HH:mm:ss`).
pub const DATE_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// ISO 8601 local date-time as written by ODS and other XML containers;
/// fractional seconds are optional.
pub const ISO_DATE_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

fn excel_epoch() -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(1899, 12, 31)
}

pub fn datetime_to_serial(dt: &NaiveDateTime) -> Option<f64> {
    let epoch = excel_epoch()?;
    let days = (dt.date() - epoch).num_days();
    // Dates on or after 1900-03-01 get +1 to account for phantom Feb 29
    let serial_days = if dt.date() >= NaiveDate::from_ymd_opt(1900, 3, 1)? {
        days + 1
    } else {
        days
    };

    let secs_in_day = dt.time().num_seconds_from_midnight() as f64;
    Some(serial_days as f64 + secs_in_day / SECONDS_PER_DAY as f64)
}

/// Convert a 1900-system serial to a calendar date-time, rounded to the
/// nearest second. Negative, non-finite or out-of-range serials yield `None`.
pub fn serial_to_datetime(serial: f64) -> Option<NaiveDateTime> {
    if !serial.is_finite() || serial < 0.0 {
        return None;
    }
    let total_secs = (serial * SECONDS_PER_DAY as f64).round();
    if total_secs > i64::MAX as f64 {
        return None;
    }
    let total_secs = total_secs as i64;
    let days = total_secs.div_euclid(SECONDS_PER_DAY);
    let secs = total_secs.rem_euclid(SECONDS_PER_DAY);

    // Serial 60 is phantom 1900-02-29; map to 1900-02-28
    let date = if days == 60 {
        NaiveDate::from_ymd_opt(1900, 2, 28)?
    } else {
        // serial < 60: offset = serial (no phantom day yet)
        // serial > 60: offset = serial - 1 (skip phantom day)
        let offset = if days < 60 { days } else { days - 1 };
        excel_epoch()?.checked_add_signed(ChronoDur::try_days(offset)?)?
    };

    let time = NaiveTime::from_num_seconds_from_midnight_opt(secs as u32, 0)?;
    Some(date.and_time(time))
}

/// Render a serial in the canonical `yyyy-MM-dd HH:mm:ss` form.
pub fn format_serial(serial: f64) -> Option<String> {
    serial_to_datetime(serial).map(|dt| dt.format(DATE_TIME_FORMAT).to_string())
}

/// A raw, type-unaware cell value as stored in a tabular source.
///
/// This is what a backend hands to the importer; the importer decides what
/// a value *means* only once it knows which field the column is bound to.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Empty,
    Text(String),
    Int(i64),
    Number(f64),
    Boolean(bool),
    /// Numeric cell carrying a date/time number format; the payload is the
    /// 1900-system serial.
    DateTime(f64),
    Error(CellErrorKind),
}

impl CellValue {
    pub fn as_serial_number(&self) -> Option<f64> {
        match self {
            CellValue::Int(i) => Some(*i as f64),
            CellValue::Number(n) | CellValue::DateTime(n) => Some(*n),
            _ => None,
        }
    }

    /// Read the cell as a string, the way a spreadsheet does when a cell's
    /// type is switched to text: integral numbers lose their fractional
    /// part, booleans become `TRUE`/`FALSE`, errors become their code.
    /// Date-formatted cells render their serial, not a calendar date.
    pub fn to_text(&self) -> String {
        self.to_string()
    }
}

fn write_number(f: &mut fmt::Formatter<'_>, n: f64) -> fmt::Result {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 {
        write!(f, "{}", n as i64)
    } else {
        write!(f, "{n}")
    }
}

impl Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Empty => Ok(()),
            CellValue::Text(s) => f.write_str(s),
            CellValue::Int(i) => write!(f, "{i}"),
            CellValue::Number(n) | CellValue::DateTime(n) => write_number(f, *n),
            CellValue::Boolean(true) => f.write_str("TRUE"),
            CellValue::Boolean(false) => f.write_str("FALSE"),
            CellValue::Error(e) => write!(f, "{e}"),
        }
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Text(value.to_string())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        CellValue::Text(value)
    }
}

impl From<i64> for CellValue {
    fn from(value: i64) -> Self {
        CellValue::Int(value)
    }
}

impl From<i32> for CellValue {
    fn from(value: i32) -> Self {
        CellValue::Int(value as i64)
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Number(value)
    }
}

impl From<bool> for CellValue {
    fn from(value: bool) -> Self {
        CellValue::Boolean(value)
    }
}

impl From<CellErrorKind> for CellValue {
    fn from(value: CellErrorKind) -> Self {
        CellValue::Error(value)
    }
}
