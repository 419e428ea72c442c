use crate::error::CoercionError;
use chrono::{NaiveDate, NaiveDateTime};
use sheetbind_common::{
    CellValue, DATE_TIME_FORMAT, DecimalText, ISO_DATE_TIME_FORMAT, format_serial,
};
use std::fmt;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Semantic type a bound column is coerced into.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    Text,
    Integer,
    Long,
    Float,
    Short,
    Double,
    Char,
    DateTime,
    Decimal,
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Text => "text",
            Self::Integer => "integer",
            Self::Long => "long integer",
            Self::Float => "float",
            Self::Short => "short integer",
            Self::Double => "double",
            Self::Char => "character",
            Self::DateTime => "date-time",
            Self::Decimal => "decimal",
        })
    }
}

/// A cell after coercion, ready to be stored in a field of the matching kind.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Integer(i32),
    Long(i64),
    Float(f32),
    Short(i16),
    Double(f64),
    Char(char),
    DateTime(NaiveDateTime),
    Decimal(DecimalText),
}

impl FieldValue {
    pub fn kind(&self) -> FieldKind {
        match self {
            Self::Text(_) => FieldKind::Text,
            Self::Integer(_) => FieldKind::Integer,
            Self::Long(_) => FieldKind::Long,
            Self::Float(_) => FieldKind::Float,
            Self::Short(_) => FieldKind::Short,
            Self::Double(_) => FieldKind::Double,
            Self::Char(_) => FieldKind::Char,
            Self::DateTime(_) => FieldKind::DateTime,
            Self::Decimal(_) => FieldKind::Decimal,
        }
    }
}

/// Outcome of coercing one cell; `Ok(None)` keeps the field's default.
pub type Coerced = Result<Option<FieldValue>, CoercionError>;

/// Rust types that can sit behind a `#[column]` field.
///
/// `KIND` fixes the coercion once, when the record's bindings are built;
/// `Option<T>` binds like `T` and stays `None` for rows without data in
/// that column.
pub trait CellField: Sized {
    const KIND: FieldKind;

    fn from_field_value(value: FieldValue) -> Option<Self>;
}

macro_rules! cell_field {
    ($ty:ty => $kind:ident) => {
        impl CellField for $ty {
            const KIND: FieldKind = FieldKind::$kind;

            fn from_field_value(value: FieldValue) -> Option<Self> {
                match value {
                    FieldValue::$kind(v) => Some(v),
                    _ => None,
                }
            }
        }
    };
}

cell_field!(String => Text);
cell_field!(i32 => Integer);
cell_field!(i64 => Long);
cell_field!(f32 => Float);
cell_field!(i16 => Short);
cell_field!(f64 => Double);
cell_field!(char => Char);
cell_field!(NaiveDateTime => DateTime);
cell_field!(DecimalText => Decimal);

impl<T: CellField> CellField for Option<T> {
    const KIND: FieldKind = T::KIND;

    fn from_field_value(value: FieldValue) -> Option<Self> {
        T::from_field_value(value).map(Some)
    }
}

/* ──────────────────────── per-kind coercions ──────────────────────
Each takes the raw cell and its text form (already known to be non-blank)
and yields `Ok(None)` when the field should keep its default.
------------------------------------------------------------------- */

pub(crate) fn coerce_text(_cell: &CellValue, text: &str) -> Coerced {
    Ok(Some(FieldValue::Text(text.to_string())))
}

fn parse_number<T>(text: &str, kind: FieldKind) -> Result<T, CoercionError>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    text.trim()
        .parse::<T>()
        .map_err(|e| CoercionError::new(format!("not a valid {kind}: {e}")))
}

pub(crate) fn coerce_integer(_cell: &CellValue, text: &str) -> Coerced {
    parse_number(text, FieldKind::Integer).map(|v| Some(FieldValue::Integer(v)))
}

pub(crate) fn coerce_long(_cell: &CellValue, text: &str) -> Coerced {
    parse_number(text, FieldKind::Long).map(|v| Some(FieldValue::Long(v)))
}

pub(crate) fn coerce_float(_cell: &CellValue, text: &str) -> Coerced {
    parse_number(text, FieldKind::Float).map(|v| Some(FieldValue::Float(v)))
}

pub(crate) fn coerce_short(_cell: &CellValue, text: &str) -> Coerced {
    parse_number(text, FieldKind::Short).map(|v| Some(FieldValue::Short(v)))
}

pub(crate) fn coerce_double(_cell: &CellValue, text: &str) -> Coerced {
    parse_number(text, FieldKind::Double).map(|v| Some(FieldValue::Double(v)))
}

pub(crate) fn coerce_char(_cell: &CellValue, text: &str) -> Coerced {
    Ok(text.chars().next().map(FieldValue::Char))
}

/// Numeric cells are read as serials and rendered `yyyy-MM-dd HH:mm:ss`;
/// textual cells are taken as written. Text that is not a date leaves the
/// field at its default rather than failing the import.
pub(crate) fn coerce_date_time(cell: &CellValue, text: &str) -> Coerced {
    let canonical = cell
        .as_serial_number()
        .and_then(format_serial)
        .unwrap_or_else(|| text.to_string());
    match parse_date_time(&canonical) {
        Some(dt) => Ok(Some(FieldValue::DateTime(dt))),
        None => {
            #[cfg(feature = "tracing")]
            tracing::warn!(
                value = %canonical,
                "unrecognised date-time text; field left at default"
            );
            Ok(None)
        }
    }
}

fn parse_date_time(text: &str) -> Option<NaiveDateTime> {
    let text = text.trim();
    NaiveDateTime::parse_from_str(text, DATE_TIME_FORMAT)
        .or_else(|_| NaiveDateTime::parse_from_str(text, ISO_DATE_TIME_FORMAT))
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(text, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

pub(crate) fn coerce_decimal(_cell: &CellValue, text: &str) -> Coerced {
    Ok(Some(FieldValue::Decimal(DecimalText::new(text))))
}
