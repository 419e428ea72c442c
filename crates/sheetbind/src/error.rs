use crate::field::FieldKind;
use sheetbind_workbook::IoError;
use thiserror::Error;

/// Reasons an import aborts. No partial result is returned for any of them.
#[derive(Debug, Error)]
pub enum ImportError {
    /// The input could not be read, or is not a tabular container.
    #[error(transparent)]
    Io(#[from] IoError),

    #[error("sheet '{name}' not found (available: {})", .available.join(", "))]
    SheetNotFound { name: String, available: Vec<String> },

    /// A non-blank cell could not be converted to its field's type.
    /// `row` and `col` are 1-based sheet coordinates; `cell` is the A1 address.
    #[error(
        "cannot convert {sheet}!{cell} ({value:?}) into {kind} field '{field}': {message}"
    )]
    TypeCoercion {
        sheet: String,
        row: u32,
        col: u32,
        cell: String,
        field: &'static str,
        kind: FieldKind,
        value: String,
        message: String,
    },

    /// A record rejected a value it advertised a binding for.
    #[error("record {record} has no usable binding for column sequence {sequence}")]
    Binding {
        record: &'static str,
        sequence: usize,
    },
}

/// Why a cell's text is not a valid value of the target kind.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct CoercionError(String);

impl CoercionError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }

    pub fn message(&self) -> &str {
        &self.0
    }
}

/// Returned by [`SheetRecord::assign`](crate::SheetRecord::assign).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AssignError {
    #[error("no field bound to sequence {0}")]
    UnknownSequence(usize),

    #[error("expected a {expected} value, got {found}")]
    KindMismatch { expected: FieldKind, found: FieldKind },
}
