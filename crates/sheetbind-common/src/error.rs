//! Excel error codes as they appear in stored cell values.
//!
//! Only the codes a workbook can persist are modelled; an error cell is
//! carried through the import as data and rendered back to its code when
//! coerced to text.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Error codes a cell may hold.
///
/// **Note:** names are CamelCase while `Display` renders them exactly as
/// Excel shows them (`#DIV/0!`, …).
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum CellErrorKind {
    Null,
    Ref,
    Name,
    Value,
    Div,
    Na,
    Num,
    GettingData,
}

impl fmt::Display for CellErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Null => "#NULL!",
            Self::Ref => "#REF!",
            Self::Name => "#NAME?",
            Self::Value => "#VALUE!",
            Self::Div => "#DIV/0!",
            Self::Na => "#N/A",
            Self::Num => "#NUM!",
            Self::GettingData => "#GETTING_DATA",
        })
    }
}

impl CellErrorKind {
    /// Parse an error code, case-insensitively. Unknown codes yield `None`.
    pub fn parse(s: &str) -> Option<Self> {
        let kind = match s.trim().to_ascii_lowercase().as_str() {
            "#null!" => Self::Null,
            "#ref!" => Self::Ref,
            "#name?" => Self::Name,
            "#value!" => Self::Value,
            "#div/0!" => Self::Div,
            "#n/a" => Self::Na,
            "#num!" => Self::Num,
            "#getting_data" => Self::GettingData,
            _ => return None,
        };
        Some(kind)
    }
}
