use std::fmt;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Exact-precision number kept in its source text form.
///
/// The importer never parses decimal columns; the cell text is handed over
/// unchanged so that the consumer can build whatever decimal type it uses
/// without an intermediate binary float.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct DecimalText(String);

impl DecimalText {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    /// Parse the text into any `FromStr` number type (e.g. a decimal crate's
    /// type, or `f64` when precision does not matter).
    pub fn parse<T: FromStr>(&self) -> Result<T, T::Err> {
        self.0.trim().parse()
    }
}

impl fmt::Display for DecimalText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for DecimalText {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for DecimalText {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}
