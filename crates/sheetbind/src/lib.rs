//! Spreadsheet rows into typed records.
//!
//! A record type opts in with `#[derive(SheetRecord)]` and marks the fields
//! that receive data with `#[column]`. Marked fields are bound to columns
//! strictly by position: the first marked field reads column A, the second
//! column B, and so on. [`TabularRecordImporter`] then turns every body row
//! of a sheet (row 1 is the header) that carries data in at least one bound
//! column into one record, coercing each cell to the field's type.
//!
//! ```ignore
//! use sheetbind::SheetRecord;
//!
//! #[derive(Debug, Default, SheetRecord)]
//! struct Contact {
//!     #[column]
//!     name: String,
//!     #[column]
//!     age: Option<i32>,
//! }
//!
//! let contacts: Vec<Contact> = sheetbind::import(Some("Contacts"), upload)?;
//! ```

extern crate self as sheetbind;

mod binding;
mod error;
mod field;
mod importer;
mod record;

pub use binding::{Coercer, FieldBinding, RecordBindings};
pub use error::{AssignError, CoercionError, ImportError};
pub use field::{CellField, Coerced, FieldKind, FieldValue};
pub use importer::{ImportOptions, SourceFormat, TabularRecordImporter, import};
pub use record::{SheetRecord, assign_field};
pub use sheetbind_macros::SheetRecord;

// Re-export for convenience
pub use sheetbind_common::{CellValue, DATE_TIME_FORMAT, DecimalText};
pub use sheetbind_workbook::{
    CsvReadOptions, CsvTrim, CsvTypeInference, IoError, SheetData, SpreadsheetReader,
};

#[doc(hidden)]
pub mod __private {
    pub use once_cell::sync::Lazy;
}
