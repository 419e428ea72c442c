pub mod backends;
pub mod error;
pub mod options;
pub mod traits;

#[cfg(feature = "calamine")]
pub use backends::CalamineAdapter;
#[cfg(feature = "csv")]
pub use backends::CsvAdapter;
pub use error::IoError;
pub use options::{CsvReadOptions, CsvTrim, CsvTypeInference};
pub use traits::{SheetData, SpreadsheetReader};

// Re-export for convenience
pub use sheetbind_common::CellValue;
