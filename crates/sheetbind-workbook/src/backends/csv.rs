use crate::error::IoError;
use crate::options::{CsvReadOptions, CsvTrim, CsvTypeInference};
use crate::traits::{SheetData, SpreadsheetReader};
use sheetbind_common::{CellErrorKind, CellValue};
use std::collections::BTreeMap;
use std::io::Read;

/// Delimited-text reader.
///
/// Semantics:
/// - A CSV file is treated as a single-sheet workbook named `Sheet1`.
/// - UTF-8 only.
/// - Every record, including the first, is loaded as a row; header handling
///   belongs to the caller.
/// - Empty fields are not stored.
pub struct CsvAdapter {
    sheet_name: String,
    sheet: SheetData,
}

impl CsvAdapter {
    pub const SHEET_NAME: &'static str = "Sheet1";

    pub fn open_reader_with_options(
        reader: Box<dyn Read + Send + Sync>,
        read_options: CsvReadOptions,
    ) -> Result<Self, IoError> {
        let sheet = Self::load(reader, &read_options)?;
        Ok(Self {
            sheet_name: Self::SHEET_NAME.to_string(),
            sheet,
        })
    }

    pub fn open_bytes_with_options(
        bytes: Vec<u8>,
        read_options: CsvReadOptions,
    ) -> Result<Self, IoError> {
        Self::open_reader_with_options(Box::new(std::io::Cursor::new(bytes)), read_options)
    }

    fn load(
        reader: Box<dyn Read + Send + Sync>,
        options: &CsvReadOptions,
    ) -> Result<SheetData, IoError> {
        let mut rb = csv::ReaderBuilder::new();
        rb.delimiter(options.delimiter)
            .has_headers(false)
            // Ragged rows are common in hand-edited exports.
            .flexible(true);

        match options.trim {
            CsvTrim::None => rb.trim(csv::Trim::None),
            CsvTrim::All => rb.trim(csv::Trim::All),
        };

        let mut rdr = rb.from_reader(reader);
        let mut cells = BTreeMap::new();
        let mut max_row: u32 = 0;
        let mut max_col: u32 = 0;

        for (ri, rec) in rdr.records().enumerate() {
            let rec = rec.map_err(|e| IoError::from_backend("csv", e))?;
            let row = ri as u32 + 1;
            max_row = row;
            max_col = max_col.max(rec.len() as u32);

            for (ci, field) in rec.iter().enumerate() {
                if let Some(v) = infer_field(field, options.type_inference) {
                    cells.insert((row, ci as u32 + 1), v);
                }
            }
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(rows = max_row, cells = cells.len(), "csv: loaded sheet");

        let dimensions = if max_row == 0 || max_col == 0 {
            None
        } else {
            Some((max_row, max_col))
        };
        Ok(SheetData { cells, dimensions })
    }
}

fn infer_field(field: &str, mode: CsvTypeInference) -> Option<CellValue> {
    if field.is_empty() {
        return None;
    }
    if mode == CsvTypeInference::Off {
        return Some(CellValue::Text(field.to_string()));
    }

    let t = field.trim();
    if t.eq_ignore_ascii_case("true") {
        return Some(CellValue::Boolean(true));
    }
    if t.eq_ignore_ascii_case("false") {
        return Some(CellValue::Boolean(false));
    }
    if let Some(kind) = CellErrorKind::parse(t) {
        return Some(CellValue::Error(kind));
    }
    // Leading zeros mark identifiers (zip codes, account numbers), not numbers.
    let digits = t.strip_prefix('-').unwrap_or(t);
    let leading_zero = digits.len() > 1 && digits.starts_with('0') && !digits.starts_with("0.");
    if !leading_zero {
        if let Ok(i) = t.parse::<i64>() {
            return Some(CellValue::Int(i));
        }
        if let Ok(n) = t.parse::<f64>() {
            if n.is_finite() {
                return Some(CellValue::Number(n));
            }
        }
    }
    Some(CellValue::Text(field.to_string()))
}

impl SpreadsheetReader for CsvAdapter {
    type Error = IoError;

    fn sheet_names(&self) -> Result<Vec<String>, Self::Error> {
        Ok(vec![self.sheet_name.clone()])
    }

    fn open_reader(reader: Box<dyn Read + Send + Sync>) -> Result<Self, Self::Error>
    where
        Self: Sized,
    {
        Self::open_reader_with_options(reader, CsvReadOptions::default())
    }

    fn open_bytes(data: Vec<u8>) -> Result<Self, Self::Error>
    where
        Self: Sized,
    {
        Self::open_bytes_with_options(data, CsvReadOptions::default())
    }

    fn read_sheet(&mut self, sheet: &str) -> Result<SheetData, Self::Error> {
        if sheet != self.sheet_name {
            return Err(IoError::Backend {
                backend: "csv".to_string(),
                message: format!("sheet not found: {sheet}"),
            });
        }
        Ok(self.sheet.clone())
    }
}
