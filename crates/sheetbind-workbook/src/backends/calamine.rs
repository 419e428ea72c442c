#![cfg(feature = "calamine")]

use crate::traits::{SheetData, SpreadsheetReader};
use chrono::{NaiveDate, NaiveDateTime};
use sheetbind_common::{CellErrorKind, CellValue, ISO_DATE_TIME_FORMAT, datetime_to_serial};
use std::collections::BTreeMap;
use std::io::{Cursor, Read};

use calamine::{Data, Range, Reader, Sheets, open_workbook_auto_from_rs};

/// Workbook container reader backed by calamine.
///
/// The container is sniffed from its bytes, so xlsx, xlsm, xlsb, xls and ods
/// all open through the same constructor. The whole input is buffered in
/// memory; calamine needs `Read + Seek` and sheets are materialized whole
/// anyway.
pub struct CalamineAdapter {
    workbook: Sheets<Cursor<Vec<u8>>>,
    names: Vec<String>,
}

impl CalamineAdapter {
    fn convert_value(data: &Data) -> CellValue {
        match data {
            Data::Empty => CellValue::Empty,
            Data::String(s) => CellValue::Text(s.clone()),
            Data::Float(f) => CellValue::Number(*f),
            Data::Int(i) => CellValue::Int(*i),
            Data::Bool(b) => CellValue::Boolean(*b),
            Data::Error(e) => {
                let kind = match e {
                    calamine::CellErrorType::Div0 => CellErrorKind::Div,
                    calamine::CellErrorType::NA => CellErrorKind::Na,
                    calamine::CellErrorType::Name => CellErrorKind::Name,
                    calamine::CellErrorType::Null => CellErrorKind::Null,
                    calamine::CellErrorType::Num => CellErrorKind::Num,
                    calamine::CellErrorType::Ref => CellErrorKind::Ref,
                    calamine::CellErrorType::Value => CellErrorKind::Value,
                    calamine::CellErrorType::GettingData => CellErrorKind::GettingData,
                    #[allow(unreachable_patterns)]
                    _ => CellErrorKind::Value,
                };
                CellValue::Error(kind)
            }
            // Durations are plain numbers as far as a record is concerned.
            Data::DateTime(dt) if dt.is_duration() => CellValue::Number(dt.as_f64()),
            Data::DateTime(dt) => CellValue::DateTime(dt.as_f64()),
            // ODS stores dates as ISO text; bring them onto the serial scale.
            Data::DateTimeIso(s) => iso_to_serial(s)
                .map(CellValue::DateTime)
                .unwrap_or_else(|| CellValue::Text(s.clone())),
            Data::DurationIso(s) => CellValue::Text(s.clone()),
        }
    }

    fn range_to_sheet(range: &Range<Data>) -> SheetData {
        let mut cells = BTreeMap::new();

        let (start_row, start_col) = range.start().unwrap_or_default();

        for (row, col, val) in range.used_cells() {
            // Calamine uses 0-based indexing relative to the range start
            let excel_row = row as u32 + start_row + 1;
            let excel_col = col as u32 + start_col + 1;

            match val {
                Data::Empty => continue,
                Data::String(s) if s.is_empty() => continue,
                _ => {}
            }
            cells.insert((excel_row, excel_col), Self::convert_value(val));
        }

        let dimensions = range.end().map(|(r, c)| (r + 1, c + 1));
        SheetData { cells, dimensions }
    }
}

fn iso_to_serial(text: &str) -> Option<f64> {
    let dt = NaiveDateTime::parse_from_str(text, ISO_DATE_TIME_FORMAT)
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(text, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })?;
    datetime_to_serial(&dt)
}

impl SpreadsheetReader for CalamineAdapter {
    type Error = calamine::Error;

    fn sheet_names(&self) -> Result<Vec<String>, Self::Error> {
        Ok(self.names.clone())
    }

    fn open_reader(mut reader: Box<dyn Read + Send + Sync>) -> Result<Self, Self::Error>
    where
        Self: Sized,
    {
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        Self::open_bytes(data)
    }

    fn open_bytes(data: Vec<u8>) -> Result<Self, Self::Error>
    where
        Self: Sized,
    {
        let workbook = open_workbook_auto_from_rs(Cursor::new(data))?;
        let names = workbook.sheet_names().to_vec();
        #[cfg(feature = "tracing")]
        tracing::debug!(sheets = names.len(), "calamine: opened workbook");
        Ok(Self { workbook, names })
    }

    fn read_sheet(&mut self, sheet: &str) -> Result<SheetData, Self::Error> {
        let range = self.workbook.worksheet_range(sheet)?;
        let data = Self::range_to_sheet(&range);
        #[cfg(feature = "tracing")]
        tracing::debug!(
            sheet,
            rows = data.row_count(),
            cells = data.cells.len(),
            "calamine: read sheet"
        );
        Ok(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converts_scalar_cells() {
        assert_eq!(
            CalamineAdapter::convert_value(&Data::String("x".into())),
            CellValue::Text("x".into())
        );
        assert_eq!(
            CalamineAdapter::convert_value(&Data::Float(2.5)),
            CellValue::Number(2.5)
        );
        assert_eq!(
            CalamineAdapter::convert_value(&Data::Int(7)),
            CellValue::Int(7)
        );
        assert_eq!(
            CalamineAdapter::convert_value(&Data::Bool(false)),
            CellValue::Boolean(false)
        );
        assert_eq!(
            CalamineAdapter::convert_value(&Data::Error(calamine::CellErrorType::NA)),
            CellValue::Error(CellErrorKind::Na)
        );
    }

    #[test]
    fn iso_date_cells_become_serials() {
        assert_eq!(
            CalamineAdapter::convert_value(&Data::DateTimeIso("2023-03-01T12:00:00".into())),
            CellValue::DateTime(44986.5)
        );
        assert_eq!(
            CalamineAdapter::convert_value(&Data::DateTimeIso("2023-03-01".into())),
            CellValue::DateTime(44986.0)
        );
        assert_eq!(
            CalamineAdapter::convert_value(&Data::DateTimeIso("1900-01-01T00:00:00".into())),
            CellValue::DateTime(1.0)
        );
        // Anything else stays readable as text.
        assert_eq!(
            CalamineAdapter::convert_value(&Data::DateTimeIso("sometime".into())),
            CellValue::Text("sometime".into())
        );
    }

    #[test]
    fn offset_ranges_keep_absolute_coordinates() {
        let mut range: Range<Data> = Range::new((2, 1), (3, 2));
        range.set_value((2, 1), Data::String("hdr".into()));
        range.set_value((3, 2), Data::Float(1.0));

        let sheet = CalamineAdapter::range_to_sheet(&range);
        assert_eq!(sheet.cell(3, 2), Some(&CellValue::Text("hdr".into())));
        assert_eq!(sheet.cell(4, 3), Some(&CellValue::Number(1.0)));
        assert_eq!(sheet.dimensions, Some((4, 3)));
    }

    #[test]
    fn garbage_bytes_are_rejected() {
        let err = CalamineAdapter::open_bytes(b"definitely not a workbook".to_vec());
        assert!(err.is_err());
    }
}
