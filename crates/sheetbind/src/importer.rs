use crate::error::ImportError;
use crate::record::SheetRecord;
use sheetbind_common::cell_to_a1;
use sheetbind_workbook::{CsvReadOptions, CsvTypeInference, IoError, SheetData, SpreadsheetReader};
use std::io::Read;
use std::marker::PhantomData;

#[cfg(feature = "calamine")]
use sheetbind_workbook::CalamineAdapter;
#[cfg(feature = "csv")]
use sheetbind_workbook::CsvAdapter;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Container format of the bytes handed to [`TabularRecordImporter::import`].
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SourceFormat {
    /// Any workbook container calamine recognises (xlsx, xlsm, xlsb, xls, ods).
    #[default]
    Workbook,
    /// Delimited text, exposed as a single sheet named `Sheet1`.
    Csv,
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Debug, Clone)]
pub struct ImportOptions {
    pub format: SourceFormat,
    /// Only consulted for [`SourceFormat::Csv`].
    pub csv: CsvReadOptions,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            format: SourceFormat::Workbook,
            csv: CsvReadOptions {
                // Cells are coerced per bound field; keep CSV fields as text
                // so identifiers like `007` reach text fields intact.
                type_inference: CsvTypeInference::Off,
                ..CsvReadOptions::default()
            },
        }
    }
}

impl ImportOptions {
    pub fn csv() -> Self {
        Self {
            format: SourceFormat::Csv,
            ..Self::default()
        }
    }
}

/// Turns the body rows of one sheet into records of type `T`.
///
/// Holds no state beyond its options; the column bindings of `T` are
/// computed once per process and shared by every importer.
#[derive(Debug, Clone)]
pub struct TabularRecordImporter<T> {
    options: ImportOptions,
    _record: PhantomData<fn() -> T>,
}

impl<T: SheetRecord> Default for TabularRecordImporter<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: SheetRecord> TabularRecordImporter<T> {
    pub fn new() -> Self {
        Self::with_options(ImportOptions::default())
    }

    pub fn with_options(options: ImportOptions) -> Self {
        Self {
            options,
            _record: PhantomData,
        }
    }

    pub fn options(&self) -> &ImportOptions {
        &self.options
    }

    /// Read `input` to the end and import the named sheet, or the first
    /// sheet when `sheet` is `None` or empty.
    pub fn import<R: Read>(
        &self,
        sheet: Option<&str>,
        mut input: R,
    ) -> Result<Vec<T>, ImportError> {
        let mut bytes = Vec::new();
        input.read_to_end(&mut bytes).map_err(IoError::from)?;
        drop(input);

        match self.options.format {
            SourceFormat::Workbook => self.import_workbook(sheet, bytes),
            SourceFormat::Csv => self.import_csv(sheet, bytes),
        }
    }

    pub fn import_first_sheet<R: Read>(&self, input: R) -> Result<Vec<T>, ImportError> {
        self.import(None, input)
    }

    /// Import from an already opened source.
    ///
    /// Sheet names match exactly first, then ignoring case; the name stored
    /// in the source is the one read.
    pub fn import_from<B>(
        &self,
        sheet: Option<&str>,
        backend: &mut B,
    ) -> Result<Vec<T>, ImportError>
    where
        B: SpreadsheetReader,
        IoError: From<B::Error>,
    {
        let names = backend.sheet_names().map_err(IoError::from)?;
        let selected = match sheet.filter(|name| !name.is_empty()) {
            Some(name) => match resolve_sheet(&names, name) {
                Some(stored) => stored.to_string(),
                None => {
                    return Err(ImportError::SheetNotFound {
                        name: name.to_string(),
                        available: names,
                    });
                }
            },
            None => match names.into_iter().next() {
                Some(first) => first,
                None => {
                    #[cfg(feature = "tracing")]
                    tracing::debug!("source has no sheets");
                    return Ok(Vec::new());
                }
            },
        };

        let data = backend.read_sheet(&selected).map_err(IoError::from)?;
        self.records_from_sheet(&selected, &data)
    }

    #[cfg(feature = "calamine")]
    fn import_workbook(
        &self,
        sheet: Option<&str>,
        bytes: Vec<u8>,
    ) -> Result<Vec<T>, ImportError> {
        let mut backend = CalamineAdapter::open_bytes(bytes).map_err(IoError::from)?;
        self.import_from(sheet, &mut backend)
    }

    #[cfg(not(feature = "calamine"))]
    fn import_workbook(
        &self,
        _sheet: Option<&str>,
        _bytes: Vec<u8>,
    ) -> Result<Vec<T>, ImportError> {
        Err(unsupported("workbook", "calamine").into())
    }

    #[cfg(feature = "csv")]
    fn import_csv(&self, sheet: Option<&str>, bytes: Vec<u8>) -> Result<Vec<T>, ImportError> {
        let mut backend = CsvAdapter::open_bytes_with_options(bytes, self.options.csv.clone())?;
        self.import_from(sheet, &mut backend)
    }

    #[cfg(not(feature = "csv"))]
    fn import_csv(&self, _sheet: Option<&str>, _bytes: Vec<u8>) -> Result<Vec<T>, ImportError> {
        Err(unsupported("csv", "csv").into())
    }

    fn records_from_sheet(&self, sheet: &str, data: &SheetData) -> Result<Vec<T>, ImportError> {
        let bindings = T::bindings();

        #[cfg(feature = "tracing")]
        let _span =
            tracing::info_span!("import", sheet = %sheet, record = bindings.record()).entered();

        let mut records = Vec::new();
        // Row 1 is the header.
        for row in 2..=data.row_count() {
            let mut record: Option<T> = None;
            for binding in bindings {
                let col = binding.sequence() as u32;
                let Some(cell) = data.cell(row, col) else {
                    continue;
                };
                let text = cell.to_text();
                if text.trim().is_empty() {
                    continue;
                }
                let target = record.get_or_insert_with(T::default);
                match binding.coerce(cell, &text) {
                    Ok(Some(value)) => {
                        target
                            .assign(binding.sequence(), value)
                            .map_err(|_| ImportError::Binding {
                                record: bindings.record(),
                                sequence: binding.sequence(),
                            })?;
                    }
                    Ok(None) => {
                        #[cfg(feature = "tracing")]
                        tracing::debug!(
                            row,
                            col,
                            field = binding.name(),
                            "cell left field at default"
                        );
                    }
                    Err(e) => {
                        return Err(ImportError::TypeCoercion {
                            sheet: sheet.to_string(),
                            row,
                            col,
                            cell: cell_to_a1(row, col),
                            field: binding.name(),
                            kind: binding.kind(),
                            value: text,
                            message: e.message().to_string(),
                        });
                    }
                }
            }
            records.extend(record);
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(
            rows = data.row_count().saturating_sub(1),
            records = records.len(),
            "sheet imported"
        );
        Ok(records)
    }
}

fn resolve_sheet<'a>(names: &'a [String], wanted: &str) -> Option<&'a str> {
    names
        .iter()
        .find(|n| n.as_str() == wanted)
        .or_else(|| {
            let wanted = wanted.to_lowercase();
            names.iter().find(|n| n.to_lowercase() == wanted)
        })
        .map(String::as_str)
}

#[cfg(any(not(feature = "calamine"), not(feature = "csv")))]
fn unsupported(format: &str, feature: &str) -> IoError {
    IoError::Unsupported {
        feature: format!("{format} input"),
        context: format!("sheetbind was built without the `{feature}` feature"),
    }
}

/// Import `T` records with default options. See [`TabularRecordImporter::import`].
pub fn import<T, R>(sheet: Option<&str>, input: R) -> Result<Vec<T>, ImportError>
where
    T: SheetRecord,
    R: Read,
{
    TabularRecordImporter::<T>::new().import(sheet, input)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FieldKind;
    use sheetbind_common::CellValue;
    use sheetbind_macros::SheetRecord;

    /// In-memory source; never opened from bytes.
    struct MockBackend {
        sheets: Vec<(String, SheetData)>,
        reads: Vec<String>,
    }

    impl MockBackend {
        fn new(sheets: Vec<(&str, SheetData)>) -> Self {
            Self {
                sheets: sheets
                    .into_iter()
                    .map(|(n, d)| (n.to_string(), d))
                    .collect(),
                reads: Vec::new(),
            }
        }
    }

    impl SpreadsheetReader for MockBackend {
        type Error = IoError;

        fn sheet_names(&self) -> Result<Vec<String>, Self::Error> {
            Ok(self.sheets.iter().map(|(n, _)| n.clone()).collect())
        }

        fn open_reader(_reader: Box<dyn Read + Send + Sync>) -> Result<Self, Self::Error> {
            Err(IoError::Unsupported {
                feature: "open".into(),
                context: "mock".into(),
            })
        }

        fn open_bytes(_data: Vec<u8>) -> Result<Self, Self::Error> {
            Err(IoError::Unsupported {
                feature: "open".into(),
                context: "mock".into(),
            })
        }

        fn read_sheet(&mut self, sheet: &str) -> Result<SheetData, Self::Error> {
            self.reads.push(sheet.to_string());
            self.sheets
                .iter()
                .find(|(n, _)| n == sheet)
                .map(|(_, d)| d.clone())
                .ok_or_else(|| IoError::Backend {
                    backend: "mock".into(),
                    message: format!("no sheet {sheet}"),
                })
        }
    }

    #[derive(Debug, Default, PartialEq, SheetRecord)]
    struct Person {
        #[column]
        name: String,
        #[column]
        age: i32,
    }

    fn rows(rows: &[&[&str]]) -> SheetData {
        SheetData::from_rows(rows.iter().map(|r| r.iter().copied()))
    }

    fn person(name: &str, age: i32) -> Person {
        Person {
            name: name.into(),
            age,
        }
    }

    #[test]
    fn header_is_skipped_and_rows_map_positionally() {
        let mut src = MockBackend::new(vec![(
            "People",
            rows(&[&["Name", "Age"], &["Alice", "30"], &["Bob", "41"]]),
        )]);
        let out = TabularRecordImporter::<Person>::new()
            .import_from(None, &mut src)
            .unwrap();
        assert_eq!(out, vec![person("Alice", 30), person("Bob", 41)]);
    }

    #[test]
    fn blank_rows_produce_no_record() {
        let mut src = MockBackend::new(vec![(
            "People",
            rows(&[
                &["Name", "Age"],
                &["Alice", "30"],
                &["", "  "],
                &["", "7"],
            ]),
        )]);
        let out = TabularRecordImporter::<Person>::new()
            .import_from(None, &mut src)
            .unwrap();
        assert_eq!(out, vec![person("Alice", 30), person("", 7)]);
    }

    #[test]
    fn numeric_failure_aborts_with_cell_address() {
        let mut src = MockBackend::new(vec![(
            "People",
            rows(&[&["Name", "Age"], &["Alice", "30"], &["Bob", "twenty"]]),
        )]);
        let err = TabularRecordImporter::<Person>::new()
            .import_from(None, &mut src)
            .unwrap_err();
        match err {
            ImportError::TypeCoercion {
                sheet,
                row,
                col,
                cell,
                field,
                kind,
                value,
                ..
            } => {
                assert_eq!(sheet, "People");
                assert_eq!((row, col), (3, 2));
                assert_eq!(cell, "B3");
                assert_eq!(field, "age");
                assert_eq!(kind, FieldKind::Integer);
                assert_eq!(value, "twenty");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn sheet_selection() {
        let mut src = MockBackend::new(vec![
            ("Jan", rows(&[&["h"], &["jan", "1"]])),
            ("Feb", rows(&[&["h"], &["feb", "2"]])),
        ]);
        let importer = TabularRecordImporter::<Person>::new();

        assert_eq!(
            importer.import_from(Some("Feb"), &mut src).unwrap(),
            vec![person("feb", 2)]
        );
        assert_eq!(
            importer.import_from(Some(""), &mut src).unwrap(),
            vec![person("jan", 1)]
        );
        assert_eq!(
            importer.import_from(None, &mut src).unwrap(),
            vec![person("jan", 1)]
        );
        assert_eq!(
            importer.import_from(Some("fEB"), &mut src).unwrap(),
            vec![person("feb", 2)]
        );
        assert_eq!(src.reads, vec!["Feb", "Jan", "Jan", "Feb"]);

        match importer.import_from(Some("Mar"), &mut src).unwrap_err() {
            ImportError::SheetNotFound { name, available } => {
                assert_eq!(name, "Mar");
                assert_eq!(available, vec!["Jan", "Feb"]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn exact_sheet_name_wins_over_case_folded_match() {
        let mut src = MockBackend::new(vec![
            ("DATA", rows(&[&["h"], &["upper", "1"]])),
            ("data", rows(&[&["h"], &["lower", "2"]])),
        ]);
        let importer = TabularRecordImporter::<Person>::new();
        assert_eq!(
            importer.import_from(Some("data"), &mut src).unwrap(),
            vec![person("lower", 2)]
        );
        assert_eq!(
            importer.import_from(Some("Data"), &mut src).unwrap(),
            vec![person("upper", 1)]
        );
    }

    #[test]
    fn no_sheets_and_empty_sheets_yield_nothing() {
        let importer = TabularRecordImporter::<Person>::new();
        let mut none = MockBackend::new(vec![]);
        assert!(importer.import_from(None, &mut none).unwrap().is_empty());

        let mut empty = MockBackend::new(vec![("Sheet1", SheetData::default())]);
        assert!(importer.import_from(None, &mut empty).unwrap().is_empty());

        let mut header_only = MockBackend::new(vec![("Sheet1", rows(&[&["Name", "Age"]]))]);
        assert!(importer.import_from(None, &mut header_only).unwrap().is_empty());
    }

    #[test]
    fn trailing_unbound_columns_are_never_read() {
        let mut src = MockBackend::new(vec![(
            "S",
            rows(&[
                &["Name", "Age", "Junk"],
                &["Ann", "5", "not a number"],
                &["", "", "x"],
            ]),
        )]);
        let out = TabularRecordImporter::<Person>::new()
            .import_from(None, &mut src)
            .unwrap();
        assert_eq!(out, vec![person("Ann", 5)]);
    }

    #[test]
    fn numeric_cells_coerce_through_their_text() {
        let mut cells = std::collections::BTreeMap::new();
        cells.insert((1, 1), CellValue::from("Name"));
        cells.insert((2, 1), CellValue::from("Carl"));
        cells.insert((2, 2), CellValue::Number(30.0));
        let mut src = MockBackend::new(vec![("S", SheetData::from_cells(cells))]);
        let out = TabularRecordImporter::<Person>::new()
            .import_from(None, &mut src)
            .unwrap();
        assert_eq!(out, vec![person("Carl", 30)]);
    }

    #[test]
    fn default_options_read_workbooks_and_keep_csv_text() {
        let opts = ImportOptions::default();
        assert_eq!(opts.format, SourceFormat::Workbook);
        assert_eq!(opts.csv.type_inference, CsvTypeInference::Off);
        assert_eq!(ImportOptions::csv().format, SourceFormat::Csv);
    }

    #[cfg(not(feature = "calamine"))]
    #[test]
    fn workbook_input_needs_the_calamine_feature() {
        let err = import::<Person, _>(None, &b"PK"[..]).unwrap_err();
        assert!(matches!(err, ImportError::Io(IoError::Unsupported { .. })));
    }

    #[cfg(not(feature = "csv"))]
    #[test]
    fn csv_input_needs_the_csv_feature() {
        let err = TabularRecordImporter::<Person>::with_options(ImportOptions::csv())
            .import(None, &b"Name,Age\n"[..])
            .unwrap_err();
        assert!(matches!(err, ImportError::Io(IoError::Unsupported { .. })));
    }

    #[cfg(feature = "calamine")]
    #[test]
    fn unreadable_bytes_are_io_errors() {
        let err = import::<Person, _>(None, &b"definitely not a workbook"[..]).unwrap_err();
        assert!(matches!(err, ImportError::Io(_)));
    }
}
