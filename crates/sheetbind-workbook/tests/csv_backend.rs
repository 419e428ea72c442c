use sheetbind_common::CellValue;
use sheetbind_testkit::csv_bytes;
use sheetbind_workbook::{CsvAdapter, CsvReadOptions, CsvTrim, CsvTypeInference, SpreadsheetReader};

#[test]
fn csv_is_a_single_sheet_workbook() {
    let input = csv_bytes(&[&["Name", "Age"], &["Alice", "30"]]);
    let mut adapter = CsvAdapter::open_bytes(input).unwrap();

    assert_eq!(adapter.sheet_names().unwrap(), vec!["Sheet1".to_string()]);
    let sheet = adapter.read_sheet("Sheet1").unwrap();
    assert_eq!(sheet.dimensions, Some((2, 2)));
    assert_eq!(sheet.cell(1, 1), Some(&CellValue::Text("Name".into())));
    assert_eq!(sheet.cell(2, 2), Some(&CellValue::Text("30".into())));
}

#[test]
fn csv_ragged_rows_and_empty_fields() {
    let input = b"a,b,c\nx\n,,z\n".to_vec();
    let mut adapter = CsvAdapter::open_bytes(input).unwrap();
    let sheet = adapter.read_sheet("Sheet1").unwrap();

    assert_eq!(sheet.dimensions, Some((3, 3)));
    assert_eq!(sheet.cell(2, 2), None);
    assert_eq!(sheet.cell(3, 1), None);
    assert_eq!(sheet.cell(3, 3), Some(&CellValue::Text("z".into())));
}

#[test]
fn csv_options_trim_and_infer() {
    let input = b"id;amount\n 7 ; 2.50 \n".to_vec();
    let opts = CsvReadOptions {
        delimiter: b';',
        trim: CsvTrim::All,
        type_inference: CsvTypeInference::Basic,
    };
    let mut adapter = CsvAdapter::open_bytes_with_options(input, opts).unwrap();
    let sheet = adapter.read_sheet("Sheet1").unwrap();

    assert_eq!(sheet.cell(2, 1), Some(&CellValue::Int(7)));
    assert_eq!(sheet.cell(2, 2), Some(&CellValue::Number(2.5)));
}

#[test]
fn csv_quoted_fields() {
    let input = b"A,B\n\"hello, world\",\"line1\nline2\"\n".to_vec();
    let mut adapter = CsvAdapter::open_bytes(input).unwrap();
    let sheet = adapter.read_sheet("Sheet1").unwrap();

    assert_eq!(sheet.cell(2, 1), Some(&CellValue::Text("hello, world".into())));
    assert_eq!(sheet.cell(2, 2), Some(&CellValue::Text("line1\nline2".into())));
}

#[test]
fn csv_unknown_sheet_errors() {
    let mut adapter = CsvAdapter::open_bytes(b"a\n".to_vec()).unwrap();
    assert!(adapter.read_sheet("Feb").is_err());
}

#[test]
fn csv_empty_input_has_no_rows() {
    let mut adapter = CsvAdapter::open_bytes(Vec::new()).unwrap();
    let sheet = adapter.read_sheet("Sheet1").unwrap();
    assert!(sheet.is_empty());
}
