//! Fixture builders for tests: real xlsx bytes written by umya-spreadsheet,
//! and CSV bytes from row slices.

use std::path::PathBuf;

pub use umya_spreadsheet;

/// Build an xlsx workbook starting from a single `Sheet1` and return its
/// bytes.
pub fn build_workbook<F>(f: F) -> Vec<u8>
where
    F: FnOnce(&mut umya_spreadsheet::Spreadsheet),
{
    let mut book = umya_spreadsheet::new_file();
    f(&mut book);
    write_bytes(&book)
}

/// Build an xlsx workbook with text-only sheets, in the given order.
/// `rows[0]` lands on row 1; empty strings leave the cell unset.
pub fn text_workbook(sheets: &[(&str, &[&[&str]])]) -> Vec<u8> {
    let mut book = umya_spreadsheet::new_file_empty_worksheet();
    for (name, rows) in sheets {
        let sheet = book.new_sheet(*name).expect("add sheet");
        for (ri, row) in rows.iter().enumerate() {
            for (ci, value) in row.iter().enumerate() {
                if value.is_empty() {
                    continue;
                }
                sheet
                    .get_cell_mut((ci as u32 + 1, ri as u32 + 1))
                    .set_value_string(*value);
            }
        }
    }
    write_bytes(&book)
}

/// Write `book` to a temp file and read the bytes back.
pub fn write_bytes(book: &umya_spreadsheet::Spreadsheet) -> Vec<u8> {
    let dir = tempfile::tempdir().expect("temp dir");
    let path: PathBuf = dir.path().join("fixture.xlsx");
    umya_spreadsheet::writer::xlsx::write(book, &path).expect("write xlsx");
    std::fs::read(&path).expect("read xlsx back")
}

/// Render rows as RFC 4180 CSV.
pub fn csv_bytes(rows: &[&[&str]]) -> Vec<u8> {
    let mut out = String::new();
    for row in rows {
        let fields: Vec<String> = row.iter().map(|f| quote_csv(f)).collect();
        out.push_str(&fields.join(","));
        out.push('\n');
    }
    out.into_bytes()
}

fn quote_csv(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
