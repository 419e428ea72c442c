//! A1-style rendering of 1-based sheet coordinates.
//!
//! Backends and the importer keep cells keyed by `(row, col)` in 1-based
//! absolute coordinates; these helpers only exist to make diagnostics read
//! the way a spreadsheet user expects (`B7` rather than `(7, 2)`).

/// Render a 1-based column index as its column letters (`1` → `A`,
/// `27` → `AA`). Column `0` has no letters and renders as an empty string.
pub fn col_to_a1(col: u32) -> String {
    let mut letters = Vec::new();
    let mut n = col;
    while n > 0 {
        let rem = ((n - 1) % 26) as u8;
        letters.push((b'A' + rem) as char);
        n = (n - 1) / 26;
    }
    letters.iter().rev().collect()
}

/// Render a 1-based `(row, col)` pair as an A1 reference.
pub fn cell_to_a1(row: u32, col: u32) -> String {
    format!("{}{}", col_to_a1(col), row)
}
