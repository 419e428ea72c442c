use sheetbind_common::CellValue;
use std::collections::BTreeMap;
use std::io::Read;

/// One materialized sheet.
///
/// Cells are keyed by 1-based absolute `(row, col)`; only cells that exist
/// in the source are present. `dimensions` is the last used `(row, col)`,
/// or `None` for a sheet without any cells.
#[derive(Clone, Debug, Default)]
pub struct SheetData {
    pub cells: BTreeMap<(u32, u32), CellValue>,
    pub dimensions: Option<(u32, u32)>,
}

impl SheetData {
    /// Build from explicit cells, deriving the used extent.
    pub fn from_cells(cells: BTreeMap<(u32, u32), CellValue>) -> Self {
        let dimensions = cells.keys().fold(None, |acc, &(r, c)| match acc {
            None => Some((r, c)),
            Some((mr, mc)) => Some((mr.max(r), mc.max(c))),
        });
        Self { cells, dimensions }
    }

    /// Build from dense rows; `rows[0]` lands on row 1. Empty values are
    /// kept as present-but-empty cells.
    pub fn from_rows<I, R, V>(rows: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: IntoIterator<Item = V>,
        V: Into<CellValue>,
    {
        let mut cells = BTreeMap::new();
        for (ri, row) in rows.into_iter().enumerate() {
            for (ci, value) in row.into_iter().enumerate() {
                cells.insert((ri as u32 + 1, ci as u32 + 1), value.into());
            }
        }
        Self::from_cells(cells)
    }

    pub fn cell(&self, row: u32, col: u32) -> Option<&CellValue> {
        self.cells.get(&(row, col))
    }

    /// Number of physical rows, header included.
    pub fn row_count(&self) -> u32 {
        self.dimensions.map_or(0, |(rows, _)| rows)
    }

    pub fn is_empty(&self) -> bool {
        self.row_count() == 0
    }
}

/// A tabular source that exposes named sheets of cells.
pub trait SpreadsheetReader {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Sheet names in workbook order.
    fn sheet_names(&self) -> Result<Vec<String>, Self::Error>;

    fn open_reader(reader: Box<dyn Read + Send + Sync>) -> Result<Self, Self::Error>
    where
        Self: Sized;

    fn open_bytes(data: Vec<u8>) -> Result<Self, Self::Error>
    where
        Self: Sized;

    fn read_sheet(&mut self, sheet: &str) -> Result<SheetData, Self::Error>;

    /// Locate a sheet by exact name.
    fn has_sheet(&self, sheet: &str) -> Result<bool, Self::Error> {
        Ok(self.sheet_names()?.iter().any(|name| name == sheet))
    }
}
