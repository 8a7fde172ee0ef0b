//! One named grid of cells

use crate::cell::{CellAddress, CellStorage, CellValue};
use crate::error::{Error, Result};
use crate::{MAX_COLS, MAX_ROWS};

/// A named sheet.
///
/// Writers address cells 0-based (`*_at`) or by A1 text. The grading
/// accessors [`value`](Self::value), [`max_row`](Self::max_row) and
/// [`max_column`](Self::max_column) are 1-based.
#[derive(Debug)]
pub struct Worksheet {
    name: String,
    cells: CellStorage,
}

impl Worksheet {
    pub fn new<S: Into<String>>(name: S) -> Self {
        Self {
            name: name.into(),
            cells: CellStorage::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Value at an A1 address such as `"E1"`
    pub fn get_value(&self, address: &str) -> Result<CellValue> {
        let addr: CellAddress = address.parse()?;
        Ok(self.get_value_at(addr.row, addr.col))
    }

    pub fn get_value_at(&self, row: u32, col: u16) -> CellValue {
        self.cells.get(row, col).cloned().unwrap_or_default()
    }

    /// Value at 1-based `(row, column)`; row 1, column 5 is E1.
    ///
    /// Zero or out-of-range coordinates read as empty.
    pub fn value(&self, row: u32, column: u32) -> CellValue {
        if row == 0 || column == 0 || row > MAX_ROWS || column > u32::from(MAX_COLS) {
            return CellValue::Empty;
        }
        self.get_value_at(row - 1, (column - 1) as u16)
    }

    /// Last populated row, 1-based; 0 for an empty sheet
    pub fn max_row(&self) -> u32 {
        self.cells.extent().map_or(0, |(row, _)| row + 1)
    }

    /// Last populated column, 1-based; 0 for an empty sheet
    pub fn max_column(&self) -> u32 {
        self.cells
            .extent()
            .map_or(0, |(_, col)| u32::from(col) + 1)
    }

    pub fn set_cell_value<V: Into<CellValue>>(&mut self, address: &str, value: V) -> Result<()> {
        let addr: CellAddress = address.parse()?;
        self.set_cell_value_at(addr.row, addr.col, value)
    }

    pub fn set_cell_value_at<V: Into<CellValue>>(
        &mut self,
        row: u32,
        col: u16,
        value: V,
    ) -> Result<()> {
        if row >= MAX_ROWS {
            return Err(Error::RowOutOfBounds(row, MAX_ROWS - 1));
        }
        if col >= MAX_COLS {
            return Err(Error::ColumnOutOfBounds(col, MAX_COLS - 1));
        }
        self.cells.set(row, col, value.into());
        Ok(())
    }

    /// Store a formula with the result it last calculated to, if any.
    /// A missing leading `=` is added.
    pub fn set_cell_formula(
        &mut self,
        address: &str,
        formula: &str,
        cached_value: Option<CellValue>,
    ) -> Result<()> {
        let text = match formula.strip_prefix('=') {
            Some(_) => formula.to_string(),
            None => format!("={}", formula),
        };
        let value = CellValue::Formula {
            text,
            cached_value: cached_value.map(Box::new),
        };
        self.set_cell_value(address, value)
    }

    /// Number of populated cells
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Populated cells in row-major order as 0-based `(row, col, value)`
    pub fn iter_cells(&self) -> impl Iterator<Item = (u32, u16, &CellValue)> {
        self.cells.iter()
    }
}
