//! Sparse cell grid

use std::collections::BTreeMap;

use super::CellValue;

/// Non-empty cells keyed by 0-based row, then column.
///
/// Both levels are ordered, so iteration is row-major and the last key of
/// each level gives the sheet extent without a scan of every cell.
#[derive(Debug, Default)]
pub struct CellStorage {
    rows: BTreeMap<u32, BTreeMap<u16, CellValue>>,
}

impl CellStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, row: u32, col: u16) -> Option<&CellValue> {
        self.rows.get(&row)?.get(&col)
    }

    /// Store a value; [`CellValue::Empty`] deletes the cell instead
    pub fn set(&mut self, row: u32, col: u16, value: CellValue) {
        if !value.is_empty() {
            self.rows.entry(row).or_default().insert(col, value);
            return;
        }

        if let Some(cols) = self.rows.get_mut(&row) {
            cols.remove(&col);
            if cols.is_empty() {
                self.rows.remove(&row);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.rows.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// 0-based `(last_row, last_col)` holding a value
    pub fn extent(&self) -> Option<(u32, u16)> {
        let last_row = *self.rows.keys().next_back()?;
        let last_col = self
            .rows
            .values()
            .filter_map(|cols| cols.keys().next_back().copied())
            .max()?;
        Some((last_row, last_col))
    }

    /// Row-major `(row, col, value)`
    pub fn iter(&self) -> impl Iterator<Item = (u32, u16, &CellValue)> {
        self.rows
            .iter()
            .flat_map(|(&row, cols)| cols.iter().map(move |(&col, value)| (row, col, value)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_and_len() {
        let mut grid = CellStorage::new();
        grid.set(0, 4, CellValue::from("Y"));
        grid.set(2, 1, CellValue::from(3.0));

        assert_eq!(grid.get(0, 4), Some(&CellValue::from("Y")));
        assert_eq!(grid.get(0, 5), None);
        assert_eq!(grid.get(7, 0), None);
        assert_eq!(grid.len(), 2);
    }

    #[test]
    fn test_storing_empty_deletes() {
        let mut grid = CellStorage::new();
        grid.set(0, 0, CellValue::from(1));
        grid.set(0, 0, CellValue::Empty);
        grid.set(4, 4, CellValue::Empty);

        assert!(grid.is_empty());
        assert_eq!(grid.extent(), None);
    }

    #[test]
    fn test_extent_spans_rows() {
        let mut grid = CellStorage::new();
        grid.set(3, 2, CellValue::from(1));
        grid.set(0, 7, CellValue::from(2));
        grid.set(1, 4, CellValue::from(3));

        assert_eq!(grid.extent(), Some((3, 7)));
    }

    #[test]
    fn test_iteration_order() {
        let mut grid = CellStorage::new();
        grid.set(1, 0, CellValue::from("b"));
        grid.set(0, 3, CellValue::from("a2"));
        grid.set(0, 1, CellValue::from("a1"));

        let order: Vec<(u32, u16)> = grid.iter().map(|(r, c, _)| (r, c)).collect();
        assert_eq!(order, vec![(0, 1), (0, 3), (1, 0)]);
    }
}
