//! In-memory cell grid
//!
//! A `Grid` is what the workbook importer produces and the exporter consumes.
//! The decision table codec only ever sees grids, never files.

use crate::types::CellValue;

static EMPTY: CellValue = CellValue::Empty;

/// Zero-based (row, column) addressable grid of cell values.
///
/// Rows are ragged: trailing blank cells are not stored, and a blank row is an
/// empty vector. Reads outside the stored area yield `CellValue::Empty`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Grid {
    rows: Vec<Vec<CellValue>>,
}

impl Grid {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_rows(rows: Vec<Vec<CellValue>>) -> Self {
        let mut grid = Self::new();
        for row in rows {
            grid.push_row(row);
        }
        grid
    }

    /// Number of rows up to and including the last stored row
    pub fn height(&self) -> usize {
        self.rows.len()
    }

    /// Widest row length
    pub fn width(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Row cells, or `None` past the last row
    pub fn row(&self, index: usize) -> Option<&[CellValue]> {
        self.rows.get(index).map(Vec::as_slice)
    }

    pub fn rows(&self) -> impl Iterator<Item = &[CellValue]> {
        self.rows.iter().map(Vec::as_slice)
    }

    pub fn get(&self, row: usize, col: usize) -> &CellValue {
        self.rows
            .get(row)
            .and_then(|cells| cells.get(col))
            .unwrap_or(&EMPTY)
    }

    /// Append a row, dropping its trailing blanks
    pub fn push_row(&mut self, mut cells: Vec<CellValue>) {
        trim_trailing_blanks(&mut cells);
        self.rows.push(cells);
    }

    /// Set a cell, growing the grid as needed
    pub fn set(&mut self, row: usize, col: usize, value: CellValue) {
        if value.is_empty() && row >= self.rows.len() {
            return;
        }
        if row >= self.rows.len() {
            self.rows.resize_with(row + 1, Vec::new);
        }
        let cells = &mut self.rows[row];
        if col >= cells.len() {
            if value.is_empty() {
                return;
            }
            cells.resize(col + 1, CellValue::Empty);
        }
        cells[col] = value;
        trim_trailing_blanks(cells);
    }

    /// Drop blank rows at the bottom, matching a workbook's used range
    pub fn trim_trailing_rows(&mut self) {
        while self.rows.last().is_some_and(Vec::is_empty) {
            self.rows.pop();
        }
    }
}

fn trim_trailing_blanks(cells: &mut Vec<CellValue>) {
    while cells.last().is_some_and(CellValue::is_empty) {
        cells.pop();
    }
}

/// True when every cell of a row is blank
pub fn is_blank_row(cells: &[CellValue]) -> bool {
    cells.iter().all(CellValue::is_empty)
}
