//! Excel exporter implementation - decision table → grid → .xlsx

use crate::error::{RulesError, RulesResult};
use crate::excel::cell::{write_cell, DATE_FORMAT};
use crate::grid::Grid;
use crate::table::write_table;
use crate::types::{DecisionTable, MetaBlock};
use rust_xlsxwriter::{Format, Workbook, XlsxError};
use std::path::Path;
use tracing::debug;

/// Worksheet name used for written rule tables
pub const SHEET_NAME: &str = "Rules";

/// Excel exporter for decision tables
pub struct ExcelExporter {
    grid: Grid,
}

impl ExcelExporter {
    /// Lay out `table` below `meta_block`, ready to export
    pub fn new(table: &DecisionTable, meta_block: &MetaBlock) -> Self {
        Self::from_grid(write_table(table, meta_block))
    }

    /// Export an arbitrary grid
    pub fn from_grid(grid: Grid) -> Self {
        Self { grid }
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Write the grid to a new .xlsx file, replacing any existing file
    pub fn export(&self, output_path: &Path) -> RulesResult<()> {
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        worksheet
            .set_name(SHEET_NAME)
            .map_err(|e| RulesError::Export(format!("Failed to set worksheet name: {}", e)))?;

        let date_format = Format::new().set_num_format(DATE_FORMAT);

        for (row_idx, cells) in self.grid.rows().enumerate() {
            let row = u32::try_from(row_idx)
                .map_err(|_| RulesError::Export(format!("Row {} out of range", row_idx)))?;
            for (col_idx, value) in cells.iter().enumerate() {
                let col = u16::try_from(col_idx)
                    .map_err(|_| RulesError::Export(format!("Column {} out of range", col_idx)))?;
                write_cell(worksheet, row, col, value, &date_format).map_err(|e| {
                    RulesError::Export(format!(
                        "Failed to write cell ({}, {}): {}",
                        row_idx, col_idx, e
                    ))
                })?;
            }
        }

        workbook.save(output_path).map_err(|e| match e {
            XlsxError::IoError(io) => RulesError::Io(io),
            other => RulesError::Export(format!("Failed to save Excel file: {}", other)),
        })?;

        debug!(
            path = %output_path.display(),
            rows = self.grid.height(),
            "wrote worksheet"
        );
        Ok(())
    }
}
