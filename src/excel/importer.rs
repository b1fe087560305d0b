//! Excel importer implementation - workbook → grid → decision table

use crate::error::{RulesError, RulesResult};
use crate::excel::cell::from_data;
use crate::grid::Grid;
use crate::table::TableReader;
use crate::types::{DecisionTable, MetaBlock};
use calamine::{open_workbook_auto, Data, Range, Reader};
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Reads the rule table from the first worksheet of a workbook
/// (.xlsx, .xlsm, .xls or .ods)
pub struct ExcelImporter {
    path: PathBuf,
}

impl ExcelImporter {
    /// Create a new Excel importer
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Load the first worksheet as a grid. The workbook is closed on return.
    pub fn load_grid(&self) -> RulesResult<Grid> {
        if !self.path.exists() {
            return Err(RulesError::Io(io::Error::new(
                io::ErrorKind::NotFound,
                format!("Rules file not found: {}", self.path.display()),
            )));
        }

        let mut workbook = open_workbook_auto(&self.path)
            .map_err(|e| RulesError::Workbook(format!("Failed to open workbook: {}", e)))?;

        let sheet_name = workbook
            .sheet_names()
            .first()
            .cloned()
            .ok_or_else(|| RulesError::Workbook("Workbook has no worksheets".to_string()))?;

        let values = workbook
            .worksheet_range(&sheet_name)
            .map_err(|e| RulesError::Workbook(format!("Failed to read sheet '{}': {}", sheet_name, e)))?;

        // Formula text lives in a separate range; a workbook without formulas is fine
        let formulas = workbook.worksheet_formula(&sheet_name).ok();

        let grid = grid_from_ranges(&values, formulas.as_ref());
        debug!(
            path = %self.path.display(),
            sheet = %sheet_name,
            rows = grid.height(),
            "loaded worksheet"
        );
        Ok(grid)
    }

    /// Import the decision table
    pub fn import(&self) -> RulesResult<DecisionTable> {
        self.import_with_meta_block().map(|(table, _)| table)
    }

    /// Import the decision table together with the rows above the marker
    pub fn import_with_meta_block(&self) -> RulesResult<(DecisionTable, MetaBlock)> {
        let grid = self.load_grid()?;
        TableReader::new(&grid).read_with_meta_block()
    }
}

/// Build a grid from absolute sheet positions, so rows above the used range
/// still count as (blank) rows.
fn grid_from_ranges(values: &Range<Data>, formulas: Option<&Range<String>>) -> Grid {
    let ends = [values.end(), formulas.and_then(Range::end)];
    let Some((last_row, last_col)) = ends
        .into_iter()
        .flatten()
        .reduce(|(r1, c1), (r2, c2)| (r1.max(r2), c1.max(c2)))
    else {
        return Grid::new();
    };

    let mut grid = Grid::new();
    for row in 0..=last_row {
        let cells = (0..=last_col)
            .map(|col| {
                let formula = formulas
                    .and_then(|f| f.get_value((row, col)))
                    .map(String::as_str);
                match values.get_value((row, col)) {
                    Some(data) => from_data(data, formula),
                    None => from_data(&Data::Empty, formula),
                }
            })
            .collect();
        grid.push_row(cells);
    }
    grid.trim_trailing_rows();
    grid
}
