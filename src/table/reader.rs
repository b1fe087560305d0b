//! Grid → decision table
//!
//! Parsing runs as fixed stages over the grid rows: marker, header row,
//! template row, data rows. Each stage either yields its piece of the table or
//! a structural error naming the layout expectation that failed.

use crate::error::{RulesError, RulesResult};
use crate::grid::{is_blank_row, Grid};
use crate::table::meta::derive_meta;
use crate::types::{
    CellValue, ColumnType, DecisionTable, MetaBlock, TableRow, TemplateCell, PARAM_PLACEHOLDER,
    RULE_TABLE_MARKER,
};
use tracing::debug;

/// Reads the decision table embedded in a grid
pub struct TableReader<'a> {
    grid: &'a Grid,
}

impl<'a> TableReader<'a> {
    pub fn new(grid: &'a Grid) -> Self {
        Self { grid }
    }

    /// Parse the decision table
    pub fn read(&self) -> RulesResult<DecisionTable> {
        self.read_with_meta_block().map(|(table, _)| table)
    }

    /// Parse the decision table and hand back the rows above the marker
    pub fn read_with_meta_block(&self) -> RulesResult<(DecisionTable, MetaBlock)> {
        let marker = self.find_marker()?;
        let meta_block = self.meta_block(marker);

        let headers = self.parse_headers(marker + 1)?;
        let templates = self.parse_templates(marker + 2, &headers)?;
        let rows = self.parse_rows(marker + 3, headers.len());

        debug!(
            marker_row = marker,
            headers = headers.len(),
            templates = templates.len(),
            rows = rows.len(),
            "parsed rule table"
        );

        let table = DecisionTable {
            meta: derive_meta(&meta_block),
            headers,
            templates,
            rows,
        };
        Ok((table, meta_block))
    }

    /// First row whose first cell is the RuleTable marker
    fn find_marker(&self) -> RulesResult<usize> {
        self.grid
            .rows()
            .position(|cells| {
                cells
                    .first()
                    .is_some_and(|c| c.to_string().eq_ignore_ascii_case(RULE_TABLE_MARKER))
            })
            .ok_or(RulesError::TableNotFound)
    }

    fn meta_block(&self, marker: usize) -> MetaBlock {
        MetaBlock::new(self.grid.rows().take(marker).map(<[CellValue]>::to_vec).collect())
    }

    /// Recognized header cells in order; anything else is dropped
    fn parse_headers(&self, index: usize) -> RulesResult<Vec<ColumnType>> {
        let cells = self.grid.row(index).ok_or(RulesError::HeaderRowMissing)?;
        let headers: Vec<ColumnType> = cells
            .iter()
            .filter_map(|cell| ColumnType::from_header(&cell.to_string()))
            .collect();

        if headers.is_empty() {
            return Err(RulesError::HeaderRowMissing);
        }
        Ok(headers)
    }

    /// Template cells aligned with the logical header positions
    fn parse_templates(
        &self,
        index: usize,
        headers: &[ColumnType],
    ) -> RulesResult<Vec<TemplateCell>> {
        let cells = self.grid.row(index).ok_or(RulesError::TemplateRowMissing)?;

        let templates = headers
            .iter()
            .zip(cells)
            .enumerate()
            .filter_map(|(column, (kind, cell))| {
                let text = cell.to_string();
                let is_template = !text.trim().is_empty()
                    && kind.is_templated()
                    && text.contains(PARAM_PLACEHOLDER);
                is_template.then(|| TemplateCell::new(column, *kind, text))
            })
            .collect();
        Ok(templates)
    }

    /// Non-blank rows from `start` to the end of the grid
    fn parse_rows(&self, start: usize, header_count: usize) -> Vec<TableRow> {
        self.grid
            .rows()
            .skip(start)
            .filter(|cells| !is_blank_row(cells))
            .map(|cells| parse_row(cells, header_count))
            .collect()
    }
}

fn parse_row(cells: &[CellValue], header_count: usize) -> TableRow {
    let name = cells.first().map(ToString::to_string).unwrap_or_default();
    let values = (1..header_count)
        .map(|col| cells.get(col).cloned().unwrap_or_default())
        .collect();
    TableRow::new(name, values)
}

/// Read the decision table from a grid
pub fn read_table(grid: &Grid) -> RulesResult<DecisionTable> {
    TableReader::new(grid).read()
}
