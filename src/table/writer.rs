//! Decision table → grid

use crate::grid::{is_blank_row, Grid};
use crate::types::{CellValue, DecisionTable, MetaBlock, RULE_TABLE_MARKER};

/// Lay out a decision table as a grid.
///
/// Rows, in order: the meta block verbatim, the `RuleTable` marker, the
/// header row, the template row, then one row per rule.
///
/// A template row or rule row that would otherwise hold no cells gets an
/// empty text cell in column 0, so the row is still there when read back.
pub fn write_table(table: &DecisionTable, meta_block: &MetaBlock) -> Grid {
    let mut grid = Grid::new();

    for row in &meta_block.rows {
        grid.push_row(row.clone());
    }

    grid.push_row(vec![CellValue::text(RULE_TABLE_MARKER)]);

    grid.push_row(
        table
            .headers
            .iter()
            .map(|kind| CellValue::text(kind.as_str()))
            .collect(),
    );

    let template_row = grid.height();
    grid.push_row(Vec::new());
    for template in &table.templates {
        grid.set(
            template_row,
            template.column_index,
            CellValue::text(template.template_text.clone()),
        );
    }
    if grid.row(template_row).is_some_and(is_blank_row) {
        grid.set(template_row, 0, CellValue::text(""));
    }

    for row in &table.rows {
        let mut cells = Vec::with_capacity(row.values.len() + 1);
        let anchor = row.name.is_empty() && row.values.iter().all(CellValue::is_empty);
        if row.name.is_empty() && !anchor {
            cells.push(CellValue::Empty);
        } else {
            cells.push(CellValue::text(row.name.clone()));
        }
        cells.extend(row.values.iter().cloned());
        grid.push_row(cells);
    }

    grid
}
