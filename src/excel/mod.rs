//! Excel import/export for rule tables
//!
//! This module connects the grid codec to workbook files:
//! - Import: first worksheet of .xlsx/.xlsm/.xls/.ods → Grid → DecisionTable
//! - Export: DecisionTable + meta block → Grid → .xlsx ("Rules" worksheet)

pub mod cell;
mod exporter;
mod importer;

pub use exporter::{ExcelExporter, SHEET_NAME};
pub use importer::ExcelImporter;
