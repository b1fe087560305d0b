//! Rulesheet - decision tables kept in spreadsheets
//!
//! This library reads a rule table laid out in a workbook, validates its
//! templated cells, and writes it back without disturbing the notes above it.
//!
//! # Features
//!
//! - `RuleTable` marker detection with leading metadata rows preserved
//! - NAME / CONDITION / ACTION columns with `$param` templates
//! - Numeric and boolean template checks for every rule cell
//! - Lossless cell values (text, number, boolean, date, formula, blank)
//! - Excel import (.xlsx, .xls, .ods) and export (.xlsx)
//!
//! # Example
//!
//! ```no_run
//! use rulesheet::core::validate;
//! use rulesheet::excel::{ExcelExporter, ExcelImporter};
//! use std::path::Path;
//!
//! let (table, meta_block) = ExcelImporter::new("DiscountRules.xlsx").import_with_meta_block()?;
//!
//! let result = validate(&table);
//! println!("Rules: {}, errors: {}", table.rows.len(), result.errors.len());
//!
//! if result.ok {
//!     ExcelExporter::new(&table, &meta_block).export(Path::new("DiscountRules.xlsx"))?;
//! }
//! # Ok::<(), rulesheet::error::RulesError>(())
//! ```

pub mod cli;
pub mod core;
pub mod error;
pub mod excel;
pub mod grid;
pub mod store;
pub mod table;
pub mod types;

// Re-export commonly used types
pub use error::{RulesError, RulesResult};
pub use grid::Grid;
pub use types::{
    CellValue, ColumnType, DecisionTable, DecisionTableMeta, MetaBlock, Numeric, TableRow,
    TemplateCell, ValidationError, ValidationResult,
};
