//! Decision table codec
//!
//! Converts between a cell grid and the structured `DecisionTable` model:
//! - Read: locate the RuleTable marker and parse headers, templates and rules
//! - Write: lay the table out again below a caller-supplied meta block

mod meta;
mod reader;
mod writer;

pub use meta::{derive_meta, merge_meta};
pub use reader::{read_table, TableReader};
pub use writer::write_table;
