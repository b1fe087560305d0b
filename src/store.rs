//! Rules file store
//!
//! Loads and saves the decision table behind a single workbook path. Saving
//! validates first and never touches the file when validation fails.

use crate::core::validate;
use crate::error::RulesResult;
use crate::excel::{ExcelExporter, ExcelImporter};
use crate::table::merge_meta;
use crate::types::{DecisionTable, DecisionTableMeta, MetaBlock, ValidationResult};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Default location of the rules workbook
pub const DEFAULT_RULES_PATH: &str = "rules/DiscountRules.xlsx";

/// Outcome of a save attempt
#[derive(Debug, Clone)]
pub struct SaveOutcome {
    pub validation: ValidationResult,
    /// True when the workbook was written
    pub saved: bool,
    /// Copy of the previous workbook, when one was made
    pub backup: Option<PathBuf>,
}

#[derive(Debug, Clone)]
pub struct RulesStore {
    path: PathBuf,
    backup: bool,
}

impl RulesStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            backup: true,
        }
    }

    /// Enable or disable the `.bak` copy made before overwriting
    pub fn with_backup(mut self, backup: bool) -> Self {
        self.backup = backup;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// `<path>.bak`, next to the rules file
    pub fn backup_path(&self) -> PathBuf {
        let mut name = self.path.as_os_str().to_os_string();
        name.push(".bak");
        PathBuf::from(name)
    }

    pub fn load(&self) -> RulesResult<DecisionTable> {
        let table = ExcelImporter::new(&self.path).import()?;
        info!(
            path = %self.path.display(),
            rows = table.rows.len(),
            "loaded rules"
        );
        Ok(table)
    }

    /// Validate, back up the previous file, then write `table`.
    ///
    /// The meta block of the previous file is kept, with its `RuleSet` and
    /// `Import` rows updated from `table.meta`. A table naming only the
    /// default rule set and no imports leaves those rows alone. A new file
    /// gets a block built from `table.meta`.
    pub fn save(&self, table: &DecisionTable) -> RulesResult<SaveOutcome> {
        let validation = validate(table);
        if !validation.ok {
            warn!(
                errors = validation.errors.len(),
                "validation failed, not saving rules"
            );
            return Ok(SaveOutcome {
                validation,
                saved: false,
                backup: None,
            });
        }

        let exists = self.path.exists();
        let backup = if exists && self.backup {
            self.copy_backup()
        } else {
            None
        };

        let meta_block = if exists {
            self.previous_meta_block(table)
        } else {
            MetaBlock::from_meta(&table.meta)
        };

        ExcelExporter::new(table, &meta_block).export(&self.path)?;
        info!(path = %self.path.display(), rows = table.rows.len(), "saved rules");

        Ok(SaveOutcome {
            validation,
            saved: true,
            backup,
        })
    }

    fn copy_backup(&self) -> Option<PathBuf> {
        let backup_path = self.backup_path();
        match fs::copy(&self.path, &backup_path) {
            Ok(_) => {
                info!(path = %backup_path.display(), "created backup");
                Some(backup_path)
            }
            Err(e) => {
                warn!(error = %e, "could not create backup");
                None
            }
        }
    }

    fn previous_meta_block(&self, table: &DecisionTable) -> MetaBlock {
        match ExcelImporter::new(&self.path).import_with_meta_block() {
            Ok((_, meta_block)) if carries_default_meta(table) => meta_block,
            Ok((_, meta_block)) => merge_meta(&meta_block, &table.meta),
            Err(e) => {
                warn!(error = %e, "could not read existing file for meta block");
                MetaBlock::from_meta(&table.meta)
            }
        }
    }
}

/// True when `table.meta` names no rule set or imports of its own
fn carries_default_meta(table: &DecisionTable) -> bool {
    let defaults = DecisionTableMeta::default();
    table.meta.rule_set_name == defaults.rule_set_name && table.meta.import_types.is_empty()
}
