use thiserror::Error;

pub type RulesResult<T> = Result<T, RulesError>;

#[derive(Error, Debug)]
pub enum RulesError {
    #[error("RuleTable marker row not found")]
    TableNotFound,

    #[error("Header row not found after RuleTable marker")]
    HeaderRowMissing,

    #[error("Template row not found after header row")]
    TemplateRowMissing,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Workbook error: {0}")]
    Workbook(String),

    #[error("Export error: {0}")]
    Export(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl RulesError {
    /// True for layout errors raised while locating the table inside a grid.
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            RulesError::TableNotFound
                | RulesError::HeaderRowMissing
                | RulesError::TemplateRowMissing
        )
    }
}
