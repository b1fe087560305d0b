use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Sentinel text marking the start of the decision table inside a grid
pub const RULE_TABLE_MARKER: &str = "RuleTable";

/// Placeholder every CONDITION/ACTION template must contain
pub const PARAM_PLACEHOLDER: &str = "$param";

pub const DEFAULT_RULE_SET_NAME: &str = "DefaultRuleSet";
pub const DEFAULT_RULE_TABLE_NAME: &str = "DiscountRules";

//==============================================================================
// Cell Values
//==============================================================================

/// Numeric cell content. Integral values read from a workbook are kept as
/// integers so `4.0` never shows up as `4.0`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Numeric {
    Int(i64),
    Float(f64),
}

impl Numeric {
    /// Largest magnitude an f64 can hold while every integer below it is exact
    const MAX_EXACT_INT: f64 = 9_007_199_254_740_992.0;

    /// Collapse a float to `Int` when it has no fractional part
    pub fn from_f64(value: f64) -> Self {
        if value.is_finite() && value.fract() == 0.0 && value.abs() < Self::MAX_EXACT_INT {
            Numeric::Int(value as i64)
        } else {
            Numeric::Float(value)
        }
    }

    pub fn as_f64(&self) -> f64 {
        match self {
            Numeric::Int(i) => *i as f64,
            Numeric::Float(f) => *f,
        }
    }
}

impl From<i64> for Numeric {
    fn from(value: i64) -> Self {
        Numeric::Int(value)
    }
}

impl From<i32> for Numeric {
    fn from(value: i32) -> Self {
        Numeric::Int(value.into())
    }
}

impl From<f64> for Numeric {
    fn from(value: f64) -> Self {
        Numeric::from_f64(value)
    }
}

impl fmt::Display for Numeric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Numeric::Int(i) => write!(f, "{i}"),
            Numeric::Float(v) => write!(f, "{v}"),
        }
    }
}

/// Value of a single grid cell.
///
/// `Empty` is a blank cell. It is distinct from `Text("")` and from
/// `Number(0)`, and it is what an absent cell reads as.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "CellWire", into = "CellWire")]
pub enum CellValue {
    Text(String),
    Number(Numeric),
    Boolean(bool),
    Date(NaiveDateTime),
    /// Formula source without the leading `=`
    Formula(String),
    #[default]
    Empty,
}

impl CellValue {
    pub fn text(value: impl Into<String>) -> Self {
        CellValue::Text(value.into())
    }

    pub fn number(value: impl Into<Numeric>) -> Self {
        CellValue::Number(value.into())
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }

    /// Variant name, used in diagnostics
    pub fn type_name(&self) -> &'static str {
        match self {
            CellValue::Text(_) => "Text",
            CellValue::Number(_) => "Number",
            CellValue::Boolean(_) => "Boolean",
            CellValue::Date(_) => "Date",
            CellValue::Formula(_) => "Formula",
            CellValue::Empty => "Empty",
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Text(s) => f.write_str(s),
            CellValue::Number(n) => write!(f, "{n}"),
            CellValue::Boolean(b) => write!(f, "{b}"),
            CellValue::Date(d) => write!(f, "{}", d.format("%Y-%m-%d %H:%M:%S")),
            CellValue::Formula(s) => f.write_str(s),
            CellValue::Empty => Ok(()),
        }
    }
}

/// JSON shape of a cell: scalars stay scalars, blanks are `null`, dates and
/// formulas are wrapped so they cannot be mistaken for text.
#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum CellWire {
    Empty,
    Boolean(bool),
    Number(Numeric),
    Text(String),
    Date { date: NaiveDateTime },
    Formula { formula: String },
}

impl From<CellWire> for CellValue {
    fn from(wire: CellWire) -> Self {
        match wire {
            CellWire::Empty => CellValue::Empty,
            CellWire::Boolean(b) => CellValue::Boolean(b),
            CellWire::Number(n) => CellValue::Number(n),
            CellWire::Text(s) => CellValue::Text(s),
            CellWire::Date { date } => CellValue::Date(date),
            CellWire::Formula { formula } => CellValue::Formula(formula),
        }
    }
}

impl From<CellValue> for CellWire {
    fn from(value: CellValue) -> Self {
        match value {
            CellValue::Empty => CellWire::Empty,
            CellValue::Boolean(b) => CellWire::Boolean(b),
            CellValue::Number(n) => CellWire::Number(n),
            CellValue::Text(s) => CellWire::Text(s),
            CellValue::Date(date) => CellWire::Date { date },
            CellValue::Formula(formula) => CellWire::Formula { formula },
        }
    }
}

//==============================================================================
// Decision Table Model
//==============================================================================

/// Kind of a decision table column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ColumnType {
    Name,
    Condition,
    Action,
}

impl ColumnType {
    pub const ALL: [ColumnType; 3] = [ColumnType::Name, ColumnType::Condition, ColumnType::Action];

    /// Canonical header text
    pub fn as_str(&self) -> &'static str {
        match self {
            ColumnType::Name => "NAME",
            ColumnType::Condition => "CONDITION",
            ColumnType::Action => "ACTION",
        }
    }

    /// Exact, case-insensitive match against the header vocabulary
    pub fn from_header(text: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(text))
    }

    /// Only CONDITION and ACTION columns carry templates
    pub fn is_templated(&self) -> bool {
        matches!(self, ColumnType::Condition | ColumnType::Action)
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parameterized expression attached to a CONDITION or ACTION column
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateCell {
    pub column_index: usize,
    #[serde(alias = "type")]
    pub column_type: ColumnType,
    #[serde(alias = "template")]
    pub template_text: String,
}

impl TemplateCell {
    pub fn new(column_index: usize, column_type: ColumnType, template_text: impl Into<String>) -> Self {
        Self {
            column_index,
            column_type,
            template_text: template_text.into(),
        }
    }

    pub fn has_placeholder(&self) -> bool {
        self.template_text.contains(PARAM_PLACEHOLDER)
    }
}

/// One rule. `values[i]` belongs to header column `i + 1`; column 0 is the name.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TableRow {
    pub name: String,
    #[serde(default)]
    pub values: Vec<CellValue>,
}

impl TableRow {
    pub fn new(name: impl Into<String>, values: Vec<CellValue>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }

    /// Cell at a logical column index, counting the name as column 0
    pub fn cell(&self, column: usize) -> CellValue {
        if column == 0 {
            if self.name.is_empty() {
                CellValue::Empty
            } else {
                CellValue::Text(self.name.clone())
            }
        } else {
            self.values.get(column - 1).cloned().unwrap_or_default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DecisionTableMeta {
    #[serde(alias = "ruleSet")]
    pub rule_set_name: String,
    pub import_types: Vec<String>,
    pub rule_table_name: String,
}

impl Default for DecisionTableMeta {
    fn default() -> Self {
        Self {
            rule_set_name: DEFAULT_RULE_SET_NAME.to_string(),
            import_types: Vec::new(),
            rule_table_name: DEFAULT_RULE_TABLE_NAME.to_string(),
        }
    }
}

/// Structured decision table. Row order is rule evaluation order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionTable {
    #[serde(default)]
    pub meta: DecisionTableMeta,
    pub headers: Vec<ColumnType>,
    #[serde(default)]
    pub templates: Vec<TemplateCell>,
    #[serde(default)]
    pub rows: Vec<TableRow>,
}

impl DecisionTable {
    pub fn new(headers: Vec<ColumnType>) -> Self {
        Self {
            meta: DecisionTableMeta::default(),
            headers,
            templates: Vec::new(),
            rows: Vec::new(),
        }
    }

    pub fn add_template(&mut self, template: TemplateCell) {
        self.templates.push(template);
    }

    pub fn add_row(&mut self, row: TableRow) {
        self.rows.push(row);
    }

    /// Number of value cells each row carries
    pub fn value_width(&self) -> usize {
        self.headers.len().saturating_sub(1)
    }

    /// First template registered for a column
    pub fn template_for(&self, column: usize) -> Option<&TemplateCell> {
        self.templates.iter().find(|t| t.column_index == column)
    }

    /// Templates ordered by column, for set-style comparison
    pub fn sorted_templates(&self) -> Vec<TemplateCell> {
        let mut templates = self.templates.clone();
        templates.sort_by(|a, b| {
            a.column_index
                .cmp(&b.column_index)
                .then_with(|| a.template_text.cmp(&b.template_text))
        });
        templates
    }

    pub fn count_of(&self, kind: ColumnType) -> usize {
        self.headers.iter().filter(|h| **h == kind).count()
    }
}

/// Grid rows found above the RuleTable marker, carried through untouched
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MetaBlock {
    pub rows: Vec<Vec<CellValue>>,
}

impl MetaBlock {
    pub fn new(rows: Vec<Vec<CellValue>>) -> Self {
        Self { rows }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// Build the rows a fresh workbook needs so `meta` reads back unchanged
    pub fn from_meta(meta: &DecisionTableMeta) -> Self {
        let mut rows = vec![vec![
            CellValue::text("RuleSet"),
            CellValue::text(meta.rule_set_name.clone()),
        ]];
        for import in &meta.import_types {
            rows.push(vec![CellValue::text("Import"), CellValue::text(import.clone())]);
        }
        Self { rows }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }
}

//==============================================================================
// Validation Results
//==============================================================================

/// A single finding. `row`/`col` are zero-based; absent for table-level findings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationError {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub row: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub col: Option<usize>,
    pub message: String,
}

impl ValidationError {
    pub fn table(message: impl Into<String>) -> Self {
        Self {
            row: None,
            col: None,
            message: message.into(),
        }
    }

    pub fn column(col: usize, message: impl Into<String>) -> Self {
        Self {
            row: None,
            col: Some(col),
            message: message.into(),
        }
    }

    pub fn cell(row: usize, col: usize, message: impl Into<String>) -> Self {
        Self {
            row: Some(row),
            col: Some(col),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.row, self.col) {
            (Some(r), Some(c)) => write!(f, "row {r}, column {c}: {}", self.message),
            (None, Some(c)) => write!(f, "column {c}: {}", self.message),
            (Some(r), None) => write!(f, "row {r}: {}", self.message),
            (None, None) => f.write_str(&self.message),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub ok: bool,
    pub errors: Vec<ValidationError>,
}

impl ValidationResult {
    pub fn from_errors(errors: Vec<ValidationError>) -> Self {
        Self {
            ok: errors.is_empty(),
            errors,
        }
    }
}
