//! Decision table validation
//!
//! Every rule runs on every call and findings accumulate; nothing short-circuits.
//! Order of findings: structural, template, then cells by row and column.

use crate::core::template::{classify, TemplateShape};
use crate::types::{
    CellValue, ColumnType, DecisionTable, TableRow, TemplateCell, ValidationError,
    ValidationResult, PARAM_PLACEHOLDER,
};
use regex::Regex;
use std::sync::OnceLock;
use tracing::debug;

/// Plain decimal literal, optional sign and exponent. No inf or NaN spellings.
fn decimal_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[+-]?(?:\d+\.?\d*|\.\d+)(?:[eE][+-]?\d+)?$").expect("valid decimal pattern")
    })
}

/// Validate a decision table. Never fails; an invalid table yields `ok: false`.
pub fn validate(table: &DecisionTable) -> ValidationResult {
    let mut errors = Vec::new();

    check_structure(table, &mut errors);
    check_templates(table, &mut errors);

    let columns = typed_columns(table);
    for (row_index, row) in table.rows.iter().enumerate() {
        check_row(row_index, row, &columns, &mut errors);
    }

    debug!(
        rows = table.rows.len(),
        errors = errors.len(),
        "validated rule table"
    );
    ValidationResult::from_errors(errors)
}

fn check_structure(table: &DecisionTable, errors: &mut Vec<ValidationError>) {
    for kind in [ColumnType::Condition, ColumnType::Action] {
        if table.count_of(kind) == 0 {
            errors.push(ValidationError::table(format!(
                "At least one {kind} column is required"
            )));
        }
    }
}

fn check_templates(table: &DecisionTable, errors: &mut Vec<ValidationError>) {
    for template in &table.templates {
        let column = template.column_index;
        match table.headers.get(column) {
            None => errors.push(ValidationError::column(
                column,
                format!(
                    "Template column {column} is outside the {} header columns",
                    table.headers.len()
                ),
            )),
            Some(header) if *header != template.column_type => {
                errors.push(ValidationError::column(
                    column,
                    format!(
                        "Template declared as {} but column {column} is {header}",
                        template.column_type
                    ),
                ))
            }
            Some(_) => {}
        }

        if template.column_type.is_templated() && !template.has_placeholder() {
            errors.push(ValidationError::column(
                column,
                format!(
                    "Template for {} column must contain '{PARAM_PLACEHOLDER}'",
                    template.column_type
                ),
            ));
        }
    }
}

/// Columns carrying a typed template, in column order
fn typed_columns(table: &DecisionTable) -> Vec<(usize, &TemplateCell, TemplateShape)> {
    (0..table.headers.len())
        .filter_map(|column| table.template_for(column))
        .map(|template| {
            (
                template.column_index,
                template,
                classify(&template.template_text),
            )
        })
        .filter(|(_, _, shape)| *shape != TemplateShape::Untyped)
        .collect()
}

fn check_row(
    row_index: usize,
    row: &TableRow,
    columns: &[(usize, &TemplateCell, TemplateShape)],
    errors: &mut Vec<ValidationError>,
) {
    for (column, template, shape) in columns {
        let value = row.cell(*column);
        if value.is_empty() {
            continue;
        }

        let message = match shape {
            TemplateShape::Numeric if !is_numeric(&value) => format!(
                "Numeric value expected for template: {}",
                template.template_text
            ),
            TemplateShape::Boolean if !is_boolean(&value) => format!(
                "Boolean value (true/false) expected for template: {}",
                template.template_text
            ),
            _ => continue,
        };
        errors.push(ValidationError::cell(row_index, *column, message));
    }
}

fn is_numeric(value: &CellValue) -> bool {
    match value {
        CellValue::Number(_) => true,
        other => decimal_pattern().is_match(other.to_string().trim()),
    }
}

fn is_boolean(value: &CellValue) -> bool {
    match value {
        CellValue::Boolean(_) => true,
        other => {
            let text = other.to_string();
            text.eq_ignore_ascii_case("true") || text.eq_ignore_ascii_case("false")
        }
    }
}
