//! Template shape classification
//!
//! A template's expected value type is inferred from its text alone:
//!
//! | Shape   | Template text                                         | Example                        |
//! |---------|-------------------------------------------------------|--------------------------------|
//! | Boolean | `==` before `$param`, and the word `true` or `false`  | `vip == $param (true/false)`   |
//! | Numeric | any of `>`, `<`, `=` before `$param`                  | `qty >= $param`                |
//! | Untyped | anything else                                         | `setDiscount($param)`          |
//!
//! Boolean is tested first, so a template matching both shapes is boolean.

use regex::Regex;
use std::sync::OnceLock;

/// Value type a template expects in its column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateShape {
    Numeric,
    Boolean,
    Untyped,
}

fn comparison_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"(?s)[<>=].*\$param").expect("valid comparison pattern"))
}

fn equality_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"(?s)==.*\$param").expect("valid equality pattern"))
}

fn boolean_word_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"(?i)\b(?:true|false)\b").expect("valid boolean pattern"))
}

/// Classify a template by its text
pub fn classify(template: &str) -> TemplateShape {
    if equality_pattern().is_match(template) && boolean_word_pattern().is_match(template) {
        TemplateShape::Boolean
    } else if comparison_pattern().is_match(template) {
        TemplateShape::Numeric
    } else {
        TemplateShape::Untyped
    }
}
