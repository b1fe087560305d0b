//! Decision table metadata from the rows above the RuleTable marker

use crate::types::{CellValue, DecisionTableMeta, MetaBlock};

/// Derive `RuleSet` and `Import` settings from the meta block.
///
/// The first cell selects the setting (substring match, any case), the second
/// holds its value. Later `RuleSet` rows override earlier ones.
pub fn derive_meta(block: &MetaBlock) -> DecisionTableMeta {
    let mut meta = DecisionTableMeta::default();

    for row in &block.rows {
        let value = row.get(1).filter(|c| !c.is_empty()).map(CellValue::to_string);
        match (meta_key(row), value) {
            (Some(MetaKey::RuleSet), Some(name)) => meta.rule_set_name = name,
            (Some(MetaKey::Import), Some(import)) => meta.import_types.push(import),
            _ => {}
        }
    }

    meta
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MetaKey {
    RuleSet,
    Import,
}

fn meta_key(row: &[CellValue]) -> Option<MetaKey> {
    let key = row.first().filter(|c| !c.is_empty())?.to_string().to_lowercase();
    if key.contains("ruleset") {
        Some(MetaKey::RuleSet)
    } else if key.contains("import") {
        Some(MetaKey::Import)
    } else {
        None
    }
}

/// Rewrite the `RuleSet` and `Import` rows of `block` so it derives `meta`.
///
/// Every other row keeps its content and position. Import rows are replaced
/// where the first one stood; missing rows are added after the `RuleSet` row.
pub fn merge_meta(block: &MetaBlock, meta: &DecisionTableMeta) -> MetaBlock {
    let current = derive_meta(block);
    if current.rule_set_name == meta.rule_set_name && current.import_types == meta.import_types {
        return block.clone();
    }

    let import_label = block
        .rows
        .iter()
        .find(|row| meta_key(row) == Some(MetaKey::Import))
        .and_then(|row| row.first().cloned())
        .unwrap_or_else(|| CellValue::text("Import"));
    let import_rows: Vec<Vec<CellValue>> = meta
        .import_types
        .iter()
        .map(|import| vec![import_label.clone(), CellValue::text(import.clone())])
        .collect();

    let mut rows = Vec::with_capacity(block.rows.len() + import_rows.len() + 1);
    let mut has_rule_set = false;
    let mut imports_placed = false;
    for row in &block.rows {
        match meta_key(row) {
            Some(MetaKey::RuleSet) => {
                let mut row = row.clone();
                row.resize(row.len().max(2), CellValue::Empty);
                row[1] = CellValue::text(meta.rule_set_name.clone());
                rows.push(row);
                has_rule_set = true;
            }
            Some(MetaKey::Import) => {
                if !imports_placed {
                    rows.extend(import_rows.iter().cloned());
                    imports_placed = true;
                }
            }
            None => rows.push(row.clone()),
        }
    }

    let rule_set_at = if has_rule_set {
        rows.iter()
            .rposition(|row| meta_key(row) == Some(MetaKey::RuleSet))
            .map_or(0, |i| i + 1)
    } else {
        rows.insert(
            0,
            vec![
                CellValue::text("RuleSet"),
                CellValue::text(meta.rule_set_name.clone()),
            ],
        );
        1
    };
    if !imports_placed {
        for (offset, row) in import_rows.into_iter().enumerate() {
            rows.insert(rule_set_at + offset, row);
        }
    }

    MetaBlock::new(rows)
}
