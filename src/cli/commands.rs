use crate::core::validate as validate_table;
use crate::error::{RulesError, RulesResult};
use crate::excel::{ExcelExporter, ExcelImporter};
use crate::store::RulesStore;
use crate::types::{DecisionTable, ValidationResult};
use clap::ValueEnum;
use colored::Colorize;
use std::fs;
use std::path::{Path, PathBuf};

/// Output format for `show`
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Yaml,
    Json,
}

/// Load a decision table from a workbook, or from a JSON/YAML table file
pub fn load_table(path: &Path) -> RulesResult<DecisionTable> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    match extension.as_str() {
        "json" => Ok(serde_json::from_str(&fs::read_to_string(path)?)?),
        "yaml" | "yml" => Ok(serde_yaml::from_str(&fs::read_to_string(path)?)?),
        _ => ExcelImporter::new(path).import(),
    }
}

/// Execute the show command
pub fn show(file: PathBuf, format: OutputFormat) -> RulesResult<()> {
    let table = RulesStore::new(&file).load()?;

    let output = match format {
        OutputFormat::Yaml => serde_yaml::to_string(&table)?,
        OutputFormat::Json => serde_json::to_string_pretty(&table)?,
    };
    println!("{}", output.trim_end());
    Ok(())
}

/// Execute the validate command
pub fn validate(files: Vec<PathBuf>) -> RulesResult<()> {
    let mut failed = 0;

    for file in &files {
        println!("{}", "✅ Validating rules".bold().green());
        println!("   File: {}\n", file.display());

        let table = match load_table(file) {
            Ok(table) => table,
            Err(e) => {
                println!("{}\n", format!("❌ Could not read rules: {}", e).bold().red());
                failed += 1;
                continue;
            }
        };

        println!(
            "   Found {} columns, {} templates, {} rules",
            table.headers.len(),
            table.templates.len(),
            table.rows.len()
        );

        let result = validate_table(&table);
        print_validation(&result);
        if !result.ok {
            failed += 1;
        }
    }

    if failed > 0 {
        return Err(RulesError::Validation(format!(
            "{} of {} file(s) failed validation",
            failed,
            files.len()
        )));
    }
    Ok(())
}

fn print_validation(result: &ValidationResult) {
    println!();
    if result.ok {
        println!("{}\n", "✅ All rules are valid!".bold().green());
        return;
    }

    println!(
        "{}",
        format!("❌ Found {} validation errors!", result.errors.len())
            .bold()
            .red()
    );
    for error in &result.errors {
        let location = match (error.row, error.col) {
            (Some(r), Some(c)) => format!("rule {}, column {}", r, c),
            (None, Some(c)) => format!("column {}", c),
            (Some(r), None) => format!("rule {}", r),
            (None, None) => "table".to_string(),
        };
        println!("   {} {}", format!("[{}]", location).bright_blue(), error.message);
    }
    println!();
}

/// Execute the save command
pub fn save(table_file: PathBuf, rules: PathBuf, no_backup: bool) -> RulesResult<()> {
    println!("{}", "💾 Saving rules".bold().green());
    println!("   Table: {}", table_file.display());
    println!("   Rules: {}\n", rules.display());

    let table = load_table(&table_file)?;
    let store = RulesStore::new(&rules).with_backup(!no_backup);
    let outcome = store.save(&table)?;

    if !outcome.saved {
        print_validation(&outcome.validation);
        println!("{}", "⚠️  Rules were not saved".yellow());
        return Err(RulesError::Validation(
            "Rules failed validation - file left unchanged".to_string(),
        ));
    }

    if let Some(backup) = &outcome.backup {
        println!("   Backup: {}", backup.display());
    }
    println!("{}", "✅ Rules saved!".bold().green());
    println!("   {} rules written\n", table.rows.len());
    Ok(())
}

/// Execute the roundtrip command - read, rewrite and compare
pub fn roundtrip(input: PathBuf, output: PathBuf) -> RulesResult<()> {
    println!("{}", "🔁 Round-trip check".bold().green());
    println!("   Input:  {}", input.display());
    println!("   Output: {}\n", output.display());

    let (original, meta_block) = ExcelImporter::new(&input).import_with_meta_block()?;
    ExcelExporter::new(&original, &meta_block).export(&output)?;
    let reread = ExcelImporter::new(&output).import()?;

    let checks = [
        ("headers", original.headers == reread.headers),
        ("templates", original.sorted_templates() == reread.sorted_templates()),
        ("rows", original.rows == reread.rows),
        ("meta", original.meta == reread.meta),
    ];

    let mut mismatches = 0;
    for (name, same) in checks {
        if same {
            println!("   {} {}", "✅".green(), name);
        } else {
            println!("   {} {} differ", "❌".red(), name.bold());
            mismatches += 1;
        }
    }
    println!();

    if mismatches > 0 {
        return Err(RulesError::Validation(format!(
            "{} section(s) changed after round trip",
            mismatches
        )));
    }
    println!("{}", "✅ Round trip preserved the table".bold().green());
    Ok(())
}
