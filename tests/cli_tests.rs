//! CLI Integration Tests
//!
//! Drives the `rulesheet` binary with assert_cmd against workbooks built in a
//! temp directory.

// The binary is stubbed during coverage builds
#![cfg(not(coverage))]
#![allow(deprecated)] // Command::cargo_bin deprecation - no stable replacement yet

use assert_cmd::Command;
use predicates::prelude::*;
use rulesheet::excel::ExcelExporter;
use rulesheet::{CellValue, Grid};
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

fn text(s: &str) -> CellValue {
    CellValue::text(s)
}

fn write_workbook(dir: &TempDir, name: &str, quantity: CellValue) -> PathBuf {
    let grid = Grid::from_rows(vec![
        vec![text("RuleSet"), text("Discounts")],
        vec![text("Owner"), text("pricing")],
        vec![text("RuleTable")],
        vec![text("NAME"), text("CONDITION"), text("ACTION")],
        vec![CellValue::Empty, text("qty >= $param"), text("setDiscount($param)")],
        vec![text("bulk"), quantity, CellValue::number(0.1)],
    ]);
    let path = dir.path().join(name);
    ExcelExporter::from_grid(grid).export(&path).unwrap();
    path
}

const VALID_TABLE_JSON: &str = r#"{
  "meta": {"ruleSetName": "Promotions", "importTypes": ["com.acme.Cart"], "ruleTableName": "DiscountRules"},
  "headers": ["NAME", "CONDITION", "ACTION"],
  "templates": [
    {"columnIndex": 1, "columnType": "CONDITION", "templateText": "total > $param"},
    {"columnIndex": 2, "columnType": "ACTION", "templateText": "setDiscount($param)"}
  ],
  "rows": [
    {"name": "big cart", "values": [500, 0.2]},
    {"name": "small cart", "values": [50, 0.05]}
  ]
}"#;

// ═══════════════════════════════════════════════════════════════════════════
// HELP AND VERSION TESTS
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_cli_help() {
    let mut cmd = Command::cargo_bin("rulesheet").unwrap();
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("rulesheet"))
        .stdout(predicate::str::contains("COMMANDS"));
}

#[test]
fn test_cli_version() {
    let mut cmd = Command::cargo_bin("rulesheet").unwrap();
    cmd.arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("rulesheet"));
}

// ═══════════════════════════════════════════════════════════════════════════
// VALIDATE
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_validate_valid_workbook() {
    let temp_dir = TempDir::new().unwrap();
    let path = write_workbook(&temp_dir, "rules.xlsx", CellValue::number(100));

    let mut cmd = Command::cargo_bin("rulesheet").unwrap();
    cmd.arg("validate")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("All rules are valid"));
}

#[test]
fn test_validate_reports_cell_errors() {
    let temp_dir = TempDir::new().unwrap();
    let path = write_workbook(&temp_dir, "rules.xlsx", text("lots"));

    let mut cmd = Command::cargo_bin("rulesheet").unwrap();
    cmd.arg("validate")
        .arg(&path)
        .assert()
        .failure()
        .stdout(predicate::str::contains("rule 0, column 1"))
        .stdout(predicate::str::contains(
            "Numeric value expected for template: qty >= $param",
        ));
}

#[test]
fn test_validate_json_table() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("table.json");
    fs::write(&path, VALID_TABLE_JSON).unwrap();

    let mut cmd = Command::cargo_bin("rulesheet").unwrap();
    cmd.arg("validate").arg(&path).assert().success();
}

#[test]
fn test_validate_workbook_without_marker() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("plain.xlsx");
    ExcelExporter::from_grid(Grid::from_rows(vec![vec![text("just data")]]))
        .export(&path)
        .unwrap();

    let mut cmd = Command::cargo_bin("rulesheet").unwrap();
    cmd.arg("validate")
        .arg(&path)
        .assert()
        .failure()
        .stdout(predicate::str::contains("RuleTable marker row not found"));
}

// ═══════════════════════════════════════════════════════════════════════════
// SHOW
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_show_json() {
    let temp_dir = TempDir::new().unwrap();
    let path = write_workbook(&temp_dir, "rules.xlsx", CellValue::number(100));

    let mut cmd = Command::cargo_bin("rulesheet").unwrap();
    cmd.args(["show", "--format", "json", "--rules"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"ruleSetName\": \"Discounts\""))
        .stdout(predicate::str::contains("\"templateText\": \"qty >= $param\""));
}

#[test]
fn test_show_uses_rules_path_env() {
    let temp_dir = TempDir::new().unwrap();
    let path = write_workbook(&temp_dir, "rules.xlsx", CellValue::number(100));

    let mut cmd = Command::cargo_bin("rulesheet").unwrap();
    cmd.arg("show")
        .env("RULES_PATH", &path)
        .assert()
        .success()
        .stdout(predicate::str::contains("CONDITION"));
}

#[test]
fn test_show_missing_file() {
    let temp_dir = TempDir::new().unwrap();
    let mut cmd = Command::cargo_bin("rulesheet").unwrap();
    cmd.args(["show", "--rules"])
        .arg(temp_dir.path().join("nope.xlsx"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Rules file not found"));
}

// ═══════════════════════════════════════════════════════════════════════════
// SAVE
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_save_new_workbook() {
    let temp_dir = TempDir::new().unwrap();
    let table = temp_dir.path().join("table.json");
    fs::write(&table, VALID_TABLE_JSON).unwrap();
    let rules = temp_dir.path().join("new.xlsx");

    let mut cmd = Command::cargo_bin("rulesheet").unwrap();
    cmd.arg("save")
        .arg(&table)
        .arg("--rules")
        .arg(&rules)
        .assert()
        .success()
        .stdout(predicate::str::contains("Rules saved"));
    assert!(rules.exists());

    let mut cmd = Command::cargo_bin("rulesheet").unwrap();
    cmd.args(["show", "--format", "json", "--rules"])
        .arg(&rules)
        .assert()
        .success()
        .stdout(predicate::str::contains("Promotions"))
        .stdout(predicate::str::contains("com.acme.Cart"))
        .stdout(predicate::str::contains("small cart"));
}

#[test]
fn test_save_over_existing_workbook() {
    let temp_dir = TempDir::new().unwrap();
    let rules = write_workbook(&temp_dir, "rules.xlsx", CellValue::number(100));
    let table = temp_dir.path().join("table.json");
    fs::write(&table, VALID_TABLE_JSON).unwrap();

    let mut cmd = Command::cargo_bin("rulesheet").unwrap();
    cmd.arg("save")
        .arg(&table)
        .arg("--rules")
        .arg(&rules)
        .assert()
        .success()
        .stdout(predicate::str::contains("Backup"));

    assert!(temp_dir.path().join("rules.xlsx.bak").exists());

    // Meta in the saved table replaces the RuleSet and Import rows
    let mut cmd = Command::cargo_bin("rulesheet").unwrap();
    cmd.args(["show", "--format", "json", "--rules"])
        .arg(&rules)
        .assert()
        .success()
        .stdout(predicate::str::contains("Promotions"))
        .stdout(predicate::str::contains("com.acme.Cart"))
        .stdout(predicate::str::contains("big cart"));
}

#[test]
fn test_save_without_meta_keeps_rule_set() {
    let temp_dir = TempDir::new().unwrap();
    let rules = write_workbook(&temp_dir, "rules.xlsx", CellValue::number(100));
    let table = temp_dir.path().join("table.json");
    fs::write(
        &table,
        r#"{"headers": ["NAME", "CONDITION", "ACTION"], "rows": [{"name": "solo", "values": [1, 2]}]}"#,
    )
    .unwrap();

    let mut cmd = Command::cargo_bin("rulesheet").unwrap();
    cmd.arg("save")
        .arg(&table)
        .arg("--rules")
        .arg(&rules)
        .arg("--no-backup")
        .assert()
        .success();
    assert!(!temp_dir.path().join("rules.xlsx.bak").exists());

    let mut cmd = Command::cargo_bin("rulesheet").unwrap();
    cmd.args(["show", "--format", "json", "--rules"])
        .arg(&rules)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"ruleSetName\": \"Discounts\""))
        .stdout(predicate::str::contains("solo"));
}

#[test]
fn test_save_bare_table_then_show() {
    let temp_dir = TempDir::new().unwrap();
    let table = temp_dir.path().join("table.json");
    fs::write(&table, r#"{"headers": ["NAME", "CONDITION", "ACTION"]}"#).unwrap();
    let rules = temp_dir.path().join("bare.xlsx");

    let mut cmd = Command::cargo_bin("rulesheet").unwrap();
    cmd.arg("save")
        .arg(&table)
        .arg("--rules")
        .arg(&rules)
        .assert()
        .success();

    let mut cmd = Command::cargo_bin("rulesheet").unwrap();
    cmd.args(["show", "--rules"])
        .arg(&rules)
        .assert()
        .success()
        .stdout(predicate::str::contains("CONDITION"));
}

#[test]
fn test_save_invalid_table_leaves_file_alone() {
    let temp_dir = TempDir::new().unwrap();
    let table = temp_dir.path().join("table.json");
    fs::write(&table, r#"{"headers": ["NAME", "CONDITION"], "rows": []}"#).unwrap();
    let rules = temp_dir.path().join("rules.xlsx");

    let mut cmd = Command::cargo_bin("rulesheet").unwrap();
    cmd.arg("save")
        .arg(&table)
        .arg("--rules")
        .arg(&rules)
        .assert()
        .failure()
        .stdout(predicate::str::contains("At least one ACTION column is required"));
    assert!(!rules.exists());
}

// ═══════════════════════════════════════════════════════════════════════════
// ROUNDTRIP
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_roundtrip_command() {
    let temp_dir = TempDir::new().unwrap();
    let input = write_workbook(&temp_dir, "rules.xlsx", CellValue::number(100));
    let output = temp_dir.path().join("copy.xlsx");

    let mut cmd = Command::cargo_bin("rulesheet").unwrap();
    cmd.arg("roundtrip")
        .arg(&input)
        .arg(&output)
        .assert()
        .success()
        .stdout(predicate::str::contains("Round trip preserved the table"));
    assert!(output.exists());
}
