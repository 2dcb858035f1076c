//! Integration tests for the casetree CLI
//!
//! These tests run the actual CLI binary against a throwaway store file.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Get the binary to test, pointed at `store`
fn casetree_cmd(store: &Path) -> Command {
    let mut cmd = Command::cargo_bin("casetree").unwrap();
    cmd.env_remove("CASETREE_DATA")
        .env_remove("CASETREE_LOG")
        .arg("--data")
        .arg(store);
    cmd
}

fn read_store(store: &Path) -> serde_json::Value {
    let raw = fs::read_to_string(store).unwrap();
    let object: serde_json::Value = serde_json::from_str(&raw).unwrap();
    let cases = object["family-case-tree-cases"].as_str().unwrap();
    serde_json::from_str(cases).unwrap()
}

#[test]
fn test_help_flag() {
    Command::cargo_bin("casetree")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("flow tree"));
}

// ============================================================================
// Stages
// ============================================================================

#[test]
fn test_stages_lists_flow_with_indentation() {
    let temp_dir = TempDir::new().unwrap();
    casetree_cmd(&temp_dir.path().join("store.json"))
        .arg("stages")
        .assert()
        .success()
        .stdout(predicate::str::contains("Arrested / Booked"))
        .stdout(predicate::str::contains("— — — Sentenced to State DOC"))
        .stdout(predicate::str::contains("state_sentence"));
}

#[test]
fn test_stages_check() {
    let temp_dir = TempDir::new().unwrap();
    casetree_cmd(&temp_dir.path().join("store.json"))
        .args(["stages", "--check"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Flow is valid (9 stages)"));
}

// ============================================================================
// Case CRUD
// ============================================================================

#[test]
fn test_first_run_seeds_sample_case() {
    let temp_dir = TempDir::new().unwrap();
    let store = temp_dir.path().join("store.json");

    casetree_cmd(&store)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("Sample Inmate"))
        .stdout(predicate::str::contains("Bergen County Jail"));

    assert_eq!(read_store(&store).as_array().unwrap().len(), 1);
}

#[test]
fn test_no_seed_starts_empty() {
    let temp_dir = TempDir::new().unwrap();
    casetree_cmd(&temp_dir.path().join("store.json"))
        .args(["--no-seed", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No cases."));
}

#[test]
fn test_add_update_delete() {
    let temp_dir = TempDir::new().unwrap();
    let store = temp_dir.path().join("store.json");

    casetree_cmd(&store)
        .args([
            "--no-seed",
            "add",
            "--name",
            "Jane Roe",
            "--custody",
            "state",
            "--stage",
            "plea",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created case #0: Jane Roe"));

    let cases = read_store(&store);
    assert_eq!(cases[0]["fullName"], "Jane Roe");
    assert_eq!(cases[0]["custodyType"], "state");
    assert_eq!(cases[0]["currentStage"], "plea");

    casetree_cmd(&store)
        .args(["--no-seed", "update", "0", "--stage", "state_sentence"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Updated case #0"));

    let cases = read_store(&store);
    assert_eq!(cases.as_array().unwrap().len(), 1);
    assert_eq!(cases[0]["fullName"], "Jane Roe");
    assert_eq!(cases[0]["currentStage"], "state_sentence");

    casetree_cmd(&store)
        .args(["--no-seed", "delete", "0"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Deleted case #0"));

    assert!(read_store(&store).as_array().unwrap().is_empty());
}

#[test]
fn test_add_without_name_fails() {
    let temp_dir = TempDir::new().unwrap();
    let store = temp_dir.path().join("store.json");

    casetree_cmd(&store)
        .args(["--no-seed", "add", "--name", "   "])
        .assert()
        .failure()
        .stderr(predicate::str::contains("CASE-010"))
        .stderr(predicate::str::contains("Fix:"));

    // Nothing was written
    assert!(!store.exists());
}

#[test]
fn test_bad_custody_fails() {
    let temp_dir = TempDir::new().unwrap();
    casetree_cmd(&temp_dir.path().join("store.json"))
        .args(["add", "--name", "John Doe", "--custody", "military"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("CASE-011"));
}

#[test]
fn test_update_out_of_range_appends() {
    let temp_dir = TempDir::new().unwrap();
    let store = temp_dir.path().join("store.json");

    casetree_cmd(&store)
        .args(["update", "-1", "--name", "John Doe"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created case #1: John Doe"));

    let cases = read_store(&store);
    assert_eq!(cases.as_array().unwrap().len(), 2);
    assert_eq!(cases[1]["currentStage"], "arrested");
}

#[test]
fn test_delete_out_of_range_is_noop() {
    let temp_dir = TempDir::new().unwrap();
    let store = temp_dir.path().join("store.json");

    casetree_cmd(&store)
        .args(["delete", "5"])
        .assert()
        .success()
        .stdout(predicate::str::contains("nothing deleted"));

    assert_eq!(read_store(&store).as_array().unwrap().len(), 1);
}

#[test]
fn test_show_renders_case_tree() {
    let temp_dir = TempDir::new().unwrap();
    casetree_cmd(&temp_dir.path().join("store.json"))
        .args(["show", "0"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Sample Inmate • Bergen County Jail • Next court: 2025-12-01",
        ))
        .stdout(predicate::str::contains("Path: Arrested / Booked > Arraignment / First Appearance"))
        .stdout(predicate::str::contains("● Arraignment / First Appearance"));
}

#[test]
fn test_show_missing_case() {
    let temp_dir = TempDir::new().unwrap();
    casetree_cmd(&temp_dir.path().join("store.json"))
        .args(["show", "9"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No case loaded."));
}

#[test]
fn test_corrupt_case_list_loads_as_empty() {
    let temp_dir = TempDir::new().unwrap();
    let store = temp_dir.path().join("store.json");
    fs::write(&store, r#"{"family-case-tree-cases": "[{broken"}"#).unwrap();

    casetree_cmd(&store)
        .args(["--no-seed", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No cases."));
}

// ============================================================================
// Tree rendering
// ============================================================================

#[test]
fn test_tree_marks_requested_stage() {
    let temp_dir = TempDir::new().unwrap();
    casetree_cmd(&temp_dir.path().join("store.json"))
        .args(["tree", "--stage", "trial", "--compact"])
        .assert()
        .success()
        .stdout(predicate::str::contains("● Trial · trial"))
        .stdout(predicate::str::contains("○ Plea Deal · plea"));
}

#[test]
fn test_tree_does_not_write_store() {
    let temp_dir = TempDir::new().unwrap();
    let store = temp_dir.path().join("store.json");

    casetree_cmd(&store)
        .args(["tree", "--stage", "trial"])
        .assert()
        .success()
        .stdout(predicate::str::contains("● Trial · trial"));

    assert!(!store.exists());
}

#[test]
fn test_list_keeps_records_with_loose_values() {
    let temp_dir = TempDir::new().unwrap();
    let store = temp_dir.path().join("store.json");
    let cases = r#"[{"fullName":"Alice","custodyType":"county"},{"fullName":"Bob","custodyType":"County"}]"#;
    let object = serde_json::json!({ "family-case-tree-cases": cases });
    fs::write(&store, object.to_string()).unwrap();

    casetree_cmd(&store)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("Alice"))
        .stdout(predicate::str::contains("Bob"))
        .stdout(predicate::str::contains("Sample Inmate").not());

    // Opening did not rewrite the list
    let object: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&store).unwrap()).unwrap();
    assert_eq!(object["family-case-tree-cases"], cases);
}

#[test]
fn test_tree_unknown_stage_marks_nothing() {
    let temp_dir = TempDir::new().unwrap();
    casetree_cmd(&temp_dir.path().join("store.json"))
        .args(["tree", "--stage", "nonexistent", "--standard"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Stage ID: arrested"))
        .stdout(predicate::str::contains("●").not());
}

#[test]
fn test_tree_html_fits_width() {
    let temp_dir = TempDir::new().unwrap();
    casetree_cmd(&temp_dir.path().join("store.json"))
        .args([
            "tree", "--stage", "plea", "--format", "html", "--width", "30", "--standard",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("<!DOCTYPE html>"))
        .stdout(predicate::str::contains("tree-node tree-node--active"))
        .stdout(predicate::str::contains("transform: scale(0.65)"));
}

#[test]
fn test_compact_preference_persists() {
    let temp_dir = TempDir::new().unwrap();
    let store = temp_dir.path().join("store.json");

    casetree_cmd(&store)
        .args(["compact", "off"])
        .assert()
        .success()
        .stdout(predicate::str::contains("standard"));

    let raw = fs::read_to_string(&store).unwrap();
    let object: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(object["family-case-tree-compact"], "0");

    // Standard layout puts stage ids on their own line
    casetree_cmd(&store)
        .args(["tree", "--stage", "trial"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Stage ID: trial"));
}
