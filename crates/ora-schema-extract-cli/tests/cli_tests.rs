//! CLI integration tests for ora-schema-extract.
//!
//! These tests verify argument parsing, help output, exit codes and the
//! offline script generation modes, which need no database.

use assert_cmd::Command;
use predicates::prelude::*;

/// Get a command for the ora-schema-extract binary.
fn cmd() -> Command {
    Command::cargo_bin("ora-schema-extract").unwrap()
}

// =============================================================================
// Help and Version Tests
// =============================================================================

#[test]
fn test_help_shows_all_commands() {
    cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("run"))
        .stdout(predicate::str::contains("sqlplus-script"))
        .stdout(predicate::str::contains("plsql-script"))
        .stdout(predicate::str::contains("health-check"));
}

#[test]
fn test_run_subcommand_help() {
    cmd()
        .args(["run", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--schemas"))
        .stdout(predicate::str::contains("--output"))
        .stdout(predicate::str::contains("--service"))
        .stdout(predicate::str::contains("--sid"));
}

#[test]
fn test_version_flag() {
    cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("ora-schema-extract"));
}

// =============================================================================
// Exit Code Tests
// =============================================================================

#[test]
fn test_run_without_connection_params_fails() {
    cmd()
        .args(["run", "--schemas", "HR", "--output", "/tmp/out"])
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("--host is required"));
}

#[test]
fn test_run_without_service_or_sid_fails() {
    cmd()
        .args([
            "run",
            "--host",
            "db.example.com",
            "--user",
            "scott",
            "--password",
            "tiger",
            "--schemas",
            "HR",
        ])
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("--service or --sid"));
}

#[test]
fn test_sqlplus_script_requires_schemas() {
    cmd()
        .args(["sqlplus-script", "--output", "/tmp/out"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--schemas"));
}

// =============================================================================
// Script Generation Tests (no database required)
// =============================================================================

#[test]
fn test_sqlplus_script_generation() {
    let dir = tempfile::tempdir().unwrap();
    cmd()
        .args(["sqlplus-script", "--schemas", "HR,FINANCE"])
        .args(["--output", dir.path().to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("SQL*Plus script generated"));

    let script = std::fs::read_to_string(dir.path().join("extract_ddl.sql")).unwrap();
    assert!(script.contains("DBMS_METADATA.SET_TRANSFORM_PARAM"));
    assert!(script.contains("owner = 'HR'"));
    assert!(script.contains("owner = 'FINANCE'"));
}

#[test]
fn test_plsql_script_generation() {
    let dir = tempfile::tempdir().unwrap();
    cmd()
        .args(["plsql-script", "--schemas", "HR"])
        .args(["--output", dir.path().to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("PL/SQL script generated"));

    let script = std::fs::read_to_string(dir.path().join("extract_ddl_plsql.sql")).unwrap();
    assert!(script.contains("UTL_FILE"));
    assert!(script.contains("GET_DDL('PACKAGE_BODY'"));
}
