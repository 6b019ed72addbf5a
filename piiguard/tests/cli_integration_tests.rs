// piiguard/tests/cli_integration_tests.rs
//! Command-line integration tests for the `piiguard` binary.
//!
//! `assert_cmd` runs the built binary with input on stdin; `tempfile` provides
//! throwaway input and configuration files. `PIIGUARD_CONFIG` is cleared so a
//! developer's own configuration cannot leak into the results.

use anyhow::Result;
use assert_cmd::Command;
use predicates::prelude::*;
use std::io::Write;
use tempfile::NamedTempFile;

fn piiguard() -> Command {
    let mut cmd = Command::cargo_bin("piiguard").unwrap();
    cmd.env_remove("PIIGUARD_CONFIG");
    cmd.env("RUST_LOG", "debug");
    cmd
}

fn scan(input: &str, args: &[&str]) -> assert_cmd::assert::Assert {
    piiguard().arg("scan").args(args).write_stdin(input).assert()
}

#[test]
fn scan_reports_pan_from_stdin() {
    scan("My PAN is ABCDE1234F", &[])
        .success()
        .stdout(predicate::str::contains(r#""entity_type":"IN_PAN""#))
        .stdout(predicate::str::contains(r#""start":10,"end":20"#))
        .stdout(predicate::str::contains(r#""recognizer":"in_pan_recognizer""#));
}

#[test]
fn scan_honours_entity_filter() {
    scan("Contact: test@example.com or 555-1234", &["--entities", "EMAIL_ADDRESS"])
        .success()
        .stdout(predicate::str::contains("EMAIL_ADDRESS"))
        .stdout(predicate::str::contains("PHONE_NUMBER").not());
}

#[test]
fn scan_empty_input_prints_empty_array() {
    scan("", &[]).success().stdout("[]\n");
}

#[test]
fn scan_unsupported_language_exits_with_code_2() {
    scan("Mon PAN est ABCDE1234F", &["--language", "fr"])
        .code(2)
        .stderr(predicate::str::contains("'fr' is not supported"));
}

#[test]
fn scan_entity_toggle_disables_default_type() {
    piiguard()
        .arg("scan")
        .env("PIIGUARD_ENTITY_PHONE_NUMBER", "false")
        .write_stdin("Contact: test@example.com or 555-1234")
        .assert()
        .success()
        .stdout(predicate::str::contains("EMAIL_ADDRESS"))
        .stdout(predicate::str::contains("PHONE_NUMBER").not());
}

#[test]
fn scan_reads_input_file_and_custom_recognizer() -> Result<()> {
    let mut config = NamedTempFile::new()?;
    config.write_all(
        br#"
recognizers:
  - name: employee_id
    entity_type: EMPLOYEE_ID
    patterns:
      - name: emp_pattern
        regex: '\bEMP-[0-9]{6}\b'
        score: 0.5
    context: [employee]
default_entities: [EMPLOYEE_ID, IN_PAN]
"#,
    )?;
    let mut input = NamedTempFile::new()?;
    input.write_all(b"employee EMP-123456 has PAN ABCDE1234F and mail a@b.io")?;

    piiguard()
        .arg("scan")
        .arg("--config")
        .arg(config.path())
        .arg("-i")
        .arg(input.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("EMPLOYEE_ID"))
        .stdout(predicate::str::contains("IN_PAN"))
        .stdout(predicate::str::contains("EMAIL_ADDRESS").not());
    Ok(())
}

#[test]
fn invalid_config_fails_before_scanning() -> Result<()> {
    let mut config = NamedTempFile::new()?;
    config.write_all(
        br#"
recognizers:
  - name: broken
    entity_type: BROKEN
    patterns:
      - name: broken_pattern
        regex: '(unclosed'
        score: 0.5
"#,
    )?;
    piiguard()
        .arg("scan")
        .arg("--config")
        .arg(config.path())
        .write_stdin("anything")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("invalid regex"));
    Ok(())
}

#[test]
fn recognizers_lists_builtin_recognizers() {
    piiguard()
        .args(["recognizers", "--json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("in_gstin_recognizer"))
        .stdout(predicate::str::contains(r#""kind": "pattern""#));
}

#[test]
fn recognizers_disable_removes_recognizer() {
    piiguard()
        .args(["recognizers", "--disable", "phone_recognizer"])
        .assert()
        .success()
        .stdout(predicate::str::contains("email_recognizer"))
        .stdout(predicate::str::contains("phone_recognizer").not());
}
