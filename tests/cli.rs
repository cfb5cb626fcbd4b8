use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn help_lists_commands() {
    Command::cargo_bin("shiire")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("report"))
        .stdout(predicate::str::contains("analyze"))
        .stdout(predicate::str::contains("inspect"));
}

#[test]
fn report_with_missing_input_fails_with_named_path() {
    Command::cargo_bin("shiire")
        .unwrap()
        .args(["report", "--data", "no_such_export.xlsx"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error:"))
        .stderr(predicate::str::contains("no_such_export.xlsx"));
}

#[test]
fn filtered_report_requires_shaping_list() {
    Command::cargo_bin("shiire")
        .unwrap()
        .args(["report", "--data", "whatever.xlsx", "--filtered"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--shaping"));
}

#[test]
fn analyze_with_missing_input_fails() {
    Command::cargo_bin("shiire")
        .unwrap()
        .args(["analyze", "--data", "no_such_export.xls", "--file-no", "F1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error:"));
}
