//! Integration tests for the `deuglify` binary.

use std::io::Write;
use std::process::{Command, Output, Stdio};

fn cargo_bin() -> Command {
    let mut cmd = Command::new(env!("CARGO"));
    cmd.args(["run", "-q", "-p", "deuglify-cli", "--bin", "deuglify", "--"]);
    cmd.env_remove("RUST_LOG");
    cmd
}

fn run_on_file(source: &str, args: &[&str]) -> Output {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("input.js");
    std::fs::write(&path, source).expect("Failed to write input");
    cargo_bin()
        .args(args)
        .arg(&path)
        .output()
        .expect("Failed to run deuglify")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

#[test]
fn test_file_input() {
    let output = run_on_file("var a=1,b=2;a&&b()", &[]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(
        stdout(&output),
        "var a__q = 1;\nvar b__w = 2;\nif (a__q) {\n  b__w();\n}\n"
    );
}

#[test]
fn test_stdin_input() {
    let mut child = cargo_bin()
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to spawn deuglify");
    child
        .stdin
        .take()
        .expect("stdin is piped")
        .write_all(b"x?f():g()")
        .expect("Failed to write stdin");
    let output = child.wait_with_output().expect("Failed to wait");

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(stdout(&output), "if (x) {\n  f();\n} else {\n  g();\n}\n");
}

#[test]
fn test_missing_file_fails_without_output() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("missing.js");
    let output = cargo_bin()
        .arg(&path)
        .output()
        .expect("Failed to run deuglify");

    assert!(!output.status.success());
    assert!(stdout(&output).is_empty());
    assert!(stderr(&output).contains("missing.js"));
}

#[test]
fn test_parse_error_reports_location() {
    let output = run_on_file("var a;\nvar = 1;", &[]);
    assert!(!output.status.success());
    assert!(stdout(&output).is_empty());
    assert!(stderr(&output).contains("(2:5)"), "stderr: {}", stderr(&output));
}

#[test]
fn test_pass_flags() {
    let output = run_on_file("var a=1,b=2;", &["--no-mangle"]);
    assert_eq!(stdout(&output), "var a = 1;\nvar b = 2;\n");

    let output = run_on_file("var a=1,b=2;", &["--no-expand"]);
    assert_eq!(stdout(&output), "var a__q = 1, b__w = 2;\n");
}

#[test]
fn test_indent_and_module() {
    let output = run_on_file(
        "import{a}from'm';if(a)a()",
        &["--module", "--indent", "4", "--no-mangle"],
    );
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(
        stdout(&output),
        "import { a } from \"m\";\nif (a) {\n    a();\n}\n"
    );
}

#[test]
fn test_with_statement_warns_on_stderr() {
    let output = run_on_file("var a;with(o)a", &[]);
    assert!(output.status.success());
    assert_eq!(stdout(&output), "var a;\nwith (o) a;\n");
    assert!(stderr(&output).contains("with statement detected, variable renaming disabled"));
}

#[test]
fn test_json_logs_stay_on_stderr() {
    let output = run_on_file("eval(a)", &["--log-json"]);
    assert!(output.status.success());
    assert_eq!(stdout(&output), "eval(a);\n");
    let line = stderr(&output)
        .lines()
        .find(|line| line.contains("direct eval call detected"))
        .map(str::to_string)
        .expect("warning should be logged");
    assert!(line.trim_start().starts_with('{'));
    assert!(line.contains("\"level\":\"WARN\""));
}

#[test]
fn test_version() {
    let output = cargo_bin()
        .arg("--version")
        .output()
        .expect("Failed to run deuglify");
    assert!(output.status.success());
    assert!(stdout(&output).contains(env!("CARGO_PKG_VERSION")));
}
