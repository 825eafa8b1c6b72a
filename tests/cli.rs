mod common;

use common::TempScript;
use std::process::Command;

fn get_hindime_binary() -> Command {
    Command::new(env!("CARGO_BIN_EXE_hindime"))
}

#[test]
fn test_version_flag() {
    let output = get_hindime_binary()
        .arg("--version")
        .output()
        .expect("Failed to execute hindime");

    assert!(output.status.success(), "Version flag should succeed");
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("hindime"));
    assert!(stdout.contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_no_file_prints_help() {
    let output = get_hindime_binary()
        .output()
        .expect("Failed to execute hindime");

    assert_eq!(output.status.code(), Some(2));
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("Usage"));
}

#[test]
fn test_runs_a_script_file() {
    let script = TempScript::new(
        "cli_hello",
        "sandesh hai \"namaste duniya\"\nbolo sandesh\n",
    )
    .unwrap();

    let output = get_hindime_binary()
        .arg(script.raw_path())
        .output()
        .expect("Failed to execute hindime");

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert_eq!(stdout.trim(), "namaste duniya");
}

#[test]
fn test_rejects_wrong_extension() {
    let dir = std::env::temp_dir().join("hindime_test_wrong_ext.txt");
    std::fs::write(&dir, "bolo 1\n").unwrap();

    let output = get_hindime_binary()
        .arg(&dir)
        .output()
        .expect("Failed to execute hindime");
    let _ = std::fs::remove_file(&dir);

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains(".hindi"));
}

#[test]
fn test_missing_file_fails() {
    let output = get_hindime_binary()
        .arg("/nahi/hai/yahan.hindi")
        .output()
        .expect("Failed to execute hindime");

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("Failed to read"));
}

#[test]
fn test_script_error_renders_a_diagnostic() {
    let script = TempScript::new("cli_err", "x hai 1\nbolo gayab\n").unwrap();

    let output = get_hindime_binary()
        .arg(script.raw_path())
        .arg("--color")
        .arg("never")
        .output()
        .expect("Failed to execute hindime");

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("error[E0201]"));
    assert!(stderr.contains("bolo gayab"));
}

#[test]
fn test_verbose_logs_to_stderr() {
    let script = TempScript::new("cli_verbose", "bolo 1\n").unwrap();

    let output = get_hindime_binary()
        .arg(script.raw_path())
        .arg("--verbose")
        .output()
        .expect("Failed to execute hindime");

    assert!(output.status.success());
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("[hindime:debug]"));
}

#[test]
fn test_shell_completions() {
    let output = get_hindime_binary()
        .arg("complete")
        .arg("bash")
        .output()
        .expect("Failed to execute hindime");

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("hindime"));
}
