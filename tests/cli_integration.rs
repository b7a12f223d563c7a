//! Integration tests for the StrongPass CLI.
//!
//! These tests exercise the binary end-to-end using `assert_cmd`.
//! Masked key-by-key entry needs a real terminal, so the strong password
//! is supplied through `STRONGPASS_PASSWORD` or piped stdin, and passwords
//! are shown (`-s`) rather than copied to a clipboard.

use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// Helper: get a Command pointing at the strongpass binary.
fn strongpass() -> Command {
    #[allow(deprecated)]
    Command::cargo_bin("strongpass").expect("binary should exist")
}

/// A temp dir with a config that keeps derivation fast.
fn project() -> TempDir {
    let tmp = TempDir::new().unwrap();
    fs::write(
        tmp.path().join(".strongpass.toml"),
        "derivation_rounds = 8\ndefault_length = 12\n",
    )
    .unwrap();
    tmp
}

/// Run `generate -s` and return stdout.
fn show(tmp: &TempDir, mnemonic: &str, extra: &[&str]) -> String {
    let output = strongpass()
        .args(["generate", mnemonic, "-s"])
        .args(extra)
        .env("STRONGPASS_PASSWORD", "correct horse battery staple")
        .current_dir(tmp.path())
        .output()
        .unwrap();
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    String::from_utf8(output.stdout).unwrap()
}

/// The shown password, with the block separators removed.
fn password_line(stdout: &str) -> String {
    stdout
        .lines()
        .nth(1)
        .expect("password line")
        .trim()
        .replace(' ', "")
}

#[test]
fn help_flag_shows_usage() {
    strongpass()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("derived password"))
        .stdout(predicate::str::contains("generate"))
        .stdout(predicate::str::contains("recipes"))
        .stdout(predicate::str::contains("completions"));
}

#[test]
fn version_flag_shows_version() {
    strongpass()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("strongpass"));
}

#[test]
fn version_command_shows_version() {
    strongpass()
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn no_args_shows_help() {
    strongpass()
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn recipes_lists_presets() {
    strongpass()
        .arg("recipes")
        .assert()
        .success()
        .stdout(predicate::str::contains("all-required"))
        .stdout(predicate::str::contains("alphanumeric-with-spaces"))
        .stdout(predicate::str::contains("pin"));
}

#[test]
fn completions_for_bash() {
    strongpass()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("strongpass"));
}

#[test]
fn completions_for_unknown_shell_fail() {
    strongpass()
        .args(["completions", "csh"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid value 'csh'"));
}

#[test]
fn generate_is_deterministic() {
    let tmp = project();
    let first = show(&tmp, "example.com", &[]);
    let second = show(&tmp, "example.com", &[]);

    assert_eq!(first, second);
    assert!(first.contains("Password for example.com"));
    assert_eq!(password_line(&first).len(), 12);
}

#[test]
fn generate_depends_on_mnemonic() {
    let tmp = project();
    let a = password_line(&show(&tmp, "example.com", &[]));
    let b = password_line(&show(&tmp, "example.org", &[]));
    assert_ne!(a, b);
}

#[test]
fn generate_respects_length_and_recipe() {
    let tmp = project();
    let pin = password_line(&show(&tmp, "bank", &["-l", "6", "--recipe", "pin"]));
    assert_eq!(pin.len(), 6);
    assert!(pin.chars().all(|c| c.is_ascii_digit()));
}

#[test]
fn piped_strong_password_matches_env_var() {
    let tmp = project();
    let from_env = show(&tmp, "example.com", &[]);

    let output = strongpass()
        .args(["generate", "example.com", "-s"])
        .env_remove("STRONGPASS_PASSWORD")
        .current_dir(tmp.path())
        .write_stdin("correct horse battery staple\n")
        .output()
        .unwrap();
    assert!(output.status.success());
    assert_eq!(String::from_utf8(output.stdout).unwrap(), from_env);
}

#[test]
fn empty_piped_strong_password_fails() {
    let tmp = project();
    strongpass()
        .args(["generate", "example.com", "-s"])
        .env_remove("STRONGPASS_PASSWORD")
        .current_dir(tmp.path())
        .write_stdin("\n")
        .assert()
        .failure()
        .stderr(predicate::str::contains("zero"));
}

#[test]
fn zero_length_fails_with_code() {
    let tmp = project();
    strongpass()
        .args(["generate", "example.com", "-s", "-l", "0"])
        .env("STRONGPASS_PASSWORD", "correct horse battery staple")
        .current_dir(tmp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("code 0x09"));
}

#[test]
fn invalid_config_fails() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join(".strongpass.toml"), "derivation_rounds = 0\n").unwrap();

    strongpass()
        .args(["generate", "example.com", "-s"])
        .env("STRONGPASS_PASSWORD", "correct horse battery staple")
        .current_dir(tmp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Config file error"));
}

#[test]
fn config_dir_flag_is_honored() {
    let tmp = project();
    let elsewhere = TempDir::new().unwrap();

    let output = strongpass()
        .args(["generate", "example.com", "-s", "--config-dir"])
        .arg(tmp.path())
        .env("STRONGPASS_PASSWORD", "correct horse battery staple")
        .current_dir(elsewhere.path())
        .output()
        .unwrap();
    assert!(output.status.success());
    assert_eq!(String::from_utf8(output.stdout).unwrap(), show(&tmp, "example.com", &[]));
}
