use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;

#[test]
fn test_help_shows_all_commands() {
    cargo_bin_cmd!("graphping")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("check"))
        .stdout(predicate::str::contains("config"));
}

#[test]
fn test_help_shows_connection_overrides() {
    cargo_bin_cmd!("graphping")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--endpoint"))
        .stdout(predicate::str::contains("--query"));
}

#[test]
fn test_config_help_shows_subcommands() {
    cargo_bin_cmd!("graphping")
        .args(["config", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("path"))
        .stdout(predicate::str::contains("init"));
}

#[test]
fn test_version_flag() {
    cargo_bin_cmd!("graphping")
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("graphping"));
}
