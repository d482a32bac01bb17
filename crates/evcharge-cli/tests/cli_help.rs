use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;

#[test]
fn test_help_shows_all_commands() {
    cargo_bin_cmd!("evcharge")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("login"))
        .stdout(predicate::str::contains("register"))
        .stdout(predicate::str::contains("stations"))
        .stdout(predicate::str::contains("book"))
        .stdout(predicate::str::contains("companies"))
        .stdout(predicate::str::contains("admin"));
}

#[test]
fn test_stations_help_shows_subcommands() {
    cargo_bin_cmd!("evcharge")
        .args(["stations", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("list"))
        .stdout(predicate::str::contains("show"))
        .stdout(predicate::str::contains("nearby"));
}

#[test]
fn test_stations_list_help_shows_filters() {
    cargo_bin_cmd!("evcharge")
        .args(["stations", "list", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--search"))
        .stdout(predicate::str::contains("--status"))
        .stdout(predicate::str::contains("--min-slots"));
}

#[test]
fn test_companies_help_shows_subcommands() {
    cargo_bin_cmd!("evcharge")
        .args(["companies", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("list"))
        .stdout(predicate::str::contains("stats"))
        .stdout(predicate::str::contains("countries"))
        .stdout(predicate::str::contains("search"));
}

#[test]
fn test_admin_help_shows_subcommands() {
    cargo_bin_cmd!("evcharge")
        .args(["admin", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("stats"))
        .stdout(predicate::str::contains("payments"))
        .stdout(predicate::str::contains("users"))
        .stdout(predicate::str::contains("add-station"));
}

#[test]
fn test_version_flag() {
    cargo_bin_cmd!("evcharge")
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("1.0"));
}
