use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;

#[test]
fn test_help_shows_all_commands() {
    cargo_bin_cmd!("botdesk")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("console"))
        .stdout(predicate::str::contains("price"))
        .stdout(predicate::str::contains("tiers"))
        .stdout(predicate::str::contains("bots"))
        .stdout(predicate::str::contains("config"));
}

#[test]
fn test_bots_help_shows_subcommands() {
    cargo_bin_cmd!("botdesk")
        .args(["bots", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("list"))
        .stdout(predicate::str::contains("token"));
}

#[test]
fn test_token_help_shows_reveal_flag() {
    cargo_bin_cmd!("botdesk")
        .args(["bots", "token", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--reveal"))
        .stdout(predicate::str::contains("--username"));
}

#[test]
fn test_version_flag() {
    cargo_bin_cmd!("botdesk")
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("0.1"));
}
