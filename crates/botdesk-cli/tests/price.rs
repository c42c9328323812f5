use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use tempfile::tempdir;

#[test]
fn test_price_for_fifteen_days() {
    let dir = tempdir().unwrap();

    cargo_bin_cmd!("botdesk")
        .env("BOTDESK_HOME", dir.path())
        .args(["price", "15"])
        .assert()
        .success()
        .stdout(predicate::str::contains("15 days"))
        .stdout(predicate::str::contains("90.000đ"))
        .stdout(predicate::str::contains("6.000đ/day"));
}

#[test]
fn test_price_rejects_non_numeric_days() {
    let dir = tempdir().unwrap();

    cargo_bin_cmd!("botdesk")
        .env("BOTDESK_HOME", dir.path())
        .args(["price", "abc"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("valid number of days"));
}

#[test]
fn test_price_rejects_zero_days() {
    let dir = tempdir().unwrap();

    cargo_bin_cmd!("botdesk")
        .env("BOTDESK_HOME", dir.path())
        .args(["price", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("valid number of days"));
}

#[test]
fn test_tiers_lists_presets() {
    let dir = tempdir().unwrap();

    cargo_bin_cmd!("botdesk")
        .env("BOTDESK_HOME", dir.path())
        .arg("tiers")
        .assert()
        .success()
        .stdout(predicate::str::contains("7 days"))
        .stdout(predicate::str::contains("30 days"))
        .stdout(predicate::str::contains("90 days"));
}
