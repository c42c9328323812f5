use std::fs;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use tempfile::tempdir;

#[test]
fn test_config_path_command() {
    let dir = tempdir().unwrap();

    cargo_bin_cmd!("botdesk")
        .env("BOTDESK_HOME", dir.path())
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.toml"));
}

#[test]
fn test_config_init_creates_file() {
    let dir = tempdir().unwrap();
    let config_path = dir.path().join("config.toml");

    assert!(!config_path.exists());

    cargo_bin_cmd!("botdesk")
        .env("BOTDESK_HOME", dir.path())
        .args(["config", "init"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created config at"));

    let contents = fs::read_to_string(&config_path).unwrap();
    assert!(contents.contains("api_base_url ="));
    assert!(contents.contains("payment_window_secs = 900"));
    assert!(contents.contains("# log_filter ="));
}

#[test]
fn test_config_init_fails_if_exists() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("config.toml"), "# existing config").unwrap();

    cargo_bin_cmd!("botdesk")
        .env("BOTDESK_HOME", dir.path())
        .args(["config", "init"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn test_config_path_works_with_broken_config() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("config.toml"), "api_base_url = [").unwrap();

    cargo_bin_cmd!("botdesk")
        .env("BOTDESK_HOME", dir.path())
        .args(["config", "path"])
        .assert()
        .success();

    cargo_bin_cmd!("botdesk")
        .env("BOTDESK_HOME", dir.path())
        .args(["price", "7"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("load config"));
}

#[test]
fn test_invalid_log_filter_is_reported() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("config.toml"), "log_filter = \"botdesk=loud\"\n").unwrap();

    cargo_bin_cmd!("botdesk")
        .env("BOTDESK_HOME", dir.path())
        .env_remove("BOTDESK_LOG")
        .args(["price", "15"])
        .assert()
        .success()
        .stdout(predicate::str::contains("90.000đ"))
        .stderr(predicate::str::contains("invalid log_filter"))
        .stderr(predicate::str::contains("botdesk=loud"));
}
