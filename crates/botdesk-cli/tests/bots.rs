use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::json;
use tempfile::tempdir;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn mount_login(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .and(body_json(json!({ "username": "ops", "password": "secret" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "user": { "id": 1, "username": "ops" }
        })))
        .expect(1)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_bots_list_signs_in_and_prints_bots() {
    let server = MockServer::start().await;
    mount_login(&server).await;
    Mock::given(method("GET"))
        .and(path("/api/my-bots"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "bots": [
                { "id": "bot_1", "name": "Alpha", "status": "online" },
                { "id": 2, "name": "Beta" }
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;
    let dir = tempdir().unwrap();

    cargo_bin_cmd!("botdesk")
        .env("BOTDESK_HOME", dir.path())
        .env_remove("BOTDESK_USERNAME")
        .env_remove("BOTDESK_PASSWORD")
        .args(["--api-url", &server.uri()])
        .args(["bots", "list", "--username", "ops", "--password", "secret"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Alpha  bot_1  online"))
        .stdout(predicate::str::contains("Beta  2  offline"));
}

#[tokio::test]
async fn test_bots_list_empty() {
    let server = MockServer::start().await;
    mount_login(&server).await;
    Mock::given(method("GET"))
        .and(path("/api/my-bots"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "bots": [] })))
        .mount(&server)
        .await;
    let dir = tempdir().unwrap();

    cargo_bin_cmd!("botdesk")
        .env("BOTDESK_HOME", dir.path())
        .env("BOTDESK_API_URL", server.uri())
        .env("BOTDESK_USERNAME", "ops")
        .env("BOTDESK_PASSWORD", "secret")
        .args(["bots", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No bots found."));
}

#[tokio::test]
async fn test_bots_list_without_credentials_reports_not_signed_in() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/my-bots"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({ "error": "Not authenticated" })),
        )
        .mount(&server)
        .await;
    let dir = tempdir().unwrap();

    cargo_bin_cmd!("botdesk")
        .env("BOTDESK_HOME", dir.path())
        .env_remove("BOTDESK_USERNAME")
        .env_remove("BOTDESK_PASSWORD")
        .args(["--api-url", &server.uri(), "bots", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not signed in"));
}

#[test]
fn test_bots_list_requires_both_credentials() {
    let dir = tempdir().unwrap();

    cargo_bin_cmd!("botdesk")
        .env("BOTDESK_HOME", dir.path())
        .env_remove("BOTDESK_PASSWORD")
        .args(["bots", "list", "--username", "ops"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Pass both --username and --password"));
}

#[tokio::test]
async fn test_bots_token_is_masked_unless_revealed() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "user": { "id": 1, "username": "ops" }
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/my-bots/bot_1/token"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "token": "abcd1234efgh5678" })),
        )
        .mount(&server)
        .await;
    let dir = tempdir().unwrap();

    cargo_bin_cmd!("botdesk")
        .env("BOTDESK_HOME", dir.path())
        .env("BOTDESK_USERNAME", "ops")
        .env("BOTDESK_PASSWORD", "secret")
        .args(["--api-url", &server.uri(), "bots", "token", "bot_1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("abcd"))
        .stdout(predicate::str::contains("5678"))
        .stdout(predicate::str::contains("1234efgh").not());

    cargo_bin_cmd!("botdesk")
        .env("BOTDESK_HOME", dir.path())
        .env("BOTDESK_USERNAME", "ops")
        .env("BOTDESK_PASSWORD", "secret")
        .args(["--api-url", &server.uri(), "bots", "token", "bot_1", "--reveal"])
        .assert()
        .success()
        .stdout(predicate::str::contains("abcd1234efgh5678"));
}
