//! HTTP client for the bot manager web server.
//!
//! All calls are JSON request/response. A failed call never produces partial
//! data; callers keep whatever they had before.

use std::fmt;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Value, json};
use url::Url;

use crate::config::Config;
use crate::transcript::{ConversationTarget, TargetKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiErrorKind {
    /// Non-2xx response.
    Http(u16),
    /// Connection failure or timeout.
    Network,
    /// Response body was not the expected JSON.
    Decode,
}

impl fmt::Display for ApiErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiErrorKind::Http(status) => write!(f, "http_{status}"),
            ApiErrorKind::Network => write!(f, "network"),
            ApiErrorKind::Decode => write!(f, "decode"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    pub kind: ApiErrorKind,
    /// One-line summary suitable for display.
    pub message: String,
}

impl ApiError {
    pub fn new(kind: ApiErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Builds an HTTP status error, preferring the server's `{error}` text.
    pub fn http_status(status: u16, body: &str) -> Self {
        let server_message = serde_json::from_str::<Value>(body)
            .ok()
            .and_then(|json| json.get("error")?.as_str().map(str::to_string));
        let message = match server_message {
            Some(msg) => msg,
            None => format!("HTTP {status}"),
        };
        Self::new(ApiErrorKind::Http(status), message)
    }

    fn network(err: &reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::new(ApiErrorKind::Network, "Request timed out")
        } else {
            Self::new(
                ApiErrorKind::Network,
                format!("Cannot reach the server: {err}"),
            )
        }
    }

    fn decode(err: &serde_json::Error) -> Self {
        Self::new(ApiErrorKind::Decode, format!("Unexpected response: {err}"))
    }

    pub fn is_unauthorized(&self) -> bool {
        self.kind == ApiErrorKind::Http(401)
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ApiError {}

pub type ApiResult<T> = std::result::Result<T, ApiError>;

/// Ids come back as strings or numbers depending on the backend store.
fn id_string<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected string or number id, got {other}"
        ))),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BotStatus {
    Online,
    #[default]
    Offline,
}

impl BotStatus {
    pub fn label(self) -> &'static str {
        match self {
            BotStatus::Online => "online",
            BotStatus::Offline => "offline",
        }
    }
}

impl<'de> Deserialize<'de> for BotStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(match raw.as_deref() {
            Some("online" | "running" | "active") => BotStatus::Online,
            _ => BotStatus::Offline,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Bot {
    #[serde(deserialize_with = "id_string")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub status: BotStatus,
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Group {
    #[serde(deserialize_with = "id_string")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub members: u32,
    #[serde(default)]
    pub online: u32,
}

impl Group {
    pub fn target(&self) -> ConversationTarget {
        ConversationTarget::new(self.id.clone(), TargetKind::Group, self.name.clone())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Presence {
    Online,
    Away,
    #[default]
    Offline,
}

impl Presence {
    pub fn label(self) -> &'static str {
        match self {
            Presence::Online => "Online",
            Presence::Away => "Away",
            Presence::Offline => "Offline",
        }
    }
}

impl<'de> Deserialize<'de> for Presence {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(match raw.map(|s| s.to_ascii_lowercase()).as_deref() {
            Some("online") => Presence::Online,
            Some("away") => Presence::Away,
            _ => Presence::Offline,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Friend {
    #[serde(deserialize_with = "id_string")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub status: Presence,
}

impl Friend {
    pub fn target(&self) -> ConversationTarget {
        ConversationTarget::new(self.id.clone(), TargetKind::Friend, self.name.clone())
    }
}

/// Groups and friends seen by one bot. Either half may be absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct BotData {
    #[serde(default)]
    pub groups: Option<Vec<Group>>,
    #[serde(default)]
    pub friends: Option<Vec<Friend>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct User {
    #[serde(deserialize_with = "id_string")]
    pub id: String,
    pub username: String,
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CreatedBot {
    #[serde(deserialize_with = "id_string")]
    pub bot_id: String,
    pub token: String,
}

#[derive(Deserialize)]
struct MeResponse {
    #[serde(default)]
    user: Option<User>,
}

#[derive(Deserialize)]
struct LoginResponse {
    user: User,
}

#[derive(Deserialize)]
struct BotsResponse {
    #[serde(default)]
    bots: Vec<Bot>,
}

#[derive(Deserialize)]
struct BotDataResponse {
    #[serde(default)]
    data: Option<BotData>,
}

#[derive(Deserialize)]
struct TokenResponse {
    token: String,
}

/// Client for the bot manager REST API. Keeps the session cookie set at login.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base: Url,
}

impl ApiClient {
    /// # Errors
    /// Returns an error if the base URL is invalid or the HTTP client cannot be built.
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self> {
        let base = Url::parse(base_url)
            .with_context(|| format!("Invalid API base URL '{base_url}'"))?;
        if base.cannot_be_a_base() {
            anyhow::bail!("API base URL '{base_url}' cannot carry a path");
        }

        let mut builder = reqwest::Client::builder().cookie_store(true);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().context("Failed to build HTTP client")?;

        Ok(Self { http, base })
    }

    /// # Errors
    /// See [`ApiClient::new`].
    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(&config.api_base_url, config.request_timeout())
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    async fn send<T: DeserializeOwned>(&self, request: reqwest::RequestBuilder) -> ApiResult<T> {
        let response = request.send().await.map_err(|e| ApiError::network(&e))?;
        let status = response.status();
        let body = response.text().await.map_err(|e| ApiError::network(&e))?;

        if !status.is_success() {
            let err = ApiError::http_status(status.as_u16(), &body);
            tracing::debug!(status = status.as_u16(), error = %err, "api call failed");
            return Err(err);
        }
        serde_json::from_str(&body).map_err(|e| ApiError::decode(&e))
    }

    /// Current user, or `None` when logged out.
    ///
    /// # Errors
    /// Network and decode failures, and any status other than 2xx or 401.
    pub async fn me(&self) -> ApiResult<Option<User>> {
        let request = self.http.get(self.endpoint(&["api", "auth", "me"]));
        match self.send::<MeResponse>(request).await {
            Ok(resp) => Ok(resp.user),
            Err(err) if err.is_unauthorized() => Ok(None),
            Err(err) => Err(err),
        }
    }

    /// # Errors
    /// Rejected credentials come back as an `Http` error carrying the server's message.
    pub async fn login(&self, username: &str, password: &str) -> ApiResult<User> {
        let request = self
            .http
            .post(self.endpoint(&["api", "auth", "login"]))
            .json(&json!({ "username": username, "password": password }));
        let resp: LoginResponse = self.send(request).await?;
        tracing::info!(user = %resp.user.username, "logged in");
        Ok(resp.user)
    }

    /// # Errors
    /// Network, status and decode failures.
    pub async fn logout(&self) -> ApiResult<()> {
        let request = self.http.post(self.endpoint(&["api", "auth", "logout"]));
        let _: Value = self.send(request).await?;
        Ok(())
    }

    /// # Errors
    /// Network, status and decode failures.
    pub async fn my_bots(&self) -> ApiResult<Vec<Bot>> {
        let request = self.http.get(self.endpoint(&["api", "my-bots"]));
        let resp: BotsResponse = self.send(request).await?;
        Ok(resp.bots)
    }

    /// Groups and friends for a bot; `None` when the server has no data yet.
    ///
    /// # Errors
    /// Network, status and decode failures.
    pub async fn bot_data(&self, bot_id: &str) -> ApiResult<Option<BotData>> {
        let request = self
            .http
            .get(self.endpoint(&["api", "my-bots", bot_id, "data"]));
        let resp: BotDataResponse = self.send(request).await?;
        Ok(resp.data)
    }

    /// # Errors
    /// Network, status and decode failures.
    pub async fn create_bot(&self, name: &str, prefix: Option<&str>) -> ApiResult<CreatedBot> {
        let metadata = match prefix {
            Some(prefix) => json!({ "prefix": prefix }),
            None => json!({}),
        };
        let request = self
            .http
            .post(self.endpoint(&["api", "my-bots"]))
            .json(&json!({ "name": name, "metadata": metadata }));
        let created: CreatedBot = self.send(request).await?;
        tracing::info!(bot = %created.bot_id, "bot created");
        Ok(created)
    }

    /// # Errors
    /// Network, status and decode failures.
    pub async fn rename_bot(&self, bot_id: &str, name: &str) -> ApiResult<()> {
        let request = self
            .http
            .put(self.endpoint(&["api", "my-bots", bot_id]))
            .json(&json!({ "name": name }));
        let _: Value = self.send(request).await?;
        Ok(())
    }

    /// # Errors
    /// Network, status and decode failures.
    pub async fn delete_bot(&self, bot_id: &str) -> ApiResult<()> {
        let request = self.http.delete(self.endpoint(&["api", "my-bots", bot_id]));
        let _: Value = self.send(request).await?;
        tracing::info!(bot = bot_id, "bot deleted");
        Ok(())
    }

    /// # Errors
    /// Network, status and decode failures.
    pub async fn bot_token(&self, bot_id: &str) -> ApiResult<String> {
        let request = self
            .http
            .get(self.endpoint(&["api", "my-bots", bot_id, "token"]));
        let resp: TokenResponse = self.send(request).await?;
        Ok(resp.token)
    }
}

#[cfg(test)]
mod tests {
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    async fn client_for(server: &MockServer) -> ApiClient {
        ApiClient::new(&server.uri(), Some(Duration::from_secs(5))).unwrap()
    }

    #[tokio::test]
    async fn test_me_logged_out_on_401() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/auth/me"))
            .respond_with(
                ResponseTemplate::new(401).set_body_json(json!({ "error": "Not authenticated" })),
            )
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        assert_eq!(client.me().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_login_keeps_session_cookie() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/auth/login"))
            .and(body_json(json!({ "username": "ops", "password": "secret123" })))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("set-cookie", "session_token=abc; Path=/")
                    .set_body_json(json!({
                        "success": true,
                        "user": { "id": 7, "username": "ops", "email": "ops@example.com" }
                    })),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/auth/me"))
            .and(wiremock::matchers::header("cookie", "session_token=abc"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "user": { "id": 7, "username": "ops" }
            })))
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let user = client.login("ops", "secret123").await.unwrap();
        assert_eq!(user.id, "7");

        let me = client.me().await.unwrap().unwrap();
        assert_eq!(me.username, "ops");
    }

    #[tokio::test]
    async fn test_login_failure_surfaces_server_message() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/auth/login"))
            .respond_with(
                ResponseTemplate::new(401).set_body_json(json!({ "error": "Invalid password" })),
            )
            .mount(&server)
            .await;

        let err = client_for(&server)
            .await
            .login("ops", "nope")
            .await
            .unwrap_err();
        assert_eq!(err.kind, ApiErrorKind::Http(401));
        assert_eq!(err.to_string(), "Invalid password");
    }

    #[tokio::test]
    async fn test_my_bots_tolerates_loose_fields() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/my-bots"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "bots": [
                    { "id": "bot_1", "name": "Alpha", "status": "online", "token": "t1" },
                    { "id": 2, "name": "Beta", "status": null },
                    { "id": "bot_3", "name": "Gamma", "status": "sleeping" }
                ],
                "count": 3
            })))
            .mount(&server)
            .await;

        let bots = client_for(&server).await.my_bots().await.unwrap();
        let statuses: Vec<BotStatus> = bots.iter().map(|b| b.status).collect();
        assert_eq!(
            statuses,
            vec![BotStatus::Online, BotStatus::Offline, BotStatus::Offline]
        );
        assert_eq!(bots[1].id, "2");
        assert_eq!(bots[0].token.as_deref(), Some("t1"));
    }

    #[tokio::test]
    async fn test_bot_data_may_be_null() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/my-bots/bot_1/data"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": null })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/my-bots/bot_2/data"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": {
                    "groups": [{ "id": "g1", "name": "Dev", "members": 12, "online": 3 }],
                    "friends": [{ "id": "f1", "name": "Ann", "status": "Away" }]
                }
            })))
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        assert_eq!(client.bot_data("bot_1").await.unwrap(), None);

        let data = client.bot_data("bot_2").await.unwrap().unwrap();
        let groups = data.groups.unwrap();
        assert_eq!(groups[0].members, 12);
        assert_eq!(data.friends.unwrap()[0].status, Presence::Away);
    }

    #[tokio::test]
    async fn test_create_rename_delete_token() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/my-bots"))
            .and(body_json(json!({ "name": "Helper", "metadata": { "prefix": "!" } })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true, "bot_id": "bot_9", "token": "tok_9"
            })))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("PUT"))
            .and(path("/api/my-bots/bot_9"))
            .and(body_json(json!({ "name": "Renamed" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("DELETE"))
            .and(path("/api/my-bots/bot_9"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/my-bots/bot_9/token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "token": "tok_9" })))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let created = client.create_bot("Helper", Some("!")).await.unwrap();
        assert_eq!(created.bot_id, "bot_9");
        client.rename_bot("bot_9", "Renamed").await.unwrap();
        assert_eq!(client.bot_token("bot_9").await.unwrap(), "tok_9");
        client.delete_bot("bot_9").await.unwrap();
    }

    #[tokio::test]
    async fn test_error_kinds() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/api/my-bots/bot_1"))
            .respond_with(ResponseTemplate::new(403).set_body_string("forbidden"))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/my-bots"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let err = client.delete_bot("bot_1").await.unwrap_err();
        assert_eq!(err.kind, ApiErrorKind::Http(403));
        assert_eq!(err.message, "HTTP 403");

        let err = client.my_bots().await.unwrap_err();
        assert_eq!(err.kind, ApiErrorKind::Decode);
    }

    #[tokio::test]
    async fn test_unreachable_server_is_network_error() {
        let client = ApiClient::new("http://127.0.0.1:9", Some(Duration::from_secs(2))).unwrap();
        let err = client.my_bots().await.unwrap_err();
        assert_eq!(err.kind, ApiErrorKind::Network);
    }

    #[test]
    fn test_endpoint_keeps_base_path() {
        let client = ApiClient::new("http://example.test/manager/", None).unwrap();
        assert_eq!(
            client.endpoint(&["api", "my-bots", "b1"]).as_str(),
            "http://example.test/manager/api/my-bots/b1"
        );
        let bare = ApiClient::new("http://example.test", None).unwrap();
        assert_eq!(
            bare.endpoint(&["api", "auth", "me"]).as_str(),
            "http://example.test/api/auth/me"
        );
    }

    #[test]
    fn test_invalid_base_url() {
        assert!(ApiClient::new("not a url", None).is_err());
    }
}
