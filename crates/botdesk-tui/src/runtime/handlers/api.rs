//! Bot manager API handlers.
//!
//! Each handler owns a clone of the client (cheap, shares the cookie jar) and
//! wraps the call result into an `ApiUiEvent`.

use botdesk_core::api::{ApiClient, ApiError, ApiErrorKind};
use tokio_util::sync::CancellationToken;

use crate::events::{ApiUiEvent, UiEvent};

pub async fn check_session(api: ApiClient) -> UiEvent {
    UiEvent::Api(ApiUiEvent::SessionChecked(api.me().await))
}

/// Signs in. Cancellation resolves immediately with an error result, which
/// the reducer drops as stale.
pub async fn login(
    api: ApiClient,
    username: String,
    password: String,
    cancel: Option<CancellationToken>,
) -> UiEvent {
    let request = api.login(&username, &password);
    let result = match cancel {
        Some(token) => {
            tokio::select! {
                biased;
                () = token.cancelled() => Err(ApiError::new(ApiErrorKind::Network, "Sign in cancelled")),
                result = request => result,
            }
        }
        None => request.await,
    };
    if let Err(err) = &result {
        tracing::info!(user = %username, error = %err, "sign in failed");
    }
    UiEvent::Api(ApiUiEvent::LoggedIn(result))
}

pub async fn logout(api: ApiClient) -> UiEvent {
    UiEvent::Api(ApiUiEvent::LoggedOut(api.logout().await))
}

pub async fn load_bots(api: ApiClient) -> UiEvent {
    UiEvent::Api(ApiUiEvent::BotsLoaded(api.my_bots().await))
}

pub async fn load_bot_data(api: ApiClient, bot_id: String) -> UiEvent {
    let result = api.bot_data(&bot_id).await;
    UiEvent::Api(ApiUiEvent::BotDataLoaded { bot_id, result })
}

pub async fn create_bot(api: ApiClient, name: String, prefix: Option<String>) -> UiEvent {
    let result = api.create_bot(&name, prefix.as_deref()).await;
    UiEvent::Api(ApiUiEvent::BotCreated { name, result })
}

pub async fn rename_bot(api: ApiClient, bot_id: String, name: String) -> UiEvent {
    let result = api.rename_bot(&bot_id, &name).await;
    UiEvent::Api(ApiUiEvent::BotRenamed {
        bot_id,
        name,
        result,
    })
}

pub async fn delete_bot(api: ApiClient, bot_id: String) -> UiEvent {
    let result = api.delete_bot(&bot_id).await;
    UiEvent::Api(ApiUiEvent::BotDeleted { bot_id, result })
}

pub async fn fetch_token(api: ApiClient, bot_id: String) -> UiEvent {
    let result = api.bot_token(&bot_id).await;
    UiEvent::Api(ApiUiEvent::TokenLoaded { bot_id, result })
}
