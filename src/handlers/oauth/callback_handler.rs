use crate::error::OAuthError;
use crate::github::GitHubClient;
use crate::models::AppState;
use crate::models::oauth::CallbackParams;
use crate::session::{ACCESS_TOKEN_KEY, SessionStore, USER_DATA_KEY};
use axum::{
    Json,
    extract::{Query, State},
};
use oauth2::{AccessToken, AuthorizationCode};
use serde_json::Value;
use tower_sessions::Session;

pub async fn callback_handler(
    Query(pairs): Query<Vec<(String, String)>>,
    State(app_state): State<AppState>,
    session: Session,
) -> Result<Json<Value>, OAuthError> {
    let params = CallbackParams::from_pairs(pairs);
    let user_data =
        complete_authorization(&app_state.github, params.code.as_deref(), &session).await?;

    tracing::info!(session_id = ?session.id(), "GitHub login completed");
    Ok(Json(user_data))
}

/// Runs the code-for-token exchange and the profile fetch, recording both
/// results in `session`.
///
/// The token is written before it is checked, so a rejected exchange still
/// overwrites `access_token` (with `null` when the provider sent none). A
/// failed profile fetch leaves the new token next to whatever `user_data`
/// was there before.
pub async fn complete_authorization<S>(
    github: &GitHubClient,
    code: Option<&str>,
    session: &S,
) -> Result<Value, OAuthError>
where
    S: SessionStore + ?Sized,
{
    let code = match code {
        Some(code) if !code.is_empty() => AuthorizationCode::new(code.to_string()),
        _ => return Err(OAuthError::MissingCode),
    };

    let token_response = github.exchange_code(&code).await?;
    tracing::debug!(response = %redact_token(&token_response), "token endpoint responded");

    let raw_token = token_response
        .get(ACCESS_TOKEN_KEY)
        .cloned()
        .unwrap_or(Value::Null);
    session.set(ACCESS_TOKEN_KEY, raw_token.clone()).await?;

    let token = issued_token(&raw_token).ok_or(OAuthError::TokenRejected)?;

    let user_data = github.fetch_user(&token).await?;
    session.set(USER_DATA_KEY, user_data.clone()).await?;

    Ok(user_data)
}

/// Any truthy value counts as a token: a non-empty string, a non-zero
/// number, `true`, or a non-empty array or object. Non-strings are sent
/// as their JSON text.
fn issued_token(raw: &Value) -> Option<AccessToken> {
    let token = match raw {
        Value::Null | Value::Bool(false) => return None,
        Value::String(token) if token.is_empty() => return None,
        Value::Number(n) if n.as_f64() == Some(0.0) => return None,
        Value::Array(items) if items.is_empty() => return None,
        Value::Object(fields) if fields.is_empty() => return None,
        Value::String(token) => token.clone(),
        other => other.to_string(),
    };

    Some(AccessToken::new(token))
}

fn redact_token(response: &Value) -> Value {
    let mut redacted = response.clone();
    if let Some(token) = redacted.get_mut(ACCESS_TOKEN_KEY) {
        if issued_token(token).is_some() {
            *token = Value::String("[redacted]".to_string());
        }
    }
    redacted
}
