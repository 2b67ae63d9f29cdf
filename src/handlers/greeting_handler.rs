use axum::{Json, response::IntoResponse};
use serde_json::json;

pub async fn root_handler() -> impl IntoResponse {
    Json(json!({ "Hello": "World" }))
}

/// Placeholder login route of the stub server; it does not authenticate.
pub async fn stub_login_handler() -> impl IntoResponse {
    Json(json!({ "Hello": "Etesam" }))
}
