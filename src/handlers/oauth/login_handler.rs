use crate::models::AppState;
use axum::{extract::State, response::Redirect};

/// Sends the browser to GitHub's consent page.
pub async fn login_handler(State(app_state): State<AppState>) -> Redirect {
    let url = app_state.github.authorize_url();

    tracing::debug!(%url, "redirecting to GitHub for authorization");
    Redirect::temporary(url.as_str())
}
