//! GitHub OAuth login backend.
//!
//! Two router configurations share the handlers: a stub server with only
//! greeting routes, and the OAuth server that runs the authorization code
//! flow behind sessions and permissive CORS.

pub mod error;
pub mod github;
pub mod handlers;
pub mod models;
pub mod session;

use axum::{Router, routing::get};
use handlers::oauth::{callback_handler, login_handler};
use handlers::{root_handler, stub_login_handler};
use models::AppState;
use time::Duration;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tower_sessions::cookie::{Key, SameSite};
use tower_sessions::{Expiry, MemoryStore, SessionManagerLayer};

pub const LOGIN_PATH: &str = "/auth/github";
pub const CALLBACK_PATH: &str = "/auth/github/callback";
pub const STUB_LOGIN_PATH: &str = "/github/login";

pub fn build_stub_router() -> Router {
    Router::new()
        .route("/", get(root_handler))
        .route(STUB_LOGIN_PATH, get(stub_login_handler))
        .layer(TraceLayer::new_for_http())
}

pub fn build_oauth_router(state: AppState, session_key: Key) -> Router {
    with_oauth_layers(oauth_routes(), state, session_key)
}

pub fn oauth_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(root_handler))
        .route(LOGIN_PATH, get(login_handler))
        .route(CALLBACK_PATH, get(callback_handler))
}

/// Wraps `routes` in sessions, CORS and request tracing.
///
/// Session cookies are signed with `session_key`; the session data itself
/// lives in process memory and is lost on restart.
pub fn with_oauth_layers(routes: Router<AppState>, state: AppState, session_key: Key) -> Router {
    let session_store = MemoryStore::default();
    let session_expiry = Expiry::OnInactivity(Duration::hours(6));
    let session_layer = SessionManagerLayer::new(session_store)
        .with_secure(false)
        .with_same_site(SameSite::Lax)
        .with_expiry(session_expiry)
        .with_signed(session_key);

    routes
        .layer(session_layer)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
