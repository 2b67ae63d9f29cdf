//! Stand-in GitHub provider and application servers for integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::http::{HeaderMap, StatusCode, header};
use axum::routing::{get, post};
use axum::{Form, Json, Router};
use github_oauth_backend::session::{ACCESS_TOKEN_KEY, SessionStore, USER_DATA_KEY};
use github_oauth_backend::{build_oauth_router, oauth_routes, with_oauth_layers};
use github_oauth_backend::github::GitHubClient;
use github_oauth_backend::models::app_config::session_key;
use github_oauth_backend::models::{AppConfig, AppState};
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tower_sessions::Session;
use tower_sessions::cookie::Key;

pub const CLIENT_ID: &str = "test-client-id";
pub const CLIENT_SECRET: &str = "test-client-secret";
pub const REDIRECT_URI: &str = "http://localhost:3000/auth/github/callback";

/// What the stub answers on each endpoint. A JSON string body is sent as
/// raw `text/html`, the way a misbehaving proxy would answer.
#[derive(Clone)]
pub struct ProviderScript {
    pub token: (StatusCode, Value),
    pub user: (StatusCode, Value),
}

impl ProviderScript {
    pub fn granting(token: &str, user: Value) -> Self {
        Self {
            token: (StatusCode::OK, json!({ "access_token": token, "token_type": "bearer" })),
            user: (StatusCode::OK, user),
        }
    }
}

/// Everything the stub saw.
#[derive(Default)]
pub struct ProviderLog {
    pub token_hits: AtomicUsize,
    pub user_hits: AtomicUsize,
    pub token_form: Mutex<Option<HashMap<String, String>>>,
    pub token_accept: Mutex<Option<String>>,
    pub user_authorization: Mutex<Option<String>>,
    pub user_agent: Mutex<Option<String>>,
}

impl ProviderLog {
    pub fn outbound_calls(&self) -> usize {
        self.token_hits.load(Ordering::SeqCst) + self.user_hits.load(Ordering::SeqCst)
    }
}

#[derive(Clone)]
struct StubState {
    script: ProviderScript,
    log: Arc<ProviderLog>,
}

pub struct StubProvider {
    pub addr: SocketAddr,
    pub log: Arc<ProviderLog>,
}

impl StubProvider {
    pub async fn start(script: ProviderScript) -> Self {
        let log = Arc::new(ProviderLog::default());
        let state = StubState {
            script,
            log: log.clone(),
        };

        let router = Router::new()
            .route("/login/oauth/access_token", post(token))
            .route("/user", get(user))
            .with_state(state);

        let addr = serve(router).await;
        Self { addr, log }
    }

    pub fn config(&self) -> AppConfig {
        config_for(
            format!("http://{}/login/oauth/access_token", self.addr),
            format!("http://{}/user", self.addr),
        )
    }

    pub fn github(&self) -> GitHubClient {
        GitHubClient::new(&self.config()).unwrap()
    }
}

async fn token(
    State(stub): State<StubState>,
    headers: HeaderMap,
    Form(form): Form<HashMap<String, String>>,
) -> Response {
    stub.log.token_hits.fetch_add(1, Ordering::SeqCst);
    *stub.log.token_form.lock().unwrap() = Some(form);
    *stub.log.token_accept.lock().unwrap() = header_value(&headers, header::ACCEPT);

    let (status, body) = stub.script.token.clone();
    reply(status, body)
}

async fn user(State(stub): State<StubState>, headers: HeaderMap) -> Response {
    stub.log.user_hits.fetch_add(1, Ordering::SeqCst);
    *stub.log.user_authorization.lock().unwrap() = header_value(&headers, header::AUTHORIZATION);
    *stub.log.user_agent.lock().unwrap() = header_value(&headers, header::USER_AGENT);

    let (status, body) = stub.script.user.clone();
    reply(status, body)
}

fn reply(status: StatusCode, body: Value) -> Response {
    match body {
        Value::String(text) => (status, [(header::CONTENT_TYPE, "text/html")], text).into_response(),
        body => (status, Json(body)).into_response(),
    }
}

fn header_value(headers: &HeaderMap, name: header::HeaderName) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(ToString::to_string)
}

pub fn config_for(token_url: String, user_url: String) -> AppConfig {
    AppConfig::from_vars(move |name| match name {
        "GITHUB_CLIENT_ID" => Some(CLIENT_ID.to_string()),
        "GITHUB_CLIENT_SECRET" => Some(CLIENT_SECRET.to_string()),
        "GITHUB_REDIRECT_URI" => Some(REDIRECT_URI.to_string()),
        "GITHUB_TOKEN_URL" => Some(token_url.clone()),
        "GITHUB_USER_URL" => Some(user_url.clone()),
        _ => None,
    })
    .unwrap()
}

/// An address nothing listens on.
pub async fn closed_addr() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap()
}

pub async fn serve(router: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    addr
}

pub const SESSION_PATH: &str = "/test/session";

fn test_key() -> Key {
    session_key(Some("integration-test-secret")).unwrap()
}

async fn session_view(session: Session) -> Json<Value> {
    let access_token = SessionStore::get(&session, ACCESS_TOKEN_KEY).await.unwrap();
    let user_data = SessionStore::get(&session, USER_DATA_KEY).await.unwrap();
    Json(json!({ "access_token": access_token, "user_data": user_data }))
}

/// The `name=value` pair of a `Set-Cookie` header, ready to send back.
pub fn cookie_pair(response: &reqwest::Response) -> String {
    let raw = response.headers()[header::SET_COOKIE].to_str().unwrap();
    raw.split(';').next().unwrap().to_string()
}

/// The OAuth variant of the application, served on a random port.
pub struct TestServer {
    pub addr: SocketAddr,
    pub client: reqwest::Client,
}

impl TestServer {
    pub async fn start(config: AppConfig) -> Self {
        let state = AppState::new(&config).unwrap();
        Self::serving(build_oauth_router(state, test_key())).await
    }

    /// Like [`TestServer::start`], plus `SESSION_PATH`, which echoes the
    /// session's OAuth fields back through the same session layer.
    pub async fn start_with_session_view(config: AppConfig) -> Self {
        let state = AppState::new(&config).unwrap();
        let routes = oauth_routes().route(SESSION_PATH, get(session_view));
        Self::serving(with_oauth_layers(routes, state, test_key())).await
    }

    pub async fn serving(router: Router) -> Self {
        let addr = serve(router).await;
        let client = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .unwrap();

        Self { addr, client }
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub async fn get(&self, path: &str) -> reqwest::Response {
        self.client.get(self.url(path)).send().await.unwrap()
    }

    pub async fn get_with_cookie(&self, path: &str, cookie: &str) -> reqwest::Response {
        self.client
            .get(self.url(path))
            .header(header::COOKIE, cookie)
            .send()
            .await
            .unwrap()
    }
}
