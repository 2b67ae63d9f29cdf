use crate::github::GitHubClient;
use oauth2::{ClientId, ClientSecret};
use sha2::{Digest, Sha512};
use thiserror::Error;
use tower_sessions::cookie::Key;
use url::Url;

pub const GITHUB_AUTHORIZE_URL: &str = "https://github.com/login/oauth/authorize";
pub const GITHUB_TOKEN_URL: &str = "https://github.com/login/oauth/access_token";
pub const GITHUB_USER_URL: &str = "https://api.github.com/user";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{name} not found")]
    Missing { name: &'static str },

    #[error("SECRET_KEY must not be empty")]
    EmptySecretKey,

    #[error("{name} is not a valid URL: {source}")]
    InvalidUrl {
        name: &'static str,
        source: url::ParseError,
    },
}

/// Where the provider lives. Defaults to github.com; each URL can be
/// overridden from the environment to point the backend at a stand-in.
#[derive(Clone, Debug)]
pub struct ProviderEndpoints {
    pub authorize_url: Url,
    pub token_url: Url,
    pub user_url: Url,
}

impl ProviderEndpoints {
    fn from_vars(var: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let endpoint = |name: &'static str, default: &str| {
            let raw = var(name).unwrap_or_else(|| default.to_string());
            Url::parse(&raw).map_err(|source| ConfigError::InvalidUrl { name, source })
        };

        Ok(Self {
            authorize_url: endpoint("GITHUB_AUTHORIZE_URL", GITHUB_AUTHORIZE_URL)?,
            token_url: endpoint("GITHUB_TOKEN_URL", GITHUB_TOKEN_URL)?,
            user_url: endpoint("GITHUB_USER_URL", GITHUB_USER_URL)?,
        })
    }
}

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub client_id: ClientId,
    pub client_secret: ClientSecret,
    pub redirect_url: String,
    pub endpoints: ProviderEndpoints,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(|name| std::env::var(name).ok())
    }

    /// Credentials are not validated: a missing value becomes an empty
    /// string and the flow carries on with it.
    pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let credential = |name: &str| {
            var(name).unwrap_or_else(|| {
                tracing::warn!(variable = name, "not set, using an empty value");
                String::new()
            })
        };

        let client_id = ClientId::new(credential("GITHUB_CLIENT_ID"));
        let client_secret = ClientSecret::new(credential("GITHUB_CLIENT_SECRET"));
        let redirect_url = credential("GITHUB_REDIRECT_URI");
        let endpoints = ProviderEndpoints::from_vars(&var)?;

        Ok(Self {
            client_id,
            client_secret,
            redirect_url,
            endpoints,
        })
    }
}

pub fn session_key_from_env() -> Result<Key, ConfigError> {
    session_key(std::env::var("SECRET_KEY").ok().as_deref())
}

/// Stretches `SECRET_KEY` into the 64 bytes the cookie signer needs.
pub fn session_key(secret: Option<&str>) -> Result<Key, ConfigError> {
    let secret = secret.ok_or(ConfigError::Missing { name: "SECRET_KEY" })?;
    if secret.is_empty() {
        return Err(ConfigError::EmptySecretKey);
    }

    let digest = Sha512::digest(secret.as_bytes());
    Ok(Key::from(digest.as_slice()))
}

#[derive(Clone)]
pub struct AppState {
    pub github: GitHubClient,
}

impl AppState {
    pub fn new(config: &AppConfig) -> Result<Self, reqwest::Error> {
        let github = GitHubClient::new(config)?;
        Ok(Self { github })
    }
}
