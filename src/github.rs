use oauth2::{AccessToken, AuthorizationCode, ClientId, ClientSecret};
use reqwest::header::ACCEPT;
use serde_json::Value;
use url::Url;

use crate::error::OAuthError;
use crate::models::{AppConfig, ProviderEndpoints};

static USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Talks to the provider's authorize, token and user endpoints.
///
/// Cloning is cheap; clones share one connection pool.
#[derive(Clone, Debug)]
pub struct GitHubClient {
    http: reqwest::Client,
    client_id: ClientId,
    client_secret: ClientSecret,
    redirect_url: String,
    endpoints: ProviderEndpoints,
}

impl GitHubClient {
    pub fn new(config: &AppConfig) -> Result<Self, reqwest::Error> {
        // api.github.com refuses requests without a User-Agent.
        let http = reqwest::Client::builder().user_agent(USER_AGENT).build()?;

        Ok(Self {
            http,
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.clone(),
            redirect_url: config.redirect_url.clone(),
            endpoints: config.endpoints.clone(),
        })
    }

    /// The page the browser is sent to. Only `client_id` is attached.
    pub fn authorize_url(&self) -> Url {
        let mut url = self.endpoints.authorize_url.clone();
        url.query_pairs_mut()
            .append_pair("client_id", self.client_id.as_str());
        url
    }

    /// Trades an authorization code for the provider's token response.
    ///
    /// The JSON body is returned whole; deciding whether it carries a usable
    /// `access_token` is up to the caller.
    pub async fn exchange_code(&self, code: &AuthorizationCode) -> Result<Value, OAuthError> {
        let form = [
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.secret().as_str()),
            ("code", code.secret().as_str()),
            ("redirect_uri", self.redirect_url.as_str()),
        ];

        let response = self
            .http
            .post(self.endpoints.token_url.clone())
            .header(ACCEPT, "application/json")
            .form(&form)
            .send()
            .await?;

        read_json(response).await
    }

    pub async fn fetch_user(&self, token: &AccessToken) -> Result<Value, OAuthError> {
        let response = self
            .http
            .get(self.endpoints.user_url.clone())
            .bearer_auth(token.secret())
            .send()
            .await?;

        read_json(response).await
    }
}

async fn read_json(response: reqwest::Response) -> Result<Value, OAuthError> {
    let status = response.status();
    if !status.is_success() {
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "Could not read error body".to_string());
        return Err(OAuthError::ProviderStatus { status, body });
    }

    Ok(response.json::<Value>().await?)
}
