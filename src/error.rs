//! Failure modes of the OAuth callback.
//!
//! Every variant is terminal for the request. `IntoResponse` turns it into
//! the status and JSON body the frontend sees.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

use crate::session::SessionStoreError;

#[derive(Debug, Error)]
pub enum OAuthError {
    /// The callback arrived without a `code` query parameter (400).
    #[error("Authorization code not provided")]
    MissingCode,

    /// The token endpoint answered but issued no access token (400).
    #[error("Access token not received")]
    TokenRejected,

    /// Connecting to the provider or decoding its reply failed (500).
    #[error("{0}")]
    ProviderTransport(#[from] reqwest::Error),

    /// The provider answered with a non-success status, passed through as is.
    #[error("provider responded with {status}: {body}")]
    ProviderStatus { status: StatusCode, body: String },

    /// Reading or writing the session failed (500).
    #[error("{0}")]
    Session(#[from] SessionStoreError),
}

/// Fieldless mirror of [`OAuthError`] for matching on the failure class.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OAuthErrorKind {
    MissingCode,
    TokenRejected,
    ProviderTransport,
    ProviderStatus,
    Session,
}

impl OAuthError {
    pub fn kind(&self) -> OAuthErrorKind {
        match self {
            OAuthError::MissingCode => OAuthErrorKind::MissingCode,
            OAuthError::TokenRejected => OAuthErrorKind::TokenRejected,
            OAuthError::ProviderTransport(_) => OAuthErrorKind::ProviderTransport,
            OAuthError::ProviderStatus { .. } => OAuthErrorKind::ProviderStatus,
            OAuthError::Session(_) => OAuthErrorKind::Session,
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            OAuthError::MissingCode | OAuthError::TokenRejected => StatusCode::BAD_REQUEST,
            OAuthError::ProviderStatus { status, .. } => *status,
            OAuthError::ProviderTransport(_) | OAuthError::Session(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for OAuthError {
    fn into_response(self) -> Response {
        let status = self.status();

        let body = match &self {
            OAuthError::MissingCode | OAuthError::TokenRejected => {
                json!({ "error": self.to_string() })
            }
            OAuthError::ProviderStatus { body, .. } => json!({ "detail": body }),
            OAuthError::ProviderTransport(_) | OAuthError::Session(_) => {
                json!({ "detail": self.to_string() })
            }
        };

        if status.is_server_error() {
            tracing::error!(error = %self, kind = ?self.kind(), "oauth callback failed");
        } else {
            tracing::warn!(error = %self, kind = ?self.kind(), %status, "oauth callback rejected");
        }

        (status, Json(body)).into_response()
    }
}
