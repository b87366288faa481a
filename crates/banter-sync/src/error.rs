//! Failures surfaced by transport and collaborator calls.

use banter_model::ApiError;
use thiserror::Error;

/// What a remote call can fail with.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The server answered with an error body.
    #[error("api error: {0}")]
    Api(#[from] ApiError),

    /// The request never completed: DNS, socket, TLS, or a transport-level
    /// timeout.
    #[error("network error: {0}")]
    Network(String),

    /// A response body failed to decode.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The response decoded but did not satisfy the call's contract.
    #[error("protocol error: {0}")]
    Protocol(String),
}

pub type Result<T> = std::result::Result<T, TransportError>;

impl TransportError {
    /// True when the server told us the session is gone: a 401 from any
    /// route except the login route itself, which returns 401 for bad
    /// credentials.
    pub fn is_session_expired(&self) -> bool {
        let TransportError::Api(api) = self else {
            return false;
        };
        api.status_code == Some(401)
            && api
                .url
                .as_deref()
                .is_some_and(|url| !url.contains("/login"))
    }

    /// The error body carried into failure records. Non-API failures are
    /// wrapped so observers always have a displayable message.
    pub fn to_api_error(&self) -> ApiError {
        match self {
            TransportError::Api(api) => api.clone(),
            other => ApiError::new(other.to_string()),
        }
    }
}
