//! Server-reported error shape.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The error body the server attaches to failed API calls, plus the request
/// context the client records alongside it. Carried inside failure records so
/// observers can render the raw server message.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiError {
    #[serde(default)]
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_code: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub server_error_id: Option<String>,
    /// URL of the failed request, recorded client-side.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl ApiError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            ..Self::default()
        }
    }

    pub fn with_status_code(mut self, status_code: u16) -> Self {
        self.status_code = Some(status_code);
        self
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)?;
        if let Some(status_code) = self.status_code {
            write!(f, " (status {status_code})")?;
        }
        Ok(())
    }
}

impl std::error::Error for ApiError {}
