//! Remote admin API client.
//!
//! # Architecture
//!
//! - JSON over HTTP via `reqwest`, with a cookie store so session cookies
//!   set by the server are sent back
//! - Bearer token read from a [`TokenSource`] before every request; no token
//!   means no `Authorization` header at all
//! - One `x-request-id` per request, recorded on the tracing span
//! - No timeouts or retries are added here
//!
//! # Example
//!
//! ```rust,ignore
//! use bazaar_admin::api::ApiClient;
//!
//! let client = ApiClient::new(&config.api)?;
//!
//! let brands = client.admin_brands().await?;
//! let orders = client.admin_orders().await?;
//! ```

mod brands;
mod client;
mod orders;
mod presentation;
mod products;
mod token;
pub mod types;

pub use client::ApiClient;
pub use token::{FileTokenStore, StaticToken, TokenSource};
pub use types::*;

use thiserror::Error;

/// Errors that can occur when calling the remote API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request never produced a response (connection refused, DNS, TLS).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-2xx status.
    #[error("Request failed with status code {status}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// `message` field of the error body, when the server sent one.
        message: Option<String>,
    },

    /// The response body did not match the expected shape.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// An endpoint URL could not be built.
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// The persisted token could not be read.
    #[error("Token error: {0}")]
    Token(String),
}

impl ApiError {
    /// Message supplied by the server in the error body, if any.
    #[must_use]
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Status {
                message: Some(message),
                ..
            } => Some(message.trim()).filter(|m| !m.is_empty()),
            _ => None,
        }
    }

    /// Message describing the failure below the application layer.
    #[must_use]
    pub fn transport_message(&self) -> String {
        match self {
            Self::Http(e) => e.to_string(),
            other => other.to_string(),
        }
    }

    /// The one message stored on a failed resource.
    ///
    /// Server message first, then the transport message, then `fallback`.
    #[must_use]
    pub fn user_message(&self, fallback: &str) -> String {
        if let Some(message) = self.server_message() {
            return message.to_string();
        }
        let transport = self.transport_message();
        if transport.trim().is_empty() {
            fallback.to_string()
        } else {
            transport
        }
    }

    /// HTTP status code, when the server answered.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}
