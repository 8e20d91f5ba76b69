//! Unified error handling for admin.

use thiserror::Error;

use crate::api::ApiError;
use crate::config::ConfigError;
use crate::forms::FormError;
use crate::spreadsheet::SpreadsheetError;
use crate::store::{GENERIC_FAILURE, StoreError};

/// Library-level error type for the admin console.
#[derive(Debug, Error)]
pub enum AdminError {
    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The remote API call failed.
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// The store refused to dispatch.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Operator input was rejected before any request.
    #[error(transparent)]
    Form(#[from] FormError),

    /// A workbook could not be read or written.
    #[error("Spreadsheet error: {0}")]
    Spreadsheet(#[from] SpreadsheetError),
}

impl AdminError {
    /// Message suitable for showing to the operator.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Api(e) => e.user_message(GENERIC_FAILURE),
            Self::Store(e) => e.to_string(),
            Self::Form(e) => e.to_string(),
            other => other.to_string(),
        }
    }

    /// Whether this error points at a bug or an outage rather than bad input.
    #[must_use]
    pub const fn is_unexpected(&self) -> bool {
        matches!(
            self,
            Self::Config(_)
                | Self::Spreadsheet(SpreadsheetError::Write(_))
                | Self::Api(ApiError::Parse(_) | ApiError::Url(_))
        )
    }

    /// Log the error, capturing unexpected ones to Sentry.
    pub fn report(&self) {
        if self.is_unexpected() {
            let event_id = sentry::capture_error(self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Admin operation error"
            );
        } else {
            tracing::warn!(error = %self, "Admin operation failed");
        }
    }
}
