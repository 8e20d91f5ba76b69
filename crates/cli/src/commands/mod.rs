//! Command implementations and the plumbing they share.

pub mod auth;
pub mod brands;
pub mod deck;
pub mod products;
pub mod reports;

use std::path::{Path, PathBuf};

use bazaar_admin::api::{ApiClient, ApiError};
use bazaar_admin::config::ConfigError;
use bazaar_admin::forms::FormError;
use bazaar_admin::spreadsheet::SpreadsheetError;
use bazaar_admin::store::{Settled, StoreError};
use bazaar_admin::{AdminConfig, AdminError, AdminStore};
use bazaar_core::PeriodError;
use thiserror::Error;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Admin(#[from] AdminError),

    #[error(transparent)]
    Period(#[from] PeriodError),

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The server or transport rejected the request; the message is the
    /// one stored on the slice.
    #[error("{0}")]
    Rejected(String),

    #[error("The {0} request was abandoned before it completed")]
    Discarded(&'static str),

    #[error("BAZAAR_API_TOKEN is set; unset it to use the token file")]
    StaticToken,
}

/// Library errors all travel through [`AdminError`] so they are reported
/// the same way.
macro_rules! via_admin_error {
    ($($source:ty),+ $(,)?) => {
        $(
            impl From<$source> for CliError {
                fn from(e: $source) -> Self {
                    Self::Admin(AdminError::from(e))
                }
            }
        )+
    };
}

via_admin_error!(ApiError, ConfigError, FormError, SpreadsheetError, StoreError);

impl CliError {
    /// Log the failure; unexpected library errors also go to Sentry.
    pub fn report(&self) {
        match self {
            Self::Admin(e) => e.report(),
            other => tracing::error!(error = %other, "Command failed"),
        }
    }
}

/// Everything a command needs: configuration and the store.
pub struct Session {
    pub config: AdminConfig,
    pub store: AdminStore,
}

impl Session {
    /// Build the API client and store described by `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: AdminConfig) -> Result<Self, CliError> {
        let api = ApiClient::new(&config.api)?;
        let store = AdminStore::new(api, config.submission_policy);
        Ok(Self { config, store })
    }
}

/// Turn the outcome of a dispatch into a result.
///
/// A rejection clears the stored errors once the message has been taken,
/// so the next command starts clean.
pub fn settled(store: &AdminStore, slice: &'static str, outcome: Settled) -> Result<(), CliError> {
    match outcome {
        Settled::Fulfilled => Ok(()),
        Settled::Rejected(message) => {
            store.clear_errors();
            Err(CliError::Rejected(message))
        }
        Settled::Discarded => Err(CliError::Discarded(slice)),
    }
}

/// Write `bytes` to `dir/filename`, creating `dir` if needed.
///
/// # Errors
///
/// Returns `CliError::Io` if the directory or file cannot be written.
pub fn write_output(dir: &Path, filename: &str, bytes: &[u8]) -> Result<PathBuf, CliError> {
    std::fs::create_dir_all(dir).map_err(|source| CliError::Io {
        path: dir.to_path_buf(),
        source,
    })?;
    let path = dir.join(filename);
    std::fs::write(&path, bytes).map_err(|source| CliError::Io {
        path: path.clone(),
        source,
    })?;
    tracing::info!(path = %path.display(), bytes = bytes.len(), "Wrote file");
    Ok(path)
}

/// Read a whole file.
///
/// # Errors
///
/// Returns `CliError::Io` if the file cannot be read.
pub fn read_input(path: &Path) -> Result<Vec<u8>, CliError> {
    std::fs::read(path).map_err(|source| CliError::Io {
        path: path.to_path_buf(),
        source,
    })
}
