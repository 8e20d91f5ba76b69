//! Bearer token sources.
//!
//! The token is looked up at request time, so a token written by another
//! process (or by `bz auth login`) is picked up without rebuilding the client.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use secrecy::{ExposeSecret, SecretString};

use super::ApiError;
use crate::config::TokenConfig;

/// Capability that yields the current bearer token, if any.
pub trait TokenSource: Send + Sync {
    /// Current token. `Ok(None)` means requests go out unauthenticated.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Token` if the backing storage exists but cannot be read.
    fn token(&self) -> Result<Option<SecretString>, ApiError>;
}

/// A fixed token (or none at all).
#[derive(Clone, Default)]
pub struct StaticToken(Option<SecretString>);

impl StaticToken {
    /// A source that always yields `token`.
    #[must_use]
    pub fn new(token: SecretString) -> Self {
        Self(Some(token))
    }

    /// A source that never yields a token.
    #[must_use]
    pub const fn anonymous() -> Self {
        Self(None)
    }
}

impl std::fmt::Debug for StaticToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let shown = if self.0.is_some() { "[REDACTED]" } else { "None" };
        f.debug_tuple("StaticToken").field(&shown).finish()
    }
}

impl TokenSource for StaticToken {
    fn token(&self) -> Result<Option<SecretString>, ApiError> {
        Ok(self
            .0
            .as_ref()
            .filter(|t| !t.expose_secret().trim().is_empty())
            .cloned())
    }
}

/// Token persisted in a local file, one token per file.
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    /// Store backed by `path`. The file does not need to exist yet.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Persist `token`, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Token` if the file cannot be written.
    pub fn save(&self, token: &SecretString) -> Result<(), ApiError> {
        std::fs::write(&self.path, token.expose_secret().trim())
            .map_err(|e| ApiError::Token(format!("{}: {e}", self.path.display())))
    }

    /// Forget the persisted token. Missing files are not an error.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Token` if the file exists but cannot be removed.
    pub fn clear(&self) -> Result<(), ApiError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(ApiError::Token(format!("{}: {e}", self.path.display()))),
        }
    }
}

impl TokenSource for FileTokenStore {
    fn token(&self) -> Result<Option<SecretString>, ApiError> {
        match std::fs::read_to_string(&self.path) {
            Ok(contents) => {
                let token = contents.trim();
                Ok((!token.is_empty()).then(|| SecretString::from(token.to_string())))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(ApiError::Token(format!("{}: {e}", self.path.display()))),
        }
    }
}

/// Build the token source described by configuration.
#[must_use]
pub fn from_config(config: &TokenConfig) -> Arc<dyn TokenSource> {
    match config {
        TokenConfig::Anonymous => Arc::new(StaticToken::anonymous()),
        TokenConfig::Static(token) => Arc::new(StaticToken::new(token.clone())),
        TokenConfig::File(path) => Arc::new(FileTokenStore::new(path.clone())),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn scratch_file(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("bazaar-token-{}-{name}", std::process::id()))
    }

    #[test]
    fn test_static_token() {
        let source = StaticToken::new(SecretString::from("abc"));
        assert_eq!(source.token().unwrap().unwrap().expose_secret(), "abc");

        assert!(StaticToken::anonymous().token().unwrap().is_none());
        assert!(StaticToken::new(SecretString::from("  ")).token().unwrap().is_none());
    }

    #[test]
    fn test_static_token_debug_redacts() {
        let debug_output = format!("{:?}", StaticToken::new(SecretString::from("hunter2")));
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("hunter2"));
    }

    #[test]
    fn test_file_token_store_round_trip() {
        let store = FileTokenStore::new(scratch_file("round-trip"));
        store.clear().unwrap();
        assert!(store.token().unwrap().is_none());

        store.save(&SecretString::from(" tok-123 \n")).unwrap();
        assert_eq!(store.token().unwrap().unwrap().expose_secret(), "tok-123");

        store.clear().unwrap();
        assert!(store.token().unwrap().is_none());
    }

    #[test]
    fn test_blank_token_file_means_no_token() {
        let path = scratch_file("blank");
        std::fs::write(&path, "\n").unwrap();
        assert!(FileTokenStore::new(&path).token().unwrap().is_none());
        std::fs::remove_file(path).unwrap();
    }
}
