//! Bearer token management.
//!
//! # Usage
//!
//! ```bash
//! # Save a token to the token file (reads stdin when omitted)
//! bz auth login <TOKEN>
//!
//! # Remove the saved token
//! bz auth logout
//!
//! # Show whether a credential is configured
//! bz auth status
//! ```
//!
//! The token file is `BAZAAR_TOKEN_FILE` (default `.bazaar-token`). When
//! `BAZAAR_API_TOKEN` is set, that value is used and the file is ignored.

use std::io::BufRead as _;

use bazaar_admin::api::{FileTokenStore, TokenSource as _};
use bazaar_admin::config::TokenConfig;
use clap::Subcommand;
use secrecy::SecretString;

use super::{CliError, Session};

#[derive(Subcommand)]
pub enum AuthAction {
    /// Save a bearer token to the token file
    Login {
        /// Token to save; read from stdin when omitted
        token: Option<String>,
    },
    /// Remove the saved token
    Logout,
    /// Show where the credential comes from
    Status,
}

pub fn run(session: &Session, action: AuthAction) -> Result<(), CliError> {
    match action {
        AuthAction::Login { token } => {
            let store = file_store(&session.config.api.token)?;
            let token = match token {
                Some(token) => token,
                None => read_stdin_line()?,
            };
            store.save(&SecretString::from(token.trim().to_string()))?;
            println!("Token saved to {}", store.path().display());
        }
        AuthAction::Logout => {
            let store = file_store(&session.config.api.token)?;
            store.clear()?;
            println!("Token removed from {}", store.path().display());
        }
        AuthAction::Status => match &session.config.api.token {
            TokenConfig::Anonymous => println!("No credential configured"),
            TokenConfig::Static(_) => println!("Using BAZAAR_API_TOKEN"),
            TokenConfig::File(path) => {
                let saved = FileTokenStore::new(path.clone()).token()?.is_some();
                if saved {
                    println!("Using token saved in {}", path.display());
                } else {
                    println!("No token saved in {}", path.display());
                }
            }
        },
    }
    Ok(())
}

fn file_store(config: &TokenConfig) -> Result<FileTokenStore, CliError> {
    match config {
        TokenConfig::File(path) => Ok(FileTokenStore::new(path.clone())),
        TokenConfig::Static(_) | TokenConfig::Anonymous => Err(CliError::StaticToken),
    }
}

fn read_stdin_line() -> Result<String, CliError> {
    let mut line = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut line)
        .map_err(|source| CliError::Io {
            path: "<stdin>".into(),
            source,
        })?;
    Ok(line)
}
