//! Bazaar admin library.
//!
//! Everything the operator console needs apart from its command-line
//! surface: the remote API client, the resource store mirroring server
//! state, the report aggregators and the spreadsheet codec.
//!
//! # Security
//!
//! The API client carries an admin bearer token. Tokens are held as
//! `SecretString` and never appear in `Debug` output or logs.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod coerce;
pub mod config;
pub mod error;
pub mod forms;
pub mod reports;
pub mod spreadsheet;
pub mod store;

pub use config::AdminConfig;
pub use error::AdminError;
pub use store::{AdminStore, SubmissionPolicy};
