//! Bazaar Core - Shared types library.
//!
//! This crate provides common types used across the Bazaar admin components:
//! - `admin` - API client, resource store, reports and spreadsheet codec
//! - `cli` - Operator command-line tool
//!
//! # Architecture
//!
//! The core crate contains only types and traits - no I/O, no HTTP clients.
//! This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, order statuses and report periods

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
