//! Core types for Bazaar.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod id;
pub mod period;
pub mod status;

pub use id::*;
pub use period::{DateRange, PeriodError};
pub use status::*;
