//! Client-side store mirroring server resources.
//!
//! # Architecture
//!
//! - [`ResourceState`] is the one lifecycle shared by every resource
//! - [`AdminState`] holds one slice per resource; [`Slice`] markers address them
//! - [`AdminStore`] owns the state and is the single mutation path: each
//!   action marks its slice pending, awaits the API call, then applies
//!   exactly one success or failure
//!
//! The store is an ordinary value: construct one, clone it into whatever
//! needs it, and `subscribe()` to observe changes.

mod actions;
mod resource;
mod state;

pub use actions::{AdminStore, Settled};
pub use resource::{Phase, ResourceState, Ticket};
pub use state::{
    AdminState, BrandCreate, BrandDelete, BrandDetails, BrandUpdate, Brands, Orders,
    ProductUpload, Products, Slice,
};

use thiserror::Error;

/// Failure message used when nothing more specific is available.
pub const GENERIC_FAILURE: &str = "Something went wrong";

/// Failure message used by the bulk upload when nothing more specific is available.
pub const UPLOAD_FAILURE: &str = "Excel Upload Failed";

/// How a second request on a slice that is still loading is handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SubmissionPolicy {
    /// Every request goes out; whichever completes last decides the state.
    #[default]
    LastWriteWins,
    /// A request on a pending slice fails fast and is never sent.
    RejectWhilePending,
}

impl std::fmt::Display for SubmissionPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::LastWriteWins => write!(f, "last-write-wins"),
            Self::RejectWhilePending => write!(f, "reject-while-pending"),
        }
    }
}

impl std::str::FromStr for SubmissionPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "last-write-wins" => Ok(Self::LastWriteWins),
            "reject-while-pending" => Ok(Self::RejectWhilePending),
            _ => Err(format!("invalid submission policy: {s}")),
        }
    }
}

/// Errors raised by the store itself (not by the remote call).
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    /// The slice already has a request in flight and the policy forbids another.
    #[error("A {0} request is already in progress")]
    AlreadyPending(&'static str),
}
