//! Wire types for the remote admin API.
//!
//! Field names follow the server's JSON (camelCase, `_id` for ids).
//! Numeric fields are decoded leniently: missing, `null` or malformed
//! values become zero rather than failing the whole response.

mod brand;
mod common;
mod deck;
mod order;
mod product;

pub use brand::*;
pub use common::*;
pub use deck::*;
pub use order::*;
pub use product::*;
