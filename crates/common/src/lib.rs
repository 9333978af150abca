//! Shared types for the orbit demo.
//!
//! # Invariants
//! - A transform's cached matrix is valid iff its dirty flag is clear.
//! - Every transform setter marks the cache dirty.

mod transform;
mod types;

pub use transform::{Transform, compose_matrix};
pub use types::EntityId;
