//! Field path module - Locations of nodes inside resource trees.
//!
//! Paths are attached to comparison errors so a caller can see which field
//! could not be reconciled.

mod path;

pub use path::*;
