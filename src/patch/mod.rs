//! Patch module - Builds the patch that converges a server object.
//!
//! The patch is a partial resource tree: only fields that must change are
//! present. Scalars carry the desired value, nested maps are written out whole
//! once anything inside them differs, and lists follow the [`MergeMode`].

mod apply;
mod builder;
mod error;
mod metadata;
mod mode;


pub use apply::*;
pub use builder::*;
pub use error::*;
pub use metadata::*;
pub use mode::*;
