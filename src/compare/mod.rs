//! Compare module - Structural equality between desired and server trees.
//!
//! Equality ignores `status`, treats lists as unordered collections and
//! compares labels and annotations as sets of entries. Comparing values of
//! incompatible shapes is a [`CompareError`], not a verdict.

mod equality;
mod error;
mod metadata;


pub use equality::{equal, equal_spec, IGNORED_FIELDS};
pub use error::*;
pub use metadata::*;

pub(crate) use equality::{equal_at, find_match};
