//! Value module - In-memory representation of resource manifests.
//!
//! Trees parsed from YAML or JSON are held as [`Value`] nodes.

mod value;

pub use value::*;
