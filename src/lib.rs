//! # Kube Reconcile
//!
//! Client-side reconciliation of declarative Kubernetes resources.
//!
//! This library decides whether a resource already on the API server matches
//! the desired definition and, when it does not, builds the smallest merge
//! patch that converges it. Server-populated fields are tolerated, list order
//! is not significant and labels and annotations are compared as entry sets.
//!
//! ## Modules
//!
//! - [`value`] - In-memory representation of YAML/JSON resource trees
//! - [`fieldpath`] - Paths into a tree, used to locate comparison errors
//! - [`compare`] - Structural equality between desired and server trees
//! - [`patch`] - Patch construction with append and replace list modes
//! - [`reconcile`] - Ensure-present and ensure-absent workflows over a transport

pub mod compare;
pub mod fieldpath;
pub mod patch;
pub mod reconcile;
pub mod value;

pub use compare::{equal, equal_spec, CompareError};
pub use fieldpath::{Path, PathElement};
pub use patch::{apply_merge_patch, form_patch, MergeMode, PatchError};
pub use reconcile::{Client, ClientBuilder, ClientError, Outcome, Transport};
pub use value::Value;
