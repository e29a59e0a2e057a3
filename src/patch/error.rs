//! Patch construction errors.

use crate::compare::CompareError;
use thiserror::Error;

/// PatchError represents a failure to build a patch.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PatchError {
    #[error("unrecognized patching mode '{mode}'")]
    InvalidMode { mode: String },

    #[error(transparent)]
    TypeMismatch(#[from] CompareError),
}
