//! Comparison errors.

use crate::fieldpath::Path;
use thiserror::Error;

/// CompareError is raised when two trees cannot be compared at all.
///
/// It is never a verdict: a caller receiving it must treat the pair as
/// impossible to reconcile, not as different.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompareError {
    #[error("{path}: type mismatch: cannot compare {actual} to {expected}")]
    TypeMismatch {
        path: String,
        expected: String,
        actual: String,
    },
}

impl CompareError {
    /// Creates a type mismatch error at the given path.
    pub fn type_mismatch(
        path: &Path,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        CompareError::TypeMismatch {
            path: path.to_string(),
            expected: expected.into(),
            actual: actual.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_mismatch_display() {
        let err = CompareError::type_mismatch(&Path::new().field("spec"), "list", "map");
        assert_eq!(
            err.to_string(),
            ".spec: type mismatch: cannot compare map to list"
        );
    }
}
