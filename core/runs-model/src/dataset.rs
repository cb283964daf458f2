//! FILENAME: core/runs-model/src/dataset.rs
//! PURPOSE: Dataset identity for run/dataset associations.

use serde::{Deserialize, Serialize};

/// Identifies one dataset version referenced by a run.
///
/// Two references point at the same dataset iff BOTH the name and the
/// content digest match. A renamed dataset with the same content, or the
/// same name with different content, is a different identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DatasetIdentity {
    /// Logical dataset name (e.g., "train", "validation").
    pub name: String,

    /// Content digest of the dataset version.
    pub digest: String,
}

impl DatasetIdentity {
    pub fn new(name: impl Into<String>, digest: impl Into<String>) -> Self {
        DatasetIdentity {
            name: name.into(),
            digest: digest.into(),
        }
    }

    /// Stable string form used inside group identifiers: `{name}.{digest}`.
    /// Group identifiers are compared, never parsed back, so embedded dots
    /// in the name are harmless.
    pub fn group_token(&self) -> String {
        format!("{}.{}", self.name, self.digest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_equality_requires_name_and_digest() {
        let a = DatasetIdentity::new("train", "abc123");
        let b = DatasetIdentity::new("train", "abc123");
        let c = DatasetIdentity::new("train", "def456");
        let d = DatasetIdentity::new("eval", "abc123");

        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_ne!(a, d);
    }

    #[test]
    fn test_group_token() {
        let id = DatasetIdentity::new("train", "abc123");
        assert_eq!(id.group_token(), "train.abc123");
    }
}
