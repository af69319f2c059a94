use serde::{Deserialize, Serialize};

/// Caller-side normalization applied to text before it is counted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Normalization {
    pub fold_case: bool,
    pub letters_only: bool,
}

impl Default for Normalization {
    fn default() -> Self {
        Self {
            fold_case: true,
            letters_only: true,
        }
    }
}

impl Normalization {
    /// Every character is its own symbol.
    pub fn raw() -> Self {
        Self {
            fold_case: false,
            letters_only: false,
        }
    }
}
