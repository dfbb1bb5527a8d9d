//! Attachment kinds.

use serde::{Deserialize, Serialize};

/// Attachment kind classification.
///
/// The original data carried a database-level enum of these two values;
/// membership is now enforced here, before anything is persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttachmentKind {
    /// Purchase receipt.
    #[default]
    Receipt,
    /// Product manual.
    Manual,
}

impl AttachmentKind {
    /// Convert to database string value.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Receipt => "receipt",
            Self::Manual => "manual",
        }
    }

    /// Parse from database string value.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "receipt" => Some(Self::Receipt),
            "manual" => Some(Self::Manual),
            _ => None,
        }
    }
}
