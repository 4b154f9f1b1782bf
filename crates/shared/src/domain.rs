use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Placeholder rendered for a taxonomy level the classifier did not provide.
pub const LEVEL_PLACEHOLDER: &str = "—";

/// A validated classify request: description is non-empty after trimming,
/// supplier may be empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Submission {
    pub description: String,
    pub supplier: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub description: String,
    pub supplier: String,
    pub submitted_at: DateTime<Utc>,
}

impl HistoryEntry {
    pub fn from_submission(submission: &Submission, submitted_at: DateTime<Utc>) -> Self {
        Self {
            description: submission.description.clone(),
            supplier: submission.supplier.clone(),
            submitted_at,
        }
    }
}

/// The three taxonomy levels extracted from a classifier response, broad to
/// specific. Levels the response omitted hold [`LEVEL_PLACEHOLDER`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryLevels {
    pub l1: String,
    pub l2: String,
    pub l3: String,
}

impl CategoryLevels {
    pub fn placeholders() -> Self {
        Self {
            l1: LEVEL_PLACEHOLDER.to_string(),
            l2: LEVEL_PLACEHOLDER.to_string(),
            l3: LEVEL_PLACEHOLDER.to_string(),
        }
    }
}

impl Default for CategoryLevels {
    fn default() -> Self {
        Self::placeholders()
    }
}
