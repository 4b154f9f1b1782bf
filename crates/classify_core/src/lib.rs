use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value;
use shared::{
    domain::{CategoryLevels, HistoryEntry, Submission, LEVEL_PLACEHOLDER},
    error::{EmptyDescription, ParseError},
};
use uuid::Uuid;

/// How many history entries the presentation layer shows. The underlying
/// sequence is never truncated to this.
pub const HISTORY_DISPLAY_LIMIT: usize = 5;

pub const SAMPLE_DESCRIPTION: &str = "CNC machining services for aluminum housings, 200 units";
pub const SAMPLE_SUPPLIER: &str = "PrecisionFab Inc";

/// The opaque external collaborator performing text-to-category inference.
/// Returns the raw response body; interpretation is left to [`parse`].
#[async_trait]
pub trait ClassifierClient: Send + Sync {
    async fn classify(&self, description: &str, supplier: &str) -> Result<String>;
}

/// Per-session mutable state: input drafts, the last classification result,
/// and the submission history. Owned by exactly one session context; state
/// starts empty and is discarded with the process.
#[derive(Debug, Clone)]
pub struct SessionContext {
    pub session_id: Uuid,
    pub description: String,
    pub supplier: String,
    pub last_result: Option<String>,
    history: Vec<HistoryEntry>,
}

impl SessionContext {
    pub fn new() -> Self {
        Self {
            session_id: Uuid::new_v4(),
            description: String::new(),
            supplier: String::new(),
            last_result: None,
            history: Vec::new(),
        }
    }

    /// Full history, most recent first.
    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }

    /// Leading slice of the history for display, capped at `limit`.
    pub fn recent_history(&self, limit: usize) -> &[HistoryEntry] {
        &self.history[..self.history.len().min(limit)]
    }

    /// The Clear action: drop both input drafts and the current result.
    /// History is untouched.
    pub fn clear_inputs(&mut self) {
        self.description.clear();
        self.supplier.clear();
        self.last_result = None;
    }

    /// The Use Sample action: overwrite the drafts with fixed example
    /// values. Bypasses validation and triggers no classification.
    pub fn apply_sample(&mut self) {
        self.description = SAMPLE_DESCRIPTION.to_string();
        self.supplier = SAMPLE_SUPPLIER.to_string();
    }

    /// Store a completed classification: the raw result replaces the
    /// previous one, and the submission is prepended to history when
    /// `save_to_history` is on.
    pub fn record_classification(
        &mut self,
        submission: &Submission,
        raw: String,
        save_to_history: bool,
    ) {
        self.last_result = Some(raw);
        if save_to_history {
            self.history
                .insert(0, HistoryEntry::from_submission(submission, Utc::now()));
        }
        tracing::debug!(
            session_id = %self.session_id,
            history_len = self.history.len(),
            saved = save_to_history,
            "recorded classification result"
        );
    }
}

impl Default for SessionContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Validates raw input into a [`Submission`]. The description must be
/// non-empty after trimming; the supplier may be empty.
pub fn validated_submission(
    description: &str,
    supplier: &str,
) -> Result<Submission, EmptyDescription> {
    if description.trim().is_empty() {
        return Err(EmptyDescription);
    }
    Ok(Submission {
        description: description.to_string(),
        supplier: supplier.to_string(),
    })
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Classified { raw: String },
    Rejected(EmptyDescription),
}

/// The full submit operation: validate, invoke the classifier exactly once,
/// record the result. A rejected submission never reaches the classifier.
/// A classifier failure propagates before any session state is mutated, so
/// `last_result` and the history are untouched on error.
pub async fn submit<C>(
    ctx: &mut SessionContext,
    client: &C,
    description: &str,
    supplier: &str,
    save_to_history: bool,
) -> Result<SubmitOutcome>
where
    C: ClassifierClient + ?Sized,
{
    let submission = match validated_submission(description, supplier) {
        Ok(submission) => submission,
        Err(rejection) => {
            tracing::warn!(session_id = %ctx.session_id, "submit rejected: {rejection}");
            return Ok(SubmitOutcome::Rejected(rejection));
        }
    };

    let raw = client
        .classify(&submission.description, &submission.supplier)
        .await?;
    ctx.record_classification(&submission, raw.clone(), save_to_history);
    Ok(SubmitOutcome::Classified { raw })
}

/// A decoded classifier response: the extracted taxonomy levels plus the
/// full JSON value for pretty display.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedResult {
    pub levels: CategoryLevels,
    pub value: Value,
}

/// Best-effort decode of a raw classifier response. Any non-object JSON
/// value (list, number, bare string) is a parse error, not a result.
pub fn parse(raw: &str) -> Result<ParsedResult, ParseError> {
    let value: Value =
        serde_json::from_str(raw).map_err(|err| ParseError::InvalidJson(err.to_string()))?;
    let Some(object) = value.as_object() else {
        return Err(ParseError::NotAnObject);
    };

    let levels = CategoryLevels {
        l1: extract_level(object, "L1"),
        l2: extract_level(object, "L2"),
        l3: extract_level(object, "L3"),
    };
    Ok(ParsedResult { levels, value })
}

/// Extracts one taxonomy level with a defined precedence: the uppercase key
/// is consulted before its lowercase form. `null` and empty-string values
/// count as absent and fall through to the next candidate; any other string
/// is accepted as-is; non-string values render compactly.
fn extract_level(object: &serde_json::Map<String, Value>, upper_key: &str) -> String {
    let lower_key = upper_key.to_ascii_lowercase();
    for key in [upper_key, lower_key.as_str()] {
        match object.get(key) {
            None | Some(Value::Null) => continue,
            Some(Value::String(text)) if text.is_empty() => continue,
            Some(Value::String(text)) => return text.clone(),
            Some(other) => return other.to_string(),
        }
    }
    LEVEL_PLACEHOLDER.to_string()
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
