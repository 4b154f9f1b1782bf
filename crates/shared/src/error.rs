use thiserror::Error;

/// Rejection for a submission whose description is empty after trimming.
/// Never reaches the classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("PO description must not be empty")]
pub struct EmptyDescription;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("classifier response is not valid JSON: {0}")]
    InvalidJson(String),
    #[error("classifier response is not a JSON object")]
    NotAnObject,
}
