use serde::{Deserialize, Serialize};

/// Wire payload posted to the classifier endpoint. The response body is an
/// opaque string; no response type is modeled here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifyRequest {
    pub description: String,
    #[serde(default)]
    pub supplier: String,
}
