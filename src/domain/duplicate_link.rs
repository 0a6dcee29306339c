use serde::{Deserialize, Serialize};

/// `duplicate_id` always names a `new` record; `original_id` may name either
/// provenance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DuplicateLink {
    pub duplicate_id: String,
    pub original_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}
