use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::application::ports::{DuplicateClassifier, DuplicateClassifierError};
use crate::domain::{ComparableSummary, DuplicateLink, Provenance};

use super::chat_completion_client::{ChatCompletionClient, ContentPart, LlmClientError};
use super::json_response::{parse_json_reply, take_array};
use super::prompts::DUPLICATE_SYSTEM_PROMPT;

pub struct LlmDuplicateClassifier {
    client: ChatCompletionClient,
}

impl LlmDuplicateClassifier {
    pub fn new(client: ChatCompletionClient) -> Self {
        Self { client }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ClassificationInput<'a> {
    records: Vec<ComparableRecord<'a>>,
    hints: &'a [DuplicateLink],
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ComparableRecord<'a> {
    id: &'a str,
    provenance: Provenance,
    date: &'a str,
    amount: String,
    description: &'a str,
    normalized_description: &'a str,
    possible_duplicate: bool,
}

/// Serializes the records and hints exactly as the cross-check model sees them.
pub fn classification_payload(
    comparables: &[ComparableSummary],
    hints: &[DuplicateLink],
) -> Result<String, serde_json::Error> {
    serde_json::to_string(&ClassificationInput {
        records: comparables.iter().map(ComparableRecord::from).collect(),
        hints,
    })
}

impl<'a> From<&'a ComparableSummary> for ComparableRecord<'a> {
    fn from(summary: &'a ComparableSummary) -> Self {
        Self {
            id: &summary.id,
            provenance: summary.provenance,
            date: &summary.normalized_date,
            amount: summary.normalized_amount.to_string(),
            description: &summary.description,
            normalized_description: &summary.normalized_description,
            possible_duplicate: summary.possible_duplicate,
        }
    }
}

#[async_trait]
impl DuplicateClassifier for LlmDuplicateClassifier {
    #[tracing::instrument(
        skip(self, comparables, hints),
        fields(model = %self.client.model(), records = comparables.len(), hints = hints.len())
    )]
    async fn classify(
        &self,
        comparables: &[ComparableSummary],
        hints: &[DuplicateLink],
    ) -> Result<Vec<DuplicateLink>, DuplicateClassifierError> {
        let payload = classification_payload(comparables, hints)
            .map_err(|e| DuplicateClassifierError::InvalidResponse(e.to_string()))?;

        let content = self
            .client
            .complete(
                DUPLICATE_SYSTEM_PROMPT,
                vec![ContentPart::Text { text: payload }],
            )
            .await
            .map_err(|e| match e {
                LlmClientError::RateLimited => DuplicateClassifierError::RateLimited,
                LlmClientError::InvalidResponse(msg) => {
                    DuplicateClassifierError::InvalidResponse(msg)
                }
                other => DuplicateClassifierError::RequestFailed(other.to_string()),
            })?;

        parse_classification_reply(&content)
    }
}

/// Reads `{"duplicates": [...]}` or a bare array; malformed entries are
/// skipped.
pub fn parse_classification_reply(
    content: &str,
) -> Result<Vec<DuplicateLink>, DuplicateClassifierError> {
    let reply = parse_json_reply(content)
        .map_err(|e| DuplicateClassifierError::InvalidResponse(e.to_string()))?;
    let items = take_array(reply, "duplicates").ok_or_else(|| {
        DuplicateClassifierError::InvalidResponse("missing duplicates array".to_string())
    })?;

    Ok(items
        .into_iter()
        .filter_map(|item| serde_json::from_value::<DuplicateLink>(item).ok())
        .filter(|link| !link.duplicate_id.is_empty() && !link.original_id.is_empty())
        .collect())
}
