use async_trait::async_trait;
use base64::{Engine as _, engine::general_purpose};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::application::ports::{
    ExtractionError, PageExtractionRequest, RawCandidate, TransactionExtractor,
};

use super::chat_completion_client::{
    ChatCompletionClient, ContentPart, FileData, ImageUrl, LlmClientError,
};
use super::json_response::{parse_json_reply, take_array};
use super::prompts::{EXTRACTION_SYSTEM_PROMPT, extraction_prompt};

/// Sends one page (PDF or image) to a vision-capable chat model and reads
/// back candidate transactions.
pub struct VlmTransactionExtractor {
    client: ChatCompletionClient,
}

impl VlmTransactionExtractor {
    pub fn new(client: ChatCompletionClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl TransactionExtractor for VlmTransactionExtractor {
    #[tracing::instrument(
        skip(self, request),
        fields(
            model = %self.client.model(),
            page_number = request.page_number,
            total_pages = request.total_pages
        )
    )]
    async fn extract_page(
        &self,
        request: PageExtractionRequest<'_>,
    ) -> Result<Vec<RawCandidate>, ExtractionError> {
        let page = request.page;
        let mime = page.content_type.as_mime();
        let data_uri = format!(
            "data:{};base64,{}",
            mime,
            general_purpose::STANDARD.encode(&page.data)
        );

        let document_part = if page.content_type.is_image() {
            ContentPart::ImageUrl {
                image_url: ImageUrl { url: data_uri },
            }
        } else {
            ContentPart::File {
                file: FileData {
                    filename: format!("statement-page-{}.pdf", request.page_number),
                    file_data: data_uri,
                },
            }
        };

        let prompt = extraction_prompt(request.catalog, request.page_number, request.total_pages);
        let content = self
            .client
            .complete(
                EXTRACTION_SYSTEM_PROMPT,
                vec![document_part, ContentPart::Text { text: prompt }],
            )
            .await
            .map_err(map_client_error)?;

        let candidates = parse_extraction_reply(&content)?;
        tracing::debug!(raw_candidates = candidates.len(), "Extraction reply parsed");
        Ok(candidates)
    }
}

fn map_client_error(error: LlmClientError) -> ExtractionError {
    match error {
        LlmClientError::RateLimited => ExtractionError::RateLimited,
        LlmClientError::InvalidResponse(msg) => ExtractionError::InvalidResponse(msg),
        other => ExtractionError::RequestFailed(other.to_string()),
    }
}

/// Reads `{"transactions": [...]}` or a bare array. Entries that do not
/// even have the right shape are skipped here; field validation happens
/// downstream.
pub fn parse_extraction_reply(content: &str) -> Result<Vec<RawCandidate>, ExtractionError> {
    let reply =
        parse_json_reply(content).map_err(|e| ExtractionError::InvalidResponse(e.to_string()))?;
    let items = take_array(reply, "transactions").ok_or_else(|| {
        ExtractionError::InvalidResponse("missing transactions array".to_string())
    })?;

    Ok(items
        .into_iter()
        .filter_map(|item| serde_json::from_value::<ExtractedTransaction>(item).ok())
        .map(RawCandidate::from)
        .collect())
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ExtractedTransaction {
    #[serde(default, rename = "type", alias = "kind")]
    kind: Option<String>,
    #[serde(default, deserialize_with = "lenient_amount")]
    amount: Option<f64>,
    #[serde(default)]
    date: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default, alias = "note")]
    notes: Option<String>,
    #[serde(default)]
    category_id: Option<String>,
    #[serde(default)]
    source_account_id: Option<String>,
    #[serde(default)]
    destination_account_id: Option<String>,
    #[serde(default)]
    possible_duplicate: Option<bool>,
}

impl From<ExtractedTransaction> for RawCandidate {
    fn from(t: ExtractedTransaction) -> Self {
        Self {
            kind: t.kind,
            amount: t.amount,
            date: t.date,
            description: t.description,
            notes: t.notes,
            category_id: t.category_id,
            source_account_id: t.source_account_id,
            destination_account_id: t.destination_account_id,
            possible_duplicate: t.possible_duplicate,
        }
    }
}

fn lenient_amount<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => {
            let cleaned: String = s
                .chars()
                .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
                .collect();
            cleaned.parse().ok()
        }
        _ => None,
    })
}
