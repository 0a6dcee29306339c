use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::infrastructure::observability::sanitize_for_log;
use crate::presentation::config::LlmSettings;

const AZURE_API_VERSION: &str = "2024-10-21";

#[derive(Debug, thiserror::Error)]
pub enum LlmClientError {
    #[error("api request failed: {0}")]
    ApiRequestFailed(String),
    #[error("rate limited")]
    RateLimited,
    #[error("invalid response: {0}")]
    InvalidResponse(String),
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
}

/// Non-streaming client for OpenAI-compatible `/chat/completions` endpoints
/// that asks for a JSON object back.
pub struct ChatCompletionClient {
    client: Client,
    provider: String,
    base_url: String,
    api_key: String,
    model: String,
    max_tokens: usize,
    temperature: f32,
}

#[derive(Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<RequestMessage<'a>>,
    max_tokens: usize,
    temperature: f32,
    response_format: ResponseFormat,
}

#[derive(Serialize)]
struct ResponseFormat {
    r#type: &'static str,
}

#[derive(Serialize)]
struct RequestMessage<'a> {
    role: &'static str,
    content: MessageContent<'a>,
}

#[derive(Serialize)]
#[serde(untagged)]
enum MessageContent<'a> {
    Text(&'a str),
    Parts(Vec<ContentPart>),
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentPart {
    Text { text: String },
    ImageUrl { image_url: ImageUrl },
    File { file: FileData },
}

#[derive(Debug, Clone, Serialize)]
pub struct ImageUrl {
    pub url: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct FileData {
    pub filename: String,
    pub file_data: String,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

impl ChatCompletionClient {
    pub fn model(&self) -> &str {
        &self.model
    }

    fn completions_url(&self) -> String {
        if self.provider == "azure" {
            format!(
                "{}/chat/completions?api-version={}",
                self.base_url, AZURE_API_VERSION
            )
        } else {
            format!("{}/chat/completions", self.base_url)
        }
    }

    fn apply_auth(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        if self.provider == "azure" {
            request.header("api-key", &self.api_key)
        } else {
            request.header("Authorization", format!("Bearer {}", self.api_key))
        }
    }

    pub async fn complete(
        &self,
        system_prompt: &str,
        user_parts: Vec<ContentPart>,
    ) -> Result<String, LlmClientError> {
        let request_body = ChatCompletionRequest {
            model: &self.model,
            messages: vec![
                RequestMessage {
                    role: "system",
                    content: MessageContent::Text(system_prompt),
                },
                RequestMessage {
                    role: "user",
                    content: MessageContent::Parts(user_parts),
                },
            ],
            max_tokens: self.max_tokens,
            temperature: self.temperature,
            response_format: ResponseFormat {
                r#type: "json_object",
            },
        };

        let request = self.client.post(self.completions_url()).json(&request_body);
        let response = self
            .apply_auth(request)
            .send()
            .await
            .map_err(|e| LlmClientError::ApiRequestFailed(e.to_string()))?;

        if response.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(LlmClientError::RateLimited);
        }

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(LlmClientError::ApiRequestFailed(format!(
                "HTTP {}: {}",
                status,
                sanitize_for_log(&body)
            )));
        }

        let raw_bytes = response
            .bytes()
            .await
            .map_err(|e| LlmClientError::ApiRequestFailed(e.to_string()))?;

        let completion: ChatCompletionResponse =
            serde_json::from_slice(&raw_bytes).map_err(|e| {
                tracing::error!(
                    raw_response = %sanitize_for_log(&String::from_utf8_lossy(&raw_bytes)),
                    "Failed to parse chat completion JSON"
                );
                LlmClientError::InvalidResponse(e.to_string())
            })?;

        let content = completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| LlmClientError::InvalidResponse("empty choices".to_string()))?;

        tracing::debug!(reply = %sanitize_for_log(&content), "Chat completion received");
        Ok(content)
    }
}

pub fn create_chat_completion_client(
    settings: &LlmSettings,
    model: &str,
) -> Result<ChatCompletionClient, LlmClientError> {
    let base_url = match settings.provider.as_str() {
        "openai" => settings
            .base_url
            .clone()
            .unwrap_or_else(|| "https://api.openai.com/v1".to_string())
            .trim_end_matches('/')
            .to_string(),
        "lmstudio" => settings
            .base_url
            .clone()
            .ok_or_else(|| {
                LlmClientError::InvalidConfiguration(
                    "base_url required for lmstudio provider".to_string(),
                )
            })?
            .trim_end_matches('/')
            .to_string(),
        "azure" => {
            let endpoint = settings.azure_endpoint.as_ref().ok_or_else(|| {
                LlmClientError::InvalidConfiguration(
                    "azure_endpoint required for azure provider".to_string(),
                )
            })?;
            format!(
                "{}/openai/deployments/{}",
                endpoint.trim_end_matches('/'),
                model
            )
        }
        other => {
            return Err(LlmClientError::InvalidConfiguration(format!(
                "unknown provider: {}",
                other
            )));
        }
    };

    let client = Client::builder()
        .timeout(Duration::from_secs(settings.timeout_seconds))
        .build()
        .map_err(|e| LlmClientError::InvalidConfiguration(e.to_string()))?;

    Ok(ChatCompletionClient {
        client,
        provider: settings.provider.clone(),
        base_url,
        api_key: settings.api_key.clone(),
        model: model.to_string(),
        max_tokens: settings.max_tokens,
        temperature: settings.temperature,
    })
}
