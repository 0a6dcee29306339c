mod chat_completion_client;
mod json_response;
mod llm_duplicate_classifier;
mod prompts;
mod vlm_transaction_extractor;

pub use chat_completion_client::{
    ChatCompletionClient, ContentPart, FileData, ImageUrl, LlmClientError,
    create_chat_completion_client,
};
pub use json_response::parse_json_reply;
pub use llm_duplicate_classifier::{
    LlmDuplicateClassifier, classification_payload, parse_classification_reply,
};
pub use vlm_transaction_extractor::{VlmTransactionExtractor, parse_extraction_reply};
