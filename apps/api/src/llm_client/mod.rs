//! LLM Client: the single point of entry for all Claude API calls.
//!
//! ARCHITECTURAL RULE: No other module may call the Anthropic API directly.
//! All LLM interactions MUST go through this module.
//!
//! Model: claude-sonnet-4-5 (hardcoded, do not make configurable to prevent drift)

use std::sync::Arc;

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::storage::{FileStore, StorageError};

pub mod prompts;

const ANTHROPIC_API_URL: &str = "https://api.anthropic.com/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";
/// The model used for all LLM calls.
/// This is intentionally hardcoded to prevent accidental drift.
pub const MODEL: &str = "claude-sonnet-4-5";
const MAX_TOKENS: u32 = 4096;
const REQUEST_TIMEOUT_SECS: u64 = 120;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error")]
    Parse(#[from] serde_json::Error),

    #[error("could not read document")]
    Document(#[from] StorageError),

    #[error("LLM returned empty content")]
    EmptyContent,
}

// ────────────────────────────────────────────────────────────────────────────
// Feedback response shape
// ────────────────────────────────────────────────────────────────────────────

/// A single text block of a multi-part message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextBlock {
    pub text: String,
}

/// Message content arrives either as one string or as an array of blocks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MessageContent {
    Text(String),
    Blocks(Vec<TextBlock>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AiMessage {
    pub content: MessageContent,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AiResponse {
    pub message: AiMessage,
}

impl AiResponse {
    #[cfg(test)]
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            message: AiMessage {
                content: MessageContent::Text(text.into()),
            },
        }
    }

    /// The feedback text: the content itself when it is a string, otherwise
    /// the first block's text.
    pub fn text(&self) -> Option<&str> {
        match &self.message.content {
            MessageContent::Text(text) => Some(text.as_str()),
            MessageContent::Blocks(blocks) => blocks.first().map(|b| b.text.as_str()),
        }
    }
}

/// Anything that can produce feedback on an uploaded document.
#[async_trait]
pub trait FeedbackClient: Send + Sync {
    /// Asks the model to analyse the stored file at `path` following `instructions`.
    async fn feedback(&self, path: &str, instructions: &str) -> Result<AiResponse, LlmError>;
}

// ────────────────────────────────────────────────────────────────────────────
// Anthropic wire types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct AnthropicRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    system: &'a str,
    messages: Vec<AnthropicMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct AnthropicMessage<'a> {
    role: &'a str,
    content: Vec<RequestBlock<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum RequestBlock<'a> {
    Document { source: DocumentSource<'a> },
    Text { text: &'a str },
}

#[derive(Debug, Serialize)]
struct DocumentSource<'a> {
    #[serde(rename = "type")]
    source_type: &'a str,
    media_type: &'a str,
    data: String,
}

#[derive(Debug, Deserialize)]
struct AnthropicResponse {
    content: Vec<ContentBlock>,
    usage: Usage,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    block_type: String,
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Usage {
    input_tokens: u32,
    output_tokens: u32,
}

impl AnthropicResponse {
    fn into_ai_response(self) -> Result<AiResponse, LlmError> {
        let blocks: Vec<TextBlock> = self
            .content
            .into_iter()
            .filter(|b| b.block_type == "text")
            .filter_map(|b| b.text)
            .map(|text| TextBlock { text })
            .collect();

        if blocks.is_empty() {
            return Err(LlmError::EmptyContent);
        }

        Ok(AiResponse {
            message: AiMessage {
                content: MessageContent::Blocks(blocks),
            },
        })
    }
}

#[derive(Debug, Deserialize)]
struct AnthropicError {
    error: AnthropicErrorBody,
}

#[derive(Debug, Deserialize)]
struct AnthropicErrorBody {
    message: String,
}

/// The feedback client backed by the Anthropic Messages API.
/// Reads the uploaded PDF from the file store and sends it as a document block.
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    api_key: String,
    files: Arc<dyn FileStore>,
}

impl LlmClient {
    pub fn new(api_key: String, files: Arc<dyn FileStore>) -> Result<Self, LlmError> {
        Ok(Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
                .build()?,
            api_key,
            files,
        })
    }

    /// Makes a single call to the Claude API with a PDF attached. No retries.
    async fn call_with_document(
        &self,
        pdf: &[u8],
        prompt: &str,
        system: &str,
    ) -> Result<AiResponse, LlmError> {
        let request_body = AnthropicRequest {
            model: MODEL,
            max_tokens: MAX_TOKENS,
            system,
            messages: vec![AnthropicMessage {
                role: "user",
                content: vec![
                    RequestBlock::Document {
                        source: DocumentSource {
                            source_type: "base64",
                            media_type: "application/pdf",
                            data: STANDARD.encode(pdf),
                        },
                    },
                    RequestBlock::Text { text: prompt },
                ],
            }],
        };

        let response = self
            .client
            .post(ANTHROPIC_API_URL)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .header("content-type", "application/json")
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<AnthropicError>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(LlmError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let llm_response: AnthropicResponse = response.json().await?;

        debug!(
            "LLM call succeeded: input_tokens={}, output_tokens={}",
            llm_response.usage.input_tokens, llm_response.usage.output_tokens
        );

        llm_response.into_ai_response()
    }
}

#[async_trait]
impl FeedbackClient for LlmClient {
    async fn feedback(&self, path: &str, instructions: &str) -> Result<AiResponse, LlmError> {
        let pdf = self.files.download(path).await?;
        debug!("Attaching {path} ({} bytes) to feedback request", pdf.len());
        self.call_with_document(&pdf, instructions, prompts::FEEDBACK_SYSTEM)
            .await
    }
}

/// Strips ```json ... ``` or ``` ... ``` code fences from LLM output.
/// The `json` tag is matched in any case.
pub fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    let Some(stripped) = text.strip_prefix("```") else {
        return text;
    };
    let stripped = match stripped.get(..4) {
        Some(tag) if tag.eq_ignore_ascii_case("json") => &stripped[4..],
        _ => stripped,
    };
    let stripped = stripped.trim_start();
    stripped
        .strip_suffix("```")
        .map(|s| s.trim())
        .unwrap_or(stripped)
}
