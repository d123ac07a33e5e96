//! LLM Client: the single point of entry for all chat-completion calls.
//!
//! ARCHITECTURAL RULE: no other module talks to the LLM provider directly.
//! Pipeline components depend on the `Completion` capability, which turns
//! every transport failure into "no result".
//!
//! The provider is any OpenAI-compatible endpoint (OpenRouter by default).
use async_trait::async_trait;
use reqwest::Client;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

pub mod prompts;

const MAX_RETRIES: u32 = 3;
const REQUEST_TIMEOUT_SECS: u64 = 60;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Rate limited after {retries} retries")]
    RateLimited { retries: u32 },

    #[error("LLM returned empty content")]
    EmptyContent,
}

// ────────────────────────────────────────────────────────────────────────────
// Capability trait
// ────────────────────────────────────────────────────────────────────────────

/// A text-completion capability. `None` means "unavailable"; the caller must
/// treat it as absence of information, never as a negative answer.
#[async_trait]
pub trait Completion: Send + Sync {
    async fn complete(
        &self,
        system: &str,
        prompt: &str,
        max_tokens: u32,
        temperature: f32,
    ) -> Option<String>;
}

// ────────────────────────────────────────────────────────────────────────────
// Wire types (OpenAI chat-completions shape)
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    temperature: f32,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct ChatResponse {
    pub choices: Vec<Choice>,
    #[serde(default)]
    pub usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
pub struct Choice {
    pub message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
pub struct ChoiceMessage {
    pub content: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
}

impl ChatResponse {
    /// Extracts the trimmed text of the first choice, if it has any.
    pub fn text(&self) -> Option<&str> {
        self.choices
            .first()
            .and_then(|c| c.message.content.as_deref())
            .map(str::trim)
            .filter(|t| !t.is_empty())
    }
}

#[derive(Debug, Deserialize)]
struct ProviderError {
    error: ProviderErrorBody,
}

#[derive(Debug, Deserialize)]
struct ProviderErrorBody {
    message: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Client
// ────────────────────────────────────────────────────────────────────────────

/// Chat-completions client. Retries 429 and 5xx responses with exponential
/// backoff; every other failure is returned to the caller as an `LlmError`.
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl LlmClient {
    pub fn new(api_key: String, base_url: String, model: String) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;
        Ok(Self {
            client,
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            model,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Makes a raw chat-completions call, returning the full response object.
    pub async fn call(
        &self,
        prompt: &str,
        system: &str,
        max_tokens: u32,
        temperature: f32,
    ) -> Result<ChatResponse, LlmError> {
        let request_body = ChatRequest {
            model: &self.model,
            max_tokens,
            temperature,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
        };
        let url = format!("{}/chat/completions", self.base_url);

        let mut last_error: Option<LlmError> = None;

        for attempt in 0..MAX_RETRIES {
            if attempt > 0 {
                // Exponential backoff: 1s, 2s
                let delay = std::time::Duration::from_millis(1000 * (1 << (attempt - 1)));
                warn!(
                    "LLM call attempt {} failed, retrying after {}ms...",
                    attempt,
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
            }

            let response = self
                .client
                .post(&url)
                .bearer_auth(&self.api_key)
                .json(&request_body)
                .send()
                .await;

            let response = match response {
                Ok(r) => r,
                Err(e) => {
                    last_error = Some(LlmError::Http(e));
                    continue;
                }
            };

            let status = response.status();

            if status.as_u16() == 429 || status.is_server_error() {
                let body = response.text().await.unwrap_or_default();
                warn!("LLM API returned {}: {}", status, body);
                last_error = Some(LlmError::Api {
                    status: status.as_u16(),
                    message: body,
                });
                continue;
            }

            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                let message = serde_json::from_str::<ProviderError>(&body)
                    .map(|e| e.error.message)
                    .unwrap_or(body);
                return Err(LlmError::Api {
                    status: status.as_u16(),
                    message,
                });
            }

            let chat_response: ChatResponse = response.json().await?;

            if let Some(usage) = &chat_response.usage {
                debug!(
                    "LLM call succeeded: prompt_tokens={}, completion_tokens={}",
                    usage.prompt_tokens, usage.completion_tokens
                );
            }

            return Ok(chat_response);
        }

        Err(last_error.unwrap_or(LlmError::RateLimited {
            retries: MAX_RETRIES,
        }))
    }
}

#[async_trait]
impl Completion for LlmClient {
    async fn complete(
        &self,
        system: &str,
        prompt: &str,
        max_tokens: u32,
        temperature: f32,
    ) -> Option<String> {
        match self.call(prompt, system, max_tokens, temperature).await {
            Ok(response) => match response.text() {
                Some(text) => Some(text.to_string()),
                None => {
                    warn!("LLM call degraded: {}", LlmError::EmptyContent);
                    None
                }
            },
            Err(e) => {
                warn!("LLM call degraded: {e}");
                None
            }
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Structured output parsing
// ────────────────────────────────────────────────────────────────────────────

/// Outcome of decoding a model reply as structured data. The raw text is kept
/// on failure for diagnostics only; callers treat `Unparsed` as "no result".
#[derive(Debug, Clone, PartialEq)]
pub enum Structured<T> {
    Parsed(T),
    Unparsed(String),
}

/// Decodes a model reply as JSON after stripping any markdown code fence.
pub fn parse_structured<T: DeserializeOwned>(raw: &str) -> Structured<T> {
    match serde_json::from_str(strip_json_fences(raw)) {
        Ok(value) => Structured::Parsed(value),
        Err(e) => {
            let preview: String = raw.chars().take(200).collect();
            warn!("Failed to parse LLM response as JSON ({e}): {preview}");
            Structured::Unparsed(raw.to_string())
        }
    }
}

/// Extracts the body of the first ```json ... ``` or ``` ... ``` block.
/// Text without a fence is returned trimmed.
fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    let (open, tagged) = match (text.find("```json"), text.find("```")) {
        (Some(i), _) => (i, true),
        (None, Some(i)) => (i, false),
        (None, None) => return text,
    };
    let body_start = open + if tagged { "```json".len() } else { "```".len() };
    let body = &text[body_start..];
    match body.find("```") {
        Some(end) => body[..end].trim(),
        None => body.trim(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_json_fences_with_json_tag() {
        let input = "```json\n{\"key\": \"value\"}\n```";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_strip_json_fences_without_tag() {
        let input = "```\n{\"key\": \"value\"}\n```";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_strip_json_fences_no_fences() {
        let input = "  {\"key\": \"value\"}\n";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_strip_json_fences_with_leading_prose() {
        let input = "Here is the analysis:\n```json\n[1, 2]\n```\nLet me know!";
        assert_eq!(strip_json_fences(input), "[1, 2]");
    }

    #[test]
    fn test_parse_structured_parsed() {
        let parsed: Structured<Vec<String>> = parse_structured("```json\n[\"a\", \"b\"]\n```");
        assert_eq!(
            parsed,
            Structured::Parsed(vec!["a".to_string(), "b".to_string()])
        );
    }

    #[test]
    fn test_parse_structured_unparsed_keeps_raw_text() {
        let parsed: Structured<Vec<String>> = parse_structured("not json at all");
        assert_eq!(parsed, Structured::Unparsed("not json at all".to_string()));
    }

    #[test]
    fn test_chat_response_text_trims_and_skips_empty() {
        let resp: ChatResponse =
            serde_json::from_str(r#"{"choices":[{"message":{"content":"  hi \n"}}]}"#).unwrap();
        assert_eq!(resp.text(), Some("hi"));

        let empty: ChatResponse =
            serde_json::from_str(r#"{"choices":[{"message":{"content":"   "}}]}"#).unwrap();
        assert_eq!(empty.text(), None);

        let none: ChatResponse = serde_json::from_str(r#"{"choices":[]}"#).unwrap();
        assert_eq!(none.text(), None);
    }
}
