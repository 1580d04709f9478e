// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Client for an OpenAI-compatible chat-completions service.
//!
//! Handles:
//! - Credential check before any network I/O
//! - JSON-mode requests with a system directive and one user message
//! - Mapping non-success statuses and transport failures to `Upstream`
//! - Extracting a JSON object from the several content shapes models return

use crate::config::CompletionConfig;
use crate::error::{AdapterError, AppError};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Chat-completions client.
#[derive(Clone)]
pub struct CompletionClient {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
    model: String,
    site_url: Option<String>,
    app_name: String,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    response_format: ResponseFormat,
    messages: [ChatMessage<'a>; 2],
}

#[derive(Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<Value>,
}

impl CompletionClient {
    /// Build a client from configuration.
    pub fn new(config: &CompletionConfig) -> Result<Self, AppError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().map_err(|e| {
            AppError::Internal(anyhow::anyhow!("Failed to build HTTP client: {}", e))
        })?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone().filter(|k| !k.trim().is_empty()),
            model: config.model.clone(),
            site_url: config.site_url.clone(),
            app_name: config.app_name.clone(),
        })
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    /// Send one JSON-mode completion and return the parsed JSON object.
    pub async fn complete_json(
        &self,
        directive: &str,
        user_message: &str,
    ) -> Result<Map<String, Value>, AdapterError> {
        let api_key = self.api_key.as_deref().ok_or(AdapterError::Configuration)?;

        let body = ChatRequest {
            model: &self.model,
            response_format: ResponseFormat {
                kind: "json_object",
            },
            messages: [
                ChatMessage {
                    role: "system",
                    content: directive,
                },
                ChatMessage {
                    role: "user",
                    content: user_message,
                },
            ],
        };

        let mut request = self
            .http
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(api_key)
            .header("X-Title", &self.app_name)
            .json(&body);
        if let Some(site_url) = &self.site_url {
            request = request.header("HTTP-Referer", site_url);
        }

        let response = request.send().await.map_err(|e| AdapterError::Upstream {
            status: None,
            body: e.to_string(),
        })?;

        let status = response.status();
        let text = response.text().await.map_err(|e| AdapterError::Upstream {
            status: Some(status.as_u16()),
            body: e.to_string(),
        })?;

        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), "Completion service returned an error");
            return Err(AdapterError::Upstream {
                status: Some(status.as_u16()),
                body: text,
            });
        }

        let parsed: ChatResponse = serde_json::from_str(&text)
            .map_err(|e| AdapterError::MalformedResponse(format!("invalid envelope: {}", e)))?;

        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| AdapterError::MalformedResponse("no content".to_string()))?;

        extract_payload(content)
    }
}

/// Turn message content into a JSON object.
///
/// Content may be a JSON-encoded string, an object already, or an array of
/// content blocks; for blocks the first `"text"` block is used and a missing
/// one reads as `{}`.
pub fn extract_payload(content: Value) -> Result<Map<String, Value>, AdapterError> {
    let parsed = match content {
        Value::String(s) if s.trim().is_empty() => {
            return Err(AdapterError::MalformedResponse("empty content".to_string()))
        }
        Value::String(s) => parse_object_text(&s)?,
        Value::Array(blocks) => {
            let text = blocks
                .iter()
                .find(|b| b.get("type").and_then(Value::as_str) == Some("text"))
                .and_then(|b| b.get("text"))
                .and_then(Value::as_str)
                .unwrap_or_default();
            parse_object_text(if text.is_empty() { "{}" } else { text })?
        }
        other => other,
    };

    match parsed {
        Value::Object(map) => Ok(map),
        other => Err(AdapterError::MalformedResponse(format!(
            "expected a JSON object, got {}",
            json_kind(&other)
        ))),
    }
}

fn parse_object_text(text: &str) -> Result<Value, AdapterError> {
    serde_json::from_str(text).map_err(|e| AdapterError::MalformedResponse(e.to_string()))
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_string_content_is_parsed() {
        let map = extract_payload(json!("{\"category\":\"food\"}")).unwrap();
        assert_eq!(map["category"], "food");
    }

    #[test]
    fn test_object_content_used_directly() {
        let map = extract_payload(json!({"category": "home"})).unwrap();
        assert_eq!(map["category"], "home");
    }

    #[test]
    fn test_first_text_block_used() {
        let content = json!([
            {"type": "reasoning", "text": "{\"category\":\"wrong\"}"},
            {"type": "text", "text": "{\"category\":\"transport\"}"},
            {"type": "text", "text": "{\"category\":\"also wrong\"}"}
        ]);
        let map = extract_payload(content).unwrap();
        assert_eq!(map["category"], "transport");
    }

    #[test]
    fn test_blocks_without_text_read_as_empty_object() {
        let map = extract_payload(json!([{"type": "image_url"}])).unwrap();
        assert!(map.is_empty());
    }

    #[test]
    fn test_unparseable_text_is_malformed() {
        for content in [
            json!("Sure! Here is your estimate: about 400g"),
            json!(""),
            json!("[1, 2, 3]"),
            json!(42),
            json!(null),
        ] {
            assert!(
                matches!(
                    extract_payload(content.clone()),
                    Err(AdapterError::MalformedResponse(_))
                ),
                "expected malformed for {}",
                content
            );
        }
    }

    #[tokio::test]
    async fn test_missing_key_fails_before_network() {
        // Port 9 (discard) would fail to connect; Configuration must come first.
        let client = CompletionClient::new(&CompletionConfig {
            api_key: None,
            base_url: "http://127.0.0.1:9".to_string(),
            ..CompletionConfig::default()
        })
        .unwrap();

        assert!(!client.is_configured());
        let err = client.complete_json("directive", "hello").await.unwrap_err();
        assert!(matches!(err, AdapterError::Configuration));
    }

    #[test]
    fn test_blank_key_counts_as_missing() {
        let client = CompletionClient::new(&CompletionConfig {
            api_key: Some("   ".to_string()),
            ..CompletionConfig::default()
        })
        .unwrap();
        assert!(!client.is_configured());
    }
}
