use std::time::Duration;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::{debug, warn};
use url::Url;

use crate::config::Config;
use crate::llm::messages::{count_image_parts, ChatMessage};
use crate::llm::service::{
    ClassificationError, CompletionService, ImageGenerationError, ImageRequest, ImageService,
};
use crate::utils::http::get_http_client;
use crate::utils::timing::log_llm_timing;

const PROVIDER: &str = "openai";
const ERROR_BODY_LIMIT: usize = 2000;

fn truncate_for_log(value: &str, limit: usize) -> String {
    if value.chars().count() <= limit {
        return value.to_string();
    }
    let truncated: String = value.chars().take(limit).collect();
    format!("{truncated}... (truncated)")
}

fn summarize_error_body(body: &str) -> (Option<String>, String) {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return (None, "empty response body".to_string());
    }

    if let Ok(value) = serde_json::from_str::<Value>(trimmed) {
        let message = value
            .pointer("/error/message")
            .and_then(|v| v.as_str())
            .map(|v| v.to_string())
            .or_else(|| {
                value
                    .get("message")
                    .and_then(|v| v.as_str())
                    .map(|v| v.to_string())
            });
        return (message, truncate_for_log(&value.to_string(), ERROR_BODY_LIMIT));
    }

    (None, truncate_for_log(trimmed, ERROR_BODY_LIMIT))
}

fn summarize_payload(payload: &Value) -> String {
    let model = payload
        .get("model")
        .and_then(|v| v.as_str())
        .unwrap_or("unknown");
    let message_count = payload
        .get("messages")
        .and_then(|v| v.as_array())
        .map(|messages| messages.len());
    let prompt_chars = payload
        .get("prompt")
        .and_then(|v| v.as_str())
        .map(|prompt| prompt.chars().count());

    match (message_count, prompt_chars) {
        (Some(count), _) => format!("model={}, messages={}", model, count),
        (None, Some(chars)) => format!("model={}, prompt_chars={}", model, chars),
        (None, None) => format!("model={}", model),
    }
}

fn extract_completion_text(response: &Value) -> Option<String> {
    let content = response
        .pointer("/choices/0/message/content")
        .and_then(|v| v.as_str())?
        .trim()
        .to_string();
    if content.is_empty() {
        None
    } else {
        Some(content)
    }
}

fn extract_image_url(response: &Value) -> Result<String> {
    let raw = response
        .pointer("/data/0/url")
        .and_then(|v| v.as_str())
        .ok_or_else(|| anyhow!("Image response did not contain a URL"))?;
    let parsed = Url::parse(raw).map_err(|err| anyhow!("Image response URL is invalid: {err}"))?;
    Ok(parsed.to_string())
}

/// Client for the OpenAI chat completions and image generation endpoints.
#[derive(Clone)]
pub struct OpenAiClient {
    api_key: String,
    base_url: String,
    completion_model: String,
    image_model: String,
    timeout: Duration,
}

impl OpenAiClient {
    pub fn from_config(config: &Config) -> Self {
        Self {
            api_key: config.openai_api_key.clone(),
            base_url: config.openai_base_url.trim_end_matches('/').to_string(),
            completion_model: config.completion_model.clone(),
            image_model: config.image_model.clone(),
            timeout: Duration::from_secs(config.openai_timeout_seconds),
        }
    }

    fn redact(&self, text: &str) -> String {
        let key = self.api_key.trim();
        if key.is_empty() {
            return text.to_string();
        }
        text.replace(key, "[redacted]")
    }

    async fn call_openai_api(&self, path: &str, payload: &Value) -> Result<Value> {
        debug!("OpenAI request to {}: {}", path, summarize_payload(payload));

        let response = get_http_client()
            .post(format!("{}/{}", self.base_url, path))
            .bearer_auth(&self.api_key)
            .timeout(self.timeout)
            .json(payload)
            .send()
            .await
            .map_err(|err| anyhow!(self.redact(&err.to_string())))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            let (message, body_summary) = summarize_error_body(&body);
            warn!("OpenAI API error: status={}, body={}", status, body_summary);
            let detail = message.unwrap_or(body_summary);
            return Err(anyhow!(
                "OpenAI request failed with status {}: {}",
                status,
                self.redact(&detail)
            ));
        }

        let value = response.json::<Value>().await?;
        debug!("OpenAI response received from {}", path);
        Ok(value)
    }
}

#[async_trait]
impl CompletionService for OpenAiClient {
    fn name(&self) -> &'static str {
        PROVIDER
    }

    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, ClassificationError> {
        let payload = json!({
            "model": self.completion_model,
            "messages": messages,
        });
        let metadata = json!({
            "messages": messages.len(),
            "image_parts": count_image_parts(messages),
        });

        log_llm_timing(
            PROVIDER,
            &self.completion_model,
            "classification",
            Some(metadata),
            || async {
                let response = self.call_openai_api("chat/completions", &payload).await?;
                extract_completion_text(&response).ok_or_else(|| {
                    warn!(
                        "OpenAI completion had no text content: {}",
                        truncate_for_log(&response.to_string(), ERROR_BODY_LIMIT)
                    );
                    anyhow!("Completion response contained no text")
                })
            },
        )
        .await
        .map_err(|err| ClassificationError(err.to_string()))
    }
}

#[async_trait]
impl ImageService for OpenAiClient {
    fn name(&self) -> &'static str {
        PROVIDER
    }

    async fn generate(&self, request: &ImageRequest) -> Result<String, ImageGenerationError> {
        let payload = json!({
            "model": self.image_model,
            "prompt": request.prompt,
            "size": request.size,
            "quality": request.quality,
            "n": request.n,
        });

        log_llm_timing(
            PROVIDER,
            &self.image_model,
            "match_image",
            Some(json!({ "size": request.size, "quality": request.quality })),
            || async {
                let response = self.call_openai_api("images/generations", &payload).await?;
                extract_image_url(&response)
            },
        )
        .await
        .map_err(|err| ImageGenerationError(err.to_string()))
    }
}
