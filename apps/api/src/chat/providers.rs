//! The closed set of supported chat providers.
//!
//! Each variant carries its endpoint, header shape, payload shape, and
//! response extractor; the handler dispatches on the variant and never
//! branches on provider names itself.

use reqwest::RequestBuilder;
use serde_json::{json, Value};

use super::ChatRequest;

const ANTHROPIC_VERSION: &str = "2023-06-01";
/// Anthropic rejects requests without `max_tokens`; used when the caller
/// sends none.
const ANTHROPIC_DEFAULT_MAX_TOKENS: u32 = 1024;

/// Sent with OpenRouter requests for their app-attribution scheme.
const OPENROUTER_REFERER: &str = "https://hireview.app";
const OPENROUTER_TITLE: &str = "Hireview";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    OpenRouter,
    OpenAi,
    Anthropic,
    DeepSeek,
}

#[cfg(test)]
pub const ALL_PROVIDERS: &[Provider] = &[
    Provider::OpenRouter,
    Provider::OpenAi,
    Provider::Anthropic,
    Provider::DeepSeek,
];

impl Provider {
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "openrouter" => Some(Provider::OpenRouter),
            "openai" => Some(Provider::OpenAi),
            "anthropic" | "claude" => Some(Provider::Anthropic),
            "deepseek" => Some(Provider::DeepSeek),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Provider::OpenRouter => "openrouter",
            Provider::OpenAi => "openai",
            Provider::Anthropic => "anthropic",
            Provider::DeepSeek => "deepseek",
        }
    }

    pub fn endpoint(&self) -> &'static str {
        match self {
            Provider::OpenRouter => "https://openrouter.ai/api/v1/chat/completions",
            Provider::OpenAi => "https://api.openai.com/v1/chat/completions",
            Provider::Anthropic => "https://api.anthropic.com/v1/messages",
            Provider::DeepSeek => "https://api.deepseek.com/v1/chat/completions",
        }
    }

    pub fn apply_headers(&self, request: RequestBuilder, api_key: &str) -> RequestBuilder {
        match self {
            Provider::Anthropic => request
                .header("x-api-key", api_key)
                .header("anthropic-version", ANTHROPIC_VERSION),
            Provider::OpenRouter => request
                .bearer_auth(api_key)
                .header("HTTP-Referer", OPENROUTER_REFERER)
                .header("X-Title", OPENROUTER_TITLE),
            Provider::OpenAi | Provider::DeepSeek => request.bearer_auth(api_key),
        }
    }

    pub fn build_payload(&self, req: &ChatRequest) -> Value {
        match self {
            Provider::Anthropic => anthropic_payload(req),
            _ => openai_payload(req),
        }
    }

    /// Pulls the assistant's plain text out of the provider's response shape.
    pub fn extract_text(&self, raw: &Value) -> Option<String> {
        let text = match self {
            Provider::Anthropic => raw
                .get("content")?
                .as_array()?
                .iter()
                .find(|block| block["type"] == "text")?
                .get("text")?
                .as_str()?,
            _ => raw.pointer("/choices/0/message/content")?.as_str()?,
        };
        if text.is_empty() {
            None
        } else {
            Some(text.to_string())
        }
    }
}

/// The OpenAI chat-completions shape, shared by OpenRouter and DeepSeek.
fn openai_payload(req: &ChatRequest) -> Value {
    let mut payload = json!({
        "model": req.model,
        "messages": req.messages,
    });
    if let Some(temperature) = req.temperature {
        payload["temperature"] = json!(temperature);
    }
    if let Some(max_tokens) = req.max_tokens {
        payload["max_tokens"] = json!(max_tokens);
    }
    payload
}

/// The Anthropic Messages shape: `system` is a top-level field, and each
/// remaining turn's content becomes an array of text blocks.
fn anthropic_payload(req: &ChatRequest) -> Value {
    let system: Vec<&str> = req
        .messages
        .iter()
        .filter(|m| m.role == "system")
        .map(|m| m.content.as_str())
        .collect();

    let turns: Vec<Value> = req
        .messages
        .iter()
        .filter(|m| m.role != "system")
        .map(|m| {
            json!({
                "role": m.role,
                "content": [{ "type": "text", "text": m.content }],
            })
        })
        .collect();

    let mut payload = json!({
        "model": req.model,
        "max_tokens": req.max_tokens.unwrap_or(ANTHROPIC_DEFAULT_MAX_TOKENS),
        "messages": turns,
    });
    if !system.is_empty() {
        payload["system"] = json!(system.join("\n\n"));
    }
    if let Some(temperature) = req.temperature {
        payload["temperature"] = json!(temperature);
    }
    payload
}
