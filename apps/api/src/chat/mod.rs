//! Chat relay: forwards a chat-completion request to one of the supported
//! LLM providers, normalizing request and response shapes per provider.

pub mod providers;

use axum::{extract::State, http::HeaderMap, Json};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::config::Config;
use crate::errors::AppError;
use crate::state::AppState;
use providers::Provider;

pub const PROVIDER_HEADER: &str = "x-provider";
pub const PROVIDER_KEY_HEADER: &str = "x-provider-key";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    #[serde(default)]
    pub temperature: Option<f64>,
    #[serde(default)]
    pub max_tokens: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub ok: bool,
    pub text: String,
    pub raw: Value,
}

/// POST /llm-chat
pub async fn handle_chat(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, AppError> {
    let provider_name = header_str(&headers, PROVIDER_HEADER)
        .ok_or_else(|| AppError::Validation("Missing X-Provider header".to_string()))?;
    let provider = Provider::from_name(provider_name).ok_or_else(|| {
        AppError::Validation(format!("Unsupported provider '{provider_name}'"))
    })?;

    let api_key = resolve_api_key(
        provider,
        header_str(&headers, PROVIDER_KEY_HEADER),
        &state.config,
    )
    .ok_or_else(|| AppError::Validation("Missing X-Provider-Key header".to_string()))?;

    if req.messages.is_empty() {
        return Err(AppError::Validation("messages must not be empty".to_string()));
    }

    let payload = provider.build_payload(&req);
    debug!("Relaying chat to {} ({})", provider.name(), req.model);

    let response = provider
        .apply_headers(state.http.post(provider.endpoint()), &api_key)
        .json(&payload)
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(AppError::Provider {
            status: status.as_u16(),
            provider: provider.name(),
            message: extract_error_message(&body),
        });
    }

    let raw: Value = response.json().await?;
    let text = provider.extract_text(&raw).ok_or(AppError::Provider {
        status: 502,
        provider: provider.name(),
        message: "Completion carried no text content".to_string(),
    })?;

    Ok(Json(ChatResponse {
        ok: true,
        text,
        raw,
    }))
}

/// The caller's key always wins; the server-held OpenRouter key is the only
/// fallback. Every other provider requires a per-request key.
fn resolve_api_key(
    provider: Provider,
    header_key: Option<&str>,
    config: &Config,
) -> Option<String> {
    header_key.map(str::to_string).or_else(|| match provider {
        Provider::OpenRouter => config.openrouter_api_key.clone(),
        _ => None,
    })
}

pub fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
}

/// Best-effort extraction of a human-readable message from a provider error
/// body: `error.message`, then a bare `error` string, then the body itself.
fn extract_error_message(body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<Value>(body) {
        if let Some(message) = value.pointer("/error/message").and_then(Value::as_str) {
            return message.to_string();
        }
        if let Some(message) = value.get("error").and_then(Value::as_str) {
            return message.to_string();
        }
    }
    body.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn config_with_openrouter_key(key: Option<&str>) -> Config {
        Config {
            coze_api_base: "http://127.0.0.1:9".to_string(),
            coze_pat: "pat_test".to_string(),
            coze_resume_workflow_id: "w-resume".to_string(),
            coze_interview_workflow_id: "w-interview".to_string(),
            supabase_url: "http://127.0.0.1:9".to_string(),
            supabase_api_key: "anon_test".to_string(),
            openrouter_api_key: key.map(str::to_string),
            port: 0,
            rust_log: "info".to_string(),
        }
    }

    #[test]
    fn test_openrouter_falls_back_to_server_key() {
        let config = config_with_openrouter_key(Some("sk-server"));
        assert_eq!(
            resolve_api_key(Provider::OpenRouter, None, &config).as_deref(),
            Some("sk-server")
        );
        // A per-request key still wins over the configured one.
        assert_eq!(
            resolve_api_key(Provider::OpenRouter, Some("sk-caller"), &config).as_deref(),
            Some("sk-caller")
        );
    }

    #[test]
    fn test_other_providers_never_use_the_server_key() {
        let config = config_with_openrouter_key(Some("sk-server"));
        for provider in [Provider::OpenAi, Provider::Anthropic, Provider::DeepSeek] {
            assert_eq!(resolve_api_key(provider, None, &config), None);
        }
    }

    #[test]
    fn test_openrouter_without_any_key_resolves_to_none() {
        let config = config_with_openrouter_key(None);
        assert_eq!(resolve_api_key(Provider::OpenRouter, None, &config), None);
    }

    #[test]
    fn test_extract_error_message_variants() {
        assert_eq!(
            extract_error_message(r#"{"error":{"message":"bad key"}}"#),
            "bad key"
        );
        assert_eq!(extract_error_message(r#"{"error":"quota"}"#), "quota");
        assert_eq!(extract_error_message("plain failure"), "plain failure");
    }

    #[test]
    fn test_header_str_trims_and_rejects_empty() {
        let mut headers = HeaderMap::new();
        headers.insert(PROVIDER_HEADER, HeaderValue::from_static("  openai  "));
        headers.insert(PROVIDER_KEY_HEADER, HeaderValue::from_static(""));

        assert_eq!(header_str(&headers, PROVIDER_HEADER), Some("openai"));
        assert_eq!(header_str(&headers, PROVIDER_KEY_HEADER), None);
        assert_eq!(header_str(&headers, "x-missing"), None);
    }
}
