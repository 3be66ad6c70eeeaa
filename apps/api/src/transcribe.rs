//! Transcription relay: forwards a base64 audio payload to a provider's
//! audio-transcriptions endpoint and returns the recognized text.

use axum::{extract::State, http::HeaderMap, Json};
use reqwest::multipart::{Form, Part};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::chat::providers::Provider;
use crate::chat::{header_str, PROVIDER_HEADER, PROVIDER_KEY_HEADER};
use crate::errors::AppError;
use crate::payload::decode_file_payload;
use crate::state::AppState;

const DEFAULT_MODEL: &str = "whisper-1";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranscribeRequest {
    pub filename: String,
    pub mime: String,
    pub data_base64: String,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct TranscribeResponse {
    pub text: String,
}

/// POST /transcribe
pub async fn handle_transcribe(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<TranscribeRequest>,
) -> Result<Json<TranscribeResponse>, AppError> {
    let provider_name = header_str(&headers, PROVIDER_HEADER)
        .ok_or_else(|| AppError::Validation("Missing X-Provider header".to_string()))?;
    let provider = Provider::from_name(provider_name).ok_or_else(|| {
        AppError::Validation(format!("Unsupported provider '{provider_name}'"))
    })?;
    let endpoint = audio_endpoint(provider)?;
    let api_key = header_str(&headers, PROVIDER_KEY_HEADER)
        .ok_or_else(|| AppError::Validation("Missing X-Provider-Key header".to_string()))?;

    let bytes = decode_file_payload(&req.data_base64)?;
    let model = req.model.as_deref().unwrap_or(DEFAULT_MODEL).to_string();
    debug!(
        "Transcribing '{}' ({} bytes) via {} model {model}",
        req.filename,
        bytes.len(),
        provider.name()
    );

    let part = Part::bytes(bytes)
        .file_name(req.filename.clone())
        .mime_str(&req.mime)
        .map_err(|e| AppError::Validation(format!("Invalid MIME type '{}': {e}", req.mime)))?;
    let mut form = Form::new().part("file", part).text("model", model);
    if let Some(language) = req.language {
        form = form.text("language", language);
    }

    let response = state
        .http
        .post(endpoint)
        .bearer_auth(api_key)
        .multipart(form)
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(AppError::Provider {
            status: status.as_u16(),
            provider: provider.name(),
            message: body,
        });
    }

    let raw: Value = response.json().await?;
    let text = raw
        .get("text")
        .and_then(Value::as_str)
        .ok_or(AppError::Provider {
            status: 502,
            provider: provider.name(),
            message: "Transcription response carried no text".to_string(),
        })?
        .to_string();

    Ok(Json(TranscribeResponse { text }))
}

/// Only providers with an audio API are accepted here; the rest are a caller
/// error, not an upstream one.
fn audio_endpoint(provider: Provider) -> Result<&'static str, AppError> {
    match provider {
        Provider::OpenAi => Ok("https://api.openai.com/v1/audio/transcriptions"),
        _ => Err(AppError::Validation(format!(
            "Provider '{}' does not support audio transcription",
            provider.name()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_audio_endpoint_accepts_openai() {
        assert!(audio_endpoint(Provider::OpenAi).is_ok());
    }

    #[test]
    fn test_audio_endpoint_rejects_chat_only_providers() {
        for provider in [Provider::OpenRouter, Provider::Anthropic, Provider::DeepSeek] {
            let err = audio_endpoint(provider).unwrap_err();
            assert!(matches!(err, AppError::Validation(_)));
        }
    }
}
