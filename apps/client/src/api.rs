//! Typed wrappers around the Hireview API surface.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::error::ClientError;
use crate::files::{encode_file, validate_file, FileKind};

#[derive(Debug, Clone, Serialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatParams {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct ChatReply {
    pub ok: bool,
    pub text: String,
    pub raw: Value,
}

/// A report to be saved; mirrors the store's column names.
#[derive(Debug, Clone, Serialize)]
pub struct ReportDraft {
    pub user_id: Uuid,
    pub title: String,
    pub report_type: String,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub markdown_output: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub candidate_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub match_score: Option<i32>,
}

pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            http: reqwest::Client::new(),
            base_url,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    pub async fn health(&self) -> Result<Value, ClientError> {
        self.execute(self.http.get(self.url("/health"))).await
    }

    /// Validates and encodes a résumé file, then requests its analysis
    /// against the given job description.
    pub async fn analyze_resume(
        &self,
        file_name: &str,
        file_bytes: &[u8],
        jd: &str,
        prompt: Option<&str>,
    ) -> Result<Value, ClientError> {
        validate_file(file_name, file_bytes.len() as u64, FileKind::Document)?;
        let body = json!({
            "fileBase64": encode_file(file_bytes),
            "fileName": file_name,
            "jd": jd,
            "prompt": prompt,
        });
        self.execute(self.http.post(self.url("/resume-analyze")).json(&body))
            .await
    }

    /// Validates and encodes an interview transcript, then requests its
    /// analysis. `recording_url` points to an already-hosted recording.
    pub async fn analyze_interview(
        &self,
        file_name: &str,
        file_bytes: &[u8],
        name: &str,
        recording_url: Option<&str>,
    ) -> Result<Value, ClientError> {
        validate_file(file_name, file_bytes.len() as u64, FileKind::Document)?;
        let body = json!({
            "fileBase64": encode_file(file_bytes),
            "fileName": file_name,
            "name": name,
            "recordingUrl": recording_url,
        });
        self.execute(self.http.post(self.url("/interview-analyze")).json(&body))
            .await
    }

    pub async fn chat(
        &self,
        provider: &str,
        api_key: &str,
        params: &ChatParams,
    ) -> Result<ChatReply, ClientError> {
        let value = self
            .execute(
                self.http
                    .post(self.url("/llm-chat"))
                    .header("X-Provider", provider)
                    .header("X-Provider-Key", api_key)
                    .json(params),
            )
            .await?;
        serde_json::from_value(value).map_err(|e| ClientError::UnexpectedResponse(e.to_string()))
    }

    pub async fn transcribe(
        &self,
        provider: &str,
        api_key: &str,
        file_name: &str,
        mime: &str,
        file_bytes: &[u8],
        model: Option<&str>,
        language: Option<&str>,
    ) -> Result<String, ClientError> {
        validate_file(file_name, file_bytes.len() as u64, FileKind::Audio)?;
        let body = transcribe_body(file_name, mime, file_bytes, model, language);
        let value = self
            .execute(
                self.http
                    .post(self.url("/transcribe"))
                    .header("X-Provider", provider)
                    .header("X-Provider-Key", api_key)
                    .json(&body),
            )
            .await?;
        value
            .get("text")
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| {
                ClientError::UnexpectedResponse("transcription carried no text".to_string())
            })
    }

    pub async fn list_reports(&self, token: &str, user_id: Uuid) -> Result<Value, ClientError> {
        self.execute(
            self.http
                .get(self.url("/reports-list"))
                .query(&[("user_id", user_id.to_string())])
                .bearer_auth(token),
        )
        .await
    }

    pub async fn save_report(
        &self,
        token: &str,
        report: &ReportDraft,
    ) -> Result<Value, ClientError> {
        self.execute(
            self.http
                .post(self.url("/reports-save"))
                .bearer_auth(token)
                .json(report),
        )
        .await
    }

    pub async fn delete_report(
        &self,
        token: &str,
        id: Uuid,
        user_id: Uuid,
    ) -> Result<(), ClientError> {
        self.execute(
            self.http
                .post(self.url("/reports-delete"))
                .bearer_auth(token)
                .json(&json!({ "id": id, "user_id": user_id })),
        )
        .await?;
        Ok(())
    }

    /// The DELETE variant of report deletion; surfaces the removed row.
    pub async fn delete_report_returning(
        &self,
        token: &str,
        id: Uuid,
        user_id: Uuid,
    ) -> Result<Value, ClientError> {
        let value = self
            .execute(
                self.http
                    .delete(self.url("/reports-delete"))
                    .bearer_auth(token)
                    .json(&json!({ "id": id, "user_id": user_id })),
            )
            .await?;
        deleted_report(value)
    }

    /// Sends the request, maps non-2xx statuses to `ClientError::Api`, and
    /// rejects 2xx bodies that still carry an `error` field.
    async fn execute(&self, request: reqwest::RequestBuilder) -> Result<Value, ClientError> {
        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;
        let value = serde_json::from_str::<Value>(&text).unwrap_or(Value::String(text));

        if !status.is_success() {
            return Err(ClientError::Api {
                status: status.as_u16(),
                message: error_message(&value),
            });
        }
        check_response(&value)?;
        Ok(value)
    }
}

/// Rejects a parsed body that carries an `error` field.
pub fn check_response(value: &Value) -> Result<(), ClientError> {
    if value.get("error").is_some() {
        return Err(ClientError::UnexpectedResponse(error_message(value)));
    }
    Ok(())
}

fn transcribe_body(
    file_name: &str,
    mime: &str,
    file_bytes: &[u8],
    model: Option<&str>,
    language: Option<&str>,
) -> Value {
    json!({
        "filename": file_name,
        "mime": mime,
        "dataBase64": encode_file(file_bytes),
        "model": model,
        "language": language,
    })
}

fn deleted_report(value: Value) -> Result<Value, ClientError> {
    value.get("deletedReport").cloned().ok_or_else(|| {
        ClientError::UnexpectedResponse("delete response carried no deletedReport".to_string())
    })
}

fn error_message(value: &Value) -> String {
    value
        .pointer("/error/message")
        .or_else(|| value.get("error"))
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_is_trimmed() {
        let client = ApiClient::new("http://localhost:8080/");
        assert_eq!(client.url("/health"), "http://localhost:8080/health");
    }

    #[test]
    fn test_check_response_rejects_error_bodies() {
        let body = json!({"error": {"code": "VALIDATION_ERROR", "message": "bad input"}});
        let err = check_response(&body).unwrap_err();
        assert!(matches!(err, ClientError::UnexpectedResponse(_)));
        assert!(err.to_string().contains("bad input"));

        assert!(check_response(&json!({"ok": true})).is_ok());
    }

    #[test]
    fn test_error_message_variants() {
        assert_eq!(
            error_message(&json!({"error": {"message": "nope"}})),
            "nope"
        );
        assert_eq!(error_message(&json!({"error": "plain"})), "plain");
        assert_eq!(error_message(&json!({"status": 500})), r#"{"status":500}"#);
    }

    #[test]
    fn test_transcribe_body_forwards_model_and_language() {
        let body = transcribe_body("call.mp3", "audio/mpeg", b"abc", Some("whisper-1"), Some("en"));
        assert_eq!(body["model"], "whisper-1");
        assert_eq!(body["language"], "en");
        assert_eq!(body["filename"], "call.mp3");
        assert_eq!(body["mime"], "audio/mpeg");
        assert!(body["dataBase64"].is_string());

        let body = transcribe_body("call.mp3", "audio/mpeg", b"abc", None, None);
        assert!(body["model"].is_null());
    }

    #[test]
    fn test_deleted_report_extraction() {
        let body = json!({"success": true, "deletedReport": {"id": "r1"}});
        assert_eq!(deleted_report(body).unwrap(), json!({"id": "r1"}));

        let err = deleted_report(json!({"ok": true})).unwrap_err();
        assert!(matches!(err, ClientError::UnexpectedResponse(_)));
    }

    #[test]
    fn test_chat_params_omit_absent_tuning_fields() {
        let params = ChatParams {
            model: "m".to_string(),
            messages: vec![],
            temperature: None,
            max_tokens: None,
        };
        let value = serde_json::to_value(&params).unwrap();
        assert!(value.get("temperature").is_none());
        assert!(value.get("max_tokens").is_none());
    }
}
