//! Coze workflow client — the single point of entry for all Coze API calls.
//!
//! Two operations exist: multipart file upload and workflow run. Both are
//! one-shot; failures are passed through to the caller with the upstream
//! status and body intact.

use reqwest::multipart::{Form, Part};
use serde_json::{json, Value};
use tracing::{debug, info};

use crate::errors::AppError;

const UPLOAD_PATH: &str = "/v1/files/upload";
const WORKFLOW_RUN_PATH: &str = "/v1/workflow/run";

#[derive(Clone)]
pub struct CozeClient {
    http: reqwest::Client,
    base_url: String,
    pat: String,
}

impl CozeClient {
    pub fn new(http: reqwest::Client, base_url: String, pat: String) -> Self {
        Self {
            http,
            base_url,
            pat,
        }
    }

    /// Uploads raw file bytes and returns the opaque file identifier Coze
    /// assigns to them.
    pub async fn upload_file(&self, bytes: Vec<u8>, file_name: &str) -> Result<String, AppError> {
        let size = bytes.len();
        let part = Part::bytes(bytes).file_name(file_name.to_string());
        let form = Form::new().part("file", part);

        let response = self
            .http
            .post(format!("{}{UPLOAD_PATH}", self.base_url))
            .bearer_auth(&self.pat)
            .multipart(form)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(AppError::from_upstream(response).await);
        }

        let body: Value = response.json().await?;
        debug!("File upload response: {body}");

        let file_id = extract_file_id(&body).ok_or_else(|| {
            AppError::Validation(format!("Upload response carried no file id: {body}"))
        })?;
        info!("Uploaded '{file_name}' ({size} bytes) as file {file_id}");
        Ok(file_id)
    }

    /// Runs a workflow by id with the given parameters and returns its output.
    pub async fn run_workflow(
        &self,
        workflow_id: &str,
        parameters: Value,
    ) -> Result<Value, AppError> {
        let response = self
            .http
            .post(format!("{}{WORKFLOW_RUN_PATH}", self.base_url))
            .bearer_auth(&self.pat)
            .json(&json!({
                "workflow_id": workflow_id,
                "parameters": parameters,
            }))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(AppError::from_upstream(response).await);
        }

        let body: Value = response.json().await?;

        // Coze wraps results in {code, msg, data}; a non-zero code is a
        // failure even under HTTP 200.
        if let Some(code) = body.get("code").and_then(Value::as_i64) {
            if code != 0 {
                return Err(AppError::Upstream {
                    status: 502,
                    body,
                });
            }
        }

        Ok(unwrap_workflow_output(body))
    }
}

/// Pulls the file id out of an upload response, tolerating the response
/// shapes seen across Coze API versions: `data.id`, `data.file_id`, `id`,
/// `file_id`, as either a string or a number.
pub fn extract_file_id(body: &Value) -> Option<String> {
    let candidates = [
        body.pointer("/data/id"),
        body.pointer("/data/file_id"),
        body.get("id"),
        body.get("file_id"),
    ];
    candidates.into_iter().flatten().find_map(|v| match v {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

/// Unwraps the `data` field of a workflow-run response. Coze returns workflow
/// output as a JSON-encoded string; decode it back to JSON when it is one.
pub fn unwrap_workflow_output(body: Value) -> Value {
    match body.get("data") {
        Some(Value::String(s)) => {
            serde_json::from_str(s).unwrap_or_else(|_| Value::String(s.clone()))
        }
        Some(data) => data.clone(),
        None => body,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_file_id_nested_id() {
        let body = json!({"code": 0, "data": {"id": "f1"}});
        assert_eq!(extract_file_id(&body).as_deref(), Some("f1"));
    }

    #[test]
    fn test_extract_file_id_nested_file_id() {
        let body = json!({"data": {"file_id": "abc123"}});
        assert_eq!(extract_file_id(&body).as_deref(), Some("abc123"));
    }

    #[test]
    fn test_extract_file_id_top_level_and_numeric() {
        assert_eq!(
            extract_file_id(&json!({"id": 7421})).as_deref(),
            Some("7421")
        );
        assert_eq!(
            extract_file_id(&json!({"file_id": "x"})).as_deref(),
            Some("x")
        );
    }

    #[test]
    fn test_extract_file_id_missing() {
        assert_eq!(extract_file_id(&json!({"data": {}})), None);
        assert_eq!(extract_file_id(&json!({"data": {"id": ""}})), None);
    }

    #[test]
    fn test_unwrap_output_decodes_json_string() {
        let body = json!({"code": 0, "data": "{\"result\":\"ok\"}"});
        assert_eq!(unwrap_workflow_output(body), json!({"result": "ok"}));
    }

    #[test]
    fn test_unwrap_output_keeps_plain_string() {
        let body = json!({"code": 0, "data": "plain text"});
        assert_eq!(unwrap_workflow_output(body), json!("plain text"));
    }

    #[test]
    fn test_unwrap_output_passes_object_through() {
        let body = json!({"code": 0, "data": {"result": "ok"}});
        assert_eq!(unwrap_workflow_output(body), json!({"result": "ok"}));
    }

    #[test]
    fn test_unwrap_output_without_data_field() {
        let body = json!({"result": "ok"});
        assert_eq!(unwrap_workflow_output(body), json!({"result": "ok"}));
    }
}
