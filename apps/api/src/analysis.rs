//! Analysis endpoints: résumé and interview-transcript analysis.
//!
//! Each handler is a two-step relay: upload the caller's file to Coze, then
//! run the matching workflow with the returned file id and the caller's
//! parameters. The workflow output is returned raw, alongside debug metadata.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::info;

use crate::errors::AppError;
use crate::payload::decode_file_payload;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumeAnalyzeRequest {
    pub file_base64: String,
    pub file_name: String,
    pub jd: String,
    #[serde(default)]
    pub prompt: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterviewAnalyzeRequest {
    pub file_base64: String,
    pub file_name: String,
    /// Interviewee name, forwarded to the workflow as-is.
    pub name: String,
    #[serde(default)]
    pub recording_url: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    pub success: bool,
    pub data: Value,
    pub debug: DebugInfo,
}

#[derive(Debug, Serialize)]
pub struct DebugInfo {
    pub workflow_id: String,
    pub file_id: String,
}

/// POST /resume-analyze
pub async fn handle_resume_analyze(
    State(state): State<AppState>,
    Json(req): Json<ResumeAnalyzeRequest>,
) -> Result<Json<AnalyzeResponse>, AppError> {
    require_field(&req.file_base64, "fileBase64")?;
    require_field(&req.file_name, "fileName")?;
    require_field(&req.jd, "jd")?;

    let bytes = decode_file_payload(&req.file_base64)?;
    let file_id = state.coze.upload_file(bytes, &req.file_name).await?;

    let workflow_id = state.config.coze_resume_workflow_id.clone();
    let parameters = resume_parameters(&file_id, &req.jd, req.prompt.as_deref());
    info!("Running resume workflow {workflow_id} for file {file_id}");
    let data = state.coze.run_workflow(&workflow_id, parameters).await?;

    Ok(Json(AnalyzeResponse {
        success: true,
        data,
        debug: DebugInfo {
            workflow_id,
            file_id,
        },
    }))
}

/// POST /interview-analyze
pub async fn handle_interview_analyze(
    State(state): State<AppState>,
    Json(req): Json<InterviewAnalyzeRequest>,
) -> Result<Json<AnalyzeResponse>, AppError> {
    require_field(&req.file_base64, "fileBase64")?;
    require_field(&req.file_name, "fileName")?;
    require_field(&req.name, "name")?;

    let bytes = decode_file_payload(&req.file_base64)?;
    let file_id = state.coze.upload_file(bytes, &req.file_name).await?;

    let workflow_id = state.config.coze_interview_workflow_id.clone();
    let parameters =
        interview_parameters(&file_id, &req.name, req.recording_url.as_deref());
    info!("Running interview workflow {workflow_id} for file {file_id}");
    let data = state.coze.run_workflow(&workflow_id, parameters).await?;

    Ok(Json(AnalyzeResponse {
        success: true,
        data,
        debug: DebugInfo {
            workflow_id,
            file_id,
        },
    }))
}

fn require_field(value: &str, name: &str) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::Validation(format!("Missing required field '{name}'")));
    }
    Ok(())
}

/// Coze file-typed workflow parameters are passed as a JSON-encoded
/// `{"file_id": ...}` string, not as a nested object.
fn file_parameter(file_id: &str) -> String {
    json!({ "file_id": file_id }).to_string()
}

fn resume_parameters(file_id: &str, jd: &str, prompt: Option<&str>) -> Value {
    json!({
        "resume_file": file_parameter(file_id),
        "jd": jd,
        "prompt": prompt.unwrap_or_default(),
    })
}

fn interview_parameters(file_id: &str, name: &str, recording_url: Option<&str>) -> Value {
    json!({
        "transcript_file": file_parameter(file_id),
        "interviewee": name,
        "recording_url": recording_url.unwrap_or_default(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resume_parameters_shape() {
        let params = resume_parameters("f1", "ping", None);
        assert_eq!(params["jd"], "ping");
        assert_eq!(params["prompt"], "");
        assert_eq!(params["resume_file"], "{\"file_id\":\"f1\"}");
    }

    #[test]
    fn test_interview_parameters_shape() {
        let params = interview_parameters("f2", "Ada", Some("https://rec/1"));
        assert_eq!(params["interviewee"], "Ada");
        assert_eq!(params["recording_url"], "https://rec/1");
        assert_eq!(params["transcript_file"], "{\"file_id\":\"f2\"}");
    }

    #[test]
    fn test_analyze_response_shape() {
        let response = AnalyzeResponse {
            success: true,
            data: json!({"result": "ok"}),
            debug: DebugInfo {
                workflow_id: "w1".to_string(),
                file_id: "f1".to_string(),
            },
        };
        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(
            value,
            json!({
                "success": true,
                "data": {"result": "ok"},
                "debug": {"workflow_id": "w1", "file_id": "f1"}
            })
        );
    }

    #[test]
    fn test_require_field_rejects_blank() {
        assert!(require_field("  ", "jd").is_err());
        assert!(require_field("ok", "jd").is_ok());
    }
}
