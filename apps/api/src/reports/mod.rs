//! Report store relay: list, save, and delete against the Supabase REST
//! interface, with the caller's bearer token passed through unchanged.

pub mod store;

use axum::{
    extract::{Query, State},
    http::{header, HeaderMap},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::errors::AppError;
use crate::state::AppState;
use store::NewReport;

#[derive(Debug, Deserialize)]
pub struct UserIdQuery {
    pub user_id: Uuid,
}

#[derive(Debug, Deserialize)]
pub struct DeleteReportRequest {
    pub id: Uuid,
    pub user_id: Uuid,
}

/// GET /reports-list
pub async fn handle_list_reports(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<Value>, AppError> {
    let token = bearer_token(&headers)?;
    let rows = state.reports.list(token, params.user_id).await?;
    Ok(Json(json!({ "data": rows })))
}

/// POST /reports-save
pub async fn handle_save_report(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(report): Json<NewReport>,
) -> Result<Json<Value>, AppError> {
    let token = bearer_token(&headers)?;
    let row = state.reports.insert(token, &report).await?;
    Ok(Json(json!({ "data": row })))
}

/// POST /reports-delete
pub async fn handle_delete_report(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<DeleteReportRequest>,
) -> Result<Json<Value>, AppError> {
    let token = bearer_token(&headers)?;
    state
        .reports
        .delete(token, req.id, req.user_id, false)
        .await?;
    Ok(Json(json!({ "ok": true })))
}

/// DELETE /reports-delete — same operation, but echoes the deleted row back.
pub async fn handle_delete_report_returning(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<DeleteReportRequest>,
) -> Result<Json<Value>, AppError> {
    let token = bearer_token(&headers)?;
    let row = state
        .reports
        .delete(token, req.id, req.user_id, true)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Report {} not found", req.id)))?;
    Ok(Json(json!({ "success": true, "deletedReport": row })))
}

/// Extracts the bearer token from the Authorization header. Anything other
/// than a non-empty `Bearer `-prefixed value is a 401.
fn bearer_token(headers: &HeaderMap) -> Result<&str, AppError> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or(AppError::Unauthorized)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers_with_auth(value: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static(value));
        headers
    }

    #[test]
    fn test_bearer_token_accepted() {
        let headers = headers_with_auth("Bearer sbp_token123");
        assert_eq!(bearer_token(&headers).unwrap(), "sbp_token123");
    }

    #[test]
    fn test_missing_header_is_unauthorized() {
        let err = bearer_token(&HeaderMap::new()).unwrap_err();
        assert!(matches!(err, AppError::Unauthorized));
    }

    #[test]
    fn test_non_bearer_scheme_is_unauthorized() {
        let headers = headers_with_auth("Basic dXNlcjpwdw==");
        assert!(matches!(
            bearer_token(&headers).unwrap_err(),
            AppError::Unauthorized
        ));
    }

    #[test]
    fn test_empty_bearer_token_is_unauthorized() {
        let headers = headers_with_auth("Bearer ");
        assert!(matches!(
            bearer_token(&headers).unwrap_err(),
            AppError::Unauthorized
        ));
    }
}
