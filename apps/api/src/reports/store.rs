//! Supabase REST client for the `reports` table.
//!
//! The relay never interprets rows: list and delete pass the store's JSON
//! through untouched, and errors keep the store's status and body. The
//! caller's bearer token is forwarded unchanged so the store's row-level
//! policies stay in charge of ownership.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::warn;
use uuid::Uuid;

use crate::errors::AppError;

#[derive(Clone)]
pub struct ReportStore {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

/// Insert payload for a report row. Optional columns are omitted from the
/// JSON entirely so older schemas without them still accept the reduced set.
#[derive(Debug, Serialize, Deserialize)]
pub struct NewReport {
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

impl NewReport {
    /// The minimal column set every deployed schema has.
    fn reduced(&self) -> Value {
        json!({
            "user_id": self.user_id,
            "title": self.title,
            "report_type": self.report_type,
            "content": self.content,
        })
    }
}

impl ReportStore {
    pub fn new(http: reqwest::Client, base_url: String, api_key: String) -> Self {
        Self {
            http,
            base_url,
            api_key,
        }
    }

    fn reports_url(&self, query: &str) -> String {
        format!("{}/rest/v1/reports?{query}", self.base_url)
    }

    /// Lists all reports owned by `user_id`, newest first.
    pub async fn list(&self, bearer: &str, user_id: Uuid) -> Result<Value, AppError> {
        let response = self
            .http
            .get(self.reports_url(&list_query(user_id)))
            .header("apikey", &self.api_key)
            .bearer_auth(bearer)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(AppError::from_upstream(response).await);
        }
        Ok(response.json().await?)
    }

    /// Inserts a report. Tries the full column set first; if the store
    /// rejects it (schema drift between deployments), retries once with the
    /// reduced set before surfacing the failure.
    pub async fn insert(&self, bearer: &str, report: &NewReport) -> Result<Value, AppError> {
        let extended = serde_json::to_value(report)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Report serialization: {e}")))?;

        match self.try_insert(bearer, &extended).await {
            Ok(row) => Ok(row),
            Err(first) => {
                warn!("Extended insert failed ({first}); retrying with reduced columns");
                self.try_insert(bearer, &report.reduced()).await
            }
        }
    }

    async fn try_insert(&self, bearer: &str, payload: &Value) -> Result<Value, AppError> {
        let response = self
            .http
            .post(self.reports_url("select=*"))
            .header("apikey", &self.api_key)
            .bearer_auth(bearer)
            .header("Prefer", "return=representation")
            .json(payload)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(AppError::from_upstream(response).await);
        }

        // PostgREST answers inserts with an array of the created rows.
        let rows: Value = response.json().await?;
        Ok(rows.get(0).cloned().unwrap_or(rows))
    }

    /// Deletes one report by id, scoped to its owner. With `return_row` the
    /// store is asked to echo the deleted row back.
    pub async fn delete(
        &self,
        bearer: &str,
        id: Uuid,
        user_id: Uuid,
        return_row: bool,
    ) -> Result<Option<Value>, AppError> {
        let mut request = self
            .http
            .delete(self.reports_url(&delete_query(id, user_id)))
            .header("apikey", &self.api_key)
            .bearer_auth(bearer);
        if return_row {
            request = request.header("Prefer", "return=representation");
        }

        let response = request.send().await?;
        if !response.status().is_success() {
            return Err(AppError::from_upstream(response).await);
        }

        if return_row {
            let rows: Value = response.json().await?;
            Ok(rows.get(0).cloned())
        } else {
            Ok(None)
        }
    }
}

/// PostgREST filter for listing one user's reports, newest first.
pub fn list_query(user_id: Uuid) -> String {
    format!("user_id=eq.{user_id}&select=*&order=created_at.desc")
}

/// PostgREST filter for deleting one report scoped to its owner.
pub fn delete_query(id: Uuid, user_id: Uuid) -> String {
    format!("id=eq.{id}&user_id=eq.{user_id}")
}
