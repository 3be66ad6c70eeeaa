use crate::config::Config;
use crate::reports::store::ReportStore;
use crate::workflow::CozeClient;

/// Shared application state injected into all route handlers via Axum extractors.
/// Holds no mutable state: one connection-pooled HTTP client plus the clients
/// derived from it.
#[derive(Clone)]
pub struct AppState {
    pub http: reqwest::Client,
    pub coze: CozeClient,
    pub reports: ReportStore,
    pub config: Config,
}
