pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::analysis;
use crate::chat;
use crate::reports;
use crate::state::AppState;
use crate::transcribe;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Analysis relays (Coze workflows)
        .route("/resume-analyze", post(analysis::handle_resume_analyze))
        .route(
            "/interview-analyze",
            post(analysis::handle_interview_analyze),
        )
        // LLM relays
        .route("/llm-chat", post(chat::handle_chat))
        .route("/transcribe", post(transcribe::handle_transcribe))
        // Report store relays (Supabase REST)
        .route("/reports-list", get(reports::handle_list_reports))
        .route("/reports-save", post(reports::handle_save_report))
        .route(
            "/reports-delete",
            post(reports::handle_delete_report)
                .delete(reports::handle_delete_report_returning),
        )
        .with_state(state)
}
