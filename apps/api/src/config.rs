use anyhow::{Context, Result};

/// Static fallback values used when the corresponding environment variables
/// are absent. A deployment convenience, not a security boundary: anything
/// secret defaults to an obvious placeholder and must come from the
/// environment in a real deployment.
mod fallback {
    pub const COZE_API_BASE: &str = "https://api.coze.cn";
    pub const COZE_PAT: &str = "pat_placeholder";
    pub const COZE_RESUME_WORKFLOW_ID: &str = "7420000000000000001";
    pub const COZE_INTERVIEW_WORKFLOW_ID: &str = "7420000000000000002";
    pub const SUPABASE_URL: &str = "https://project.supabase.co";
    pub const SUPABASE_API_KEY: &str = "anon_key_placeholder";
}

/// Application configuration, loaded from environment variables once at
/// process start and injected into handlers via `AppState`. Handlers never
/// read the environment directly.
#[derive(Debug, Clone)]
pub struct Config {
    pub coze_api_base: String,
    pub coze_pat: String,
    pub coze_resume_workflow_id: String,
    pub coze_interview_workflow_id: String,
    pub supabase_url: String,
    pub supabase_api_key: String,
    /// Server-held OpenRouter key, used when a chat request carries no key of its own.
    pub openrouter_api_key: Option<String>,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            coze_api_base: env_or("COZE_API_BASE", fallback::COZE_API_BASE),
            coze_pat: env_or("COZE_PAT", fallback::COZE_PAT),
            coze_resume_workflow_id: env_or(
                "COZE_RESUME_WORKFLOW_ID",
                fallback::COZE_RESUME_WORKFLOW_ID,
            ),
            coze_interview_workflow_id: env_or(
                "COZE_INTERVIEW_WORKFLOW_ID",
                fallback::COZE_INTERVIEW_WORKFLOW_ID,
            ),
            supabase_url: env_or("SUPABASE_URL", fallback::SUPABASE_URL),
            // Prefer the service-role key; the anon key is enough for
            // operations the store's row-level policies already allow.
            supabase_api_key: std::env::var("SUPABASE_SERVICE_ROLE_KEY")
                .or_else(|_| std::env::var("SUPABASE_ANON_KEY"))
                .unwrap_or_else(|_| fallback::SUPABASE_API_KEY.to_string()),
            openrouter_api_key: std::env::var("OPENROUTER_API_KEY").ok(),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
