//! Client-side helpers for the Hireview API: file validation and encoding,
//! a generic retry wrapper, friendly error messages, and typed calls to
//! every endpoint the service exposes.

pub mod error;
pub mod files;
pub mod messages;
pub mod retry;

mod api;

pub use api::{ApiClient, ChatMessage, ChatParams, ChatReply, ReportDraft};
pub use error::ClientError;
