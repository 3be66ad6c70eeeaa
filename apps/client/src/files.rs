//! File checks and base64 encoding applied before anything leaves the client.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;

use crate::error::ClientError;

pub const MAX_FILE_SIZE: u64 = 10 * 1024 * 1024;

const DOCUMENT_EXTENSIONS: &[&str] = &["pdf", "doc", "docx", "txt", "md"];
const AUDIO_EXTENSIONS: &[&str] = &["mp3", "wav", "m4a", "webm", "ogg"];

/// What a file is being uploaded as; decides the extension allow-list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Document,
    Audio,
}

impl FileKind {
    fn allowed(&self) -> &'static [&'static str] {
        match self {
            FileKind::Document => DOCUMENT_EXTENSIONS,
            FileKind::Audio => AUDIO_EXTENSIONS,
        }
    }
}

/// Rejects files that are too big or of a type the platform does not accept.
pub fn validate_file(name: &str, size: u64, kind: FileKind) -> Result<(), ClientError> {
    if size > MAX_FILE_SIZE {
        return Err(ClientError::FileTooLarge {
            size,
            max: MAX_FILE_SIZE,
        });
    }
    let ext = extension(name)
        .ok_or_else(|| ClientError::UnsupportedFileType(name.to_string()))?;
    if !kind.allowed().contains(&ext.as_str()) {
        return Err(ClientError::UnsupportedFileType(name.to_string()));
    }
    Ok(())
}

fn extension(name: &str) -> Option<String> {
    name.rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .filter(|ext| !ext.is_empty())
}

/// Encodes file bytes the way the API expects its `fileBase64` fields.
pub fn encode_file(bytes: &[u8]) -> String {
    BASE64.encode(bytes)
}
