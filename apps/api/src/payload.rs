use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;

use crate::errors::AppError;

/// Decodes a base64 file payload as sent by the front end.
///
/// Browsers often hand over the `FileReader.readAsDataURL` result unchanged,
/// so a `data:<mime>;base64,` prefix is stripped before decoding.
pub fn decode_file_payload(payload: &str) -> Result<Vec<u8>, AppError> {
    let raw = match payload.split_once("base64,") {
        Some((head, rest)) if head.starts_with("data:") => rest,
        _ => payload,
    };
    BASE64
        .decode(raw.trim())
        .map_err(|e| AppError::Validation(format!("Invalid base64 file payload: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_plain_base64() {
        let encoded = BASE64.encode(b"hello world");
        assert_eq!(decode_file_payload(&encoded).unwrap(), b"hello world");
    }

    #[test]
    fn test_decode_strips_data_url_prefix() {
        let encoded = format!("data:application/pdf;base64,{}", BASE64.encode(b"%PDF-1.4"));
        assert_eq!(decode_file_payload(&encoded).unwrap(), b"%PDF-1.4");
    }

    #[test]
    fn test_round_trip_preserves_bytes() {
        let original: Vec<u8> = (0..=255u8).collect();
        let encoded = BASE64.encode(&original);
        let decoded = decode_file_payload(&encoded).unwrap();
        assert_eq!(BASE64.encode(&decoded), encoded);
    }

    #[test]
    fn test_invalid_base64_is_a_validation_error() {
        let err = decode_file_payload("not-base64!!!").unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }
}
