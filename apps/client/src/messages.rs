//! User-facing messages keyed by HTTP status.
//!
//! The UI shows these instead of raw provider errors; `None` stands for a
//! network-level failure with no status at all.

pub fn friendly_message(status: Option<u16>) -> &'static str {
    match status {
        Some(401) => "Your API key was rejected. Check the key and try again.",
        Some(403) => "Access denied. Your account may lack permission for this action.",
        Some(404) => "The requested resource was not found.",
        Some(429) => "Too many requests. Wait a moment before retrying.",
        Some(s) if s >= 500 => "The service is temporarily unavailable. Please retry shortly.",
        Some(_) => "The request failed. Check the input and try again.",
        None => "Network error. Check your connection and try again.",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_codes_have_specific_messages() {
        for status in [401, 403, 404, 429] {
            let message = friendly_message(Some(status));
            assert!(!message.is_empty());
            // Each known code gets its own message, not the generic one.
            assert_ne!(message, friendly_message(Some(400)));
        }
    }

    #[test]
    fn test_server_errors_share_one_message() {
        assert_eq!(friendly_message(Some(500)), friendly_message(Some(503)));
    }

    #[test]
    fn test_no_status_means_network_error() {
        assert!(friendly_message(None).starts_with("Network error"));
    }
}
