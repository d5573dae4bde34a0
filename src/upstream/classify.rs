//! Upstream response classification.

use axum::http::StatusCode;

use crate::stats::Color;
use crate::upstream::FetchError;

/// Longest body excerpt kept on a status error, for logs.
const MAX_ERROR_EXCERPT: usize = 256;

/// Turn a completed upstream response into a color or a failure.
///
/// Only a status below 400 with a non-blank body is a success; the color
/// is the body with surrounding whitespace trimmed.
pub fn classify(status: StatusCode, body: &[u8]) -> Result<Color, FetchError> {
    let text = String::from_utf8_lossy(body);

    if status.as_u16() >= 400 {
        let excerpt: String = text.trim().chars().take(MAX_ERROR_EXCERPT).collect();
        return Err(FetchError::Status { status, body: excerpt });
    }

    Color::parse(&text).ok_or(FetchError::EmptyBody)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_is_trimmed() {
        let color = classify(StatusCode::OK, b"  blue\n").unwrap();
        assert_eq!(color.as_str(), "blue");
    }

    #[test]
    fn test_error_status_is_failure_even_with_body() {
        let err = classify(StatusCode::INTERNAL_SERVER_ERROR, b"periodic error").unwrap_err();
        match err {
            FetchError::Status { status, body } => {
                assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
                assert_eq!(body, "periodic error");
            }
            other => panic!("unexpected error: {}", other),
        }

        assert!(matches!(
            classify(StatusCode::NOT_FOUND, b"blue"),
            Err(FetchError::Status { .. })
        ));
    }

    #[test]
    fn test_blank_body_is_failure() {
        assert!(matches!(classify(StatusCode::OK, b""), Err(FetchError::EmptyBody)));
        assert!(matches!(classify(StatusCode::OK, b" \r\n\t"), Err(FetchError::EmptyBody)));
    }

    #[test]
    fn test_status_below_400_is_success() {
        assert!(classify(StatusCode::NON_AUTHORITATIVE_INFORMATION, b"red").is_ok());
        assert!(classify(StatusCode::from_u16(399).unwrap(), b"red").is_ok());
    }

    #[test]
    fn test_error_excerpt_is_bounded() {
        let body = "x".repeat(MAX_ERROR_EXCERPT * 2);
        match classify(StatusCode::BAD_GATEWAY, body.as_bytes()) {
            Err(FetchError::Status { body, .. }) => assert_eq!(body.len(), MAX_ERROR_EXCERPT),
            _ => panic!("expected status error"),
        }
    }
}
