use std::fmt;

/// Errors that can occur while retrieving or decoding the posts document.
///
/// None of these are retried. The view controller reports the message once
/// and leaves the store empty.
#[derive(Debug)]
pub enum FetchError {
    /// The configured location could not be turned into a URL or path.
    Location(String),
    /// Network-level failure (DNS, connection refused, timeout).
    Network(String),
    /// The server answered with a non-success status.
    Status { status: u16, reason: String },
    /// Reading a local posts file failed.
    Io(std::io::Error),
    /// The payload was not JSON, or not an array of post objects.
    Decode(String),
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchError::Location(msg) => write!(f, "invalid posts location: {msg}"),
            FetchError::Network(msg) => write!(f, "network error: {msg}"),
            FetchError::Status { status, reason } => {
                write!(f, "HTTP error! status: {status} {reason}")
            }
            FetchError::Io(e) => write!(f, "could not read posts file: {e}"),
            FetchError::Decode(msg) => write!(f, "malformed posts document: {msg}"),
        }
    }
}

impl std::error::Error for FetchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FetchError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for FetchError {
    fn from(e: std::io::Error) -> Self {
        FetchError::Io(e)
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(e: serde_json::Error) -> Self {
        FetchError::Decode(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_message_carries_code() {
        let err = FetchError::Status {
            status: 404,
            reason: "Not Found".to_string(),
        };
        assert_eq!(err.to_string(), "HTTP error! status: 404 Not Found");
    }

    #[test]
    fn test_json_error_becomes_decode() {
        let err: FetchError = serde_json::from_str::<serde_json::Value>("{oops")
            .unwrap_err()
            .into();
        assert!(matches!(err, FetchError::Decode(_)));
        assert!(err.to_string().starts_with("malformed posts document"));
    }
}
