// ABOUTME: Error types for remote key fetching.
// ABOUTME: Separates transport failures, non-success statuses and malformed responses.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum RemoteError {
    /// Could not reach the platform (DNS, refused connection, TLS, body read).
    #[error("failed to fetch keys from {platform}: {source}")]
    Network {
        platform: String,
        #[source]
        source: reqwest::Error,
    },

    /// The platform answered with something other than 200 OK.
    #[error("{platform} API returned status code {status}")]
    Status { platform: String, status: u16 },

    /// The response body was not a JSON array of `{id, key}` objects.
    #[error("failed to parse {platform} response: {source}")]
    Parse {
        platform: String,
        #[source]
        source: serde_json::Error,
    },

    /// Username was empty or a dot segment after trimming; no request was sent.
    #[error("invalid username: {0}")]
    InvalidUsername(&'static str),

    /// The HTTP client could not be constructed.
    #[error("failed to create HTTP client: {0}")]
    Client(#[source] reqwest::Error),
}

impl RemoteError {
    /// HTTP status code for `Status` errors.
    pub fn status(&self) -> Option<u16> {
        match self {
            RemoteError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, RemoteError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_error_display() {
        let err = RemoteError::Status {
            platform: "GitHub".to_string(),
            status: 404,
        };
        assert_eq!(err.to_string(), "GitHub API returned status code 404");
        assert_eq!(err.status(), Some(404));
    }

    #[test]
    fn test_parse_error_display() {
        let source = serde_json::from_str::<Vec<u8>>("not json").unwrap_err();
        let err = RemoteError::Parse {
            platform: "GitLab".to_string(),
            source,
        };
        assert!(err.to_string().starts_with("failed to parse GitLab response"));
        assert_eq!(err.status(), None);
    }

    #[test]
    fn test_invalid_username_display() {
        let err = RemoteError::InvalidUsername("cannot be empty");
        assert_eq!(err.to_string(), "invalid username: cannot be empty");
    }
}
