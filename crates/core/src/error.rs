use thiserror::Error;

#[derive(Error, Debug)]
pub enum HayahError {
    /// The request never produced an HTTP response (DNS, TLS, connection reset).
    #[error("network error: {0}")]
    Network(String),

    /// The backend answered with a non-success status. `message` is the
    /// `message`/`error` field of the payload when there is one.
    #[error("{message}")]
    Api { status: u16, message: String },

    #[error("unexpected response: {0}")]
    Decode(String),

    #[error("validation error: {0}")]
    Validation(String),

    #[error("storage error: {0}")]
    Storage(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("not logged in")]
    Unauthorized,

    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

impl HayahError {
    /// True when the failure came from the environment rather than the backend.
    pub fn is_network(&self) -> bool {
        matches!(self, HayahError::Network(_))
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            HayahError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<std::io::Error> for HayahError {
    fn from(e: std::io::Error) -> Self {
        HayahError::Storage(e.to_string())
    }
}

impl From<serde_json::Error> for HayahError {
    fn from(e: serde_json::Error) -> Self {
        HayahError::Decode(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_displays_backend_message() {
        let err = HayahError::Api {
            status: 409,
            message: "Email already exists".to_string(),
        };
        assert_eq!(err.to_string(), "Email already exists");
        assert_eq!(err.status(), Some(409));
        assert!(!err.is_network());
    }

    #[test]
    fn test_network_error() {
        let err = HayahError::Network("connection refused".into());
        assert!(err.is_network());
        assert_eq!(err.status(), None);
    }
}
