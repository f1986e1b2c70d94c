//! Maps backend failures onto user-facing error kinds.

use hayah_core::HayahError;

use crate::core::result::{ErrorKind, SubmissionError};

/// Kind for a backend message, by lowercase substring. First match wins.
pub fn classify_message(message: &str) -> ErrorKind {
    let lower = message.to_lowercase();
    if ["duplicate", "exists", "already"]
        .iter()
        .any(|needle| lower.contains(needle))
    {
        ErrorKind::EmailTaken
    } else if lower.contains("email") {
        ErrorKind::InvalidEmail
    } else if lower.contains("password") {
        ErrorKind::WeakPassword
    } else if lower.contains("validation") {
        ErrorKind::Validation
    } else {
        ErrorKind::Server
    }
}

/// Classify a failed register call.
///
/// Recognised kinds keep the backend's own message; unrecognised ones get
/// the generic server message so internals never reach the user.
pub fn classify_error(err: &HayahError) -> SubmissionError {
    match err {
        HayahError::Network(_) => SubmissionError::new(ErrorKind::Network),
        HayahError::Api { message, .. } => {
            let kind = classify_message(message);
            if kind == ErrorKind::Server || message.trim().is_empty() {
                SubmissionError::new(kind)
            } else {
                SubmissionError::with_message(kind, message.clone())
            }
        }
        _ => SubmissionError::new(ErrorKind::Server),
    }
}

/// Failures of calls made before submitting (email check, lookups):
/// the user only needs to know whether to retry.
pub fn environment_error(err: &HayahError) -> SubmissionError {
    if err.is_network() {
        SubmissionError::new(ErrorKind::Network)
    } else {
        SubmissionError::new(ErrorKind::Server)
    }
}

/// Login failures: a 401 or a credentials message means wrong email/password
pub fn classify_login_error(err: &HayahError) -> SubmissionError {
    let bad_credentials = match err {
        HayahError::Unauthorized => true,
        HayahError::Api { status, message } => {
            *status == 401 || message.to_lowercase().contains("credential")
        }
        _ => false,
    };
    if bad_credentials {
        SubmissionError::new(ErrorKind::InvalidCredentials)
    } else {
        environment_error(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn api(status: u16, message: &str) -> HayahError {
        HayahError::Api {
            status,
            message: message.to_string(),
        }
    }

    #[test]
    fn test_classify_message_precedence() {
        assert_eq!(classify_message("Email already registered"), ErrorKind::EmailTaken);
        assert_eq!(classify_message("Duplicate key"), ErrorKind::EmailTaken);
        assert_eq!(classify_message("User exists"), ErrorKind::EmailTaken);
        assert_eq!(classify_message("Invalid EMAIL"), ErrorKind::InvalidEmail);
        assert_eq!(classify_message("password too weak"), ErrorKind::WeakPassword);
        assert_eq!(classify_message("Validation failed"), ErrorKind::Validation);
        assert_eq!(classify_message("boom"), ErrorKind::Server);
        assert_eq!(classify_message(""), ErrorKind::Server);
    }

    #[test]
    fn test_classify_error() {
        let err = classify_error(&HayahError::Network("connection refused".into()));
        assert_eq!(err.kind, ErrorKind::Network);
        assert_eq!(
            err.message,
            "Connection failed, check your internet and try again"
        );

        let err = classify_error(&api(409, "Email already in use"));
        assert_eq!(err.kind, ErrorKind::EmailTaken);
        assert_eq!(err.message, "Email already in use");

        let err = classify_error(&api(500, "NullPointerException at line 42"));
        assert_eq!(err.kind, ErrorKind::Server);
        assert_eq!(err.message, "Server error, please try again");

        let err = classify_error(&HayahError::Decode("eof".into()));
        assert_eq!(err.kind, ErrorKind::Server);
    }

    #[test]
    fn test_login_errors() {
        assert_eq!(
            classify_login_error(&api(401, "nope")).kind,
            ErrorKind::InvalidCredentials
        );
        assert_eq!(
            classify_login_error(&api(400, "Invalid credentials")).kind,
            ErrorKind::InvalidCredentials
        );
        assert_eq!(
            classify_login_error(&HayahError::Network("dns".into())).kind,
            ErrorKind::Network
        );
        assert_eq!(classify_login_error(&api(503, "down")).kind, ErrorKind::Server);
    }
}
