use hayah_core::AuthSession;

/// Outcome of a step gate. Recomputed on every navigation attempt.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ValidationResult {
    pub valid: bool,
    pub reasons: Vec<String>,
}

impl ValidationResult {
    pub fn ok() -> Self {
        Self {
            valid: true,
            reasons: Vec::new(),
        }
    }

    /// Valid iff there is nothing to complain about
    pub fn from_reasons(reasons: Vec<String>) -> Self {
        Self {
            valid: reasons.is_empty(),
            reasons,
        }
    }

    pub fn first_reason(&self) -> Option<&str> {
        self.reasons.first().map(String::as_str)
    }

    /// Append reasons from another check, skipping duplicates
    pub fn merge(&mut self, other: ValidationResult) {
        for reason in other.reasons {
            if !self.reasons.contains(&reason) {
                self.reasons.push(reason);
            }
        }
        self.valid = self.reasons.is_empty();
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    RequiredFields,
    EmailTaken,
    InvalidEmail,
    WeakPassword,
    PasswordMismatch,
    InvalidPhone,
    InvalidCode,
    Validation,
    InvalidCredentials,
    Network,
    Server,
}

impl ErrorKind {
    pub fn default_message(&self) -> &'static str {
        match self {
            ErrorKind::RequiredFields => "Please fill in all required fields",
            ErrorKind::EmailTaken => "This email is already registered",
            ErrorKind::InvalidEmail => "Invalid email",
            ErrorKind::WeakPassword => "Password does not meet the requirements",
            ErrorKind::PasswordMismatch => "Passwords do not match",
            ErrorKind::InvalidPhone => "Invalid phone number",
            ErrorKind::InvalidCode => "Invalid or expired code",
            ErrorKind::Validation => "Some fields are invalid, please review them",
            ErrorKind::InvalidCredentials => "Incorrect email or password",
            ErrorKind::Network => "Connection failed, check your internet and try again",
            ErrorKind::Server => "Server error, please try again",
        }
    }

    /// Business-rule and field errors come from the user's input;
    /// the rest come from the environment.
    pub fn is_user_error(&self) -> bool {
        !matches!(self, ErrorKind::Network | ErrorKind::Server)
    }
}

/// A classified failure, ready to show to the user
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct SubmissionError {
    pub kind: ErrorKind,
    pub message: String,
    /// Individual reasons (e.g. each unmet password rule)
    pub details: Vec<String>,
}

impl SubmissionError {
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            message: kind.default_message().to_string(),
            details: Vec::new(),
        }
    }

    pub fn with_message(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            details: Vec::new(),
        }
    }

    pub fn with_details(mut self, details: Vec<String>) -> Self {
        self.details = details;
        self
    }
}

/// Result of one registration attempt
#[derive(Debug, Clone, PartialEq)]
pub enum SubmissionOutcome {
    Success(AuthSession),
    Failure(SubmissionError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Error,
}

/// Non-blocking message for the user (a toast)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }
}
