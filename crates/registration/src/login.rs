//! Login and logout against the backend, with the session kept in the cookie jar.

use std::sync::Arc;

use tracing::{info, warn};

use hayah_core::{AuthApi, AuthSession, CookieJar};

use crate::core::result::{ErrorKind, SubmissionError};
use crate::orchestrator::classify_login_error;
use crate::rules::is_valid_email;

/// Local checks before calling the backend
pub fn validate_login(email: &str, password: &str) -> Result<(), SubmissionError> {
    if email.trim().is_empty() || password.is_empty() {
        return Err(SubmissionError::new(ErrorKind::RequiredFields));
    }
    if !is_valid_email(email.trim()) {
        return Err(SubmissionError::new(ErrorKind::InvalidEmail));
    }
    Ok(())
}

pub struct LoginFlow {
    api: Arc<dyn AuthApi>,
    jar: CookieJar,
}

impl LoginFlow {
    pub fn new(api: Arc<dyn AuthApi>, jar: CookieJar) -> Self {
        Self { api, jar }
    }

    pub fn jar(&self) -> &CookieJar {
        &self.jar
    }

    pub fn current_session(&self) -> Option<AuthSession> {
        self.jar.session()
    }

    /// Log in and remember the session
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthSession, SubmissionError> {
        validate_login(email, password)?;

        match self.api.login(email.trim(), password).await {
            Ok(session) => {
                info!("🔐 Logged in as {}", session.user.email);
                self.jar.set_session(&session);
                Ok(session)
            }
            Err(e) => {
                warn!("Login failed for {}: {}", email.trim(), e);
                Err(classify_login_error(&e))
            }
        }
    }

    /// Store a session obtained elsewhere (a fresh registration)
    pub fn remember(&self, session: &AuthSession) {
        self.jar.set_session(session);
    }

    pub fn logout(&self) {
        info!("Logging out");
        self.jar.clear();
    }
}
