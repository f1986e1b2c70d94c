//! In-memory `AuthApi` for unit tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use hayah_core::*;

pub const VALID_CODE: &str = "123456";

#[derive(Default)]
pub struct FakeAuth {
    pub email_exists: bool,
    pub offline: bool,
    /// `(status, message)` returned by register instead of a session
    pub register_failure: Option<(u16, String)>,
    /// Register sleeps this long before answering
    pub register_delay: Option<std::time::Duration>,
    pub password: String,
    pub check_calls: AtomicUsize,
    pub register_calls: AtomicUsize,
    pub recovery_calls: AtomicUsize,
    pub last_payload: Mutex<Option<serde_json::Value>>,
}

impl FakeAuth {
    pub fn new() -> Self {
        Self {
            password: "Aa1!aaaa".to_string(),
            ..Default::default()
        }
    }

    pub fn checks(&self) -> usize {
        self.check_calls.load(Ordering::SeqCst)
    }

    pub fn registrations(&self) -> usize {
        self.register_calls.load(Ordering::SeqCst)
    }

    fn reachable(&self) -> Result<(), HayahError> {
        if self.offline {
            Err(HayahError::Network("connection refused".into()))
        } else {
            Ok(())
        }
    }

    fn session(email: &str) -> AuthSession {
        AuthSession {
            token: "tok-1".into(),
            user: UserIdentity {
                id: "1".into(),
                name: "Ana".into(),
                email: email.into(),
            },
        }
    }
}

#[async_trait]
impl AuthApi for FakeAuth {
    async fn check_email(&self, _email: &str) -> Result<EmailAvailability, HayahError> {
        self.check_calls.fetch_add(1, Ordering::SeqCst);
        self.reachable()?;
        Ok(EmailAvailability {
            exists: self.email_exists,
            message: String::new(),
        })
    }

    async fn register(&self, payload: &serde_json::Value) -> Result<AuthSession, HayahError> {
        self.register_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.register_delay {
            tokio::time::sleep(delay).await;
        }
        self.reachable()?;
        *self.last_payload.lock().unwrap() = Some(payload.clone());
        if let Some((status, message)) = &self.register_failure {
            return Err(HayahError::Api {
                status: *status,
                message: message.clone(),
            });
        }
        let email = payload["email"].as_str().unwrap_or_default();
        Ok(Self::session(email))
    }

    async fn login(&self, email: &str, password: &str) -> Result<AuthSession, HayahError> {
        self.reachable()?;
        if password != self.password {
            return Err(HayahError::Api {
                status: 401,
                message: "Invalid credentials".into(),
            });
        }
        Ok(Self::session(email))
    }

    async fn send_recovery_code(&self, _email: &str) -> Result<ApiMessage, HayahError> {
        self.recovery_calls.fetch_add(1, Ordering::SeqCst);
        self.reachable()?;
        Ok(ApiMessage {
            message: "Code sent".into(),
        })
    }

    async fn verify_recovery_code(&self, _email: &str, code: &str) -> Result<ApiMessage, HayahError> {
        self.reachable()?;
        if code != VALID_CODE {
            return Err(HayahError::Api {
                status: 400,
                message: "Invalid code".into(),
            });
        }
        Ok(ApiMessage {
            message: "Code verified".into(),
        })
    }

    async fn reset_password(
        &self,
        _email: &str,
        code: &str,
        _password: &str,
    ) -> Result<ApiMessage, HayahError> {
        self.reachable()?;
        if code != VALID_CODE {
            return Err(HayahError::Api {
                status: 400,
                message: "Invalid code".into(),
            });
        }
        Ok(ApiMessage {
            message: "Password updated".into(),
        })
    }
}
