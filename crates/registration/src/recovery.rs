//! Password recovery: request a code by email, verify it, choose a new password.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tracing::{debug, info, warn};

use hayah_core::{AuthApi, HayahError};

use crate::core::result::{ErrorKind, SubmissionError};
use crate::orchestrator::{classify_error, environment_error};
use crate::rules::{is_valid_email, is_valid_recovery_code, password_requirements, passwords_match};

pub const DEFAULT_RESEND_SECONDS: u64 = 60;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecoveryStep {
    RequestCode,
    VerifyCode { email: String },
    ResetPassword { email: String, code: String },
    Done,
}

/// Seconds left before another code may be requested
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Countdown {
    remaining: u64,
    length: u64,
}

impl Countdown {
    pub fn new(length: u64) -> Self {
        Self {
            remaining: 0,
            length,
        }
    }

    pub fn restart(&mut self) {
        self.remaining = self.length;
    }

    /// One second passed
    pub fn tick(&mut self) -> u64 {
        self.remaining = self.remaining.saturating_sub(1);
        self.remaining
    }

    pub fn remaining(&self) -> u64 {
        self.remaining
    }

    pub fn is_done(&self) -> bool {
        self.remaining == 0
    }
}

/// Publishes the remaining seconds once per second until zero.
/// The task stops early when every receiver is dropped.
pub fn countdown_ticker(seconds: u64) -> watch::Receiver<u64> {
    let (tx, rx) = watch::channel(seconds);

    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(1));
        // first tick is immediate
        interval.tick().await;

        let mut remaining = seconds;
        while remaining > 0 {
            interval.tick().await;
            remaining -= 1;
            if tx.send(remaining).is_err() {
                debug!("countdown receiver dropped");
                break;
            }
        }
    });

    rx
}

fn wrong_step(expected: &str) -> SubmissionError {
    SubmissionError::with_message(
        ErrorKind::Validation,
        format!("Recovery is not waiting for {}", expected),
    )
}

fn code_error(err: &HayahError) -> SubmissionError {
    match err {
        HayahError::Api { status, message }
            if *status == 400 || *status == 401 || message.to_lowercase().contains("code") =>
        {
            SubmissionError::new(ErrorKind::InvalidCode)
        }
        other => environment_error(other),
    }
}

pub struct RecoveryFlow {
    api: Arc<dyn AuthApi>,
    step: RecoveryStep,
    countdown: Countdown,
}

impl RecoveryFlow {
    pub fn new(api: Arc<dyn AuthApi>, resend_seconds: u64) -> Self {
        Self {
            api,
            step: RecoveryStep::RequestCode,
            countdown: Countdown::new(resend_seconds),
        }
    }

    pub fn step(&self) -> &RecoveryStep {
        &self.step
    }

    pub fn countdown(&self) -> &Countdown {
        &self.countdown
    }

    pub fn tick(&mut self) -> u64 {
        self.countdown.tick()
    }

    pub fn can_resend(&self) -> bool {
        matches!(self.step, RecoveryStep::VerifyCode { .. }) && self.countdown.is_done()
    }

    /// Ask the backend to email a code. Returns the backend's message.
    pub async fn send_code(&mut self, email: &str) -> Result<String, SubmissionError> {
        if self.step != RecoveryStep::RequestCode {
            return Err(wrong_step("an email address"));
        }
        let email = email.trim();
        if !is_valid_email(email) {
            return Err(SubmissionError::new(ErrorKind::InvalidEmail));
        }

        let reply = self.api.send_recovery_code(email).await.map_err(|e| {
            warn!("Sending recovery code failed: {}", e);
            classify_error(&e)
        })?;

        info!("Recovery code sent to {}", email);
        self.step = RecoveryStep::VerifyCode {
            email: email.to_string(),
        };
        self.countdown.restart();
        Ok(reply.message)
    }

    /// Request another code; only once the countdown reached zero
    pub async fn resend(&mut self) -> Result<String, SubmissionError> {
        let RecoveryStep::VerifyCode { email } = &self.step else {
            return Err(wrong_step("a code"));
        };
        if !self.countdown.is_done() {
            return Err(SubmissionError::with_message(
                ErrorKind::Validation,
                format!(
                    "Please wait {} seconds before requesting a new code",
                    self.countdown.remaining()
                ),
            ));
        }

        let reply = self
            .api
            .send_recovery_code(email)
            .await
            .map_err(|e| classify_error(&e))?;
        debug!("Recovery code resent to {}", email);
        self.countdown.restart();
        Ok(reply.message)
    }

    pub async fn verify_code(&mut self, code: &str) -> Result<(), SubmissionError> {
        let RecoveryStep::VerifyCode { email } = &self.step else {
            return Err(wrong_step("a code"));
        };
        let code = code.trim();
        if !is_valid_recovery_code(code) {
            return Err(SubmissionError::new(ErrorKind::InvalidCode));
        }

        self.api
            .verify_recovery_code(email, code)
            .await
            .map_err(|e| code_error(&e))?;

        self.step = RecoveryStep::ResetPassword {
            email: email.clone(),
            code: code.to_string(),
        };
        Ok(())
    }

    pub async fn reset_password(
        &mut self,
        password: &str,
        confirmation: &str,
    ) -> Result<String, SubmissionError> {
        let RecoveryStep::ResetPassword { email, code } = &self.step else {
            return Err(wrong_step("a new password"));
        };

        let unmet = password_requirements(password);
        if !unmet.is_empty() {
            return Err(SubmissionError::new(ErrorKind::WeakPassword)
                .with_details(unmet.iter().map(|r| r.message().to_string()).collect()));
        }
        if !passwords_match(password, confirmation) {
            return Err(SubmissionError::new(ErrorKind::PasswordMismatch));
        }

        let reply = self
            .api
            .reset_password(email, code, password)
            .await
            .map_err(|e| code_error(&e))?;

        info!("Password reset for {}", email);
        self.step = RecoveryStep::Done;
        Ok(reply.message)
    }
}
