use std::sync::Arc;

use tracing::{debug, info, warn};

use hayah_core::AuthApi;

use super::classify::{classify_error, environment_error};
use crate::core::form::RegistrationFormState;
use crate::core::result::{ErrorKind, SubmissionError, SubmissionOutcome};
use crate::rules::{
    is_valid_email, is_valid_phone, missing_required, password_requirements, passwords_match,
    validate_step,
};
use crate::steps::WizardStepSpec;

/// Runs the remote checks of the account step and the final register call
pub struct SubmissionOrchestrator {
    api: Arc<dyn AuthApi>,
    /// Check the email format before asking the backend whether it exists
    email_format_first: bool,
}

impl SubmissionOrchestrator {
    pub fn new(api: Arc<dyn AuthApi>, email_format_first: bool) -> Self {
        Self {
            api,
            email_format_first,
        }
    }

    /// Account step checks, in order; stops at the first failure.
    pub async fn check_account_step(
        &self,
        step: &WizardStepSpec,
        form: &RegistrationFormState,
    ) -> Result<(), SubmissionError> {
        let missing = missing_required(step, form);
        if !missing.is_empty() {
            debug!(?missing, "account step incomplete");
            return Err(SubmissionError::new(ErrorKind::RequiredFields)
                .with_details(missing.iter().map(|f| f.label().to_string()).collect()));
        }

        if self.email_format_first && !is_valid_email(&form.email) {
            return Err(SubmissionError::new(ErrorKind::InvalidEmail));
        }

        let availability = match self.api.check_email(&form.email).await {
            Ok(availability) => availability,
            Err(e) => {
                warn!("Email check failed: {}", e);
                return Err(environment_error(&e));
            }
        };
        if availability.exists {
            info!("Email {} is already registered", form.email);
            return Err(SubmissionError::new(ErrorKind::EmailTaken));
        }
        if !is_valid_email(&form.email) {
            return Err(SubmissionError::new(ErrorKind::InvalidEmail));
        }

        let unmet = password_requirements(&form.password);
        if !unmet.is_empty() {
            return Err(SubmissionError::new(ErrorKind::WeakPassword)
                .with_details(unmet.iter().map(|r| r.message().to_string()).collect()));
        }
        if !passwords_match(&form.password, &form.confirm_password) {
            return Err(SubmissionError::new(ErrorKind::PasswordMismatch));
        }

        if !is_valid_phone(&form.phone, &form.country) {
            return Err(SubmissionError::new(ErrorKind::InvalidPhone));
        }

        let gate = validate_step(step, form);
        if !gate.valid {
            let message = gate
                .first_reason()
                .unwrap_or(ErrorKind::Validation.default_message())
                .to_string();
            return Err(SubmissionError::with_message(ErrorKind::Validation, message)
                .with_details(gate.reasons));
        }

        Ok(())
    }

    /// Send the whole form. Never retried automatically.
    pub async fn submit(&self, form: &RegistrationFormState) -> SubmissionOutcome {
        info!("Submitting registration for {}", form.email);

        match self.api.register(&form.to_payload()).await {
            Ok(session) => {
                info!("Registration succeeded for user {}", session.user.id);
                SubmissionOutcome::Success(session)
            }
            Err(e) => {
                let error = classify_error(&e);
                warn!("Registration failed ({:?}): {}", error.kind, e);
                SubmissionOutcome::Failure(error)
            }
        }
    }
}
