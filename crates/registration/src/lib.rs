// Core modules
pub mod core;
pub mod rules;
pub mod steps;
pub mod orchestrator;

// Account flows outside the wizard
pub mod login;
pub mod recovery;

#[cfg(test)]
mod testing;

// Re-exports for convenience
pub use crate::core::types::*;
pub use crate::core::form::*;
pub use crate::core::result::*;
pub use steps::{Flow, StepId, StepKind, WizardStepSpec};
pub use orchestrator::*;
pub use login::{validate_login, LoginFlow};
pub use recovery::{countdown_ticker, Countdown, RecoveryFlow, RecoveryStep};

use hayah_core::config::WizardConfig;

/// Settings the wizard and recovery flows read from the app config
#[derive(Debug, Clone)]
pub struct RegistrationConfig {
    pub flow: Flow,
    pub email_format_first: bool,
    pub recovery_resend_seconds: u64,
}

impl Default for RegistrationConfig {
    fn default() -> Self {
        Self {
            flow: Flow::Legacy,
            email_format_first: false,
            recovery_resend_seconds: recovery::DEFAULT_RESEND_SECONDS,
        }
    }
}

impl TryFrom<&WizardConfig> for RegistrationConfig {
    type Error = hayah_core::HayahError;

    fn try_from(config: &WizardConfig) -> Result<Self, Self::Error> {
        let flow = config
            .flow
            .parse::<Flow>()
            .map_err(hayah_core::HayahError::Config)?;
        Ok(Self {
            flow,
            email_format_first: config.email_format_first,
            recovery_resend_seconds: config.recovery_resend_seconds,
        })
    }
}
