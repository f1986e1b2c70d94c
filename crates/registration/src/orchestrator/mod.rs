pub mod classify;
pub mod controller;
pub mod submission;

pub use classify::*;
pub use controller::{Transition, WizardController, WizardState};
pub use submission::SubmissionOrchestrator;
