//! Step gate: a step may only be left forwards when this passes.

use tracing::debug;

use hayah_core::is_valid_uf;

use super::validators::*;
use super::visibility::visible_fields;
use crate::core::form::RegistrationFormState;
use crate::core::result::ValidationResult;
use crate::core::types::{FieldId, MAX_HOUSEHOLD_SIZE};
use crate::steps::{StepKind, WizardStepSpec};

pub const MSG_SELECT_INTEREST: &str = "Select at least one interest";
pub const MSG_SELECT_SKILL: &str = "Select at least one skill";
pub const MSG_SELECT_HABIT: &str = "Select at least one habit";
pub const MSG_ACCEPT_TERMS: &str = "You must accept the terms of use";
pub const MSG_ACCEPT_DATA_USAGE: &str = "You must authorize the use of your data";

fn missing_message(field: FieldId) -> String {
    match field {
        FieldId::Interests => MSG_SELECT_INTEREST.to_string(),
        FieldId::Skills => MSG_SELECT_SKILL.to_string(),
        FieldId::Habits => MSG_SELECT_HABIT.to_string(),
        FieldId::AcceptsTerms => MSG_ACCEPT_TERMS.to_string(),
        FieldId::AcceptsDataUsage => MSG_ACCEPT_DATA_USAGE.to_string(),
        other => format!("{} is required", other.label()),
    }
}

/// Problems with a filled-in value; empty values are the required check's job
fn value_errors(field: FieldId, form: &RegistrationFormState) -> Vec<String> {
    if !form.is_filled(field) {
        return Vec::new();
    }

    match field {
        FieldId::Email if !is_valid_email(&form.email) => vec!["Invalid email".to_string()],
        FieldId::Password => password_requirements(&form.password)
            .iter()
            .map(|rule| rule.message().to_string())
            .collect(),
        FieldId::ConfirmPassword if !passwords_match(&form.password, &form.confirm_password) => {
            vec!["Passwords do not match".to_string()]
        }
        FieldId::Phone if !is_valid_phone(&form.phone, &form.country) => {
            vec!["Invalid phone number".to_string()]
        }
        FieldId::BirthDate if !is_valid_birth_date(&form.birth_date) => {
            vec!["Invalid birth date".to_string()]
        }
        FieldId::State if !is_valid_uf(&form.state) => vec!["Unknown state".to_string()],
        FieldId::HouseholdSize => match form.household_size {
            Some(n) if n == 0 || n > MAX_HOUSEHOLD_SIZE => vec![format!(
                "Household size must be between 1 and {}",
                MAX_HOUSEHOLD_SIZE
            )],
            _ => Vec::new(),
        },
        _ => Vec::new(),
    }
}

/// Required fields of `step` that are visible but still empty
pub fn missing_required(step: &WizardStepSpec, form: &RegistrationFormState) -> Vec<FieldId> {
    visible_fields(step, form)
        .into_iter()
        .filter(|f| step.is_required(*f) && !form.is_filled(*f))
        .collect()
}

/// Full check of one step: required fields, then value formats.
/// The final step also gets the consent/interests/skills check.
pub fn validate_step(step: &WizardStepSpec, form: &RegistrationFormState) -> ValidationResult {
    let mut reasons: Vec<String> = missing_required(step, form)
        .into_iter()
        .map(missing_message)
        .collect();

    for field in visible_fields(step, form) {
        reasons.extend(value_errors(field, form));
    }

    let mut result = ValidationResult::from_reasons(reasons);
    if step.kind == StepKind::Final {
        result.merge(validate_final_step(form));
    }

    debug!(step = ?step.id, valid = result.valid, reasons = result.reasons.len(), "step validated");
    result
}

pub fn is_step_valid(step: &WizardStepSpec, form: &RegistrationFormState) -> bool {
    validate_step(step, form).valid
}

/// Last gate before submitting, with a specific message per problem
pub fn validate_final_step(form: &RegistrationFormState) -> ValidationResult {
    let mut reasons = Vec::new();
    if !form.accepts_terms {
        reasons.push(MSG_ACCEPT_TERMS.to_string());
    }
    if !form.accepts_data_usage {
        reasons.push(MSG_ACCEPT_DATA_USAGE.to_string());
    }
    if form.interests.is_empty() {
        reasons.push(MSG_SELECT_INTEREST.to_string());
    }
    if form.skills.is_empty() {
        reasons.push(MSG_SELECT_SKILL.to_string());
    }
    ValidationResult::from_reasons(reasons)
}
