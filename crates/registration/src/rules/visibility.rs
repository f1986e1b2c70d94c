//! Which fields render for the current answers, and the fields that get
//! filled (and locked) automatically from the education status.

use std::collections::BTreeSet;

use tracing::debug;

use crate::core::form::RegistrationFormState;
use crate::core::types::*;
use crate::steps::WizardStepSpec;

/// Faculty intent and financial support implied by an education status
pub fn auto_fill_for(status: EducationStatus) -> (Option<FacultyIntent>, Option<FinancialSupport>) {
    match status {
        EducationStatus::TechnicalInProgress => (Some(FacultyIntent::InProgress), None),
        EducationStatus::HigherInProgress => (Some(FacultyIntent::InProgress), None),
        EducationStatus::HigherComplete => {
            (Some(FacultyIntent::Completed), Some(FinancialSupport::NotApplicable))
        }
        EducationStatus::ElementaryIncomplete => (None, Some(FinancialSupport::NotApplicable)),
        _ => (None, None),
    }
}

/// Overwrite the dependent fields for the current education status.
/// Runs on every education status change, discarding manual answers.
pub fn apply_auto_fill(form: &mut RegistrationFormState) {
    let Some(status) = form.education_status else {
        return;
    };

    let (intent, support) = auto_fill_for(status);
    if let Some(intent) = intent {
        debug!(?status, ?intent, "auto-filling faculty intent");
        form.faculty_intent = Some(intent);
    }
    if let Some(support) = support {
        debug!(?status, ?support, "auto-filling financial support");
        form.financial_support = Some(support);
    }
}

/// Locked fields ignore manual edits
pub fn is_locked(field: FieldId, form: &RegistrationFormState) -> bool {
    let Some(status) = form.education_status else {
        return false;
    };
    let (intent, support) = auto_fill_for(status);
    match field {
        FieldId::FacultyIntent => intent.is_some(),
        FieldId::FinancialSupport => support.is_some(),
        _ => false,
    }
}

pub fn is_visible(field: FieldId, form: &RegistrationFormState) -> bool {
    match field {
        FieldId::CurrentInstitution => form
            .education_status
            .map(|s| s.is_in_progress())
            .unwrap_or(false),
        FieldId::FinancialSupport => {
            let moot = form
                .education_status
                .map(|s| auto_fill_for(s).1.is_some())
                .unwrap_or(false);
            let wants_faculty = matches!(
                form.faculty_intent,
                Some(FacultyIntent::Yes) | Some(FacultyIntent::InProgress)
            );
            wants_faculty && !moot
        }
        FieldId::Occupation => form
            .employment_status
            .map(|s| s.has_occupation())
            .unwrap_or(false),
        _ => true,
    }
}

/// Fields of `step` that render for the current answers
pub fn visible_fields(step: &WizardStepSpec, form: &RegistrationFormState) -> BTreeSet<FieldId> {
    step.fields
        .iter()
        .copied()
        .filter(|f| is_visible(*f, form))
        .collect()
}
