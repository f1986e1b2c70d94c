//! Step specs and the two registration flows built from them.

use std::fmt;
use std::str::FromStr;

use crate::core::types::FieldId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StepId {
    Account,
    Interests,
    Skills,
    Education,
    Employment,
    Habits,
    Socioeconomic,
    Profile,
    Consent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepKind {
    /// Identity and credentials; runs the remote email check before advancing
    Account,
    Standard,
    /// Consent; the richer final check runs before submitting
    Final,
}

/// Static description of one wizard step
#[derive(Debug)]
pub struct WizardStepSpec {
    pub id: StepId,
    pub title: &'static str,
    /// Everything the step can render (visibility filters it further)
    pub fields: &'static [FieldId],
    /// Must be filled when visible
    pub required: &'static [FieldId],
    pub kind: StepKind,
}

impl WizardStepSpec {
    pub fn is_required(&self, field: FieldId) -> bool {
        self.required.contains(&field)
    }
}

pub static ACCOUNT: WizardStepSpec = WizardStepSpec {
    id: StepId::Account,
    title: "Create your account",
    fields: &[
        FieldId::FullName,
        FieldId::Email,
        FieldId::Password,
        FieldId::ConfirmPassword,
        FieldId::Phone,
        FieldId::Country,
        FieldId::BirthDate,
    ],
    // the name can be completed later from the profile page
    required: &[
        FieldId::Email,
        FieldId::Password,
        FieldId::ConfirmPassword,
        FieldId::Country,
    ],
    kind: StepKind::Account,
};

pub static INTERESTS: WizardStepSpec = WizardStepSpec {
    id: StepId::Interests,
    title: "What are you interested in?",
    fields: &[FieldId::Interests],
    required: &[FieldId::Interests],
    kind: StepKind::Standard,
};

pub static SKILLS: WizardStepSpec = WizardStepSpec {
    id: StepId::Skills,
    title: "What are you good at?",
    fields: &[FieldId::Skills],
    required: &[FieldId::Skills],
    kind: StepKind::Standard,
};

pub static EDUCATION: WizardStepSpec = WizardStepSpec {
    id: StepId::Education,
    title: "Education",
    fields: &[
        FieldId::EducationStatus,
        FieldId::CurrentInstitution,
        FieldId::FacultyIntent,
        FieldId::FinancialSupport,
    ],
    required: &[
        FieldId::EducationStatus,
        FieldId::CurrentInstitution,
        FieldId::FacultyIntent,
        FieldId::FinancialSupport,
    ],
    kind: StepKind::Standard,
};

pub static EMPLOYMENT: WizardStepSpec = WizardStepSpec {
    id: StepId::Employment,
    title: "Work",
    fields: &[FieldId::EmploymentStatus, FieldId::Occupation],
    required: &[FieldId::EmploymentStatus, FieldId::Occupation],
    kind: StepKind::Standard,
};

pub static HABITS: WizardStepSpec = WizardStepSpec {
    id: StepId::Habits,
    title: "Habits",
    fields: &[FieldId::Habits, FieldId::StudyHours],
    required: &[FieldId::Habits, FieldId::StudyHours],
    kind: StepKind::Standard,
};

pub static SOCIOECONOMIC: WizardStepSpec = WizardStepSpec {
    id: StepId::Socioeconomic,
    title: "About your household",
    fields: &[
        FieldId::State,
        FieldId::City,
        FieldId::FamilyIncome,
        FieldId::HouseholdSize,
    ],
    required: &[
        FieldId::State,
        FieldId::City,
        FieldId::FamilyIncome,
        FieldId::HouseholdSize,
    ],
    kind: StepKind::Standard,
};

/// Condensed profile step of the short flow
pub static PROFILE: WizardStepSpec = WizardStepSpec {
    id: StepId::Profile,
    title: "Your profile",
    fields: &[
        FieldId::Interests,
        FieldId::Skills,
        FieldId::EducationStatus,
        FieldId::CurrentInstitution,
        FieldId::FacultyIntent,
        FieldId::FinancialSupport,
        FieldId::State,
        FieldId::City,
    ],
    required: &[
        FieldId::Interests,
        FieldId::Skills,
        FieldId::EducationStatus,
        FieldId::CurrentInstitution,
        FieldId::FacultyIntent,
        FieldId::FinancialSupport,
        FieldId::State,
        FieldId::City,
    ],
    kind: StepKind::Standard,
};

pub static CONSENT: WizardStepSpec = WizardStepSpec {
    id: StepId::Consent,
    title: "Almost there",
    fields: &[
        FieldId::AcceptsTerms,
        FieldId::AcceptsDataUsage,
        FieldId::AcceptsMarketing,
    ],
    required: &[FieldId::AcceptsTerms, FieldId::AcceptsDataUsage],
    kind: StepKind::Final,
};

static LEGACY_STEPS: [&WizardStepSpec; 8] = [
    &ACCOUNT,
    &INTERESTS,
    &SKILLS,
    &EDUCATION,
    &EMPLOYMENT,
    &HABITS,
    &SOCIOECONOMIC,
    &CONSENT,
];

static MOVE_STEPS: [&WizardStepSpec; 3] = [&ACCOUNT, &PROFILE, &CONSENT];

/// A registration flow: a fixed, ordered list of steps
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Flow {
    /// Full eight-step questionnaire
    #[default]
    Legacy,
    /// Three-step onboarding
    Move,
}

impl Flow {
    pub fn steps(&self) -> &'static [&'static WizardStepSpec] {
        match self {
            Flow::Legacy => &LEGACY_STEPS,
            Flow::Move => &MOVE_STEPS,
        }
    }

    pub fn len(&self) -> usize {
        self.steps().len()
    }

    /// 1-based lookup
    pub fn step(&self, index: usize) -> Option<&'static WizardStepSpec> {
        index.checked_sub(1).and_then(|i| self.steps().get(i).copied())
    }

    pub fn is_last(&self, index: usize) -> bool {
        index == self.len()
    }
}

impl FromStr for Flow {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "legacy" => Ok(Flow::Legacy),
            "move" | "hayah-move" => Ok(Flow::Move),
            other => Err(format!("unknown flow: {} (expected legacy or move)", other)),
        }
    }
}

impl fmt::Display for Flow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Flow::Legacy => write!(f, "legacy"),
            Flow::Move => write!(f, "move"),
        }
    }
}
