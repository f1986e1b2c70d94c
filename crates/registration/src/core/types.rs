use serde::{Deserialize, Serialize};

/// Every field the registration wizard collects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FieldId {
    FullName,
    Email,
    Password,
    ConfirmPassword,
    Phone,
    Country,
    BirthDate,
    Interests,
    Skills,
    EducationStatus,
    CurrentInstitution,
    FacultyIntent,
    FinancialSupport,
    EmploymentStatus,
    Occupation,
    Habits,
    StudyHours,
    State,
    City,
    FamilyIncome,
    HouseholdSize,
    AcceptsTerms,
    AcceptsDataUsage,
    AcceptsMarketing,
}

impl FieldId {
    /// Human-readable label, used in "X is required" messages
    pub fn label(&self) -> &'static str {
        match self {
            FieldId::FullName => "Full name",
            FieldId::Email => "Email",
            FieldId::Password => "Password",
            FieldId::ConfirmPassword => "Password confirmation",
            FieldId::Phone => "Phone",
            FieldId::Country => "Country",
            FieldId::BirthDate => "Birth date",
            FieldId::Interests => "Interests",
            FieldId::Skills => "Skills",
            FieldId::EducationStatus => "Education status",
            FieldId::CurrentInstitution => "Current institution",
            FieldId::FacultyIntent => "Plans for higher education",
            FieldId::FinancialSupport => "Financial support",
            FieldId::EmploymentStatus => "Employment status",
            FieldId::Occupation => "Occupation",
            FieldId::Habits => "Habits",
            FieldId::StudyHours => "Weekly study hours",
            FieldId::State => "State",
            FieldId::City => "City",
            FieldId::FamilyIncome => "Family income",
            FieldId::HouseholdSize => "Household size",
            FieldId::AcceptsTerms => "Terms of use",
            FieldId::AcceptsDataUsage => "Data usage consent",
            FieldId::AcceptsMarketing => "Marketing consent",
        }
    }
}

/// The multi-select fields (checkbox groups)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListField {
    Interests,
    Skills,
    Habits,
}

impl ListField {
    pub fn catalog(&self) -> &'static [&'static str] {
        match self {
            ListField::Interests => INTERESTS,
            ListField::Skills => SKILLS,
            ListField::Habits => HABITS,
        }
    }
}

pub const INTERESTS: &[&str] = &[
    "technology",
    "health",
    "arts",
    "business",
    "education",
    "engineering",
    "law",
    "communication",
    "environment",
    "sports",
    "science",
    "social_impact",
];

pub const SKILLS: &[&str] = &[
    "communication",
    "leadership",
    "problem_solving",
    "creativity",
    "teamwork",
    "programming",
    "languages",
    "math",
    "writing",
    "organization",
    "public_speaking",
    "design",
];

pub const HABITS: &[&str] = &[
    "reading",
    "online_courses",
    "volunteering",
    "sports",
    "gaming",
    "music",
    "side_projects",
    "study_groups",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EducationStatus {
    ElementaryIncomplete,
    ElementaryComplete,
    HighSchoolInProgress,
    HighSchoolComplete,
    TechnicalInProgress,
    TechnicalComplete,
    HigherInProgress,
    HigherComplete,
}

impl EducationStatus {
    /// Currently enrolled somewhere
    pub fn is_in_progress(&self) -> bool {
        matches!(
            self,
            EducationStatus::HighSchoolInProgress
                | EducationStatus::TechnicalInProgress
                | EducationStatus::HigherInProgress
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FacultyIntent {
    Yes,
    No,
    Undecided,
    InProgress,
    Completed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FinancialSupport {
    Needed,
    NotNeeded,
    Unsure,
    NotApplicable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmploymentStatus {
    Employed,
    SelfEmployed,
    Intern,
    Unemployed,
    StudentOnly,
}

impl EmploymentStatus {
    pub fn has_occupation(&self) -> bool {
        matches!(
            self,
            EmploymentStatus::Employed | EmploymentStatus::SelfEmployed | EmploymentStatus::Intern
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StudyHours {
    #[serde(rename = "up_to_5")]
    UpTo5,
    #[serde(rename = "6_to_10")]
    From6To10,
    #[serde(rename = "11_to_20")]
    From11To20,
    #[serde(rename = "over_20")]
    Over20,
}

/// Monthly family income in minimum wages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FamilyIncome {
    #[serde(rename = "up_to_1")]
    UpTo1,
    #[serde(rename = "1_to_3")]
    From1To3,
    #[serde(rename = "3_to_5")]
    From3To5,
    #[serde(rename = "5_to_10")]
    From5To10,
    #[serde(rename = "over_10")]
    Over10,
    #[serde(rename = "prefer_not_to_say")]
    PreferNotToSay,
}

pub const MAX_HOUSEHOLD_SIZE: u8 = 20;
