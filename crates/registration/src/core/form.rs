use serde::Serialize;
use tracing::debug;

use super::types::*;
use crate::rules::validators::format_phone;
use crate::rules::visibility;

/// Everything the wizard collects, across all steps.
///
/// Text fields start empty, choices start unset, consent starts false.
/// Nothing is ever removed; updates only overwrite.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationFormState {
    pub full_name: String,
    pub email: String,
    pub password: String,
    #[serde(skip_serializing)]
    pub confirm_password: String,
    pub phone: String,
    pub country: String,
    pub birth_date: String,

    pub interests: Vec<String>,
    pub skills: Vec<String>,

    pub education_status: Option<EducationStatus>,
    pub current_institution: String,
    pub faculty_intent: Option<FacultyIntent>,
    pub financial_support: Option<FinancialSupport>,

    pub employment_status: Option<EmploymentStatus>,
    pub occupation: String,

    pub habits: Vec<String>,
    pub study_hours: Option<StudyHours>,

    pub state: String,
    pub city: String,
    pub family_income: Option<FamilyIncome>,
    pub household_size: Option<u8>,

    pub accepts_terms: bool,
    pub accepts_data_usage: bool,
    pub accepts_marketing: bool,
}

impl Default for RegistrationFormState {
    fn default() -> Self {
        Self {
            full_name: String::new(),
            email: String::new(),
            password: String::new(),
            confirm_password: String::new(),
            phone: String::new(),
            country: "BR".to_string(),
            birth_date: String::new(),
            interests: Vec::new(),
            skills: Vec::new(),
            education_status: None,
            current_institution: String::new(),
            faculty_intent: None,
            financial_support: None,
            employment_status: None,
            occupation: String::new(),
            habits: Vec::new(),
            study_hours: None,
            state: String::new(),
            city: String::new(),
            family_income: None,
            household_size: None,
            accepts_terms: false,
            accepts_data_usage: false,
            accepts_marketing: false,
        }
    }
}

/// One message per logical field. Replaces indexing the form by field name.
#[derive(Debug, Clone, PartialEq)]
pub enum FormUpdate {
    FullName(String),
    Email(String),
    Password(String),
    ConfirmPassword(String),
    Phone(String),
    Country(String),
    BirthDate(String),
    /// Check or uncheck one option of a checkbox group
    Toggle(ListField, String),
    EducationStatus(EducationStatus),
    CurrentInstitution(String),
    FacultyIntent(FacultyIntent),
    FinancialSupport(FinancialSupport),
    EmploymentStatus(EmploymentStatus),
    Occupation(String),
    StudyHours(StudyHours),
    State(String),
    City(String),
    FamilyIncome(FamilyIncome),
    HouseholdSize(u8),
    AcceptsTerms(bool),
    AcceptsDataUsage(bool),
    AcceptsMarketing(bool),
}

impl RegistrationFormState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge one update into the current state and recompute derived fields.
    /// Returns false when the update was refused (locked field, unknown option).
    pub fn apply(&mut self, update: FormUpdate) -> bool {
        match update {
            FormUpdate::FullName(v) => self.full_name = v,
            FormUpdate::Email(v) => self.email = v.trim().to_string(),
            FormUpdate::Password(v) => self.password = v,
            FormUpdate::ConfirmPassword(v) => self.confirm_password = v,
            FormUpdate::Phone(v) => {
                self.phone = if self.is_brazil() { format_phone(&v) } else { v };
            }
            FormUpdate::Country(v) => {
                self.country = v.trim().to_uppercase();
                if self.is_brazil() {
                    self.phone = format_phone(&self.phone);
                }
            }
            FormUpdate::BirthDate(v) => self.birth_date = v.trim().to_string(),
            FormUpdate::Toggle(list, value) => return self.toggle(list, value),
            FormUpdate::EducationStatus(status) => {
                self.education_status = Some(status);
                visibility::apply_auto_fill(self);
            }
            FormUpdate::CurrentInstitution(v) => self.current_institution = v,
            FormUpdate::FacultyIntent(intent) => {
                if visibility::is_locked(FieldId::FacultyIntent, self) {
                    debug!("faculty intent is locked by education status");
                    return false;
                }
                self.faculty_intent = Some(intent);
            }
            FormUpdate::FinancialSupport(support) => {
                if visibility::is_locked(FieldId::FinancialSupport, self) {
                    debug!("financial support is locked by education status");
                    return false;
                }
                self.financial_support = Some(support);
            }
            FormUpdate::EmploymentStatus(status) => self.employment_status = Some(status),
            FormUpdate::Occupation(v) => self.occupation = v,
            FormUpdate::StudyHours(v) => self.study_hours = Some(v),
            FormUpdate::State(v) => {
                let uf = v.trim().to_uppercase();
                if uf != self.state {
                    // the previous city belongs to another state
                    self.city = String::new();
                }
                self.state = uf;
            }
            FormUpdate::City(v) => self.city = v,
            FormUpdate::FamilyIncome(v) => self.family_income = Some(v),
            FormUpdate::HouseholdSize(v) => self.household_size = Some(v),
            FormUpdate::AcceptsTerms(v) => self.accepts_terms = v,
            FormUpdate::AcceptsDataUsage(v) => self.accepts_data_usage = v,
            FormUpdate::AcceptsMarketing(v) => self.accepts_marketing = v,
        }
        true
    }

    fn toggle(&mut self, list: ListField, value: String) -> bool {
        if !list.catalog().contains(&value.as_str()) {
            debug!(?list, value = %value, "ignoring option outside the catalog");
            return false;
        }

        let values = self.list_mut(list);
        if let Some(pos) = values.iter().position(|v| *v == value) {
            values.remove(pos);
        } else {
            values.push(value);
        }
        true
    }

    fn list_mut(&mut self, list: ListField) -> &mut Vec<String> {
        match list {
            ListField::Interests => &mut self.interests,
            ListField::Skills => &mut self.skills,
            ListField::Habits => &mut self.habits,
        }
    }

    pub fn is_brazil(&self) -> bool {
        self.country.eq_ignore_ascii_case("BR")
    }

    /// Whether a field holds a value (text non-blank, choice set, list
    /// non-empty, consent given)
    pub fn is_filled(&self, field: FieldId) -> bool {
        match field {
            FieldId::FullName => !self.full_name.trim().is_empty(),
            FieldId::Email => !self.email.trim().is_empty(),
            FieldId::Password => !self.password.is_empty(),
            FieldId::ConfirmPassword => !self.confirm_password.is_empty(),
            FieldId::Phone => !self.phone.trim().is_empty(),
            FieldId::Country => !self.country.trim().is_empty(),
            FieldId::BirthDate => !self.birth_date.trim().is_empty(),
            FieldId::Interests => !self.interests.is_empty(),
            FieldId::Skills => !self.skills.is_empty(),
            FieldId::EducationStatus => self.education_status.is_some(),
            FieldId::CurrentInstitution => !self.current_institution.trim().is_empty(),
            FieldId::FacultyIntent => self.faculty_intent.is_some(),
            FieldId::FinancialSupport => self.financial_support.is_some(),
            FieldId::EmploymentStatus => self.employment_status.is_some(),
            FieldId::Occupation => !self.occupation.trim().is_empty(),
            FieldId::Habits => !self.habits.is_empty(),
            FieldId::StudyHours => self.study_hours.is_some(),
            FieldId::State => !self.state.trim().is_empty(),
            FieldId::City => !self.city.trim().is_empty(),
            FieldId::FamilyIncome => self.family_income.is_some(),
            FieldId::HouseholdSize => self.household_size.is_some(),
            FieldId::AcceptsTerms => self.accepts_terms,
            FieldId::AcceptsDataUsage => self.accepts_data_usage,
            FieldId::AcceptsMarketing => self.accepts_marketing,
        }
    }

    /// Body for `POST /auth/register` (the confirmation is not sent)
    pub fn to_payload(&self) -> serde_json::Value {
        // every field is a string, bool, number, list or unit enum
        serde_json::to_value(self).unwrap_or_default()
    }
}
