use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use tracing::{info, warn};

use hayah_registration::{
    EducationStatus, EmploymentStatus, FacultyIntent, FamilyIncome, FinancialSupport, Flow,
    FormUpdate, ListField, StudyHours, Transition, WizardController,
};

use super::{print_notices, AppContext};

/// Wizard answers as written in the TOML file. Missing keys stay unanswered.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Answers {
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub confirm_password: Option<String>,
    pub country: Option<String>,
    pub phone: Option<String>,
    pub birth_date: Option<String>,
    pub interests: Vec<String>,
    pub skills: Vec<String>,
    pub education_status: Option<EducationStatus>,
    pub current_institution: Option<String>,
    pub faculty_intent: Option<FacultyIntent>,
    pub financial_support: Option<FinancialSupport>,
    pub employment_status: Option<EmploymentStatus>,
    pub occupation: Option<String>,
    pub habits: Vec<String>,
    pub study_hours: Option<StudyHours>,
    pub state: Option<String>,
    pub city: Option<String>,
    pub family_income: Option<FamilyIncome>,
    pub household_size: Option<u8>,
    pub accepts_terms: bool,
    pub accepts_data_usage: bool,
    pub accepts_marketing: bool,
}

impl Answers {
    pub async fn load(path: &Path) -> Result<Self> {
        let raw = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("reading answers file {}", path.display()))?;
        Ok(toml::from_str(&raw)?)
    }

    /// Updates in the order a person would fill the form: country before
    /// phone, education status before the fields it drives, state before city.
    pub fn into_updates(self) -> Vec<FormUpdate> {
        let mut updates = Vec::new();

        updates.extend(self.full_name.map(FormUpdate::FullName));
        updates.extend(self.email.map(FormUpdate::Email));
        updates.extend(self.password.map(FormUpdate::Password));
        updates.extend(self.confirm_password.map(FormUpdate::ConfirmPassword));
        updates.extend(self.country.map(FormUpdate::Country));
        updates.extend(self.phone.map(FormUpdate::Phone));
        updates.extend(self.birth_date.map(FormUpdate::BirthDate));

        for (list, values) in [
            (ListField::Interests, self.interests),
            (ListField::Skills, self.skills),
            (ListField::Habits, self.habits),
        ] {
            updates.extend(values.into_iter().map(|v| FormUpdate::Toggle(list, v)));
        }

        updates.extend(self.education_status.map(FormUpdate::EducationStatus));
        updates.extend(self.current_institution.map(FormUpdate::CurrentInstitution));
        updates.extend(self.faculty_intent.map(FormUpdate::FacultyIntent));
        updates.extend(self.financial_support.map(FormUpdate::FinancialSupport));
        updates.extend(self.employment_status.map(FormUpdate::EmploymentStatus));
        updates.extend(self.occupation.map(FormUpdate::Occupation));
        updates.extend(self.study_hours.map(FormUpdate::StudyHours));
        updates.extend(self.state.map(FormUpdate::State));
        updates.extend(self.city.map(FormUpdate::City));
        updates.extend(self.family_income.map(FormUpdate::FamilyIncome));
        updates.extend(self.household_size.map(FormUpdate::HouseholdSize));

        updates.push(FormUpdate::AcceptsTerms(self.accepts_terms));
        updates.push(FormUpdate::AcceptsDataUsage(self.accepts_data_usage));
        updates.push(FormUpdate::AcceptsMarketing(self.accepts_marketing));
        updates
    }
}

pub async fn run(ctx: &AppContext, answers: &Path, flow: Option<String>) -> Result<()> {
    let mut settings = ctx.registration_config()?;
    if let Some(flow) = flow {
        settings.flow = flow.parse::<Flow>().map_err(anyhow::Error::msg)?;
    }

    let answers = Answers::load(answers).await?;
    let mut wizard = WizardController::new(
        settings.flow,
        ctx.backend.clone(),
        settings.email_format_first,
    );

    for update in answers.into_updates() {
        if !wizard.update(update.clone()) {
            warn!("Answer refused by the form: {:?}", update);
        }
    }

    info!("Starting {} registration ({} steps)", settings.flow, settings.flow.len());

    loop {
        if let Some(spec) = wizard.current_spec() {
            println!(
                "\n[{}/{}] {} ({})",
                wizard.current_step(),
                settings.flow.len(),
                spec.title,
                wizard.submit_label()
            );
        }

        let transition = wizard.next().await;
        print_notices(wizard.take_notices());

        match transition {
            Transition::Advanced { .. } => continue,
            Transition::Completed(session) => {
                ctx.jar.set_session(&session);
                ctx.save_session().await?;
                println!("\nWelcome, {}! You are logged in.", session.user.email);
                return Ok(());
            }
            Transition::Blocked(result) => {
                for reason in &result.reasons {
                    println!("  - {}", reason);
                }
                bail!("registration stopped at step {}", wizard.current_step());
            }
            Transition::Rejected(error) => {
                for detail in &error.details {
                    println!("  - {}", detail);
                }
                bail!(
                    "registration stopped at step {}: {}",
                    wizard.current_step(),
                    error
                );
            }
            Transition::Retreated { .. } | Transition::Ignored => {
                bail!("wizard did not move from step {}", wizard.current_step())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_answers() {
        let answers: Answers = toml::from_str(
            r#"
            email = "a@b.co"
            password = "Aa1!aaaa"
            confirm_password = "Aa1!aaaa"
            interests = ["technology", "arts"]
            education_status = "higher_in_progress"
            family_income = "1_to_3"
            household_size = 4
            accepts_terms = true
            "#,
        )
        .unwrap();

        assert_eq!(answers.education_status, Some(EducationStatus::HigherInProgress));
        assert_eq!(answers.family_income, Some(FamilyIncome::From1To3));
        assert!(answers.skills.is_empty());
        assert!(!answers.accepts_data_usage);
    }

    #[test]
    fn test_updates_keep_dependent_order() {
        let answers = Answers {
            phone: Some("11987654321".into()),
            country: Some("BR".into()),
            city: Some("Campinas".into()),
            state: Some("SP".into()),
            ..Default::default()
        };
        let updates = answers.into_updates();

        let pos = |wanted: &FormUpdate| updates.iter().position(|u| u == wanted).unwrap();
        assert!(pos(&FormUpdate::Country("BR".into())) < pos(&FormUpdate::Phone("11987654321".into())));
        assert!(pos(&FormUpdate::State("SP".into())) < pos(&FormUpdate::City("Campinas".into())));
        assert_eq!(updates.last(), Some(&FormUpdate::AcceptsMarketing(false)));
    }
}
