use std::collections::BTreeSet;
use std::sync::Arc;

use tracing::{debug, info, warn};

use hayah_core::{AuthApi, AuthSession};

use super::submission::SubmissionOrchestrator;
use crate::core::form::{FormUpdate, RegistrationFormState};
use crate::core::result::{Notice, SubmissionError, SubmissionOutcome, ValidationResult};
use crate::core::types::FieldId;
use crate::rules::{validate_step, visible_fields};
use crate::steps::{Flow, StepKind, WizardStepSpec};

/// Where the wizard is
#[derive(Debug, Clone, PartialEq)]
pub enum WizardState {
    /// 1-based step index
    Step(usize),
    Submitting,
    /// Terminal; the form is frozen
    Success(AuthSession),
}

/// Result of one navigation attempt
#[derive(Debug, Clone, PartialEq)]
pub enum Transition {
    Advanced { from: usize, to: usize },
    Retreated { from: usize, to: usize },
    /// The step gate failed; the step index is unchanged
    Blocked(ValidationResult),
    /// A remote check or the submission failed; the step index is unchanged
    Rejected(SubmissionError),
    Completed(AuthSession),
    /// Busy, finished, or nowhere to go
    Ignored,
}

impl Transition {
    /// Moves the user to a different screen
    pub fn scrolls_to_top(&self) -> bool {
        matches!(
            self,
            Transition::Advanced { .. } | Transition::Retreated { .. } | Transition::Completed(_)
        )
    }
}

/// Drives one registration wizard: step index, form, busy flag and notices
pub struct WizardController {
    flow: Flow,
    form: RegistrationFormState,
    state: WizardState,
    orchestrator: SubmissionOrchestrator,
    busy: bool,
    last_error: Option<SubmissionError>,
    notices: Vec<Notice>,
}

impl WizardController {
    pub fn new(flow: Flow, api: Arc<dyn AuthApi>, email_format_first: bool) -> Self {
        Self {
            flow,
            form: RegistrationFormState::new(),
            state: WizardState::Step(1),
            orchestrator: SubmissionOrchestrator::new(api, email_format_first),
            busy: false,
            last_error: None,
            notices: Vec::new(),
        }
    }

    pub fn flow(&self) -> Flow {
        self.flow
    }

    pub fn state(&self) -> &WizardState {
        &self.state
    }

    /// 1-based index of the step on screen (the last one while submitting)
    pub fn current_step(&self) -> usize {
        match self.state {
            WizardState::Step(i) => i,
            WizardState::Submitting | WizardState::Success(_) => self.flow.len(),
        }
    }

    pub fn current_spec(&self) -> Option<&'static WizardStepSpec> {
        self.flow.step(self.current_step())
    }

    pub fn form(&self) -> &RegistrationFormState {
        &self.form
    }

    pub fn visible_fields(&self) -> BTreeSet<FieldId> {
        self.current_spec()
            .map(|spec| visible_fields(spec, &self.form))
            .unwrap_or_default()
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    pub fn is_complete(&self) -> bool {
        matches!(self.state, WizardState::Success(_))
    }

    pub fn last_error(&self) -> Option<&SubmissionError> {
        self.last_error.as_ref()
    }

    /// Drain pending notices
    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    /// Label for the forward button
    pub fn submit_label(&self) -> &'static str {
        if self.busy {
            "Please wait..."
        } else if self.flow.is_last(self.current_step()) {
            "Create account"
        } else {
            "Next"
        }
    }

    /// Merge a field update. Refused once registration has succeeded.
    pub fn update(&mut self, update: FormUpdate) -> bool {
        if self.is_complete() {
            warn!("Ignoring form update after registration completed");
            return false;
        }
        self.form.apply(update)
    }

    /// Try to move forward. On the last step this submits the form.
    pub async fn next(&mut self) -> Transition {
        if self.busy {
            debug!("next() while busy, ignoring");
            return Transition::Ignored;
        }
        let WizardState::Step(index) = self.state else {
            return Transition::Ignored;
        };
        let Some(step) = self.flow.step(index) else {
            return Transition::Ignored;
        };

        let outcome = {
            let mut guard = BusyGuard::enter(&mut self.busy, &mut self.state, index);
            evaluate(&self.orchestrator, &self.form, self.flow, index, step, &mut guard).await
        };
        self.settle(index, outcome)
    }

    fn settle(&mut self, index: usize, outcome: StepOutcome) -> Transition {
        match outcome {
            StepOutcome::Blocked(gate) => {
                if let Some(reason) = gate.first_reason() {
                    self.notices.push(Notice::error(reason));
                }
                Transition::Blocked(gate)
            }
            StepOutcome::Rejected(error)
            | StepOutcome::Submitted(SubmissionOutcome::Failure(error)) => self.reject(error),
            StepOutcome::Passed => {
                self.last_error = None;
                self.state = WizardState::Step(index + 1);
                debug!("Step {} -> {}", index, index + 1);
                Transition::Advanced {
                    from: index,
                    to: index + 1,
                }
            }
            StepOutcome::Submitted(SubmissionOutcome::Success(session)) => {
                info!("Registration complete for {}", session.user.email);
                self.last_error = None;
                self.notices.push(Notice::success("Registration complete! Welcome aboard"));
                self.state = WizardState::Success(session.clone());
                Transition::Completed(session)
            }
        }
    }

    fn reject(&mut self, error: SubmissionError) -> Transition {
        self.notices.push(Notice::error(error.message.clone()));
        self.last_error = Some(error.clone());
        Transition::Rejected(error)
    }

    /// Step back; always allowed past the first step, never touches the form
    pub fn previous(&mut self) -> Transition {
        if self.busy {
            return Transition::Ignored;
        }
        match self.state {
            WizardState::Step(index) if index > 1 => {
                self.state = WizardState::Step(index - 1);
                self.last_error = None;
                Transition::Retreated {
                    from: index,
                    to: index - 1,
                }
            }
            _ => Transition::Ignored,
        }
    }
}

/// What one `next()` call found, before it is applied to the controller
enum StepOutcome {
    Blocked(ValidationResult),
    Rejected(SubmissionError),
    Passed,
    Submitted(SubmissionOutcome),
}

/// Holds the busy flag for one `next()` call. Dropping it, even while the
/// call is still awaiting, clears the flag and puts an unfinished
/// submission back on its step.
struct BusyGuard<'a> {
    busy: &'a mut bool,
    state: &'a mut WizardState,
    index: usize,
}

impl<'a> BusyGuard<'a> {
    fn enter(busy: &'a mut bool, state: &'a mut WizardState, index: usize) -> Self {
        *busy = true;
        Self { busy, state, index }
    }

    fn submitting(&mut self) {
        *self.state = WizardState::Submitting;
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        *self.busy = false;
        if matches!(self.state, WizardState::Submitting) {
            *self.state = WizardState::Step(self.index);
        }
    }
}

async fn evaluate(
    orchestrator: &SubmissionOrchestrator,
    form: &RegistrationFormState,
    flow: Flow,
    index: usize,
    step: &'static WizardStepSpec,
    guard: &mut BusyGuard<'_>,
) -> StepOutcome {
    if step.kind == StepKind::Account {
        if let Err(error) = orchestrator.check_account_step(step, form).await {
            return StepOutcome::Rejected(error);
        }
    } else {
        let gate = validate_step(step, form);
        if !gate.valid {
            return StepOutcome::Blocked(gate);
        }
    }

    if !flow.is_last(index) {
        return StepOutcome::Passed;
    }

    guard.submitting();
    StepOutcome::Submitted(orchestrator.submit(form).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::result::{ErrorKind, NoticeLevel};
    use crate::core::types::*;
    use crate::rules::MSG_SELECT_INTEREST;
    use crate::testing::FakeAuth;

    fn controller(flow: Flow, api: Arc<FakeAuth>) -> WizardController {
        WizardController::new(flow, api, false)
    }

    fn fill_account(wizard: &mut WizardController) {
        wizard.update(FormUpdate::FullName("Ana Souza".into()));
        wizard.update(FormUpdate::Email("a@b.co".into()));
        wizard.update(FormUpdate::Password("Aa1!aaaa".into()));
        wizard.update(FormUpdate::ConfirmPassword("Aa1!aaaa".into()));
    }

    fn fill_profile(wizard: &mut WizardController) {
        wizard.update(FormUpdate::Toggle(ListField::Interests, "technology".into()));
        wizard.update(FormUpdate::Toggle(ListField::Skills, "math".into()));
        wizard.update(FormUpdate::EducationStatus(EducationStatus::HigherComplete));
        wizard.update(FormUpdate::State("SP".into()));
        wizard.update(FormUpdate::City("Campinas".into()));
    }

    fn consent(wizard: &mut WizardController) {
        wizard.update(FormUpdate::AcceptsTerms(true));
        wizard.update(FormUpdate::AcceptsDataUsage(true));
    }

    #[tokio::test]
    async fn test_starts_on_first_step() {
        let wizard = controller(Flow::Legacy, Arc::new(FakeAuth::new()));
        assert_eq!(wizard.state(), &WizardState::Step(1));
        assert_eq!(wizard.submit_label(), "Next");
        assert!(!wizard.is_busy());
    }

    #[tokio::test]
    async fn test_account_step_advances() {
        let mut wizard = controller(Flow::Legacy, Arc::new(FakeAuth::new()));
        fill_account(&mut wizard);
        let transition = wizard.next().await;
        assert_eq!(transition, Transition::Advanced { from: 1, to: 2 });
        assert!(transition.scrolls_to_top());
        assert!(!wizard.is_busy());
    }

    #[tokio::test]
    async fn test_taken_email_never_registers() {
        let api = Arc::new(FakeAuth {
            email_exists: true,
            ..FakeAuth::new()
        });
        let mut wizard = controller(Flow::Move, api.clone());
        fill_account(&mut wizard);

        match wizard.next().await {
            Transition::Rejected(err) => {
                assert_eq!(err.message, "This email is already registered")
            }
            other => panic!("unexpected transition {:?}", other),
        }
        assert_eq!(wizard.current_step(), 1);
        assert_eq!(wizard.last_error().unwrap().kind, ErrorKind::EmailTaken);
        assert_eq!(api.registrations(), 0);

        let notices = wizard.take_notices();
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].level, NoticeLevel::Error);
        assert!(wizard.take_notices().is_empty());
    }

    #[tokio::test]
    async fn test_gate_blocks_without_moving() {
        let mut wizard = controller(Flow::Legacy, Arc::new(FakeAuth::new()));
        fill_account(&mut wizard);
        wizard.next().await;

        match wizard.next().await {
            Transition::Blocked(result) => {
                assert_eq!(result.reasons, vec![MSG_SELECT_INTEREST])
            }
            other => panic!("unexpected transition {:?}", other),
        }
        assert_eq!(wizard.current_step(), 2);
    }

    #[tokio::test]
    async fn test_previous_keeps_answers() {
        let mut wizard = controller(Flow::Legacy, Arc::new(FakeAuth::new()));
        assert_eq!(wizard.previous(), Transition::Ignored);

        fill_account(&mut wizard);
        wizard.next().await;
        wizard.update(FormUpdate::Toggle(ListField::Interests, "arts".into()));
        let before = wizard.form().clone();

        let transition = wizard.previous();
        assert_eq!(transition, Transition::Retreated { from: 2, to: 1 });
        assert!(transition.scrolls_to_top());
        assert_eq!(wizard.form(), &before);
    }

    #[tokio::test]
    async fn test_move_flow_completes() {
        let api = Arc::new(FakeAuth::new());
        let mut wizard = controller(Flow::Move, api.clone());
        fill_account(&mut wizard);
        assert!(matches!(wizard.next().await, Transition::Advanced { .. }));
        fill_profile(&mut wizard);
        assert!(matches!(wizard.next().await, Transition::Advanced { .. }));
        assert_eq!(wizard.submit_label(), "Create account");

        consent(&mut wizard);
        match wizard.next().await {
            Transition::Completed(session) => assert_eq!(session.token, "tok-1"),
            other => panic!("unexpected transition {:?}", other),
        }
        assert!(wizard.is_complete());
        assert_eq!(api.registrations(), 1);

        assert!(!wizard.update(FormUpdate::FullName("Changed".into())));
        assert_eq!(wizard.form().full_name, "Ana Souza");
        assert_eq!(wizard.next().await, Transition::Ignored);
        assert_eq!(wizard.previous(), Transition::Ignored);
        assert_eq!(api.registrations(), 1);
    }

    #[tokio::test]
    async fn test_final_step_requires_consent() {
        let api = Arc::new(FakeAuth::new());
        let mut wizard = controller(Flow::Move, api.clone());
        fill_account(&mut wizard);
        wizard.next().await;
        fill_profile(&mut wizard);
        wizard.next().await;

        wizard.update(FormUpdate::AcceptsTerms(true));
        assert!(matches!(wizard.next().await, Transition::Blocked(_)));
        assert_eq!(api.registrations(), 0);
        assert_eq!(wizard.current_step(), 3);
    }

    #[tokio::test]
    async fn test_failed_submission_stays_on_last_step() {
        let api = Arc::new(FakeAuth {
            register_failure: Some((500, "stack trace".into())),
            ..FakeAuth::new()
        });
        let mut wizard = controller(Flow::Move, api.clone());
        fill_account(&mut wizard);
        wizard.next().await;
        fill_profile(&mut wizard);
        wizard.next().await;
        consent(&mut wizard);
        let before = wizard.form().clone();

        match wizard.next().await {
            Transition::Rejected(err) => {
                assert_eq!(err.kind, ErrorKind::Server);
                assert_eq!(err.message, "Server error, please try again");
            }
            other => panic!("unexpected transition {:?}", other),
        }
        assert_eq!(wizard.state(), &WizardState::Step(3));
        assert_eq!(wizard.form(), &before);
        assert!(!wizard.is_busy());

        // manual retry
        wizard.next().await;
        assert_eq!(api.registrations(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_abandoned_submission_unlocks_the_wizard() {
        let api = Arc::new(FakeAuth {
            register_delay: Some(std::time::Duration::from_secs(30)),
            ..FakeAuth::new()
        });
        let mut wizard = controller(Flow::Move, api.clone());
        fill_account(&mut wizard);
        wizard.next().await;
        fill_profile(&mut wizard);
        wizard.next().await;
        consent(&mut wizard);

        let abandoned =
            tokio::time::timeout(std::time::Duration::from_secs(1), wizard.next()).await;
        assert!(abandoned.is_err());
        assert!(!wizard.is_busy());
        assert_eq!(wizard.state(), &WizardState::Step(3));
        assert_eq!(wizard.submit_label(), "Create account");

        assert_eq!(wizard.previous(), Transition::Retreated { from: 3, to: 2 });
        wizard.next().await;
        assert!(matches!(wizard.next().await, Transition::Completed(_)));
        assert_eq!(api.registrations(), 2);
    }
}
