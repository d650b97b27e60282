use serde::{Deserialize, Serialize};

use crate::error::VoteError;

pub const TOTAL_STEPS: u8 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WizardPhase {
    Selecting,
    Reviewing,
    ReadyToSubmit,
    Submitting,
    Complete,
}

impl WizardPhase {
    pub fn step(self) -> u8 {
        match self {
            WizardPhase::Selecting => 1,
            WizardPhase::Reviewing => 2,
            WizardPhase::ReadyToSubmit | WizardPhase::Submitting | WizardPhase::Complete => 3,
        }
    }

    pub fn submission_state(self) -> SubmissionState {
        match self {
            WizardPhase::Submitting => SubmissionState::Submitting,
            WizardPhase::Complete => SubmissionState::Complete,
            _ => SubmissionState::Idle,
        }
    }

    pub fn progress_percent(self) -> u8 {
        (u16::from(self.step()) * 100 / u16::from(TOTAL_STEPS)) as u8
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SubmissionState {
    Idle,
    Submitting,
    Complete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WizardAction {
    Select,
    Advance { has_selection: bool },
    Retreat,
    SubmitStart,
    SubmitSuccess,
    SubmitFailure,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhaseTransition {
    pub from: WizardPhase,
    pub to: WizardPhase,
    pub reason: &'static str,
}

pub fn draft_transition(
    phase: WizardPhase,
    action: WizardAction,
) -> Result<PhaseTransition, VoteError> {
    use WizardAction as A;
    use WizardPhase as P;

    let (to, reason) = match (phase, action) {
        (P::Complete, _) => return Err(VoteError::WizardClosed),

        (P::Selecting, A::Select) => (P::Selecting, "selection_changed"),
        (P::Reviewing, A::Select) => (P::Reviewing, "selection_changed"),

        (P::Selecting, A::Advance { has_selection: false }) => {
            return Err(VoteError::SelectionRequired)
        }
        (P::Selecting, A::Advance { has_selection: true }) => (P::Reviewing, "advance_to_review"),
        (P::Reviewing, A::Advance { .. }) => (P::ReadyToSubmit, "advance_to_submit"),

        (P::Selecting, A::Retreat) => (P::Selecting, "retreat_at_first_step"),
        (P::Reviewing, A::Retreat) => (P::Selecting, "retreat_to_select"),
        (P::ReadyToSubmit, A::Retreat) => (P::Reviewing, "retreat_to_review"),

        (P::ReadyToSubmit, A::SubmitStart) => (P::Submitting, "submit_started"),
        (P::Submitting, A::SubmitSuccess) => (P::Complete, "submit_succeeded"),
        (P::Submitting, A::SubmitFailure) => (P::ReadyToSubmit, "submit_failed"),

        (P::Submitting, A::Select | A::Advance { .. } | A::Retreat | A::SubmitStart) => {
            return Err(VoteError::AlreadySubmitting)
        }
        (phase, action) => return Err(VoteError::IllegalTransition { phase, action }),
    };

    Ok(PhaseTransition {
        from: phase,
        to,
        reason,
    })
}
