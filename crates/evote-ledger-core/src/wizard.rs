use std::sync::{Mutex, MutexGuard};

use serde::{Deserialize, Serialize};

use crate::domain::{Ballot, BallotCommit, Candidate, ConfirmationToken};
use crate::error::VoteError;
use crate::ports::{CommitPort, PortError};
use crate::state_machine::{
    draft_transition, PhaseTransition, SubmissionState, WizardAction, WizardPhase,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftSnapshot {
    pub step: u8,
    pub phase: WizardPhase,
    pub selection: Option<String>,
    pub submission_state: SubmissionState,
    pub confirmation: Option<ConfirmationToken>,
    pub progress_percent: u8,
}

#[derive(Debug, Clone)]
struct BallotDraft {
    phase: WizardPhase,
    selection: Option<String>,
    confirmation: Option<ConfirmationToken>,
}

/// Select → review → submit flow for one ballot. Build a new wizard per election visit.
pub struct BallotWizard<C: CommitPort> {
    pub commit: C,
    ballot: Ballot,
    draft: Mutex<BallotDraft>,
}

/// Returns an in-flight draft to `ReadyToSubmit` if the submit future is dropped.
struct SubmitGuard<'a> {
    draft: &'a Mutex<BallotDraft>,
}

impl Drop for SubmitGuard<'_> {
    fn drop(&mut self) {
        if let Ok(mut d) = self.draft.lock() {
            if d.phase == WizardPhase::Submitting {
                d.phase = WizardPhase::ReadyToSubmit;
            }
        }
    }
}

impl<C: CommitPort> BallotWizard<C> {
    pub fn new(ballot: Ballot, commit: C) -> Self {
        Self {
            commit,
            ballot,
            draft: Mutex::new(BallotDraft {
                phase: WizardPhase::Selecting,
                selection: None,
                confirmation: None,
            }),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, BallotDraft>, VoteError> {
        self.draft
            .lock()
            .map_err(|e| VoteError::Internal(format!("draft lock poisoned: {e}")))
    }

    pub fn ballot(&self) -> &Ballot {
        &self.ballot
    }

    pub fn snapshot(&self) -> Result<DraftSnapshot, VoteError> {
        let d = self.lock()?;
        Ok(DraftSnapshot {
            step: d.phase.step(),
            phase: d.phase,
            selection: d.selection.clone(),
            submission_state: d.phase.submission_state(),
            confirmation: d.confirmation.clone(),
            progress_percent: d.phase.progress_percent(),
        })
    }

    pub fn selected_candidate(&self) -> Result<Option<Candidate>, VoteError> {
        let d = self.lock()?;
        Ok(d
            .selection
            .as_deref()
            .and_then(|id| self.ballot.candidate(id))
            .cloned())
    }

    pub fn select_candidate(&self, candidate_id: &str) -> Result<PhaseTransition, VoteError> {
        let mut d = self.lock()?;
        let transition = draft_transition(d.phase, WizardAction::Select)?;
        if self.ballot.candidate(candidate_id).is_none() {
            return Err(VoteError::UnknownCandidate(candidate_id.to_owned()));
        }
        d.selection = Some(candidate_id.to_owned());
        d.phase = transition.to;
        tracing::debug!(candidate_id, "candidate selected");
        Ok(transition)
    }

    pub fn advance(&self) -> Result<PhaseTransition, VoteError> {
        let mut d = self.lock()?;
        let transition = draft_transition(
            d.phase,
            WizardAction::Advance {
                has_selection: d.selection.is_some(),
            },
        )?;
        d.phase = transition.to;
        tracing::debug!(from = ?transition.from, to = ?transition.to, "wizard advanced");
        Ok(transition)
    }

    pub fn retreat(&self) -> Result<PhaseTransition, VoteError> {
        let mut d = self.lock()?;
        let transition = draft_transition(d.phase, WizardAction::Retreat)?;
        d.phase = transition.to;
        tracing::debug!(from = ?transition.from, to = ?transition.to, "wizard retreated");
        Ok(transition)
    }

    /// Runs the single commit call. A concurrent call while one is in flight is rejected.
    pub async fn submit(&self) -> Result<ConfirmationToken, VoteError> {
        let request = {
            let mut d = self.lock()?;
            let transition = draft_transition(d.phase, WizardAction::SubmitStart)?;
            let candidate_id = d.selection.clone().ok_or(VoteError::SelectionRequired)?;
            d.phase = transition.to;
            BallotCommit {
                election_id: self.ballot.election_id.clone(),
                candidate_id,
            }
        };
        let _guard = SubmitGuard { draft: &self.draft };

        let result = match self.commit.commit(&request).await {
            Ok(token) if token.is_empty() => Err(PortError::Validation(
                "commit returned an empty confirmation token".to_owned(),
            )),
            other => other,
        };

        let mut d = self.lock()?;
        match result {
            Ok(token) => {
                let transition = draft_transition(d.phase, WizardAction::SubmitSuccess)?;
                d.phase = transition.to;
                d.confirmation = Some(token.clone());
                tracing::info!(
                    election_id = %request.election_id,
                    confirmation = %token,
                    "ballot committed"
                );
                Ok(token)
            }
            Err(e) => {
                let transition = draft_transition(d.phase, WizardAction::SubmitFailure)?;
                d.phase = transition.to;
                tracing::warn!(election_id = %request.election_id, error = %e, "ballot commit failed");
                Err(VoteError::SubmissionFailed(e))
            }
        }
    }
}
