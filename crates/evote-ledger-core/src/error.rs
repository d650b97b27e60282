use thiserror::Error;

use crate::domain::Notice;
use crate::ports::PortError;
use crate::state_machine::{WizardAction, WizardPhase};

#[derive(Debug, Error)]
pub enum VoteError {
    #[error("no signing provider available: {0}")]
    ProviderUnavailable(String),
    #[error("wallet connection failed: {0}")]
    ConnectionFailed(#[source] PortError),
    #[error("a wallet connection is already in progress")]
    AlreadyConnecting,
    #[error("no wallet connected")]
    NotConnected,
    #[error("reconnect flag store failed: {0}")]
    Persistence(#[source] PortError),
    #[error("a candidate must be selected before continuing")]
    SelectionRequired,
    #[error("candidate {0} is not on this ballot")]
    UnknownCandidate(String),
    #[error("ballot submission already in progress")]
    AlreadySubmitting,
    #[error("ballot submission failed: {0}")]
    SubmissionFailed(#[source] PortError),
    #[error("ballot already submitted")]
    WizardClosed,
    #[error("illegal wizard transition: {action:?} from {phase:?}")]
    IllegalTransition {
        phase: WizardPhase,
        action: WizardAction,
    },
    #[error("internal error: {0}")]
    Internal(String),
}

impl VoteError {
    /// The notice a shell should show for this failure.
    pub fn notice(&self) -> Notice {
        match self {
            VoteError::ProviderUnavailable(_) => Notice::destructive(
                "Wallet not found",
                "Please install a browser wallet extension",
            ),
            VoteError::ConnectionFailed(_) => {
                Notice::destructive("Connection failed", "Failed to connect to wallet")
            }
            VoteError::AlreadyConnecting => {
                Notice::info("Connecting", "A wallet connection is already in progress")
            }
            VoteError::NotConnected => {
                Notice::destructive("Wallet required", "Connect your wallet to continue")
            }
            VoteError::Persistence(_) => Notice::destructive(
                "Preference not saved",
                "Your wallet connection preference could not be saved",
            ),
            VoteError::SelectionRequired => Notice::destructive(
                "Selection required",
                "Please select a candidate to continue",
            ),
            VoteError::UnknownCandidate(id) => Notice::destructive(
                "Unknown candidate",
                format!("Candidate {id} is not on this ballot"),
            ),
            VoteError::AlreadySubmitting => {
                Notice::info("Processing", "Your vote is already being submitted")
            }
            VoteError::SubmissionFailed(_) => Notice::destructive(
                "Error submitting vote",
                "There was an error recording your vote. Please try again.",
            ),
            VoteError::WizardClosed => {
                Notice::info("Vote recorded", "Your vote has already been recorded")
            }
            VoteError::IllegalTransition { .. } | VoteError::Internal(_) => {
                Notice::destructive("Something went wrong", self.to_string())
            }
        }
    }
}
