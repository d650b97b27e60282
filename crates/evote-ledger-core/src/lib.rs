pub mod domain;
pub mod error;
pub mod ports;
pub mod session;
pub mod state_machine;
pub mod wizard;

pub use domain::{
    Ballot, BallotCommit, Candidate, ConfirmationToken, Network, Notice, NoticeTone,
    ProviderEvent, ProviderEventKind, Session, SignerHandle, RECONNECT_FLAG_KEY,
};
pub use error::VoteError;
pub use ports::{CommitPort, PortError, ProviderPort, ReconnectStorePort};
pub use session::{AutoConnectOutcome, SessionManager};
pub use state_machine::{
    draft_transition, PhaseTransition, SubmissionState, WizardAction, WizardPhase, TOTAL_STEPS,
};
pub use wizard::{BallotWizard, DraftSnapshot};
