use alloy::primitives::Address;
use serde::{Deserialize, Serialize};

/// Storage key for the persisted reconnect intent.
pub const RECONNECT_FLAG_KEY: &str = "eVoteLedgerConnected";

/// The application's view of the connected signing identity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub account: Option<Address>,
    pub chain_id: Option<u64>,
    pub connecting: bool,
}

impl Session {
    pub fn is_connected(&self) -> bool {
        self.account.is_some()
    }

    /// `0x1234...abcd` form of the connected account.
    pub fn short_account(&self) -> Option<String> {
        self.account.map(|a| short_address(&a))
    }
}

pub fn short_address(address: &Address) -> String {
    let full = address.to_string();
    format!("{}...{}", &full[..6], &full[full.len() - 4..])
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Network {
    pub chain_id: u64,
}

/// Handle to the provider's signer for one account. Nothing is signed through it yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignerHandle {
    pub address: Address,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProviderEventKind {
    AccountsChanged(Vec<Address>),
    ChainChanged(u64),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderEvent {
    pub sequence: u64,
    pub kind: ProviderEventKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    pub id: String,
    pub name: String,
    pub party: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ballot {
    pub election_id: String,
    pub title: String,
    pub candidates: Vec<Candidate>,
}

impl Ballot {
    pub fn candidate(&self, id: &str) -> Option<&Candidate> {
        self.candidates.iter().find(|c| c.id == id)
    }
}

/// Payload handed to the commit call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BallotCommit {
    pub election_id: String,
    pub candidate_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfirmationToken(pub String);

impl ConfirmationToken {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::fmt::Display for ConfirmationToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NoticeTone {
    Info,
    Destructive,
}

/// One-shot message for the user, rendered by whatever shell is driving the flow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub title: String,
    pub description: String,
    pub tone: NoticeTone,
}

impl Notice {
    pub fn info(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            tone: NoticeTone::Info,
        }
    }

    pub fn destructive(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            tone: NoticeTone::Destructive,
        }
    }

    pub fn connected(account: &Address) -> Self {
        Self::info("Connected", format!("Connected to {}", short_address(account)))
    }

    pub fn disconnected() -> Self {
        Self::info("Disconnected", "Wallet disconnected successfully")
    }

    pub fn vote_recorded(token: &ConfirmationToken) -> Self {
        Self::info(
            "Vote submitted successfully",
            format!("Your vote has been recorded on the blockchain ({token})"),
        )
    }
}
