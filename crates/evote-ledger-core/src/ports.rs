use alloy::primitives::Address;
use async_trait::async_trait;
use thiserror::Error;

use crate::domain::{BallotCommit, ConfirmationToken, Network, ProviderEvent, SignerHandle};

#[derive(Debug, Error)]
pub enum PortError {
    #[error("port not implemented: {0}")]
    NotImplemented(&'static str),
    #[error("transport error: {0}")]
    Transport(String),
    #[error("validation error: {0}")]
    Validation(String),
    #[error("policy error: {0}")]
    Policy(String),
    #[error("request rejected: {0}")]
    Rejected(String),
    #[error("not found: {0}")]
    NotFound(String),
}

/// External signing provider (an EIP-1193 wallet or a stand-in for one).
#[async_trait]
pub trait ProviderPort: Send + Sync {
    /// Whether a signing capability is reachable at all.
    fn is_available(&self) -> bool;
    async fn request_accounts(&self) -> Result<Vec<Address>, PortError>;
    async fn network(&self) -> Result<Network, PortError>;
    async fn signer(&self) -> Result<SignerHandle, PortError>;
    /// Takes every event queued since the last call, oldest first.
    async fn drain_events(&self) -> Result<Vec<ProviderEvent>, PortError>;
}

/// Persistent storage for the reconnect intent flag.
///
/// Implementations are synchronous and hold a single small value; async callers run them
/// inline.
pub trait ReconnectStorePort: Send + Sync {
    fn load_intent(&self) -> Result<bool, PortError>;
    fn store_intent(&self, connected: bool) -> Result<(), PortError>;
}

#[async_trait]
pub trait CommitPort: Send + Sync {
    async fn commit(&self, ballot: &BallotCommit) -> Result<ConfirmationToken, PortError>;
}
