use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use alloy::primitives::keccak256;
use async_trait::async_trait;

use evote_ledger_core::{BallotCommit, CommitPort, ConfirmationToken, PortError};

use crate::EvoteAdapterConfig;

/// Ballot commit backend. Only the simulated ledger exists today: it waits the configured
/// delay and answers with a transaction-hash style token.
#[derive(Debug, Clone)]
pub struct CommitAdapter {
    mode: CommitMode,
    nonce: Arc<AtomicU64>,
    fail_next: Arc<Mutex<Option<String>>>,
}

#[derive(Debug, Clone)]
enum CommitMode {
    Disabled(String),
    Simulated { delay: Duration },
}

impl Default for CommitAdapter {
    fn default() -> Self {
        Self::with_config(&EvoteAdapterConfig::from_env())
    }
}

impl CommitAdapter {
    pub fn with_config(config: &EvoteAdapterConfig) -> Self {
        let mode = if config.strict_runtime_required() {
            CommitMode::Disabled(
                "ballot ledger runtime not available in production runtime profile".to_owned(),
            )
        } else {
            CommitMode::Simulated {
                delay: Duration::from_millis(config.commit_delay_ms),
            }
        };
        Self {
            mode,
            nonce: Arc::new(AtomicU64::new(0)),
            fail_next: Arc::new(Mutex::new(None)),
        }
    }

    pub fn simulated(delay: Duration) -> Self {
        Self {
            mode: CommitMode::Simulated { delay },
            nonce: Arc::new(AtomicU64::new(0)),
            fail_next: Arc::new(Mutex::new(None)),
        }
    }

    pub fn debug_fail_next(&self, reason: &str) -> Result<(), PortError> {
        let mut g = self
            .fail_next
            .lock()
            .map_err(|e| PortError::Transport(format!("commit lock poisoned: {e}")))?;
        *g = Some(reason.to_owned());
        Ok(())
    }

    fn take_failure(&self) -> Result<Option<String>, PortError> {
        let mut g = self
            .fail_next
            .lock()
            .map_err(|e| PortError::Transport(format!("commit lock poisoned: {e}")))?;
        Ok(g.take())
    }
}

#[async_trait]
impl CommitPort for CommitAdapter {
    async fn commit(&self, ballot: &BallotCommit) -> Result<ConfirmationToken, PortError> {
        let delay = match &self.mode {
            CommitMode::Disabled(reason) => return Err(PortError::Policy(reason.clone())),
            CommitMode::Simulated { delay } => *delay,
        };

        tokio::time::sleep(delay).await;

        if let Some(reason) = self.take_failure()? {
            return Err(PortError::Transport(reason));
        }

        let nonce = self.nonce.fetch_add(1, Ordering::SeqCst);
        let seed = format!("{}:{}:{nonce}", ballot.election_id, ballot.candidate_id);
        Ok(ConfirmationToken(keccak256(seed.as_bytes()).to_string()))
    }
}
