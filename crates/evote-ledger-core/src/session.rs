//! Wallet session lifecycle.
//!
//! `SessionManager` is the single owner of the connection state. Consumers hold a
//! `watch::Receiver<Session>` from [`SessionManager::subscribe`]; every change is published
//! through the sender before the call that caused it returns.

use alloy::primitives::Address;
use tokio::sync::watch;

use crate::domain::{Network, ProviderEvent, ProviderEventKind, Session, SignerHandle};
use crate::error::VoteError;
use crate::ports::{PortError, ProviderPort, ReconnectStorePort};

/// Result of the startup reconnect attempt. Failures are reported here instead of to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AutoConnectOutcome {
    Skipped,
    Connected(Session),
    Failed { reason: String },
}

pub struct SessionManager<P, R>
where
    P: ProviderPort,
    R: ReconnectStorePort,
{
    pub provider: P,
    pub store: R,
    state: watch::Sender<Session>,
}

/// Clears `connecting` when a connect attempt ends, including when its future is dropped.
struct ConnectingGuard<'a> {
    state: &'a watch::Sender<Session>,
}

impl Drop for ConnectingGuard<'_> {
    fn drop(&mut self) {
        self.state.send_if_modified(|s| {
            if s.connecting {
                s.connecting = false;
                true
            } else {
                false
            }
        });
    }
}

impl<P, R> SessionManager<P, R>
where
    P: ProviderPort,
    R: ReconnectStorePort,
{
    pub fn new(provider: P, store: R) -> Self {
        let (state, _) = watch::channel(Session::default());
        Self {
            provider,
            store,
            state,
        }
    }

    pub fn session(&self) -> Session {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Session> {
        self.state.subscribe()
    }

    pub async fn connect(&self) -> Result<Session, VoteError> {
        if !self.provider.is_available() {
            tracing::warn!("wallet connect requested without a signing provider");
            return Err(VoteError::ProviderUnavailable(
                "no signing provider detected".to_owned(),
            ));
        }

        let mut in_flight = false;
        self.state.send_if_modified(|s| {
            if s.connecting {
                in_flight = true;
                false
            } else {
                s.connecting = true;
                true
            }
        });
        if in_flight {
            return Err(VoteError::AlreadyConnecting);
        }
        let _guard = ConnectingGuard { state: &self.state };

        match self.establish().await {
            Ok((account, network)) => {
                if let Err(e) = self.store.store_intent(true) {
                    tracing::warn!(error = %e, "failed to persist reconnect intent");
                }
                self.state.send_modify(|s| {
                    s.account = Some(account);
                    s.chain_id = Some(network.chain_id);
                    s.connecting = false;
                });
                tracing::info!(account = %account, chain_id = network.chain_id, "wallet connected");
                Ok(self.session())
            }
            Err(e) => {
                self.state.send_modify(|s| {
                    s.account = None;
                    s.chain_id = None;
                    s.connecting = false;
                });
                tracing::warn!(error = %e, "wallet connection failed");
                Err(VoteError::ConnectionFailed(e))
            }
        }
    }

    async fn establish(&self) -> Result<(Address, Network), PortError> {
        let accounts = self.provider.request_accounts().await?;
        let account = accounts
            .first()
            .copied()
            .ok_or_else(|| PortError::Rejected("provider returned no accounts".to_owned()))?;
        let network = self.provider.network().await?;
        Ok((account, network))
    }

    pub fn disconnect(&self) -> Result<(), VoteError> {
        let was_connected = self.state.send_if_modified(|s| {
            if s.account.is_none() && s.chain_id.is_none() {
                return false;
            }
            s.account = None;
            s.chain_id = None;
            true
        });
        self.store
            .store_intent(false)
            .map_err(VoteError::Persistence)?;
        if was_connected {
            tracing::info!("wallet disconnected");
        }
        Ok(())
    }

    /// Startup reconnect driven by the persisted intent flag.
    pub async fn auto_connect(&self) -> AutoConnectOutcome {
        let intent = match self.store.load_intent() {
            Ok(intent) => intent,
            Err(e) => {
                tracing::warn!(error = %e, "could not read reconnect intent");
                return AutoConnectOutcome::Failed {
                    reason: e.to_string(),
                };
            }
        };
        if !intent {
            tracing::debug!("no reconnect intent stored; skipping auto-connect");
            return AutoConnectOutcome::Skipped;
        }

        match self.connect().await {
            Ok(session) => AutoConnectOutcome::Connected(session),
            Err(e) => {
                tracing::warn!(error = %e, "automatic wallet reconnect failed");
                AutoConnectOutcome::Failed {
                    reason: e.to_string(),
                }
            }
        }
    }

    /// Connects unless a session already exists, then returns the settled session.
    pub async fn ensure_connected(&self) -> Result<Session, VoteError> {
        let current = self.session();
        if current.is_connected() {
            return Ok(current);
        }
        self.connect().await
    }

    pub async fn signer(&self) -> Result<SignerHandle, VoteError> {
        if !self.session().is_connected() {
            return Err(VoteError::NotConnected);
        }
        self.provider
            .signer()
            .await
            .map_err(VoteError::ConnectionFailed)
    }

    /// Applies one provider push.
    ///
    /// An empty account list disconnects, exactly like [`Self::disconnect`]. A non-empty list
    /// only switches the account of an existing session, and a chain change only updates a
    /// connected session: a wallet cannot open a session here without the user calling
    /// [`Self::connect`], so a disconnected manager ignores both.
    pub fn apply_event(&self, event: &ProviderEvent) -> Result<(), VoteError> {
        match &event.kind {
            ProviderEventKind::AccountsChanged(accounts) => match accounts.first().copied() {
                None => self.disconnect(),
                Some(first) => {
                    let switched = self.state.send_if_modified(|s| match s.account {
                        Some(current) if current != first => {
                            s.account = Some(first);
                            true
                        }
                        _ => false,
                    });
                    if switched {
                        tracing::info!(account = %first, sequence = event.sequence, "active account changed");
                    }
                    Ok(())
                }
            },
            ProviderEventKind::ChainChanged(chain_id) => {
                let chain_id = *chain_id;
                let switched = self.state.send_if_modified(|s| {
                    if s.account.is_some() && s.chain_id != Some(chain_id) {
                        s.chain_id = Some(chain_id);
                        true
                    } else {
                        false
                    }
                });
                if switched {
                    tracing::info!(chain_id, sequence = event.sequence, "network changed");
                }
                Ok(())
            }
        }
    }

    /// Drains queued provider events and applies them in order. Returns how many were drained.
    pub async fn pump_events(&self) -> Result<usize, VoteError> {
        if !self.provider.is_available() {
            return Ok(0);
        }
        let mut events = self
            .provider
            .drain_events()
            .await
            .map_err(VoteError::ConnectionFailed)?;
        events.sort_by_key(|e| e.sequence);
        for event in &events {
            self.apply_event(event)?;
        }
        Ok(events.len())
    }
}
