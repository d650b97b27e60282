#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use alloy::primitives::Address;
use async_trait::async_trait;
use tokio::sync::Notify;

use evote_ledger_core::{
    Ballot, BallotCommit, BallotWizard, Candidate, CommitPort, ConfirmationToken, Network,
    PortError, ProviderEvent, ProviderEventKind, ProviderPort, ReconnectStorePort, SessionManager,
    SignerHandle,
};

pub fn account_a() -> Address {
    "0x1000000000000000000000000000000000000001"
        .parse()
        .expect("valid account a")
}

pub fn account_b() -> Address {
    "0x2000000000000000000000000000000000000002"
        .parse()
        .expect("valid account b")
}

#[derive(Debug)]
struct FakeProviderState {
    available: bool,
    accounts: Vec<Address>,
    chain_id: u64,
    reject: Option<String>,
    hang: bool,
    request_count: usize,
    event_seq: u64,
    events: Vec<ProviderEvent>,
}

#[derive(Debug, Clone)]
pub struct FakeProvider {
    inner: Arc<Mutex<FakeProviderState>>,
}

impl Default for FakeProvider {
    fn default() -> Self {
        Self {
            inner: Arc::new(Mutex::new(FakeProviderState {
                available: true,
                accounts: vec![account_a()],
                chain_id: 1,
                reject: None,
                hang: false,
                request_count: 0,
                event_seq: 0,
                events: Vec::new(),
            })),
        }
    }
}

impl FakeProvider {
    pub fn unavailable() -> Self {
        let provider = Self::default();
        provider.state().available = false;
        provider
    }

    fn state(&self) -> MutexGuard<'_, FakeProviderState> {
        self.inner.lock().expect("fake provider lock")
    }

    pub fn set_accounts(&self, accounts: Vec<Address>) {
        self.state().accounts = accounts;
    }

    pub fn reject_with(&self, reason: Option<&str>) {
        self.state().reject = reason.map(str::to_owned);
    }

    pub fn set_hang(&self, hang: bool) {
        self.state().hang = hang;
    }

    pub fn request_count(&self) -> usize {
        self.state().request_count
    }

    pub fn push_event(&self, kind: ProviderEventKind) {
        let mut g = self.state();
        g.event_seq += 1;
        let sequence = g.event_seq;
        g.events.push(ProviderEvent { sequence, kind });
    }
}

#[async_trait]
impl ProviderPort for FakeProvider {
    fn is_available(&self) -> bool {
        self.state().available
    }

    async fn request_accounts(&self) -> Result<Vec<Address>, PortError> {
        let (hang, result) = {
            let mut g = self.state();
            g.request_count += 1;
            let result = match &g.reject {
                Some(reason) => Err(PortError::Rejected(reason.clone())),
                None => Ok(g.accounts.clone()),
            };
            (g.hang, result)
        };
        if hang {
            std::future::pending::<()>().await;
        }
        result
    }

    async fn network(&self) -> Result<Network, PortError> {
        Ok(Network {
            chain_id: self.state().chain_id,
        })
    }

    async fn signer(&self) -> Result<SignerHandle, PortError> {
        let g = self.state();
        g.accounts
            .first()
            .map(|a| SignerHandle { address: *a })
            .ok_or_else(|| PortError::NotFound("no signer account".to_owned()))
    }

    async fn drain_events(&self) -> Result<Vec<ProviderEvent>, PortError> {
        Ok(std::mem::take(&mut self.state().events))
    }
}

#[derive(Debug, Clone, Default)]
pub struct MemoryFlag {
    value: Arc<Mutex<Option<bool>>>,
    fail_reads: Arc<Mutex<bool>>,
    fail_writes: Arc<Mutex<bool>>,
}

impl MemoryFlag {
    pub fn with_intent(intent: bool) -> Self {
        let flag = Self::default();
        *flag.value.lock().expect("flag lock") = Some(intent);
        flag
    }

    pub fn stored(&self) -> Option<bool> {
        *self.value.lock().expect("flag lock")
    }

    pub fn fail_reads(&self) {
        *self.fail_reads.lock().expect("flag lock") = true;
    }

    pub fn fail_writes(&self) {
        *self.fail_writes.lock().expect("flag lock") = true;
    }
}

impl ReconnectStorePort for MemoryFlag {
    fn load_intent(&self) -> Result<bool, PortError> {
        if *self.fail_reads.lock().expect("flag lock") {
            return Err(PortError::Transport("storage offline".to_owned()));
        }
        Ok(self.stored().unwrap_or(false))
    }

    fn store_intent(&self, connected: bool) -> Result<(), PortError> {
        if *self.fail_writes.lock().expect("flag lock") {
            return Err(PortError::Transport("storage read-only".to_owned()));
        }
        let mut g = self.value.lock().expect("flag lock");
        *g = connected.then_some(true);
        Ok(())
    }
}

pub type TestSession = SessionManager<FakeProvider, MemoryFlag>;

pub fn new_session() -> TestSession {
    SessionManager::new(FakeProvider::default(), MemoryFlag::default())
}

/// Commit port that blocks until released, counting every call.
#[derive(Debug, Clone, Default)]
pub struct GatedCommit {
    gate: Arc<Notify>,
    calls: Arc<AtomicUsize>,
    fail: Arc<Mutex<Option<String>>>,
}

impl GatedCommit {
    pub fn release(&self) {
        self.gate.notify_one();
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn fail_with(&self, reason: Option<&str>) {
        *self.fail.lock().expect("commit lock") = reason.map(str::to_owned);
    }
}

#[async_trait]
impl CommitPort for GatedCommit {
    async fn commit(&self, ballot: &BallotCommit) -> Result<ConfirmationToken, PortError> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        self.gate.notified().await;
        let failure = self.fail.lock().expect("commit lock").clone();
        match failure {
            Some(reason) => Err(PortError::Transport(reason)),
            None => Ok(ConfirmationToken(format!(
                "0x{n:02x}{}{}",
                ballot.election_id, ballot.candidate_id
            ))),
        }
    }
}

/// Commit port that resolves immediately.
#[derive(Debug, Clone, Default)]
pub struct InstantCommit;

#[async_trait]
impl CommitPort for InstantCommit {
    async fn commit(&self, ballot: &BallotCommit) -> Result<ConfirmationToken, PortError> {
        Ok(ConfirmationToken(format!(
            "0xconfirmed-{}-{}",
            ballot.election_id, ballot.candidate_id
        )))
    }
}

pub fn council_ballot() -> Ballot {
    let candidate = |id: &str, name: &str, party: &str| Candidate {
        id: id.to_owned(),
        name: name.to_owned(),
        party: party.to_owned(),
        description: String::new(),
    };
    Ballot {
        election_id: "1".to_owned(),
        title: "City Council Election 2025".to_owned(),
        candidates: vec![
            candidate("1", "Jane Smith", "Progressive Party"),
            candidate("2", "John Doe", "Liberty Party"),
            candidate("3", "Alex Johnson", "Unity Coalition"),
            candidate("4", "Maria Garcia", "Future Alliance"),
            candidate("5", "Sam Wilson", "Independent"),
        ],
    }
}

/// Wizard already at step 3 with candidate "3" selected.
pub fn ready_wizard<C: CommitPort>(commit: C) -> BallotWizard<C> {
    let wizard = BallotWizard::new(council_ballot(), commit);
    wizard.select_candidate("3").expect("select candidate");
    wizard.advance().expect("advance to review");
    wizard.advance().expect("advance to submit");
    wizard
}
