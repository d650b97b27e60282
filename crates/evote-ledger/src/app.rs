//! Wiring between the command line and the session/ballot core.

use std::path::Path;

use clap::{Parser, Subcommand};

use evote_ledger_adapters::{CommitAdapter, Eip1193Adapter, EvoteAdapterConfig, FileReconnectStore};
use evote_ledger_core::{
    AutoConnectOutcome, BallotWizard, DraftSnapshot, Notice, NoticeTone, Session, SessionManager,
    VoteError,
};

use crate::fixtures;

const DEFAULT_STORE_PATH: &str = ".evote-ledger/session.json";

/// Wallet session and ballot submission for eVoteLedger.
#[derive(Parser, Debug)]
#[command(name = "evote-ledger")]
#[command(about = "Wallet session and ballot submission for eVoteLedger")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Show the current wallet session (default)
    Status,
    /// Connect the wallet and remember the choice
    Connect,
    /// Disconnect the wallet and forget the choice
    Disconnect,
    /// List the candidates on the ballot
    Ballot,
    /// Cast a vote for a candidate
    Vote {
        /// Candidate id as listed by `ballot`
        candidate_id: String,
    },
}

pub struct App {
    config: EvoteAdapterConfig,
    session: SessionManager<Eip1193Adapter, FileReconnectStore>,
}

impl App {
    pub fn new(config: EvoteAdapterConfig) -> Self {
        let store = FileReconnectStore::with_config(&config, Path::new(DEFAULT_STORE_PATH));
        let provider = Eip1193Adapter::with_config(config.clone());
        Self {
            config,
            session: SessionManager::new(provider, store),
        }
    }

    pub async fn run(&self, command: Command) -> Result<(), VoteError> {
        match self.session.auto_connect().await {
            AutoConnectOutcome::Failed { reason } => {
                tracing::warn!(%reason, "continuing without a restored wallet session")
            }
            AutoConnectOutcome::Connected(session) => {
                tracing::debug!(account = ?session.account, "wallet session restored")
            }
            AutoConnectOutcome::Skipped => {}
        }

        match command {
            Command::Status => {
                print_session(&self.session.session());
                Ok(())
            }
            Command::Connect => {
                let session = self.session.connect().await?;
                if let Some(account) = session.account {
                    show(&Notice::connected(&account));
                }
                Ok(())
            }
            Command::Disconnect => {
                self.session.disconnect()?;
                show(&Notice::disconnected());
                Ok(())
            }
            Command::Ballot => {
                let ballot = fixtures::city_council_ballot();
                println!("{} (election {})", ballot.title, ballot.election_id);
                for c in &ballot.candidates {
                    println!("  [{}] {} - {}: {}", c.id, c.name, c.party, c.description);
                }
                Ok(())
            }
            Command::Vote { candidate_id } => self.vote(&candidate_id).await,
        }
    }

    async fn vote(&self, candidate_id: &str) -> Result<(), VoteError> {
        let session = self.session.ensure_connected().await?;
        if let Some(short) = session.short_account() {
            println!("voting as {short}");
        }

        let wizard = BallotWizard::new(
            fixtures::city_council_ballot(),
            CommitAdapter::with_config(&self.config),
        );
        println!("{}", wizard.ballot().title);

        wizard.select_candidate(candidate_id)?;
        print_progress(&wizard.snapshot()?);
        wizard.advance()?;
        if let Some(candidate) = wizard.selected_candidate()? {
            println!("  reviewing: {} ({})", candidate.name, candidate.party);
        }
        print_progress(&wizard.snapshot()?);
        wizard.advance()?;
        print_progress(&wizard.snapshot()?);

        println!("  submitting...");
        let token = wizard.submit().await?;
        show(&Notice::vote_recorded(&token));
        Ok(())
    }
}

pub fn show(notice: &Notice) {
    let marker = match notice.tone {
        NoticeTone::Info => "ok",
        NoticeTone::Destructive => "error",
    };
    println!("[{marker}] {}: {}", notice.title, notice.description);
}

fn print_session(session: &Session) {
    match (session.short_account(), session.chain_id) {
        (Some(account), Some(chain_id)) => println!("connected: {account} on chain {chain_id}"),
        (Some(account), None) => println!("connected: {account}"),
        _ => println!("not connected"),
    }
}

fn print_progress(snapshot: &DraftSnapshot) {
    println!(
        "  step {}/{} ({}%)",
        snapshot.step,
        evote_ledger_core::TOTAL_STEPS,
        snapshot.progress_percent
    );
}
