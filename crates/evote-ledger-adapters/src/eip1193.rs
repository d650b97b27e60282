use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use alloy::primitives::{address, Address};
use async_trait::async_trait;
use serde_json::Value;

use evote_ledger_core::{
    Network, PortError, ProviderEvent, ProviderEventKind, ProviderPort, SignerHandle,
};

use crate::EvoteAdapterConfig;

#[derive(Debug, Clone)]
pub struct Eip1193Adapter {
    mode: ProviderMode,
    state: Arc<Mutex<ProviderState>>,
}

#[derive(Debug, Clone)]
enum ProviderMode {
    Disabled(String),
    Deterministic,
    Proxy(ProxyRuntime),
}

#[derive(Debug, Clone)]
struct ProxyRuntime {
    base_url: String,
    client: reqwest::Client,
}

const DETERMINISTIC_ACCOUNT: Address = address!("1000000000000000000000000000000000000001");

#[derive(Debug, Clone)]
struct ProviderState {
    accounts: Vec<Address>,
    chain_id: u64,
    // Whether `accounts` / `chain_id` mirror a real wallet read. Until they do, the
    // next poll records a baseline instead of reporting a change.
    accounts_seen: bool,
    chain_seen: bool,
    reject_reason: Option<String>,
    event_seq: u64,
    events: Vec<ProviderEvent>,
}

impl ProviderState {
    fn deterministic() -> Self {
        Self {
            accounts: vec![DETERMINISTIC_ACCOUNT],
            chain_id: 1,
            accounts_seen: true,
            chain_seen: true,
            reject_reason: None,
            event_seq: 0,
            events: Vec::new(),
        }
    }

    fn unobserved() -> Self {
        Self {
            accounts: Vec::new(),
            chain_id: 0,
            accounts_seen: false,
            chain_seen: false,
            ..Self::deterministic()
        }
    }

    fn observe_accounts(&mut self, accounts: Vec<Address>) {
        let changed = self.accounts_seen && self.accounts != accounts;
        self.accounts_seen = true;
        self.accounts = accounts.clone();
        if changed {
            self.push_event(ProviderEventKind::AccountsChanged(accounts));
        }
    }

    fn observe_chain(&mut self, chain_id: u64) {
        let changed = self.chain_seen && self.chain_id != chain_id;
        self.chain_seen = true;
        self.chain_id = chain_id;
        if changed {
            self.push_event(ProviderEventKind::ChainChanged(chain_id));
        }
    }

    fn push_event(&mut self, kind: ProviderEventKind) {
        self.event_seq = self.event_seq.saturating_add(1);
        let sequence = self.event_seq;
        self.events.push(ProviderEvent { sequence, kind });
    }
}

impl Default for Eip1193Adapter {
    fn default() -> Self {
        Self::with_config(EvoteAdapterConfig::from_env())
    }
}

impl Eip1193Adapter {
    pub fn with_config(config: EvoteAdapterConfig) -> Self {
        let mode = if let Some(ref base_url) = config.eip1193_proxy_url {
            let timeout = Duration::from_millis(config.provider_timeout_ms);
            match reqwest::Client::builder().timeout(timeout).build() {
                Ok(client) => ProviderMode::Proxy(ProxyRuntime {
                    base_url: base_url.clone(),
                    client,
                }),
                Err(e) => {
                    if config.strict_runtime_required() {
                        ProviderMode::Disabled(format!(
                            "failed to initialize EIP-1193 proxy client in production profile: {e}"
                        ))
                    } else {
                        tracing::warn!(error = %e, "EIP-1193 proxy client unavailable; using deterministic provider");
                        ProviderMode::Deterministic
                    }
                }
            }
        } else if config.strict_runtime_required() {
            ProviderMode::Disabled(
                "EIP-1193 proxy URL not configured in production runtime profile".to_owned(),
            )
        } else {
            ProviderMode::Deterministic
        };

        let state = match mode {
            ProviderMode::Proxy(_) => ProviderState::unobserved(),
            _ => ProviderState::deterministic(),
        };
        Self {
            mode,
            state: Arc::new(Mutex::new(state)),
        }
    }

    /// An adapter with no signing capability behind it.
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self {
            mode: ProviderMode::Disabled(reason.into()),
            state: Arc::new(Mutex::new(ProviderState::deterministic())),
        }
    }

    fn check_mode(&self) -> Result<(), PortError> {
        if let ProviderMode::Disabled(reason) = &self.mode {
            return Err(PortError::Policy(reason.clone()));
        }
        Ok(())
    }

    fn lock_state(&self) -> Result<MutexGuard<'_, ProviderState>, PortError> {
        self.state
            .lock()
            .map_err(|e| PortError::Transport(format!("provider lock poisoned: {e}")))
    }

    fn take_rejection(&self) -> Result<(), PortError> {
        let mut g = self.lock_state()?;
        match g.reject_reason.take() {
            Some(reason) => Err(PortError::Rejected(reason)),
            None => Ok(()),
        }
    }

    /// Simulates the user dismissing the next account request.
    pub fn debug_reject_next_request(&self, reason: &str) -> Result<(), PortError> {
        self.lock_state()?.reject_reason = Some(reason.to_owned());
        Ok(())
    }

    pub fn debug_inject_accounts_changed(&self, accounts: Vec<Address>) -> Result<(), PortError> {
        let mut g = self.lock_state()?;
        g.accounts = accounts.clone();
        g.push_event(ProviderEventKind::AccountsChanged(accounts));
        Ok(())
    }

    pub fn debug_inject_chain_changed(&self, chain_id: u64) -> Result<(), PortError> {
        let mut g = self.lock_state()?;
        g.chain_id = chain_id;
        g.push_event(ProviderEventKind::ChainChanged(chain_id));
        Ok(())
    }

    async fn proxy_call(&self, method: &str, params: Value) -> Result<Value, PortError> {
        let proxy = match &self.mode {
            ProviderMode::Proxy(proxy) => proxy,
            ProviderMode::Disabled(reason) => return Err(PortError::Policy(reason.clone())),
            ProviderMode::Deterministic => {
                return Err(PortError::NotImplemented(
                    "eip1193 proxy runtime not enabled",
                ))
            }
        };

        let payload = serde_json::json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": method,
            "params": params,
        });
        let response = proxy
            .client
            .post(&proxy.base_url)
            .json(&payload)
            .send()
            .await
            .map_err(|e| PortError::Transport(format!("eip1193 proxy request failed: {e}")))?;
        let status = response.status();
        let body: Value = response
            .json()
            .await
            .map_err(|e| PortError::Transport(format!("eip1193 proxy json decode failed: {e}")))?;
        if !status.is_success() {
            return Err(PortError::Transport(format!(
                "eip1193 proxy status {}: {}",
                status, body
            )));
        }
        if let Some(err) = body.get("error") {
            // 4001 is the EIP-1193 "user rejected request" code.
            if err.get("code").and_then(Value::as_i64) == Some(4001) {
                return Err(PortError::Rejected(err.to_string()));
            }
            return Err(PortError::Transport(format!(
                "eip1193 proxy returned error: {err}"
            )));
        }
        body.get("result")
            .cloned()
            .ok_or_else(|| PortError::Transport("eip1193 proxy missing result".to_owned()))
    }

    async fn proxy_accounts(&self, method: &str) -> Result<Vec<Address>, PortError> {
        let result = self.proxy_call(method, serde_json::json!([])).await?;
        json_accounts(&result)
    }

    async fn proxy_chain_id(&self) -> Result<u64, PortError> {
        let result = self.proxy_call("eth_chainId", serde_json::json!([])).await?;
        json_chain_id_to_u64(&result)
    }

    /// Polls the proxy and queues an event for every field that moved since the last read.
    /// The first read of each field only sets the baseline.
    async fn refresh_proxy_snapshot(&self) -> Result<(), PortError> {
        let accounts = self.proxy_accounts("eth_accounts").await?;
        let chain_id = self.proxy_chain_id().await?;

        let mut g = self.lock_state()?;
        g.observe_accounts(accounts);
        g.observe_chain(chain_id);
        Ok(())
    }
}

#[async_trait]
impl ProviderPort for Eip1193Adapter {
    fn is_available(&self) -> bool {
        !matches!(self.mode, ProviderMode::Disabled(_))
    }

    async fn request_accounts(&self) -> Result<Vec<Address>, PortError> {
        self.check_mode()?;
        self.take_rejection()?;

        if matches!(self.mode, ProviderMode::Proxy(_)) {
            let accounts = self.proxy_accounts("eth_requestAccounts").await?;
            let mut g = self.lock_state()?;
            g.accounts_seen = true;
            g.accounts = accounts.clone();
            return Ok(accounts);
        }

        Ok(self.lock_state()?.accounts.clone())
    }

    async fn network(&self) -> Result<Network, PortError> {
        self.check_mode()?;

        if matches!(self.mode, ProviderMode::Proxy(_)) {
            let chain_id = self.proxy_chain_id().await?;
            let mut g = self.lock_state()?;
            g.chain_seen = true;
            g.chain_id = chain_id;
            return Ok(Network { chain_id });
        }

        let chain_id = self.lock_state()?.chain_id;
        Ok(Network { chain_id })
    }

    async fn signer(&self) -> Result<SignerHandle, PortError> {
        self.check_mode()?;

        let accounts = if matches!(self.mode, ProviderMode::Proxy(_)) {
            self.proxy_accounts("eth_accounts").await?
        } else {
            let g = self.lock_state()?;
            g.accounts.clone()
        };
        accounts
            .first()
            .map(|address| SignerHandle { address: *address })
            .ok_or_else(|| PortError::NotFound("provider exposes no signer account".to_owned()))
    }

    async fn drain_events(&self) -> Result<Vec<ProviderEvent>, PortError> {
        self.check_mode()?;
        if matches!(self.mode, ProviderMode::Proxy(_)) {
            self.refresh_proxy_snapshot().await?;
        }
        let mut g = self.lock_state()?;
        Ok(std::mem::take(&mut g.events))
    }
}

fn json_accounts(value: &Value) -> Result<Vec<Address>, PortError> {
    let arr = value
        .as_array()
        .ok_or_else(|| PortError::Transport("accounts result must be array".to_owned()))?;
    arr.iter()
        .map(|item| {
            let raw = item
                .as_str()
                .ok_or_else(|| PortError::Transport("account item must be string".to_owned()))?;
            raw.parse()
                .map_err(|e| PortError::Validation(format!("invalid account: {e}")))
        })
        .collect()
}

fn json_chain_id_to_u64(value: &Value) -> Result<u64, PortError> {
    if let Some(n) = value.as_u64() {
        return Ok(n);
    }
    let s = value
        .as_str()
        .ok_or_else(|| PortError::Validation("chain id must be string or number".to_owned()))?;
    parse_chain_id_str(s)
}

fn parse_chain_id_str(raw: &str) -> Result<u64, PortError> {
    if raw.starts_with("0x") || raw.starts_with("0X") {
        u64::from_str_radix(&raw[2..], 16)
            .map_err(|e| PortError::Validation(format!("invalid hex chain id: {e}")))
    } else {
        raw.parse()
            .map_err(|e| PortError::Validation(format!("invalid chain id: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chain_ids_parse_from_hex_and_decimal() {
        assert_eq!(parse_chain_id_str("0x2105").expect("hex"), 8453);
        assert_eq!(parse_chain_id_str("0X1").expect("upper hex"), 1);
        assert_eq!(parse_chain_id_str("137").expect("decimal"), 137);
        assert!(parse_chain_id_str("0xzz").is_err());
        assert_eq!(
            json_chain_id_to_u64(&serde_json::json!(10)).expect("number"),
            10
        );
    }

    #[test]
    fn account_lists_reject_non_strings() {
        let err = json_accounts(&serde_json::json!([1])).expect_err("must fail");
        assert!(matches!(err, PortError::Transport(_)));
        let empty = json_accounts(&serde_json::json!([])).expect("empty list");
        assert!(empty.is_empty());
    }
}
