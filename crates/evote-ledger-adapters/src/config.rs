use std::path::PathBuf;

use evote_ledger_core::RECONNECT_FLAG_KEY;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuntimeProfile {
    Development,
    Production,
}

impl RuntimeProfile {
    fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "dev" | "development" => Some(Self::Development),
            "prod" | "production" => Some(Self::Production),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct EvoteAdapterConfig {
    pub runtime_profile: RuntimeProfile,
    pub eip1193_proxy_url: Option<String>,
    pub provider_timeout_ms: u64,
    pub reconnect_flag_key: String,
    pub reconnect_store_path: Option<PathBuf>,
    pub commit_delay_ms: u64,
}

impl Default for EvoteAdapterConfig {
    fn default() -> Self {
        Self {
            runtime_profile: RuntimeProfile::Development,
            eip1193_proxy_url: None,
            provider_timeout_ms: 15_000,
            reconnect_flag_key: RECONNECT_FLAG_KEY.to_owned(),
            reconnect_store_path: None,
            commit_delay_ms: 2_000,
        }
    }
}

impl EvoteAdapterConfig {
    /// Defaults overridden by `EVOTE_*` environment variables. Unparseable values are ignored.
    pub fn from_env() -> Self {
        let mut cfg = Self::default();

        if let Some(profile) = env_var("EVOTE_RUNTIME_PROFILE") {
            match RuntimeProfile::parse(&profile) {
                Some(p) => cfg.runtime_profile = p,
                None => tracing::warn!(value = %profile, "ignoring unknown EVOTE_RUNTIME_PROFILE"),
            }
        }
        cfg.eip1193_proxy_url = env_var("EVOTE_EIP1193_PROXY_URL");
        if let Some(ms) = env_var("EVOTE_PROVIDER_TIMEOUT_MS").and_then(|v| v.parse().ok()) {
            cfg.provider_timeout_ms = ms;
        }
        cfg.reconnect_store_path = env_var("EVOTE_RECONNECT_STORE_PATH").map(PathBuf::from);
        if let Some(ms) = env_var("EVOTE_COMMIT_DELAY_MS").and_then(|v| v.parse().ok()) {
            cfg.commit_delay_ms = ms;
        }

        cfg
    }

    pub fn strict_runtime_required(&self) -> bool {
        self.runtime_profile == RuntimeProfile::Production
    }
}

fn env_var(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
}
