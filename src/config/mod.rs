use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use alloy::primitives::Address;
use serde::Deserialize;

use crate::infrastructure::ethereum::{EthereumProvider, ProviderConfig, ReceiptPolicy};
use crate::token::{Deployment, MiniMeToken};
use crate::{Error, Result};

const DEFAULT_RPC: &str = "http://localhost:8545";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NetworkConfig {
    pub rpc: Option<String>,
    pub ws: Option<String>,
    pub ipc: Option<String>,
}

/// Addresses of an existing deployment, filled in after `deploy`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContractsConfig {
    pub token_factory: Option<Address>,
    pub token: Option<Address>,
}

/// Defaults applied when deploying a fresh token
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TokenDefaults {
    /// Token this one is cloned from; zero for a root token
    pub parent_token: Address,
    /// Block of the parent the clone snapshots; zero for a root token
    pub parent_snapshot_block: u64,
    pub token_name: String,
    pub decimal_units: u8,
    pub token_symbol: String,
    pub transfers_enabled: bool,
}

impl Default for TokenDefaults {
    fn default() -> Self {
        Self {
            parent_token: Address::ZERO,
            parent_snapshot_block: 0,
            token_name: "BinaryToken".to_string(),
            decimal_units: 18,
            token_symbol: "BINC".to_string(),
            transfers_enabled: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ReceiptConfig {
    pub interval_ms: u64,
    pub timeout_secs: u64,
}

impl Default for ReceiptConfig {
    fn default() -> Self {
        let policy = ReceiptPolicy::default();
        Self {
            interval_ms: policy.interval.as_millis() as u64,
            timeout_secs: policy.timeout.as_secs(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub network: NetworkConfig,

    #[serde(default)]
    pub contracts: ContractsConfig,

    #[serde(default)]
    pub token: TokenDefaults,

    #[serde(default)]
    pub receipt: ReceiptConfig,
}

impl Config {
    /// Pick the endpoint to connect to. IPC wins over WebSocket, which wins over HTTP.
    pub fn provider_config(&self) -> ProviderConfig {
        #[cfg(unix)]
        if let Some(path) = self.network.ipc.as_deref().filter(|p| !p.trim().is_empty()) {
            return ProviderConfig::Ipc(PathBuf::from(path));
        }
        if let Some(url) = self.network.ws.as_deref().filter(|u| !u.trim().is_empty()) {
            return ProviderConfig::WebSocket(url.to_string());
        }
        let rpc = self
            .network
            .rpc
            .clone()
            .filter(|u| !u.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_RPC.to_string());
        ProviderConfig::Http(rpc)
    }

    pub fn receipt_policy(&self) -> ReceiptPolicy {
        ReceiptPolicy {
            interval: Duration::from_millis(self.receipt.interval_ms.max(1)),
            timeout: Duration::from_secs(self.receipt.timeout_secs),
        }
    }

    /// Handle to the configured token, if `[contracts] token` is set
    pub fn token(&self, provider: Arc<dyn EthereumProvider>) -> Option<MiniMeToken> {
        let address = self.contracts.token?;
        Some(MiniMeToken::new(provider, address).with_receipt_policy(self.receipt_policy()))
    }

    /// The recorded factory + token pair, when both addresses are configured
    pub fn deployment(&self, provider: Arc<dyn EthereumProvider>) -> Option<Deployment> {
        let factory = self.contracts.token_factory?;
        Some(Deployment {
            factory,
            token: self.token(provider)?,
        })
    }
}

/// Load the config file, falling back to defaults when it is absent or unreadable.
pub fn load() -> Config {
    let Some(path) = config_path() else {
        return Config::default();
    };
    match load_from(&path) {
        Ok(config) => config,
        Err(err) => {
            if path.exists() {
                tracing::warn!(path = %path.display(), "ignoring config: {err}");
            }
            Config::default()
        }
    }
}

pub fn load_from(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path)
        .map_err(|err| Error::Config(format!("{}: {err}", path.display())))?;
    parse(&content)
}

pub fn parse(content: &str) -> Result<Config> {
    toml::from_str::<Config>(content).map_err(|err| Error::Config(err.to_string()))
}

pub fn config_path() -> Option<PathBuf> {
    if let Some(path) = std::env::var_os("MINIME_CONFIG").map(PathBuf::from) {
        return Some(path);
    }
    if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME").map(PathBuf::from) {
        return Some(xdg.join("minime").join("config.toml"));
    }
    if let Some(home) = std::env::var_os("HOME").map(PathBuf::from) {
        return Some(home.join(".config").join("minime").join("config.toml"));
    }

    directories::ProjectDirs::from("io", "minime", "minime")
        .map(|dirs| dirs.config_dir().join("config.toml"))
}
