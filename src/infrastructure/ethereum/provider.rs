//! Ethereum provider abstraction and Alloy implementations

use std::path::PathBuf;

use alloy::network::Ethereum;
use alloy::primitives::{Address, Bytes, B256};
use alloy::providers::{
    fillers::{BlobGasFiller, ChainIdFiller, FillProvider, GasFiller, JoinFill, NonceFiller},
    Identity, Provider, ProviderBuilder, RootProvider,
};
use alloy::rpc::types::TransactionRequest;
use anyhow::{Context, Result};

use crate::infrastructure::ethereum::types::{convert_receipt, RawReceipt};

/// Provider configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderConfig {
    /// HTTP JSON-RPC endpoint
    Http(String),
    /// WebSocket endpoint
    WebSocket(String),
    /// IPC socket path (Unix only)
    #[cfg(unix)]
    Ipc(PathBuf),
}

impl ProviderConfig {
    /// Get display name for this endpoint
    pub fn display(&self) -> String {
        match self {
            ProviderConfig::Http(url) => url.clone(),
            ProviderConfig::WebSocket(url) => url.clone(),
            #[cfg(unix)]
            ProviderConfig::Ipc(path) => path.display().to_string(),
        }
    }
}

/// The RPC surface the token client needs.
///
/// Everything that talks to the node goes through this trait, so callers can
/// swap in their own transport and tests can answer calls in memory.
#[async_trait::async_trait]
pub trait EthereumProvider: Send + Sync + 'static {
    /// Whether the node accepts connections (`net_listening`)
    async fn is_listening(&self) -> Result<bool>;

    /// Get the current block number
    async fn block_number(&self) -> Result<u64>;

    /// Accounts unlocked on the node
    async fn accounts(&self) -> Result<Vec<Address>>;

    /// Execute a read-only call (eth_call)
    async fn call(&self, request: TransactionRequest) -> Result<Bytes>;

    async fn estimate_gas(&self, request: TransactionRequest) -> Result<u64>;

    /// Submit a transaction signed by the node and return its hash
    async fn send_transaction(&self, request: TransactionRequest) -> Result<B256>;

    /// Get transaction receipt, `None` while the transaction is pending
    async fn get_receipt(&self, hash: B256) -> Result<Option<RawReceipt>>;

    /// Get endpoint display name
    fn endpoint_name(&self) -> String;
}

// Type aliases for the filled providers
type FilledProvider = FillProvider<
    JoinFill<
        Identity,
        JoinFill<GasFiller, JoinFill<BlobGasFiller, JoinFill<NonceFiller, ChainIdFiller>>>,
    >,
    RootProvider,
    Ethereum,
>;

/// Enum-based provider that stores concrete types for each transport
pub enum AlloyProvider {
    Http {
        provider: FilledProvider,
        endpoint: String,
    },
    WebSocket {
        provider: FilledProvider,
        endpoint: String,
    },
    #[cfg(unix)]
    Ipc {
        provider: FilledProvider,
        endpoint: String,
    },
}

/// Create a provider from configuration
pub async fn create_provider(config: ProviderConfig) -> Result<Box<dyn EthereumProvider>> {
    match config {
        ProviderConfig::Http(url) => {
            let rpc_url = url.parse().context("Invalid HTTP URL")?;
            let provider = ProviderBuilder::new().connect_http(rpc_url);
            Ok(Box::new(AlloyProvider::Http {
                provider,
                endpoint: url,
            }))
        }
        ProviderConfig::WebSocket(url) => {
            let provider = ProviderBuilder::new()
                .connect(&url)
                .await
                .context("Failed to create WebSocket provider")?;
            Ok(Box::new(AlloyProvider::WebSocket {
                provider,
                endpoint: url,
            }))
        }
        #[cfg(unix)]
        ProviderConfig::Ipc(path) => {
            use alloy::providers::IpcConnect;
            let ipc_path = path.to_string_lossy().to_string();
            let ipc = IpcConnect::new(ipc_path);
            let provider = ProviderBuilder::new()
                .connect_ipc(ipc)
                .await
                .context("Failed to create IPC provider")?;
            Ok(Box::new(AlloyProvider::Ipc {
                provider,
                endpoint: path.display().to_string(),
            }))
        }
    }
}

impl AlloyProvider {
    /// All transports share one filler stack, so the variants only differ by endpoint
    fn inner(&self) -> &FilledProvider {
        match self {
            AlloyProvider::Http { provider, .. } => provider,
            AlloyProvider::WebSocket { provider, .. } => provider,
            #[cfg(unix)]
            AlloyProvider::Ipc { provider, .. } => provider,
        }
    }
}

#[async_trait::async_trait]
impl EthereumProvider for AlloyProvider {
    async fn is_listening(&self) -> Result<bool> {
        let listening: bool = self
            .inner()
            .raw_request("net_listening".into(), ())
            .await
            .context("net_listening failed")?;
        Ok(listening)
    }

    async fn block_number(&self) -> Result<u64> {
        Ok(self.inner().get_block_number().await?)
    }

    async fn accounts(&self) -> Result<Vec<Address>> {
        Ok(self.inner().get_accounts().await?)
    }

    async fn call(&self, request: TransactionRequest) -> Result<Bytes> {
        Ok(self.inner().call(request).await?)
    }

    async fn estimate_gas(&self, request: TransactionRequest) -> Result<u64> {
        Ok(self.inner().estimate_gas(request).await?)
    }

    async fn send_transaction(&self, request: TransactionRequest) -> Result<B256> {
        let pending = self.inner().send_transaction(request).await?;
        Ok(*pending.tx_hash())
    }

    async fn get_receipt(&self, hash: B256) -> Result<Option<RawReceipt>> {
        let receipt = self.inner().get_transaction_receipt(hash).await?;
        Ok(receipt.as_ref().map(convert_receipt))
    }

    fn endpoint_name(&self) -> String {
        match self {
            AlloyProvider::Http { endpoint, .. } => endpoint.clone(),
            AlloyProvider::WebSocket { endpoint, .. } => endpoint.clone(),
            #[cfg(unix)]
            AlloyProvider::Ipc { endpoint, .. } => endpoint.clone(),
        }
    }
}
