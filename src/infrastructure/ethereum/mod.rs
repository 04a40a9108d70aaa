//! Ethereum infrastructure - Alloy provider implementations

mod provider;
mod receipt;
pub(crate) mod types;

pub use provider::{create_provider, AlloyProvider, EthereumProvider, ProviderConfig};
pub use receipt::{wait_for_receipt, ReceiptPolicy};
pub use types::RawReceipt;
