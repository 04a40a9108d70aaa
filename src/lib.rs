//! Client SDK for MiniMe cloneable tokens.
//!
//! The token logic itself (checkpoints, snapshot balances, clone bookkeeping)
//! lives in the deployed contract. This crate builds the calls, converts
//! amounts by the token's decimals, sequences dependent calls and waits for
//! transaction receipts.
//!
//! Layout:
//! - [`config`]: TOML configuration (endpoint, deployed addresses, defaults)
//! - [`domain`]: value types (amounts, token state)
//! - [`infrastructure`]: ABI bindings, artifacts and the RPC provider
//! - [`token`]: the contract façade, state reader and deployment helper

pub mod config;
pub mod domain;
mod error;
pub mod infrastructure;
pub mod token;

#[cfg(test)]
pub(crate) mod testing;

pub use domain::{format_units, parse_units, TokenAmount, TokenState};
pub use error::{Error, Result};
pub use infrastructure::abi::{ContractArtifact, TokenArtifacts};
pub use infrastructure::ethereum::{
    create_provider, wait_for_receipt, EthereumProvider, ProviderConfig, RawReceipt,
    ReceiptPolicy,
};
pub use token::{
    clone_address, deploy, CloneOptions, DeployOptions, Deployment, MiniMeToken, MiniMeTokenState,
    TxOptions,
};

pub use alloy::primitives::{Address, B256, U256};
