//! Crate-wide error type

use std::time::Duration;

use alloy::primitives::B256;

use crate::domain::UnitsError;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Failure reported by the RPC provider, passed through untouched
    #[error(transparent)]
    Rpc(#[from] anyhow::Error),

    #[error("ABI decoding failed: {0}")]
    Abi(#[from] alloy_sol_types::Error),

    #[error("invalid amount: {0}")]
    Units(#[from] UnitsError),

    #[error("Timeout mining transaction {hash} (waited {waited:?})")]
    ReceiptTimeout { hash: B256, waited: Duration },

    #[error("transaction {0} reverted")]
    Reverted(B256),

    #[error("receipt for {0} carries no contract address")]
    MissingContractAddress(B256),

    #[error("transaction {0} emitted no NewCloneToken event")]
    MissingCloneEvent(B256),

    #[error("node exposes no accounts to send from")]
    NoAccounts,

    #[error("node at {0} is not listening")]
    NotConnected(String),

    #[error("invalid contract artifact: {0}")]
    Artifact(String),

    #[error("config error: {0}")]
    Config(String),
}
