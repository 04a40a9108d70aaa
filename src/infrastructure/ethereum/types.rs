//! Type conversions between Alloy types and the client's receipt view

use alloy::primitives::{Address, Log, B256};
use alloy::rpc::types::TransactionReceipt;

/// Chain-agnostic subset of a transaction receipt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawReceipt {
    pub transaction_hash: B256,
    pub block_number: Option<u64>,
    /// `false` when the transaction reverted
    pub status: bool,
    pub gas_used: u64,
    /// Set for contract-creation transactions
    pub contract_address: Option<Address>,
    pub logs: Vec<Log>,
}

/// Convert an Alloy receipt into a [`RawReceipt`]
pub fn convert_receipt(receipt: &TransactionReceipt) -> RawReceipt {
    RawReceipt {
        transaction_hash: receipt.transaction_hash,
        block_number: receipt.block_number,
        status: receipt.status(),
        gas_used: receipt.gas_used,
        contract_address: receipt.contract_address,
        logs: receipt
            .inner
            .logs()
            .iter()
            .map(|log| log.inner.clone())
            .collect(),
    }
}
