//! Waiting for transactions to be mined

use std::time::Duration;

use alloy::primitives::B256;
use tokio::time::{sleep, Instant};
use tracing::{debug, warn};

use super::{EthereumProvider, RawReceipt};
use crate::{Error, Result};

/// How often and how long to poll for a receipt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReceiptPolicy {
    pub interval: Duration,
    pub timeout: Duration,
}

impl Default for ReceiptPolicy {
    fn default() -> Self {
        Self {
            interval: Duration::from_millis(200),
            timeout: Duration::from_secs(900),
        }
    }
}

/// Poll `eth_getTransactionReceipt` at a fixed interval until the receipt
/// shows up or `policy.timeout` has passed since the first poll.
///
/// RPC errors abort the wait immediately and are returned as-is.
pub async fn wait_for_receipt(
    provider: &dyn EthereumProvider,
    hash: B256,
    policy: ReceiptPolicy,
) -> Result<RawReceipt> {
    let started = Instant::now();
    let mut attempts = 0u32;

    loop {
        attempts += 1;
        if let Some(receipt) = provider.get_receipt(hash).await? {
            debug!(%hash, attempts, block = ?receipt.block_number, "receipt available");
            return Ok(receipt);
        }

        let waited = started.elapsed();
        if waited > policy.timeout {
            warn!(%hash, attempts, ?waited, "gave up waiting for receipt");
            return Err(Error::ReceiptTimeout { hash, waited });
        }
        sleep(policy.interval).await;
    }
}
