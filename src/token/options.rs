use alloy::primitives::{Address, U256};
use alloy::rpc::types::TransactionRequest;

use crate::infrastructure::ethereum::EthereumProvider;
use crate::{Error, Result};

/// Per-transaction overrides
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TxOptions {
    /// Sender; the node's first account when unset
    pub from: Option<Address>,
    /// Fixed gas limit; estimated when unset
    pub gas: Option<u64>,
    /// Added on top of the estimate
    pub extra_gas: u64,
}

impl TxOptions {
    pub fn sender(from: Address) -> Self {
        Self {
            from: Some(from),
            ..Self::default()
        }
    }

    pub fn with_gas(mut self, gas: u64) -> Self {
        self.gas = Some(gas);
        self
    }

    pub fn with_extra_gas(mut self, extra_gas: u64) -> Self {
        self.extra_gas = extra_gas;
        self
    }
}

/// Arguments of `createCloneToken`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CloneOptions {
    pub name: String,
    pub decimals: u8,
    pub symbol: String,
    /// Block of the parent to snapshot; 0 lets the contract use the current block
    pub snapshot_block: U256,
    pub transfers_enabled: bool,
}

impl CloneOptions {
    pub fn new(name: impl Into<String>, decimals: u8, symbol: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            decimals,
            symbol: symbol.into(),
            snapshot_block: U256::ZERO,
            transfers_enabled: true,
        }
    }

    pub fn at_block(mut self, block: u64) -> Self {
        self.snapshot_block = U256::from(block);
        self
    }

    pub fn transfers_enabled(mut self, enabled: bool) -> Self {
        self.transfers_enabled = enabled;
        self
    }
}

pub(crate) async fn resolve_sender(
    provider: &dyn EthereumProvider,
    from: Option<Address>,
) -> Result<Address> {
    if let Some(from) = from {
        return Ok(from);
    }
    provider
        .accounts()
        .await?
        .first()
        .copied()
        .ok_or(Error::NoAccounts)
}

/// Set the gas limit: the fixed override, or the node's estimate plus `extra_gas`
pub(crate) async fn with_gas(
    provider: &dyn EthereumProvider,
    request: TransactionRequest,
    opts: &TxOptions,
) -> Result<TransactionRequest> {
    let gas = match opts.gas {
        Some(gas) => gas,
        None => provider
            .estimate_gas(request.clone())
            .await?
            .saturating_add(opts.extra_gas),
    };
    Ok(request.gas_limit(gas))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{account, MockProvider};

    #[tokio::test]
    async fn test_sender_defaults_to_first_account() {
        let mock = MockProvider::new();
        assert_eq!(resolve_sender(&mock, None).await.unwrap(), account(0xa0));
        assert_eq!(
            resolve_sender(&mock, Some(account(7))).await.unwrap(),
            account(7)
        );

        let empty = MockProvider::new().with_accounts(vec![]);
        assert!(matches!(
            resolve_sender(&empty, None).await,
            Err(Error::NoAccounts)
        ));
    }

    #[tokio::test]
    async fn test_gas_limit() {
        // the mock estimates 100_000 for everything
        let mock = MockProvider::new();
        let request = TransactionRequest::default();

        let estimated = with_gas(&mock, request.clone(), &TxOptions::default())
            .await
            .unwrap();
        assert_eq!(estimated.gas, Some(100_000));

        let padded = TxOptions::default().with_extra_gas(50_000);
        let padded = with_gas(&mock, request.clone(), &padded).await.unwrap();
        assert_eq!(padded.gas, Some(150_000));

        let fixed = TxOptions::default().with_gas(200_000).with_extra_gas(5);
        let fixed = with_gas(&mock, request, &fixed).await.unwrap();
        assert_eq!(fixed.gas, Some(200_000));
    }
}
