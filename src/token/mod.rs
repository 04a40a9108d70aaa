//! MiniMe token client
//!
//! [`MiniMeToken`] wraps the contract's ABI. Amount-valued calls look up the
//! token's `decimals` first and scale by `10^decimals` in both directions, so
//! callers deal in human amounts ("1.5") while the contract sees base units.

mod deploy;
mod options;
mod state;

use std::fmt;
use std::sync::Arc;

use alloy::primitives::{Address, Log, B256, U256};
use alloy::rpc::types::TransactionRequest;
use alloy::sol_types::{SolCall, SolEvent};
use tracing::{debug, info};

use crate::domain::{parse_units, TokenAmount};
use crate::infrastructure::abi::bindings::MiniMeToken as abi;
use crate::infrastructure::ethereum::{wait_for_receipt, EthereumProvider, ReceiptPolicy};
use crate::{Error, Result};

pub use deploy::{deploy, DeployOptions, Deployment};
pub use options::{CloneOptions, TxOptions};
pub use state::MiniMeTokenState;

use options::{resolve_sender, with_gas};

/// Gas added on top of the estimate for `destroyTokens`
const DESTROY_EXTRA_GAS: u64 = 50_000;

/// Handle to a deployed token
#[derive(Clone)]
pub struct MiniMeToken {
    provider: Arc<dyn EthereumProvider>,
    address: Address,
    receipt_policy: ReceiptPolicy,
}

impl fmt::Debug for MiniMeToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MiniMeToken")
            .field("address", &self.address)
            .field("endpoint", &self.provider.endpoint_name())
            .finish()
    }
}

impl MiniMeToken {
    pub fn new(provider: Arc<dyn EthereumProvider>, address: Address) -> Self {
        Self {
            provider,
            address,
            receipt_policy: ReceiptPolicy::default(),
        }
    }

    pub fn with_receipt_policy(mut self, policy: ReceiptPolicy) -> Self {
        self.receipt_policy = policy;
        self
    }

    /// Another token reached through the same provider
    pub fn at(&self, address: Address) -> Self {
        Self {
            provider: Arc::clone(&self.provider),
            address,
            receipt_policy: self.receipt_policy,
        }
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub fn provider(&self) -> &Arc<dyn EthereumProvider> {
        &self.provider
    }

    pub fn receipt_policy(&self) -> ReceiptPolicy {
        self.receipt_policy
    }

    // --- raw access -------------------------------------------------------

    /// `eth_call` any token method and decode its return value
    pub async fn read<C: SolCall>(&self, call: C) -> Result<C::Return> {
        let request = TransactionRequest::default()
            .to(self.address)
            .input(call.abi_encode().into());
        let data = self.provider.call(request).await?;
        Ok(C::abi_decode_returns(&data)?)
    }

    /// Submit any token method as a transaction and return its hash
    pub async fn send<C: SolCall>(&self, call: C, opts: TxOptions) -> Result<B256> {
        let from = resolve_sender(self.provider.as_ref(), opts.from).await?;
        let request = TransactionRequest::default()
            .from(from)
            .to(self.address)
            .input(call.abi_encode().into());
        let request = with_gas(self.provider.as_ref(), request, &opts).await?;
        let gas = request.gas;

        let hash = self.provider.send_transaction(request).await?;
        debug!(
            token = %self.address,
            %from,
            method = C::SIGNATURE,
            ?gas,
            %hash,
            "transaction submitted"
        );
        Ok(hash)
    }

    async fn amount<C>(&self, call: C) -> Result<TokenAmount>
    where
        C: SolCall<Return = U256>,
    {
        let decimals = self.decimals().await?;
        let raw = self.read(call).await?;
        Ok(TokenAmount::new(raw, decimals))
    }

    async fn convert_amount_and_send<C, F>(
        &self,
        amount: &str,
        build: F,
        opts: TxOptions,
    ) -> Result<B256>
    where
        C: SolCall,
        F: FnOnce(U256) -> C,
    {
        let decimals = self.decimals().await?;
        let raw = parse_units(amount, decimals)?;
        self.send(build(raw), opts).await
    }

    // --- metadata ---------------------------------------------------------

    pub async fn name(&self) -> Result<String> {
        self.read(abi::nameCall {}).await
    }

    pub async fn symbol(&self) -> Result<String> {
        self.read(abi::symbolCall {}).await
    }

    pub async fn version(&self) -> Result<String> {
        self.read(abi::versionCall {}).await
    }

    pub async fn decimals(&self) -> Result<u8> {
        self.read(abi::decimalsCall {}).await
    }

    pub async fn controller(&self) -> Result<Address> {
        self.read(abi::controllerCall {}).await
    }

    /// Zero for a root token
    pub async fn parent_token(&self) -> Result<Address> {
        self.read(abi::parentTokenCall {}).await
    }

    pub async fn parent_snapshot_block(&self) -> Result<U256> {
        self.read(abi::parentSnapShotBlockCall {}).await
    }

    pub async fn transfers_enabled(&self) -> Result<bool> {
        self.read(abi::transfersEnabledCall {}).await
    }

    // --- balances ---------------------------------------------------------

    pub async fn total_supply(&self) -> Result<TokenAmount> {
        self.amount(abi::totalSupplyCall {}).await
    }

    pub async fn total_supply_at(&self, block: u64) -> Result<TokenAmount> {
        self.amount(abi::totalSupplyAtCall {
            blockNumber: U256::from(block),
        })
        .await
    }

    pub async fn balance_of(&self, owner: Address) -> Result<TokenAmount> {
        self.amount(abi::balanceOfCall { owner }).await
    }

    /// Balance recorded by the contract for `owner` at `block`
    pub async fn balance_of_at(&self, owner: Address, block: u64) -> Result<TokenAmount> {
        self.amount(abi::balanceOfAtCall {
            owner,
            blockNumber: U256::from(block),
        })
        .await
    }

    pub async fn allowance(&self, owner: Address, spender: Address) -> Result<TokenAmount> {
        self.amount(abi::allowanceCall { owner, spender }).await
    }

    // --- transactions -----------------------------------------------------

    pub async fn transfer(&self, to: Address, amount: &str, opts: TxOptions) -> Result<B256> {
        self.convert_amount_and_send(amount, |amount| abi::transferCall { to, amount }, opts)
            .await
    }

    pub async fn transfer_from(
        &self,
        from: Address,
        to: Address,
        amount: &str,
        opts: TxOptions,
    ) -> Result<B256> {
        self.convert_amount_and_send(
            amount,
            |amount| abi::transferFromCall { from, to, amount },
            opts,
        )
        .await
    }

    pub async fn approve(&self, spender: Address, amount: &str, opts: TxOptions) -> Result<B256> {
        self.convert_amount_and_send(amount, |amount| abi::approveCall { spender, amount }, opts)
            .await
    }

    /// Mint to `owner`; only the controller may call this
    pub async fn generate_tokens(
        &self,
        owner: Address,
        amount: &str,
        opts: TxOptions,
    ) -> Result<B256> {
        self.convert_amount_and_send(
            amount,
            |amount| abi::generateTokensCall { owner, amount },
            opts,
        )
        .await
    }

    /// Burn from `owner`; only the controller may call this
    pub async fn destroy_tokens(
        &self,
        owner: Address,
        amount: &str,
        opts: TxOptions,
    ) -> Result<B256> {
        self.convert_amount_and_send(
            amount,
            |amount| abi::destroyTokensCall { owner, amount },
            opts.with_extra_gas(DESTROY_EXTRA_GAS),
        )
        .await
    }

    pub async fn enable_transfers(&self, enabled: bool, opts: TxOptions) -> Result<B256> {
        self.send(
            abi::enableTransfersCall {
                transfersEnabled: enabled,
            },
            opts,
        )
        .await
    }

    pub async fn change_controller(&self, controller: Address, opts: TxOptions) -> Result<B256> {
        self.send(
            abi::changeControllerCall {
                newController: controller,
            },
            opts,
        )
        .await
    }

    /// Create a clone of this token and wait until it is mined.
    ///
    /// The clone's address is taken from the `NewCloneToken` event the parent
    /// emits.
    pub async fn create_clone_token(&self, clone: CloneOptions, opts: TxOptions) -> Result<Self> {
        let call = abi::createCloneTokenCall {
            cloneTokenName: clone.name.clone(),
            cloneDecimalUnits: clone.decimals,
            cloneTokenSymbol: clone.symbol.clone(),
            snapshotBlock: clone.snapshot_block,
            transfersEnabled: clone.transfers_enabled,
        };
        let hash = self.send(call, opts).await?;

        let receipt = wait_for_receipt(self.provider.as_ref(), hash, self.receipt_policy).await?;
        if !receipt.status {
            return Err(Error::Reverted(hash));
        }
        let clone_address = clone_address(&receipt.logs).ok_or(Error::MissingCloneEvent(hash))?;

        info!(
            parent = %self.address,
            clone = %clone_address,
            name = %clone.name,
            block = ?receipt.block_number,
            "clone token created"
        );
        Ok(self.at(clone_address))
    }
}

/// Address carried in `topics[1]` of the first `NewCloneToken` log
pub fn clone_address(logs: &[Log]) -> Option<Address> {
    logs.iter()
        .map(|log| log.data.topics())
        .find(|topics| topics.first() == Some(&abi::NewCloneToken::SIGNATURE_HASH))
        .and_then(|topics| topics.get(1))
        .map(|topic| Address::from_word(*topic))
}
