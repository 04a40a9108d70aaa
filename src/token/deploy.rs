//! Deploying a fresh factory + token pair

use std::sync::Arc;

use alloy::network::TransactionBuilder;
use alloy::primitives::{Address, Bytes, U256};
use alloy::rpc::types::TransactionRequest;
use alloy::sol_types::SolConstructor;
use tracing::{debug, info};

use super::options::{resolve_sender, with_gas};
use super::{MiniMeToken, TxOptions};
use crate::config::TokenDefaults;
use crate::infrastructure::abi::bindings::MiniMeToken as abi;
use crate::infrastructure::abi::TokenArtifacts;
use crate::infrastructure::ethereum::{wait_for_receipt, EthereumProvider, ReceiptPolicy};
use crate::{Error, Result};

/// Constructor arguments of the token, plus transaction overrides
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeployOptions {
    pub token_name: String,
    pub decimal_units: u8,
    pub token_symbol: String,
    pub parent_token: Address,
    pub parent_snapshot_block: u64,
    pub transfers_enabled: bool,
    pub tx: TxOptions,
}

impl From<&TokenDefaults> for DeployOptions {
    fn from(defaults: &TokenDefaults) -> Self {
        Self {
            token_name: defaults.token_name.clone(),
            decimal_units: defaults.decimal_units,
            token_symbol: defaults.token_symbol.clone(),
            parent_token: defaults.parent_token,
            parent_snapshot_block: defaults.parent_snapshot_block,
            transfers_enabled: defaults.transfers_enabled,
            tx: TxOptions::default(),
        }
    }
}

impl Default for DeployOptions {
    fn default() -> Self {
        Self::from(&TokenDefaults::default())
    }
}

/// Result of [`deploy`]
#[derive(Debug, Clone)]
pub struct Deployment {
    pub factory: Address,
    pub token: MiniMeToken,
}

/// Deploy the token factory, then a token wired to it.
///
/// Each deployment waits for its receipt before the next step, since the
/// token's constructor needs the factory's address.
pub async fn deploy(
    provider: Arc<dyn EthereumProvider>,
    artifacts: &TokenArtifacts,
    options: &DeployOptions,
    policy: ReceiptPolicy,
) -> Result<Deployment> {
    if !provider.is_listening().await? {
        return Err(Error::NotConnected(provider.endpoint_name()));
    }
    let from = resolve_sender(provider.as_ref(), options.tx.from).await?;

    let factory = deploy_contract(
        provider.as_ref(),
        from,
        artifacts.factory.bytecode.clone(),
        &options.tx,
        policy,
    )
    .await?;
    info!(%factory, %from, "token factory deployed");

    let constructor = abi::constructorCall {
        tokenFactory: factory,
        parentToken: options.parent_token,
        parentSnapShotBlock: U256::from(options.parent_snapshot_block),
        tokenName: options.token_name.clone(),
        decimalUnits: options.decimal_units,
        tokenSymbol: options.token_symbol.clone(),
        transfersEnabled: options.transfers_enabled,
    };
    let mut code = artifacts.token.bytecode.to_vec();
    code.extend_from_slice(&constructor.abi_encode());

    let token = deploy_contract(provider.as_ref(), from, code.into(), &options.tx, policy).await?;
    info!(
        %token,
        %factory,
        name = %options.token_name,
        symbol = %options.token_symbol,
        "token deployed"
    );

    Ok(Deployment {
        factory,
        token: MiniMeToken::new(provider, token).with_receipt_policy(policy),
    })
}

async fn deploy_contract(
    provider: &dyn EthereumProvider,
    from: Address,
    code: Bytes,
    opts: &TxOptions,
    policy: ReceiptPolicy,
) -> Result<Address> {
    let request = TransactionRequest::default()
        .from(from)
        .with_deploy_code(code);
    let request = with_gas(provider, request, opts).await?;

    let hash = provider.send_transaction(request).await?;
    debug!(%hash, %from, "deployment submitted");

    let receipt = wait_for_receipt(provider, hash, policy).await?;
    if !receipt.status {
        return Err(Error::Reverted(hash));
    }
    receipt
        .contract_address
        .ok_or(Error::MissingContractAddress(hash))
}
