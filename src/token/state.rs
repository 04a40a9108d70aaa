use std::collections::BTreeMap;

use futures::future::try_join_all;
use tracing::debug;

use super::MiniMeToken;
use crate::domain::{TokenAmount, TokenState};
use crate::infrastructure::abi::bindings::MiniMeToken as abi;
use crate::{Error, Result};

/// Builds [`TokenState`] snapshots of a token for every account the node manages
#[derive(Debug, Clone)]
pub struct MiniMeTokenState {
    token: MiniMeToken,
}

impl MiniMeTokenState {
    pub fn new(token: MiniMeToken) -> Self {
        Self { token }
    }

    pub fn token(&self) -> &MiniMeToken {
        &self.token
    }

    /// Fetch metadata, supply and per-account balances.
    ///
    /// Metadata reads and the account list go out together, then one
    /// `balanceOf` per account. The first failure aborts the snapshot.
    pub async fn get_state(&self) -> Result<TokenState> {
        let token = &self.token;
        let accounts = async {
            let accounts = token.provider().accounts().await?;
            Ok::<_, Error>(accounts)
        };

        let (
            name,
            decimals,
            controller,
            total_supply,
            parent_token,
            parent_snapshot_block,
            accounts,
        ) = futures::try_join!(
            token.read(abi::nameCall {}),
            token.read(abi::decimalsCall {}),
            token.read(abi::controllerCall {}),
            token.read(abi::totalSupplyCall {}),
            token.read(abi::parentTokenCall {}),
            token.read(abi::parentSnapShotBlockCall {}),
            accounts,
        )?;

        let raw_balances = try_join_all(
            accounts
                .iter()
                .map(|owner| token.read(abi::balanceOfCall { owner: *owner })),
        )
        .await?;

        let balances: BTreeMap<_, _> = accounts
            .into_iter()
            .zip(raw_balances)
            .map(|(owner, raw)| (owner, TokenAmount::new(raw, decimals)))
            .collect();

        debug!(
            token = %token.address(),
            accounts = balances.len(),
            "token state fetched"
        );

        Ok(TokenState {
            name,
            decimals,
            controller,
            total_supply: TokenAmount::new(total_supply, decimals),
            parent_token,
            parent_snapshot_block,
            balances,
        })
    }
}
