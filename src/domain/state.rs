use std::collections::BTreeMap;

use alloy::primitives::{Address, U256};

use super::TokenAmount;

/// Point-in-time view of a token, rebuilt from the contract on every read
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenState {
    pub name: String,
    pub decimals: u8,
    pub controller: Address,
    pub total_supply: TokenAmount,
    pub parent_token: Address,
    pub parent_snapshot_block: U256,
    pub balances: BTreeMap<Address, TokenAmount>,
}

impl TokenState {
    /// Balance of `owner`, zero when the account was not part of the snapshot
    pub fn balance(&self, owner: &Address) -> TokenAmount {
        self.balances
            .get(owner)
            .copied()
            .unwrap_or_else(|| TokenAmount::new(U256::ZERO, self.decimals))
    }

    pub fn is_clone(&self) -> bool {
        !self.parent_token.is_zero()
    }
}
