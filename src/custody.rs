// 6.0 custody.rs: MOCKED fungible-asset collaborator. balance bookkeeping only,
// no real transfers. the engine locks order funds here and holds minted pool
// shares on behalf of the owner.

use crate::types::{AccountId, FactoryId, PairId, TokenId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// 6.1: everything the ledger can hold. pool shares are scoped by factory
// because each factory numbers its pairs independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Asset {
    Token(TokenId),
    PoolShares { factory: FactoryId, pair: PairId },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CustodyError {
    #[error("insufficient balance for {account:?}: requested {requested}, available {available}")]
    InsufficientBalance {
        account: AccountId,
        requested: Decimal,
        available: Decimal,
    },

    #[error("negative amount {0} is not transferable")]
    NegativeAmount(Decimal),
}

// 6.2: balance map per (asset, account). all mutations go through credit/debit
// so a balance can never go negative.
#[derive(Debug, Default)]
pub struct TokenLedger {
    balances: HashMap<(Asset, AccountId), Decimal>,
}

impl TokenLedger {
    pub fn new() -> Self {
        Self {
            balances: HashMap::new(),
        }
    }

    pub fn balance_of(&self, asset: Asset, account: AccountId) -> Decimal {
        self.balances
            .get(&(asset, account))
            .copied()
            .unwrap_or(Decimal::ZERO)
    }

    pub fn credit(&mut self, asset: Asset, account: AccountId, amount: Decimal) {
        debug_assert!(amount >= Decimal::ZERO);
        *self.balances.entry((asset, account)).or_insert(Decimal::ZERO) += amount;
    }

    pub fn debit(
        &mut self,
        asset: Asset,
        account: AccountId,
        amount: Decimal,
    ) -> Result<(), CustodyError> {
        if amount < Decimal::ZERO {
            return Err(CustodyError::NegativeAmount(amount));
        }
        let available = self.balance_of(asset, account);
        if available < amount {
            return Err(CustodyError::InsufficientBalance {
                account,
                requested: amount,
                available,
            });
        }
        // a zero debit may hit an account with no entry yet
        *self.balances.entry((asset, account)).or_insert(Decimal::ZERO) -= amount;
        Ok(())
    }

    pub fn transfer(
        &mut self,
        asset: Asset,
        from: AccountId,
        to: AccountId,
        amount: Decimal,
    ) -> Result<(), CustodyError> {
        self.debit(asset, from, amount)?;
        self.credit(asset, to, amount);
        Ok(())
    }

    /// Wrapped-native adapter: the pool layer only understands the wrapped
    /// form, so a native leg is converted 1:1 before it is locked.
    pub fn wrap_native(
        &mut self,
        account: AccountId,
        wrapped: TokenId,
        amount: Decimal,
    ) -> Result<(), CustodyError> {
        self.debit(Asset::Token(TokenId::NATIVE), account, amount)?;
        self.credit(Asset::Token(wrapped), account, amount);
        Ok(())
    }

    pub fn unwrap_native(
        &mut self,
        account: AccountId,
        wrapped: TokenId,
        amount: Decimal,
    ) -> Result<(), CustodyError> {
        self.debit(Asset::Token(wrapped), account, amount)?;
        self.credit(Asset::Token(TokenId::NATIVE), account, amount);
        Ok(())
    }

    /// Sum of one asset across all accounts. Tests use this for conservation checks.
    pub fn total_of(&self, asset: Asset) -> Decimal {
        self.balances
            .iter()
            .filter(|((a, _), _)| *a == asset)
            .map(|(_, v)| *v)
            .sum()
    }
}
