//! In-memory collaborator implementations.
//!
//! [`MemoryBank`] and [`MemoryMarkets`] keep everything in `HashMap`s with
//! no persistence. They back tests and embedded hosts that do not have a
//! real asset ledger or pool manager to delegate to.

use std::collections::HashMap;

use tracing::debug;

use crate::error::TransferError;
use crate::traits::{AssetTransfer, MarketDirectory};
use crate::types::{AccountId, Amount, AssetId, MarketKey};

/// Balance book keyed by `(holder, asset)`.
#[derive(Debug, Default, Clone)]
pub struct MemoryBank {
    balances: HashMap<(AccountId, AssetId), Amount>,
}

impl MemoryBank {
    /// Create an empty bank.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create `amount` of `asset` out of thin air in `holder`'s account.
    pub fn mint(
        &mut self,
        holder: &AccountId,
        asset: &AssetId,
        amount: Amount,
    ) -> Result<(), TransferError> {
        let entry = self.balances.entry((*holder, *asset)).or_insert(0);
        *entry = entry
            .checked_add(amount)
            .ok_or(TransferError::BalanceOverflow(*holder))?;
        Ok(())
    }

    /// Sum of all balances of `asset`.
    pub fn total_supply(&self, asset: &AssetId) -> Amount {
        self.balances
            .iter()
            .filter(|((_, a), _)| a == asset)
            .map(|(_, v)| *v)
            .sum()
    }
}

impl AssetTransfer for MemoryBank {
    fn transfer(
        &mut self,
        from: &AccountId,
        to: &AccountId,
        asset: &AssetId,
        amount: Amount,
    ) -> Result<(), TransferError> {
        let have = self.balance_of(from, asset);
        if have < amount {
            return Err(TransferError::InsufficientBalance {
                asset: *asset,
                have,
                need: amount,
            });
        }
        if from == to {
            return Ok(());
        }
        // Check the credit side before debiting so a failure changes nothing.
        let credited = self
            .balance_of(to, asset)
            .checked_add(amount)
            .ok_or(TransferError::BalanceOverflow(*to))?;
        self.balances.insert((*from, *asset), have - amount);
        self.balances.insert((*to, *asset), credited);
        debug!(%from, %to, %asset, amount, "bank: transfer");
        Ok(())
    }

    fn balance_of(&self, holder: &AccountId, asset: &AssetId) -> Amount {
        self.balances.get(&(*holder, *asset)).copied().unwrap_or(0)
    }
}

/// Market directory backed by a map of accepted-asset lists.
#[derive(Debug, Default, Clone)]
pub struct MemoryMarkets {
    markets: HashMap<MarketKey, Vec<AssetId>>,
}

impl MemoryMarkets {
    /// Create an empty directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) a market's accepted assets.
    pub fn insert(&mut self, market: MarketKey, assets: Vec<AssetId>) {
        self.markets.insert(market, assets);
    }
}

impl MarketDirectory for MemoryMarkets {
    fn accepted_assets(&self, market: &MarketKey) -> Vec<AssetId> {
        self.markets.get(market).cloned().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn acct(seed: u8) -> AccountId {
        AccountId([seed; 32])
    }

    fn asset(seed: u8) -> AssetId {
        AssetId([seed; 32])
    }

    #[test]
    fn mint_and_balance() {
        let mut bank = MemoryBank::new();
        bank.mint(&acct(1), &asset(1), 100).unwrap();
        bank.mint(&acct(1), &asset(1), 50).unwrap();
        assert_eq!(bank.balance_of(&acct(1), &asset(1)), 150);
        assert_eq!(bank.balance_of(&acct(1), &asset(2)), 0);
    }

    #[test]
    fn transfer_moves_value() {
        let mut bank = MemoryBank::new();
        bank.mint(&acct(1), &asset(1), 100).unwrap();
        bank.transfer(&acct(1), &acct(2), &asset(1), 40).unwrap();
        assert_eq!(bank.balance_of(&acct(1), &asset(1)), 60);
        assert_eq!(bank.balance_of(&acct(2), &asset(1)), 40);
        assert_eq!(bank.total_supply(&asset(1)), 100);
    }

    #[test]
    fn transfer_insufficient_balance_changes_nothing() {
        let mut bank = MemoryBank::new();
        bank.mint(&acct(1), &asset(1), 10).unwrap();
        let err = bank.transfer(&acct(1), &acct(2), &asset(1), 11).unwrap_err();
        assert_eq!(
            err,
            TransferError::InsufficientBalance { asset: asset(1), have: 10, need: 11 }
        );
        assert_eq!(bank.balance_of(&acct(1), &asset(1)), 10);
        assert_eq!(bank.balance_of(&acct(2), &asset(1)), 0);
    }

    #[test]
    fn transfer_credit_overflow_changes_nothing() {
        let mut bank = MemoryBank::new();
        bank.mint(&acct(1), &asset(1), 10).unwrap();
        bank.mint(&acct(2), &asset(1), u128::MAX).unwrap();
        assert!(bank.transfer(&acct(1), &acct(2), &asset(1), 1).is_err());
        assert_eq!(bank.balance_of(&acct(1), &asset(1)), 10);
    }

    #[test]
    fn self_transfer_is_noop() {
        let mut bank = MemoryBank::new();
        bank.mint(&acct(1), &asset(1), 10).unwrap();
        bank.transfer(&acct(1), &acct(1), &asset(1), 10).unwrap();
        assert_eq!(bank.balance_of(&acct(1), &asset(1)), 10);
    }

    #[test]
    fn unknown_market_accepts_nothing() {
        let mut markets = MemoryMarkets::new();
        markets.insert(MarketKey([1; 32]), vec![asset(1)]);
        assert!(markets.accepts(&MarketKey([1; 32]), &asset(1)));
        assert!(markets.accepted_assets(&MarketKey([2; 32])).is_empty());
    }
}
