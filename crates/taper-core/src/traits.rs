//! Trait interfaces for the collaborators a campaign depends on.
//!
//! - [`AssetTransfer`]: moves fungible value between accounts (external)
//! - [`MarketDirectory`]: lists the assets a market accepts (external)
//! - [`VoucherStore`]: the registry's voucher table as seen by a ledger
//!
//! Campaign code only calls these; it never implements custody itself.

use crate::error::{LedgerError, TransferError};
use crate::types::{AccountId, Amount, AssetId, MarketKey, VoucherId, VoucherRecord};

/// Moves fungible value between accounts.
///
/// A failed transfer must leave every balance untouched. Campaign operations
/// treat any error as aborting.
pub trait AssetTransfer {
    /// Move `amount` of `asset` from `from` to `to`.
    fn transfer(
        &mut self,
        from: &AccountId,
        to: &AccountId,
        asset: &AssetId,
        amount: Amount,
    ) -> Result<(), TransferError>;

    /// Current balance of `asset` held by `holder`.
    fn balance_of(&self, holder: &AccountId, asset: &AssetId) -> Amount;
}

/// Read-only view of market configuration.
pub trait MarketDirectory {
    /// Assets accepted by `market`. Empty for an unknown market.
    fn accepted_assets(&self, market: &MarketKey) -> Vec<AssetId>;

    /// Whether `asset` is one of the market's accepted assets.
    ///
    /// Default implementation scans [`accepted_assets`](Self::accepted_assets).
    fn accepts(&self, market: &MarketKey, asset: &AssetId) -> bool {
        self.accepted_assets(market).contains(asset)
    }
}

/// Voucher table access granted to reward ledgers.
///
/// Ledgers may read any record but may only flip the `claimed` flag of a
/// voucher that names them as its ledger.
pub trait VoucherStore {
    /// Look up a voucher. Returns `None` if no such voucher was issued.
    fn get(&self, id: &VoucherId) -> Option<VoucherRecord>;

    /// Check, without mutating, that `caller` may mark voucher `id` claimed.
    ///
    /// Ledgers call this before paying out. An implementation must accept a
    /// [`mark_claimed`](Self::mark_claimed) for the same caller and voucher
    /// once this has succeeded and the store has not changed in between.
    ///
    /// # Errors
    ///
    /// - [`LedgerError::NotAuthorized`] unless `caller` is exactly the
    ///   ledger recorded on the voucher (unknown vouchers included)
    fn authorize_mark(&self, caller: &AccountId, id: &VoucherId) -> Result<(), LedgerError>;

    /// Mark a voucher claimed on behalf of `caller`.
    ///
    /// # Errors
    ///
    /// Same as [`authorize_mark`](Self::authorize_mark).
    fn mark_claimed(&mut self, caller: &AccountId, id: &VoucherId) -> Result<(), LedgerError>;
}
