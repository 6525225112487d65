//! Error types for Taper campaigns.
//!
//! Every error aborts the whole requested operation; no variant implies a
//! partially committed state change.
use thiserror::Error;

use crate::types::{AccountId, Amount, AssetId, MarketKey, Timestamp, VoucherId};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MathError {
    #[error("arithmetic overflow")] ArithmeticOverflow,
    #[error("division by zero")] DivisionByZero,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransferError {
    #[error("insufficient balance of {asset}: have {have}, need {need}")] InsufficientBalance { asset: AssetId, have: Amount, need: Amount },
    #[error("balance overflow crediting {0}")] BalanceOverflow(AccountId),
    #[error("transfer rejected: {0}")] Rejected(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error("voucher {0} is not redeemable against this ledger")] InvalidVoucher(VoucherId),
    #[error("voucher issued at {issued} after campaign expiry at {expires}")] DiscountExpired { issued: Timestamp, expires: Timestamp },
    #[error("voucher {0} already claimed")] AlreadyClaimed(VoucherId),
    #[error("reward is zero: campaign exhausted")] RewardExpired,
    #[error("caller {0} is not authorized")] NotAuthorized(AccountId),
    #[error("transfer failed: {0}")] Transfer(#[from] TransferError),
    #[error(transparent)] Math(#[from] MathError),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("campaign already exists for market {0}")] CampaignAlreadyExists(MarketKey),
    #[error("asset {asset} is not accepted by market {market}")] InvalidRewardAsset { market: MarketKey, asset: AssetId },
    #[error("insufficient funding: have {have}, need {need}")] InsufficientFunding { have: Amount, need: Amount },
    #[error("discount rate {rate} exceeds cap {max}")] InvalidDiscountRate { rate: u128, max: u128 },
    #[error("caller {0} is not authorized")] NotAuthorized(AccountId),
    #[error("no campaign for market {0}")] UnknownCampaign(MarketKey),
    #[error("reward asset and budget of the campaign for market {0} are fixed once funded")] FundingTermsChanged(MarketKey),
    #[error("no ledger with identity {0}")] UnknownLedger(AccountId),
    #[error("funding transfer failed: {0}")] Transfer(#[from] TransferError),
    #[error("ledger: {0}")] Ledger(LedgerError),
}

impl From<LedgerError> for RegistryError {
    fn from(e: LedgerError) -> Self {
        match e {
            LedgerError::NotAuthorized(caller) => RegistryError::NotAuthorized(caller),
            other => RegistryError::Ledger(other),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("parse: {0}")] Parse(String),
    #[error("max discount rate must be in 1..={max}, got {got}")] InvalidMaxDiscountRate { got: u128, max: u128 },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid identifier: {0}")]
pub struct IdParseError(pub String);

#[derive(Error, Debug)]
pub enum TaperError {
    #[error(transparent)] Math(#[from] MathError),
    #[error(transparent)] Transfer(#[from] TransferError),
    #[error(transparent)] Ledger(#[from] LedgerError),
    #[error(transparent)] Registry(#[from] RegistryError),
    #[error(transparent)] Config(#[from] ConfigError),
    #[error(transparent)] IdParse(#[from] IdParseError),
}
