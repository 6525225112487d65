//! # taper-ledger — Per-campaign reward ledger.
//!
//! All calculations use integer arithmetic only for determinism.
//!
//! - **Capped reward**: a voucher pays `min(quantity, ceiling) * rate`, where
//!   the ceiling shrinks by every reward paid.
//! - **Linear decay**: after each claim the rate is reset to
//!   `max_rate * (1 - distributed / budget)`, reaching exactly zero when the
//!   budget is gone.
//! - **Atomic claims**: a voucher is validated, paid, accounted and marked
//!   claimed in one step; a failed payout leaves nothing changed.

pub mod decay;
pub mod ledger;

pub use decay::{compute_reward, decayed_rate};
pub use ledger::{CampaignStatus, ClaimReceipt, LedgerState, RewardLedger};
