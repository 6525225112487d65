//! The registry's voucher table.
//!
//! Records are written by the external voucher issuer and read by reward
//! ledgers. The only mutation a ledger can request is flipping `claimed`,
//! and only for vouchers issued against that ledger.

use std::collections::HashMap;

use tracing::{debug, warn};

use taper_core::constants::VOUCHER_ID_DOMAIN;
use taper_core::error::LedgerError;
use taper_core::traits::VoucherStore;
use taper_core::types::{derive_id, AccountId, VoucherId, VoucherRecord};

/// Voucher records keyed by identifier.
#[derive(Debug, Clone)]
pub struct VoucherBook {
    /// Authority mixed into derived voucher identifiers.
    authority: AccountId,
    records: HashMap<VoucherId, VoucherRecord>,
    next_nonce: u64,
}

impl VoucherBook {
    /// Create an empty book whose identifiers are derived from `authority`.
    pub fn new(authority: AccountId) -> Self {
        Self {
            authority,
            records: HashMap::new(),
            next_nonce: 0,
        }
    }

    /// Store a new voucher and return its freshly derived identifier.
    ///
    /// The record is stored as given; issuers are expected to pass
    /// `claimed: false`.
    pub fn insert(&mut self, record: VoucherRecord) -> VoucherId {
        let id = VoucherId(derive_id(VOUCHER_ID_DOMAIN, &self.authority, self.next_nonce));
        self.next_nonce += 1;
        debug!(
            voucher = %id,
            holder = %record.holder,
            ledger = %record.ledger,
            quantity = record.claimed_quantity,
            "registry: voucher recorded"
        );
        self.records.insert(id, record);
        id
    }

    /// Borrow a voucher record.
    pub fn record(&self, id: &VoucherId) -> Option<&VoucherRecord> {
        self.records.get(id)
    }

    /// Number of vouchers ever issued.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Iterate over all vouchers.
    pub fn iter(&self) -> impl Iterator<Item = (&VoucherId, &VoucherRecord)> {
        self.records.iter()
    }
}

impl VoucherStore for VoucherBook {
    fn get(&self, id: &VoucherId) -> Option<VoucherRecord> {
        self.records.get(id).cloned()
    }

    fn authorize_mark(&self, caller: &AccountId, id: &VoucherId) -> Result<(), LedgerError> {
        match self.records.get(id) {
            Some(record) if record.ledger == *caller => Ok(()),
            _ => {
                warn!(voucher = %id, %caller, "registry: rejected claim mark");
                Err(LedgerError::NotAuthorized(*caller))
            }
        }
    }

    fn mark_claimed(&mut self, caller: &AccountId, id: &VoucherId) -> Result<(), LedgerError> {
        self.authorize_mark(caller, id)?;
        if let Some(record) = self.records.get_mut(id) {
            record.claimed = true;
            debug!(voucher = %id, ledger = %caller, "registry: voucher marked claimed");
        }
        Ok(())
    }
}
