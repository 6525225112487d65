//! # taper-core
//! Foundation types and traits for Taper reward campaigns.
//!
//! A campaign pays holders of single-use vouchers a discount that decays as
//! its budget is distributed. This crate holds what the ledger and registry
//! share: identifiers, entity records, error enums, collaborator traits and
//! the integer fixed-point arithmetic everything is computed with.

pub mod constants;
pub mod error;
pub mod math;
pub mod memory;
pub mod traits;
pub mod types;
