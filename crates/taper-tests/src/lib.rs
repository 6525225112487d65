//! Integration test suite for Taper.
//!
//! This crate exercises the registry and its ledgers together through the
//! public API: campaign lifecycles end to end, and property-based attacks on
//! the payout invariants.

pub mod helpers;
