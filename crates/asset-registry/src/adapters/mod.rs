//! # Adapters Layer (Outer Hexagon)
//!
//! Reference implementations of the `StateStore` and `TransactionalLedger`
//! ports.
//!
//! ## Modules
//!
//! - `ledger`: in-memory and file-backed versioned ledgers

pub mod ledger;

pub use ledger::*;
