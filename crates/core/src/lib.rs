//! Core payout ledger logic.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! Persistence is reached only through the [`store::LedgerStore`] trait.
//!
//! # Modules
//!
//! - `hold` - Hold-period calendar arithmetic
//! - `earning` - Earning records and balance aggregation
//! - `withdrawal` - Amount and method validation, fees, lifecycle
//! - `policy` - Configured hold, minimum and fee knobs
//! - `store` - Persistence trait and the embedded store
//! - `service` - Ledger operations over a store
//! - `cache` - Caller-owned read-through stats cache

pub mod cache;
pub mod earning;
pub mod error;
pub mod hold;
pub mod policy;
pub mod service;
pub mod store;
pub mod withdrawal;

#[cfg(test)]
mod hold_props;

pub use cache::StatsCache;
pub use error::LedgerError;
pub use hold::{HOLD_PERIOD_DAYS, HoldPolicy};
pub use policy::LedgerPolicy;
pub use service::LedgerService;
pub use store::{LedgerStore, MemoryLedgerStore};
