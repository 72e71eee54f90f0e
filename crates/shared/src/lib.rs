//! Shared types, errors, and configuration for the payout ledger.
//!
//! This crate provides common types used across all other crates:
//! - Money in integer minor units
//! - Typed IDs for type-safe entity references
//! - Application-wide error types
//! - Configuration management

pub mod config;
pub mod error;
pub mod types;

pub use config::{AppConfig, LedgerConfig, StatsCacheConfig};
pub use error::AppError;
pub use types::{EarningId, Money, UserId, WithdrawalId};
