//! Earning ledger.
//!
//! - Earning records and their status enums
//! - Balance aggregation (available, pending, this month, withdrawn)

pub mod balance;
pub mod types;

#[cfg(test)]
mod balance_props;

pub use balance::{
    EarningsStats, SourceBreakdown, available_balance, compute_stats, pending_balance,
    source_breakdown, this_month_earnings, total_withdrawn,
};
pub use types::{
    Earning, EarningSourceType, EarningStatus, NewEarning, PaymentProvider, PaymentState,
};
