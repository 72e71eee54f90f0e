//! Ledger-wide policy knobs resolved from configuration.

use chrono_tz::Tz;
use payout_shared::{LedgerConfig, Money};

use crate::error::LedgerError;
use crate::hold::HoldPolicy;
use crate::withdrawal::fee::FeeSchedule;
use crate::withdrawal::validation::MINIMUM_WITHDRAWAL;

/// Hold window, payout floor and fee schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LedgerPolicy {
    /// Hold-period policy.
    pub hold: HoldPolicy,
    /// Smallest withdrawal accepted.
    pub minimum_withdrawal: Money,
    /// Flat fees per rail.
    pub fees: FeeSchedule,
}

impl Default for LedgerPolicy {
    fn default() -> Self {
        Self {
            hold: HoldPolicy::default(),
            minimum_withdrawal: MINIMUM_WITHDRAWAL,
            fees: FeeSchedule::default(),
        }
    }
}

impl LedgerPolicy {
    /// Builds a policy from the `ledger` config section.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for an unknown timezone, a non-positive minimum,
    /// a negative fee, or a fee that would leave a minimum withdrawal with no
    /// net payout.
    pub fn from_config(config: &LedgerConfig) -> Result<Self, LedgerError> {
        let timezone: Tz = config
            .timezone
            .parse()
            .map_err(|_| LedgerError::InvalidInput(format!("unknown timezone: {}", config.timezone)))?;

        let minimum_withdrawal = Money::new(config.minimum_withdrawal);
        if !minimum_withdrawal.is_positive() {
            return Err(LedgerError::InvalidInput(
                "minimum_withdrawal must be positive".to_string(),
            ));
        }

        let fees = FeeSchedule {
            bank_transfer: Money::new(config.bank_transfer_fee),
            paypal: Money::new(config.paypal_fee),
        };
        if fees.bank_transfer.is_negative() || fees.paypal.is_negative() {
            return Err(LedgerError::InvalidInput(
                "withdrawal fees must be non-negative".to_string(),
            ));
        }
        if fees.bank_transfer >= minimum_withdrawal || fees.paypal >= minimum_withdrawal {
            return Err(LedgerError::InvalidInput(
                "withdrawal fees must be below minimum_withdrawal".to_string(),
            ));
        }

        Ok(Self {
            hold: HoldPolicy::new(config.hold_period_days, timezone),
            minimum_withdrawal,
            fees,
        })
    }
}
