//! Withdrawal fees.
//!
//! Fees are flat per payout rail. A fee may exceed a tiny amount; the
//! minimum-withdrawal rule catches that, not this module.

use payout_shared::Money;
use serde::{Deserialize, Serialize};

use super::types::WithdrawalMethodKind;
use crate::error::LedgerError;

/// Default bank transfer fee in minor units.
pub const BANK_TRANSFER_FEE: Money = Money::new(250);

/// Default PayPal fee in minor units.
pub const PAYPAL_FEE: Money = Money::new(0);

/// Flat fee per payout rail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeSchedule {
    /// Fee for bank transfers.
    pub bank_transfer: Money,
    /// Fee for PayPal payouts.
    pub paypal: Money,
}

impl Default for FeeSchedule {
    fn default() -> Self {
        Self {
            bank_transfer: BANK_TRANSFER_FEE,
            paypal: PAYPAL_FEE,
        }
    }
}

impl FeeSchedule {
    /// Fee charged for `amount` over `kind`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidAmount` for a negative amount.
    pub fn fee_for(&self, amount: Money, kind: WithdrawalMethodKind) -> Result<Money, LedgerError> {
        if amount.is_negative() {
            return Err(LedgerError::InvalidAmount);
        }
        Ok(match kind {
            WithdrawalMethodKind::BankTransfer => self.bank_transfer,
            WithdrawalMethodKind::Paypal => self.paypal,
        })
    }

    /// `amount - fee` for `kind`.
    pub fn net_payout(&self, amount: Money, kind: WithdrawalMethodKind) -> Result<Money, LedgerError> {
        let fee = self.fee_for(amount, kind)?;
        amount.checked_sub(fee).ok_or(LedgerError::Overflow)
    }
}

/// Fee for `amount` under the default schedule, by method name.
///
/// # Errors
///
/// Returns `InvalidMethod` for an unknown method and `InvalidAmount` for a
/// negative amount.
pub fn calculate_withdrawal_fee(amount: i64, method: &str) -> Result<Money, LedgerError> {
    let kind: WithdrawalMethodKind = method.parse()?;
    FeeSchedule::default().fee_for(Money::new(amount), kind)
}
