//! Ledger schema.
//!
//! Creates the withdrawal_requests and earnings tables. Amounts are BIGINT
//! minor units; status columns are TEXT guarded by CHECK constraints.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(LEDGER_SQL).await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(
            "DROP TABLE IF EXISTS earnings CASCADE;
             DROP TABLE IF EXISTS withdrawal_requests CASCADE;",
        )
        .await?;
        Ok(())
    }
}

const LEDGER_SQL: &str = r"
-- Withdrawal requests: one row per payout attempt
CREATE TABLE withdrawal_requests (
    id UUID PRIMARY KEY,
    user_id UUID NOT NULL,
    requested_amount BIGINT NOT NULL,
    method_type TEXT NOT NULL,
    method JSONB NOT NULL,
    fee BIGINT NOT NULL,
    net_amount BIGINT NOT NULL,
    status TEXT NOT NULL DEFAULT 'validated',
    earning_ids JSONB NOT NULL DEFAULT '[]'::jsonb,
    failure_reason TEXT,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_withdrawal_amount_positive CHECK (requested_amount > 0),
    CONSTRAINT chk_withdrawal_fee_non_negative CHECK (fee >= 0),
    CONSTRAINT chk_withdrawal_net CHECK (net_amount = requested_amount - fee),
    CONSTRAINT chk_withdrawal_method_type CHECK (method_type IN ('bank_transfer', 'paypal')),
    CONSTRAINT chk_withdrawal_status CHECK (status IN ('validated', 'processing', 'completed', 'failed')),
    CONSTRAINT chk_withdrawal_failure_reason CHECK (failure_reason IS NULL OR status = 'failed')
);

-- User's withdrawal history
CREATE INDEX idx_withdrawal_requests_user ON withdrawal_requests(user_id, created_at DESC);

-- Earnings: append-only accrual events
CREATE TABLE earnings (
    id UUID PRIMARY KEY,
    user_id UUID NOT NULL,
    source_type TEXT NOT NULL,
    source_id UUID,
    gross_amount BIGINT NOT NULL,
    platform_fee BIGINT NOT NULL DEFAULT 0,
    net_amount BIGINT NOT NULL,
    payment_provider TEXT,
    payment_state TEXT NOT NULL DEFAULT 'completed',
    status TEXT NOT NULL DEFAULT 'pending',
    withdrawal_id UUID REFERENCES withdrawal_requests(id),
    created_at TIMESTAMPTZ NOT NULL,
    available_at TIMESTAMPTZ NOT NULL,
    CONSTRAINT chk_earnings_amounts_non_negative CHECK (gross_amount >= 0 AND platform_fee >= 0),
    CONSTRAINT chk_earnings_net CHECK (net_amount = gross_amount - platform_fee AND net_amount >= 0),
    CONSTRAINT chk_earnings_hold CHECK (available_at >= created_at),
    CONSTRAINT chk_earnings_source_type CHECK (source_type IN ('tip', 'superchat', 'subscription_pool')),
    CONSTRAINT chk_earnings_payment_provider CHECK (payment_provider IS NULL OR payment_provider IN ('stripe', 'ccbill')),
    CONSTRAINT chk_earnings_payment_state CHECK (payment_state IN ('pending', 'completed', 'failed')),
    CONSTRAINT chk_earnings_status CHECK (status IN ('pending', 'available', 'withdrawn')),
    CONSTRAINT chk_earnings_withdrawn_link CHECK ((status = 'withdrawn') = (withdrawal_id IS NOT NULL))
);

-- Reservation scan: a user's earnings in selection order
CREATE INDEX idx_earnings_user_available ON earnings(user_id, available_at, created_at, id);

-- Release on failed withdrawal
CREATE INDEX idx_earnings_withdrawal ON earnings(withdrawal_id) WHERE withdrawal_id IS NOT NULL;
";
