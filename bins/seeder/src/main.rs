//! Development seeder for the payout ledger.
//!
//! Seeds a fixed test creator with a mix of earnings: some past their hold,
//! some still held, one from a failed charge. Re-running is a no-op once the
//! creator has earnings.
//!
//! Usage: cargo run --bin seeder

use anyhow::Context;
use chrono::{TimeDelta, Utc};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

use payout_core::earning::{EarningSourceType, NewEarning, PaymentProvider, PaymentState};
use payout_core::{LedgerPolicy, LedgerService, LedgerStore};
use payout_db::{PgLedgerStore, connect_with_config};
use payout_shared::{AppConfig, Money, UserId};

/// Test creator ID (consistent for all seeds)
const TEST_USER_ID: &str = "00000000-0000-0000-0000-000000000002";

/// (source, gross, platform fee, days ago, state)
const SEED_EARNINGS: &[(EarningSourceType, i64, i64, i64, PaymentState)] = &[
    (EarningSourceType::Tip, 1000, 200, 40, PaymentState::Completed),
    (EarningSourceType::Superchat, 2500, 500, 30, PaymentState::Completed),
    (EarningSourceType::SubscriptionPool, 12_000, 2400, 20, PaymentState::Completed),
    (EarningSourceType::Tip, 500, 100, 16, PaymentState::Failed),
    (EarningSourceType::Tip, 3000, 600, 5, PaymentState::Completed),
    (EarningSourceType::Superchat, 800, 160, 1, PaymentState::Pending),
];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "payout=debug,sea_orm=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::load().context("Failed to load configuration")?;
    let policy = LedgerPolicy::from_config(&config.ledger)?;

    let db = connect_with_config(&config.database)
        .await
        .context("Failed to connect to database")?;
    info!("Connected to database");

    let service = LedgerService::new(PgLedgerStore::new(db), policy);
    let user_id = UserId::from_uuid(Uuid::parse_str(TEST_USER_ID)?);

    if !service.store().list_earnings_for_user(user_id).await?.is_empty() {
        info!(user_id = %user_id, "Test creator already has earnings, skipping");
        return Ok(());
    }

    let now = Utc::now();
    for &(source_type, gross, fee, days_ago, payment_state) in SEED_EARNINGS {
        let provider = match source_type {
            EarningSourceType::SubscriptionPool => PaymentProvider::Ccbill,
            EarningSourceType::Tip | EarningSourceType::Superchat => PaymentProvider::Stripe,
        };
        service
            .record_earning(
                NewEarning {
                    user_id,
                    source_type,
                    source_id: Some(Uuid::now_v7()),
                    gross_amount: Money::new(gross),
                    platform_fee: Money::new(fee),
                    payment_provider: Some(provider),
                    payment_state,
                },
                now - TimeDelta::days(days_ago),
            )
            .await?;
    }

    let stats = service.get_stats(user_id, now).await?;
    info!(
        user_id = %user_id,
        available = %stats.available_balance,
        pending = %stats.pending_balance,
        "Seeding complete"
    );
    Ok(())
}
