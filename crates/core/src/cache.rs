//! Read-through balance cache using Moka.
//!
//! The ledger itself never caches. Request layers that serve stats at high
//! volume wrap their [`LedgerService`] in a [`StatsCache`]; writes made
//! through the cache invalidate the affected creator's entry. Writes that
//! bypass it become visible once the entry's TTL lapses.

use chrono::{DateTime, Utc};
use moka::sync::Cache;
use payout_shared::{Money, StatsCacheConfig, UserId, WithdrawalId};
use std::sync::Arc;
use std::time::Duration;

use crate::earning::{Earning, EarningsStats, NewEarning};
use crate::error::LedgerError;
use crate::service::LedgerService;
use crate::store::LedgerStore;
use crate::withdrawal::{WithdrawalMethodInput, WithdrawalRequest};

/// Balance snapshots keyed by creator.
pub struct StatsCache<S> {
    service: Arc<LedgerService<S>>,
    cache: Cache<UserId, Arc<EarningsStats>>,
}

impl<S: LedgerStore> StatsCache<S> {
    /// Wraps `service` with capacity and TTL from `config`.
    pub fn new(service: Arc<LedgerService<S>>, config: &StatsCacheConfig) -> Self {
        Self::with_config(service, config.max_capacity, config.ttl_secs)
    }

    /// Wraps `service` with a custom capacity and TTL.
    pub fn with_config(service: Arc<LedgerService<S>>, max_capacity: u64, ttl_secs: u64) -> Self {
        let cache = Cache::builder()
            .max_capacity(max_capacity)
            .time_to_live(Duration::from_secs(ttl_secs))
            .build();

        Self { service, cache }
    }

    /// The wrapped service.
    pub fn service(&self) -> &Arc<LedgerService<S>> {
        &self.service
    }

    /// Cached snapshot for `user_id`, computing it as of `now` on a miss.
    ///
    /// A hit returns the snapshot's original `as_of`.
    pub async fn get_stats(
        &self,
        user_id: UserId,
        now: DateTime<Utc>,
    ) -> Result<EarningsStats, LedgerError> {
        if let Some(cached) = self.cache.get(&user_id) {
            return Ok((*cached).clone());
        }

        let stats = self.service.get_stats(user_id, now).await?;
        self.cache.insert(user_id, Arc::new(stats.clone()));
        Ok(stats)
    }

    /// Records an earning and drops the creator's snapshot.
    pub async fn record_earning(
        &self,
        input: NewEarning,
        now: DateTime<Utc>,
    ) -> Result<Earning, LedgerError> {
        let earning = self.service.record_earning(input, now).await?;
        self.invalidate(earning.user_id);
        Ok(earning)
    }

    /// Submits a withdrawal and drops the creator's snapshot.
    pub async fn submit_withdrawal(
        &self,
        user_id: UserId,
        amount: Money,
        method: Option<&WithdrawalMethodInput>,
        now: DateTime<Utc>,
    ) -> Result<WithdrawalRequest, LedgerError> {
        let request = self
            .service
            .submit_withdrawal(user_id, amount, method, now)
            .await?;
        self.invalidate(user_id);
        Ok(request)
    }

    /// Completes a withdrawal and drops the creator's snapshot.
    pub async fn complete_withdrawal(
        &self,
        id: WithdrawalId,
        now: DateTime<Utc>,
    ) -> Result<WithdrawalRequest, LedgerError> {
        let request = self.service.complete_withdrawal(id, now).await?;
        self.invalidate(request.user_id);
        Ok(request)
    }

    /// Fails a withdrawal and drops the creator's snapshot.
    pub async fn fail_withdrawal(
        &self,
        id: WithdrawalId,
        reason: &str,
        now: DateTime<Utc>,
    ) -> Result<WithdrawalRequest, LedgerError> {
        let request = self.service.fail_withdrawal(id, reason, now).await?;
        self.invalidate(request.user_id);
        Ok(request)
    }

    /// Drops one creator's snapshot.
    pub fn invalidate(&self, user_id: UserId) {
        self.cache.invalidate(&user_id);
    }

    /// Drops every snapshot.
    pub fn invalidate_all(&self) {
        self.cache.invalidate_all();
    }

    /// Number of cached snapshots.
    #[must_use]
    pub fn entry_count(&self) -> u64 {
        self.cache.entry_count()
    }

    /// Runs pending eviction work so `entry_count` is current.
    pub fn run_pending_tasks(&self) {
        self.cache.run_pending_tasks();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::earning::{EarningSourceType, PaymentState};
    use crate::policy::LedgerPolicy;
    use crate::store::MemoryLedgerStore;
    use chrono::TimeDelta;

    fn at(raw: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(raw).unwrap().with_timezone(&Utc)
    }

    fn superchat(user_id: UserId, net: i64) -> NewEarning {
        NewEarning {
            user_id,
            source_type: EarningSourceType::Superchat,
            source_id: None,
            gross_amount: Money::new(net),
            platform_fee: Money::ZERO,
            payment_provider: None,
            payment_state: PaymentState::Completed,
        }
    }

    fn cache() -> StatsCache<MemoryLedgerStore> {
        let service = Arc::new(LedgerService::new(
            MemoryLedgerStore::new(),
            LedgerPolicy::default(),
        ));
        StatsCache::with_config(service, 100, 60)
    }

    #[tokio::test]
    async fn test_miss_then_hit() {
        let cache = cache();
        let user = UserId::new();
        let first_now = at("2025-06-01T00:00:00Z");
        cache
            .record_earning(superchat(user, 2000), first_now - TimeDelta::days(20))
            .await
            .unwrap();

        let first = cache.get_stats(user, first_now).await.unwrap();
        assert_eq!(first.available_balance, Money::new(2000));

        let second = cache
            .get_stats(user, first_now + TimeDelta::minutes(5))
            .await
            .unwrap();
        assert_eq!(second.as_of, first_now);
        cache.run_pending_tasks();
        assert_eq!(cache.entry_count(), 1);
    }

    #[tokio::test]
    async fn test_writes_through_cache_invalidate() {
        let cache = cache();
        let user = UserId::new();
        let now = at("2025-06-01T00:00:00Z");
        cache
            .record_earning(superchat(user, 2000), now - TimeDelta::days(20))
            .await
            .unwrap();
        assert_eq!(
            cache.get_stats(user, now).await.unwrap().available_balance,
            Money::new(2000)
        );

        let method = WithdrawalMethodInput {
            method_type: Some("paypal".to_string()),
            paypal_email: Some("creator@example.com".to_string()),
            ..WithdrawalMethodInput::default()
        };
        cache
            .submit_withdrawal(user, Money::new(2000), Some(&method), now)
            .await
            .unwrap();

        let stats = cache.get_stats(user, now).await.unwrap();
        assert_eq!(stats.available_balance, Money::ZERO);
        assert_eq!(stats.total_withdrawn, Money::new(2000));
    }

    #[tokio::test]
    async fn test_bypassing_writes_are_stale_until_invalidated() {
        let cache = cache();
        let user = UserId::new();
        let now = at("2025-06-01T00:00:00Z");
        assert_eq!(
            cache.get_stats(user, now).await.unwrap().pending_balance,
            Money::ZERO
        );

        cache
            .service()
            .record_earning(superchat(user, 800), now)
            .await
            .unwrap();
        assert_eq!(
            cache.get_stats(user, now).await.unwrap().pending_balance,
            Money::ZERO
        );

        cache.invalidate(user);
        assert_eq!(
            cache.get_stats(user, now).await.unwrap().pending_balance,
            Money::new(800)
        );
    }

    #[tokio::test]
    async fn test_invalidate_all() {
        let cache = cache();
        let now = at("2025-06-01T00:00:00Z");
        for _ in 0..3 {
            cache.get_stats(UserId::new(), now).await.unwrap();
        }
        cache.run_pending_tasks();
        assert_eq!(cache.entry_count(), 3);

        cache.invalidate_all();
        cache.run_pending_tasks();
        assert_eq!(cache.entry_count(), 0);
    }
}
