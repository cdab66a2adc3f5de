//! In-memory implementation of the store ports.
//!
//! Serves two roles: the substrate for unit and integration tests, and the
//! backing store when the server runs without a configured database. A
//! single mutex guards the whole pool, which trivially satisfies the atomic
//! unit contract for one process; multi-instance deployments need the
//! Diesel/PostgreSQL adapter instead.

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::domain::{
    Category, CategoryStats, Code, CodeId, CorrelationId, PlayerId, RedemptionRecord,
};

use super::{
    AllocationOutcome, CodeStatus, InventoryReader, IssuedCode, NextAvailable, RedemptionStore,
    StoreError,
};

#[derive(Default)]
struct Inner {
    codes: Vec<Code>,
    redemptions: Vec<RedemptionRecord>,
}

/// Mutex-guarded in-memory code pool and redemption ledger.
#[derive(Default)]
pub struct MemoryRedemptionStore {
    inner: Mutex<Inner>,
}

impl MemoryRedemptionStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed one available code. Codes are kept sorted by id so allocation
    /// order matches seed order regardless of call order.
    pub fn seed_code(&self, id: i64, category: Category, value: impl Into<String>) {
        let mut inner = self.lock_or_poisoned();
        inner.codes.push(Code {
            id: CodeId::new(id),
            category,
            value: value.into(),
            created_at: Utc::now(),
            consumed_at: None,
        });
        inner.codes.sort_by_key(|code| code.id);
    }

    fn lock_or_poisoned(&self) -> std::sync::MutexGuard<'_, Inner> {
        // Poisoning only happens if a holder panicked; the data is still
        // consistent because every mutation completes before unlock.
        match self.inner.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

#[async_trait]
impl RedemptionStore for MemoryRedemptionStore {
    async fn redeem(
        &self,
        category: Category,
        player: PlayerId,
        correlation_id: Option<CorrelationId>,
    ) -> Result<AllocationOutcome, StoreError> {
        let mut inner = self.lock_or_poisoned();

        // Idempotent replay: the ledger wins over inventory, even with stock
        // remaining.
        if let Some(record) = inner
            .redemptions
            .iter()
            .find(|record| record.player_id == player && record.category == category)
        {
            let code_id = record.code_id;
            let redeemed_at = record.redeemed_at;
            let value = inner
                .codes
                .iter()
                .find(|code| code.id == code_id)
                .map(|code| code.value.clone())
                .ok_or_else(|| StoreError::query("ledger references an unknown code"))?;
            return Ok(AllocationOutcome::AlreadyRedeemed(IssuedCode {
                code_id,
                value,
                redeemed_at,
            }));
        }

        // FIFO pop: codes are sorted by id, so the first available one is
        // the lowest-id candidate.
        let now = Utc::now();
        let Some(code) = inner
            .codes
            .iter_mut()
            .find(|code| code.category == category && code.is_available())
        else {
            return Ok(AllocationOutcome::OutOfStock);
        };

        code.consumed_at = Some(now);
        let issued = IssuedCode {
            code_id: code.id,
            value: code.value.clone(),
            redeemed_at: now,
        };
        inner.redemptions.push(RedemptionRecord {
            id: Uuid::new_v4(),
            code_id: issued.code_id,
            player_id: player,
            category,
            correlation_id,
            redeemed_at: now,
        });
        Ok(AllocationOutcome::Allocated(issued))
    }
}

#[async_trait]
impl InventoryReader for MemoryRedemptionStore {
    async fn find_code(
        &self,
        value: &str,
        category: Option<Category>,
    ) -> Result<Option<CodeStatus>, StoreError> {
        let inner = self.lock_or_poisoned();
        let code = inner.codes.iter().find(|code| {
            code.value == value && category.is_none_or(|wanted| code.category == wanted)
        });
        Ok(code.map(|code| CodeStatus {
            code: code.clone(),
            redemption: inner
                .redemptions
                .iter()
                .find(|record| record.code_id == code.id)
                .cloned(),
        }))
    }

    async fn next_available(
        &self,
        category: Category,
    ) -> Result<Option<NextAvailable>, StoreError> {
        let inner = self.lock_or_poisoned();
        Ok(inner
            .codes
            .iter()
            .find(|code| code.category == category && code.is_available())
            .map(|code| NextAvailable {
                code_id: code.id,
                value: code.value.clone(),
            }))
    }

    async fn category_stats(&self) -> Result<Vec<CategoryStats>, StoreError> {
        let inner = self.lock_or_poisoned();
        Ok(Category::ALL
            .iter()
            .map(|&category| {
                let mut remaining = 0;
                let mut used = 0;
                for code in inner.codes.iter().filter(|code| code.category == category) {
                    if code.is_available() {
                        remaining += 1;
                    } else {
                        used += 1;
                    }
                }
                CategoryStats {
                    category,
                    remaining,
                    used,
                }
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn player(id: i64) -> PlayerId {
        PlayerId::new(id).expect("non-negative")
    }

    fn seeded_coins() -> MemoryRedemptionStore {
        let store = MemoryRedemptionStore::new();
        store.seed_code(1, Category::Coins, "A1");
        store.seed_code(2, Category::Coins, "A2");
        store
    }

    #[tokio::test]
    async fn allocates_in_fifo_order() {
        let store = seeded_coins();
        store.seed_code(3, Category::Coins, "A3");

        for (player_id, expected) in [(10, "A1"), (11, "A2"), (12, "A3")] {
            let outcome = store
                .redeem(Category::Coins, player(player_id), None)
                .await
                .expect("store ok");
            let AllocationOutcome::Allocated(issued) = outcome else {
                panic!("expected allocation, got {outcome:?}");
            };
            assert_eq!(issued.value, expected);
        }
    }

    #[tokio::test]
    async fn replays_existing_redemption_without_touching_inventory() {
        let store = seeded_coins();

        let first = store
            .redeem(Category::Coins, player(7), None)
            .await
            .expect("store ok");
        let AllocationOutcome::Allocated(issued) = first else {
            panic!("expected allocation");
        };

        let second = store
            .redeem(Category::Coins, player(7), None)
            .await
            .expect("store ok");
        let AllocationOutcome::AlreadyRedeemed(replayed) = second else {
            panic!("expected replay");
        };
        assert_eq!(replayed.value, issued.value);
        assert_eq!(replayed.redeemed_at, issued.redeemed_at);

        // The second code is still available for another player.
        let stats = store.category_stats().await.expect("stats");
        let coins = stats
            .iter()
            .find(|entry| entry.category == Category::Coins)
            .expect("coins entry");
        assert_eq!((coins.remaining, coins.used), (1, 1));
    }

    #[tokio::test]
    async fn exhausted_category_reports_out_of_stock() {
        let store = seeded_coins();
        for id in [20, 21] {
            store
                .redeem(Category::Coins, player(id), None)
                .await
                .expect("store ok");
        }
        let outcome = store
            .redeem(Category::Coins, player(22), None)
            .await
            .expect("store ok");
        assert_eq!(outcome, AllocationOutcome::OutOfStock);
    }

    #[tokio::test]
    async fn categories_are_isolated() {
        let store = seeded_coins();
        let outcome = store
            .redeem(Category::Cashback, player(7), None)
            .await
            .expect("store ok");
        assert_eq!(outcome, AllocationOutcome::OutOfStock);
    }

    #[tokio::test]
    async fn find_code_joins_ledger_entry_once_consumed() {
        let store = seeded_coins();
        let before = store
            .find_code("A1", Some(Category::Coins))
            .await
            .expect("store ok")
            .expect("seeded");
        assert!(before.redemption.is_none());
        assert!(before.code.is_available());

        store
            .redeem(Category::Coins, player(7), Some(CorrelationId::truncated("req-1")))
            .await
            .expect("store ok");

        let after = store
            .find_code("A1", None)
            .await
            .expect("store ok")
            .expect("still present");
        let record = after.redemption.expect("consumed");
        assert_eq!(record.player_id, player(7));
        assert_eq!(
            record.correlation_id.as_ref().map(|c| c.as_str()),
            Some("req-1")
        );
        assert_eq!(after.code.consumed_at, Some(record.redeemed_at));
    }

    #[tokio::test]
    async fn stats_include_zero_count_categories() {
        let store = MemoryRedemptionStore::new();
        let stats = store.category_stats().await.expect("stats");
        assert_eq!(stats.len(), Category::ALL.len());
        assert!(stats.iter().all(|entry| entry.remaining == 0 && entry.used == 0));
    }
}
