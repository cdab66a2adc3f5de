//! PostgreSQL-backed `RedemptionStore` implementation using Diesel ORM.
//!
//! The whole redeem algorithm runs inside one database transaction:
//!
//! 1. `pg_advisory_xact_lock` serialises callers sharing the same
//!    `(player, category)` key; the lock is released with the transaction.
//! 2. The ledger is consulted first, so replays return the original code
//!    without touching inventory.
//! 3. The FIFO pop selects the lowest-id available code with
//!    `FOR UPDATE SKIP LOCKED`, so concurrent pops of different codes never
//!    queue behind each other.
//! 4. The code is marked consumed and the ledger entry appended; commit
//!    publishes both or neither.
//!
//! If the caller abandons the future mid-flight the connection drops and
//! PostgreSQL rolls the transaction back, leaving no partial state.

use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel::sql_types::Integer;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};
use uuid::Uuid;

use crate::domain::ports::{AllocationOutcome, IssuedCode, RedemptionStore, StoreError};
use crate::domain::{Category, CodeId, CorrelationId, PlayerId};

use super::diesel_helpers::{map_diesel_error, map_pool_error};
use super::models::{CodeRow, NewRedemptionRow, RedemptionRow};
use super::pool::DbPool;
use super::schema::{codes, redemptions};

/// Diesel-backed implementation of the `RedemptionStore` port.
#[derive(Clone)]
pub struct DieselRedemptionStore {
    pool: DbPool,
}

impl DieselRedemptionStore {
    /// Create a new store with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Advisory lock key pair for `(player, category)`.
///
/// Must be deterministic across processes and binary versions, so it is
/// computed arithmetically rather than with a hasher. Collisions between
/// distinct players only over-serialise; they never affect correctness.
fn advisory_keys(category: Category, player: PlayerId) -> (i32, i32) {
    let id = player.get();
    let folded = (id ^ (id >> 32)) as i32;
    let ordinal = Category::ALL
        .iter()
        .position(|&member| member == category)
        .unwrap_or_default() as i32;
    (folded, ordinal)
}

#[async_trait]
impl RedemptionStore for DieselRedemptionStore {
    async fn redeem(
        &self,
        category: Category,
        player: PlayerId,
        correlation_id: Option<CorrelationId>,
    ) -> Result<AllocationOutcome, StoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let category_name = category.as_str();
        let correlation = correlation_id.map(|id| id.as_str().to_owned());
        let (key1, key2) = advisory_keys(category, player);

        conn.transaction::<AllocationOutcome, diesel::result::Error, _>(|conn| {
            async move {
                diesel::sql_query("SELECT pg_advisory_xact_lock($1, $2)")
                    .bind::<Integer, _>(key1)
                    .bind::<Integer, _>(key2)
                    .execute(conn)
                    .await?;

                // Ledger first: the replay path must win even with stock
                // remaining.
                let existing: Option<(RedemptionRow, CodeRow)> = redemptions::table
                    .inner_join(codes::table)
                    .filter(redemptions::player_id.eq(player.get()))
                    .filter(redemptions::category.eq(category_name))
                    .select((RedemptionRow::as_select(), CodeRow::as_select()))
                    .first(conn)
                    .await
                    .optional()?;

                if let Some((record, code)) = existing {
                    return Ok(AllocationOutcome::AlreadyRedeemed(IssuedCode {
                        code_id: CodeId::new(record.code_id),
                        value: code.value,
                        redeemed_at: record.redeemed_at,
                    }));
                }

                let candidate: Option<CodeRow> = codes::table
                    .filter(codes::category.eq(category_name))
                    .filter(codes::consumed_at.is_null())
                    .order(codes::id.asc())
                    .limit(1)
                    .for_update()
                    .skip_locked()
                    .select(CodeRow::as_select())
                    .first(conn)
                    .await
                    .optional()?;

                let Some(code) = candidate else {
                    return Ok(AllocationOutcome::OutOfStock);
                };

                let now = Utc::now();
                diesel::update(codes::table.find(code.id))
                    .set(codes::consumed_at.eq(now))
                    .execute(conn)
                    .await?;

                diesel::insert_into(redemptions::table)
                    .values(&NewRedemptionRow {
                        id: Uuid::new_v4(),
                        code_id: code.id,
                        player_id: player.get(),
                        category: category_name,
                        correlation_id: correlation.as_deref(),
                        redeemed_at: now,
                    })
                    .execute(conn)
                    .await?;

                Ok(AllocationOutcome::Allocated(IssuedCode {
                    code_id: CodeId::new(code.id),
                    value: code.value,
                    redeemed_at: now,
                }))
            }
            .scope_boxed()
        })
        .await
        .map_err(map_diesel_error)
    }
}
