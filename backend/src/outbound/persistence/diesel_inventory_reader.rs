//! PostgreSQL-backed `InventoryReader` implementation using Diesel ORM.
//!
//! Read-only queries for the operator endpoints. No locking beyond the
//! store's default read consistency: `next_available` is informational and
//! makes no allocation promise.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{CodeStatus, InventoryReader, NextAvailable, StoreError};
use crate::domain::{Category, CategoryStats, CodeId};

use super::diesel_helpers::{map_diesel_error, map_pool_error};
use super::models::{CodeRow, RedemptionRow};
use super::pool::DbPool;
use super::schema::{codes, redemptions};

/// Diesel-backed implementation of the `InventoryReader` port.
#[derive(Clone)]
pub struct DieselInventoryReader {
    pool: DbPool,
}

impl DieselInventoryReader {
    /// Create a new reader with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl InventoryReader for DieselInventoryReader {
    async fn find_code(
        &self,
        value: &str,
        category: Option<Category>,
    ) -> Result<Option<CodeStatus>, StoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let mut query = codes::table
            .left_join(redemptions::table)
            .filter(codes::value.eq(value))
            .into_boxed();
        if let Some(wanted) = category {
            query = query.filter(codes::category.eq(wanted.as_str()));
        }

        let row: Option<(CodeRow, Option<RedemptionRow>)> = query
            .select((CodeRow::as_select(), Option::<RedemptionRow>::as_select()))
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(|(code, redemption)| {
            Ok(CodeStatus {
                code: code.into_domain()?,
                redemption: redemption.map(RedemptionRow::into_domain).transpose()?,
            })
        })
        .transpose()
    }

    async fn next_available(
        &self,
        category: Category,
    ) -> Result<Option<NextAvailable>, StoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<CodeRow> = codes::table
            .filter(codes::category.eq(category.as_str()))
            .filter(codes::consumed_at.is_null())
            .order(codes::id.asc())
            .limit(1)
            .select(CodeRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        Ok(row.map(|code| NextAvailable {
            code_id: CodeId::new(code.id),
            value: code.value,
        }))
    }

    async fn category_stats(&self) -> Result<Vec<CategoryStats>, StoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        // Driven off the enum rather than DISTINCT category so empty
        // categories still appear with zero counts.
        let mut stats = Vec::with_capacity(Category::ALL.len());
        for &category in &Category::ALL {
            let remaining: i64 = codes::table
                .filter(codes::category.eq(category.as_str()))
                .filter(codes::consumed_at.is_null())
                .count()
                .get_result(&mut conn)
                .await
                .map_err(map_diesel_error)?;
            let used: i64 = codes::table
                .filter(codes::category.eq(category.as_str()))
                .filter(codes::consumed_at.is_not_null())
                .count()
                .get_result(&mut conn)
                .await
                .map_err(map_diesel_error)?;

            stats.push(CategoryStats {
                category,
                remaining: u64::try_from(remaining).unwrap_or_default(),
                used: u64::try_from(used).unwrap_or_default(),
            });
        }
        Ok(stats)
    }
}
