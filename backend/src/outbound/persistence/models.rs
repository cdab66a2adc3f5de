//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain. They exist solely to satisfy Diesel's
//! type requirements for queries and mutations.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::domain::ports::StoreError;
use crate::domain::{Category, Code, CodeId, CorrelationId, PlayerId, RedemptionRecord};

use super::schema::{codes, redemptions};

/// Row struct for reading from the codes table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = codes)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct CodeRow {
    pub id: i64,
    pub category: String,
    pub value: String,
    pub created_at: DateTime<Utc>,
    pub consumed_at: Option<DateTime<Utc>>,
}

impl CodeRow {
    pub(crate) fn into_domain(self) -> Result<Code, StoreError> {
        Ok(Code {
            id: CodeId::new(self.id),
            category: parse_category(&self.category)?,
            value: self.value,
            created_at: self.created_at,
            consumed_at: self.consumed_at,
        })
    }
}

/// Row struct for reading from the redemptions table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = redemptions)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct RedemptionRow {
    pub id: Uuid,
    pub code_id: i64,
    pub player_id: i64,
    pub category: String,
    pub correlation_id: Option<String>,
    pub redeemed_at: DateTime<Utc>,
}

impl RedemptionRow {
    pub(crate) fn into_domain(self) -> Result<RedemptionRecord, StoreError> {
        let player_id = PlayerId::new(self.player_id)
            .map_err(|_| StoreError::query("negative player id in redemptions table"))?;
        Ok(RedemptionRecord {
            id: self.id,
            code_id: CodeId::new(self.code_id),
            player_id,
            category: parse_category(&self.category)?,
            correlation_id: self.correlation_id.map(CorrelationId::truncated),
            redeemed_at: self.redeemed_at,
        })
    }
}

/// Insertable struct for appending ledger entries.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = redemptions)]
pub(crate) struct NewRedemptionRow<'a> {
    pub id: Uuid,
    pub code_id: i64,
    pub player_id: i64,
    pub category: &'a str,
    pub correlation_id: Option<&'a str>,
    // Set explicitly, not left to the column default, so the receipt the
    // caller sees matches the stored row exactly.
    pub redeemed_at: DateTime<Utc>,
}

pub(crate) fn parse_category(raw: &str) -> Result<Category, StoreError> {
    raw.parse()
        .map_err(|_| StoreError::query(format!("unknown category in database: {raw}")))
}
