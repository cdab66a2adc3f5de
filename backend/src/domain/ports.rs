//! Domain ports defining the edges of the hexagon.
//!
//! Driven ports describe how the domain expects to interact with the durable
//! store; driving ports are the use-case traits the inbound HTTP adapter
//! calls. Each trait exposes strongly typed errors so adapters map their
//! failures into predictable variants instead of returning `anyhow::Result`.
//!
//! The whole redeem algorithm hangs off a single driven operation,
//! [`RedemptionStore::redeem`]: ledger lookup and inventory allocation must
//! be one indivisible unit against the store, so the port boundary is drawn
//! around that unit rather than around individual queries. Adapters that
//! cannot express the unit atomically cannot implement the port by accident.

pub mod memory;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
#[cfg(test)]
use mockall::automock;
use thiserror::Error as ThisError;

use super::{Category, CategoryStats, Code, CodeId, CorrelationId, Error, PlayerId, RedemptionRecord};

/// Errors surfaced by store adapters.
///
/// The coordinator classifies these into retryable and non-retryable
/// outcomes; adapters must pick the variant by cause, never collapse
/// everything into `Query`.
#[derive(Debug, Clone, PartialEq, Eq, ThisError)]
pub enum StoreError {
    /// Connectivity to the durable store was lost or never established.
    #[error("store connection failed: {message}")]
    Connection {
        /// Adapter-provided cause description.
        message: String,
    },
    /// The store reported that the operation exceeded a time bound.
    #[error("store operation timed out: {message}")]
    Timeout {
        /// Adapter-provided cause description.
        message: String,
    },
    /// A concurrent writer won a race the store detected at a uniqueness
    /// constraint. The caller can retry and will hit the replay path.
    #[error("store detected a conflicting write: {message}")]
    Conflict {
        /// Adapter-provided cause description.
        message: String,
    },
    /// Any other query or mutation failure.
    #[error("store query failed: {message}")]
    Query {
        /// Adapter-provided cause description.
        message: String,
    },
}

impl StoreError {
    /// Helper for connectivity failures.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Helper for store-side timeouts.
    pub fn timeout(message: impl Into<String>) -> Self {
        Self::Timeout {
            message: message.into(),
        }
    }

    /// Helper for conflicting concurrent writes.
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict {
            message: message.into(),
        }
    }

    /// Helper for query failures.
    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
        }
    }
}

/// A code as handed to a player by the atomic unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedCode {
    /// The consumed code's id.
    pub code_id: CodeId,
    /// The opaque redemption string.
    pub value: String,
    /// When the code was consumed. Stable across idempotent replays.
    pub redeemed_at: DateTime<Utc>,
}

/// Result of one execution of the atomic redeem unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AllocationOutcome {
    /// A fresh code was allocated and marked consumed.
    Allocated(IssuedCode),
    /// The player already holds a code for this category; inventory was not
    /// touched.
    AlreadyRedeemed(IssuedCode),
    /// No available code exists and the player has no prior redemption.
    OutOfStock,
}

/// Driven port for the transactional redeem unit.
///
/// Implementations must execute the whole algorithm as one atomic unit:
/// serialise callers sharing the same `(player, category)` key, replay an
/// existing redemption without touching inventory, otherwise pop the
/// lowest-id available code without blocking behind concurrent pops of other
/// codes, and never leave a consumed code without a matching record.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait RedemptionStore: Send + Sync {
    /// Run the atomic redeem unit for `(player, category)`.
    async fn redeem(
        &self,
        category: Category,
        player: PlayerId,
        correlation_id: Option<CorrelationId>,
    ) -> Result<AllocationOutcome, StoreError>;
}

/// A code joined with its redemption record, if consumed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeStatus {
    /// The code's metadata.
    pub code: Code,
    /// The ledger entry, present iff the code is consumed.
    pub redemption: Option<RedemptionRecord>,
}

/// The code a subsequent allocation would hand out.
///
/// Informational only: no allocation guarantee is attached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NextAvailable {
    /// The candidate code's id.
    pub code_id: CodeId,
    /// The candidate code's value.
    pub value: String,
}

/// Driven port for read-only inventory access.
///
/// Never mutates; requires no locking discipline beyond the store's default
/// read consistency.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait InventoryReader: Send + Sync {
    /// Look up a code by its value, optionally narrowed to a category.
    async fn find_code(
        &self,
        value: &str,
        category: Option<Category>,
    ) -> Result<Option<CodeStatus>, StoreError>;

    /// The lowest-id available code in a category, if any.
    async fn next_available(&self, category: Category)
    -> Result<Option<NextAvailable>, StoreError>;

    /// Aggregate counts for every member of the category enumeration,
    /// zero counts included.
    async fn category_stats(&self) -> Result<Vec<CategoryStats>, StoreError>;
}

/// Parameters for one redeem attempt.
#[derive(Debug, Clone)]
pub struct RedeemRequest {
    /// Requested reward category.
    pub category: Category,
    /// Redeeming player.
    pub player: PlayerId,
    /// Raw caller-supplied correlation token; the coordinator truncates it.
    pub correlation_id: Option<String>,
}

/// Successful outcome of a redeem attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedeemReceipt {
    /// The issued code's id.
    pub code_id: CodeId,
    /// The issued code's value.
    pub code: String,
    /// Category the code belongs to.
    pub category: Category,
    /// `true` when this is an idempotent replay of an earlier allocation.
    pub replayed: bool,
    /// When the code was consumed.
    pub redeemed_at: DateTime<Utc>,
}

/// Driving port: the redeem use-case consumed by inbound adapters.
#[async_trait]
pub trait RedeemCommand: Send + Sync {
    /// Redeem a code for `(player, category)`, idempotently.
    ///
    /// Out-of-stock, transient store failures, and deadline expiry surface
    /// as [`Error`] values with the corresponding [`super::ErrorCode`].
    async fn redeem(&self, request: RedeemRequest) -> Result<RedeemReceipt, Error>;
}

/// Driving port: read accessors consumed by inbound adapters.
#[async_trait]
pub trait InventoryQuery: Send + Sync {
    /// Code metadata plus redemption record if consumed.
    async fn code_status(
        &self,
        value: &str,
        category: Option<Category>,
    ) -> Result<CodeStatus, Error>;

    /// The code the next allocation would hand out, without consuming it.
    async fn peek_next(&self, category: Category) -> Result<NextAvailable, Error>;

    /// Remaining/used counts for every member of the category enumeration.
    async fn stats(&self) -> Result<Vec<CategoryStats>, Error>;
}
