//! Redemption codes and per-category aggregate counts.

use chrono::{DateTime, Utc};

use super::Category;

/// Identifier of a pooled code.
///
/// Ids are assigned strictly increasing at seed time and define the FIFO
/// allocation order within a category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CodeId(i64);

impl CodeId {
    /// Wrap a raw identifier.
    #[must_use]
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    /// The raw identifier.
    #[must_use]
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for CodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single pooled redemption code.
///
/// ## Invariants
/// - `consumed_at` is `None` iff no [`super::RedemptionRecord`] references
///   this code; it transitions to `Some` exactly once and never reverts.
/// - `category` and `value` are immutable after seeding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Code {
    /// FIFO ordinal, unique across the pool.
    pub id: CodeId,
    /// Category the code belongs to.
    pub category: Category,
    /// Opaque redemption string handed to the player.
    pub value: String,
    /// Seed timestamp.
    pub created_at: DateTime<Utc>,
    /// Consumption timestamp; `None` while the code is still available.
    pub consumed_at: Option<DateTime<Utc>>,
}

impl Code {
    /// Whether the code can still be allocated.
    #[must_use]
    pub const fn is_available(&self) -> bool {
        self.consumed_at.is_none()
    }
}

/// Aggregate inventory counts for one category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoryStats {
    /// Category the counts describe.
    pub category: Category,
    /// Codes still available for allocation.
    pub remaining: u64,
    /// Codes already consumed.
    pub used: u64,
}
