//! Ledger-side primitives: player identity, correlation metadata, and the
//! append-only redemption record.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::{Category, CodeId};

/// Non-negative player identifier.
///
/// The service models the strict idempotent variant: every redemption is
/// keyed by `(player, category)`, so a player identity is always required.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PlayerId(i64);

/// Validation error returned when constructing [`PlayerId`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum PlayerIdError {
    /// The identifier was negative.
    #[error("player id must be a non-negative integer")]
    Negative,
}

impl PlayerId {
    /// Validate and wrap a raw identifier.
    ///
    /// # Errors
    ///
    /// Returns [`PlayerIdError::Negative`] for negative inputs.
    pub const fn new(id: i64) -> Result<Self, PlayerIdError> {
        if id < 0 {
            return Err(PlayerIdError::Negative);
        }
        Ok(Self(id))
    }

    /// The raw identifier.
    #[must_use]
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Caller-supplied opaque tracing token, bounded to 128 characters.
///
/// Used for external correlation only; correctness never depends on it. The
/// bound prevents unbounded ledger growth from hostile or buggy callers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorrelationId(String);

impl CorrelationId {
    /// Maximum stored length in characters.
    pub const MAX_LEN: usize = 128;

    /// Build a correlation id, truncating the input to [`Self::MAX_LEN`]
    /// characters.
    #[must_use]
    pub fn truncated(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        if raw.chars().count() <= Self::MAX_LEN {
            Self(raw)
        } else {
            Self(raw.chars().take(Self::MAX_LEN).collect())
        }
    }

    /// Borrow the stored token.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl std::fmt::Display for CorrelationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Append-only record of one consumed code.
///
/// Exactly one record may reference a given code. Records are created only
/// by the coordinator's atomic unit and are never mutated or deleted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedemptionRecord {
    /// Record identifier, assigned at creation.
    pub id: Uuid,
    /// The consumed code (1:1).
    pub code_id: CodeId,
    /// Redeeming player.
    pub player_id: PlayerId,
    /// Denormalised copy of the code's category so the idempotency key
    /// `(player_id, category)` can be queried without a join.
    pub category: Category,
    /// Optional caller-supplied tracing token.
    pub correlation_id: Option<CorrelationId>,
    /// Creation timestamp, immutable.
    pub redeemed_at: DateTime<Utc>,
}
