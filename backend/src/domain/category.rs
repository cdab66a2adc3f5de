//! Closed enumeration of reward categories.
//!
//! Categories are a sum type rather than a free string so an invalid category
//! cannot reach the coordinator: parsing happens once at the HTTP boundary
//! and everything past it carries a [`Category`] value.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Reward category a code belongs to.
///
/// Wire and database form is the upper-case name (`CASHBACK`, `COINS`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Category {
    /// Cashback reward codes.
    Cashback,
    /// In-game coin reward codes.
    Coins,
}

impl Category {
    /// Every member of the closed enumeration, in a stable order.
    pub const ALL: [Self; 2] = [Self::Cashback, Self::Coins];

    /// Canonical wire/database representation.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Cashback => "CASHBACK",
            Self::Coins => "COINS",
        }
    }

    /// Comma-separated accepted values, used in validation error messages.
    #[must_use]
    pub fn accepted_values() -> String {
        Self::ALL
            .iter()
            .map(|category| category.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string is not a member of the enumeration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown category `{value}`; accepted values are {accepted}")]
pub struct CategoryParseError {
    /// The rejected input.
    pub value: String,
    /// Comma-separated accepted values.
    pub accepted: String,
}

impl FromStr for Category {
    type Err = CategoryParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "CASHBACK" => Ok(Self::Cashback),
            "COINS" => Ok(Self::Coins),
            other => Err(CategoryParseError {
                value: other.to_owned(),
                accepted: Self::accepted_values(),
            }),
        }
    }
}
