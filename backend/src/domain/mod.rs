//! Domain primitives and services.
//!
//! Purpose: define the strongly typed entities of the redemption system and
//! the services that operate on them. Types are immutable after construction;
//! the one-time `consumed_at` transition on a code happens inside the store
//! adapters, never here.
//!
//! Public surface:
//! - [`Category`] — closed enumeration of reward categories.
//! - [`Code`] / [`CodeId`] — a pooled redemption code and its FIFO ordinal.
//! - [`PlayerId`] / [`CorrelationId`] / [`RedemptionRecord`] — the ledger side.
//! - [`Error`] / [`ErrorCode`] — transport-agnostic failure payload.
//! - [`RedemptionCoordinator`] — the transactional redeem use-case.
//! - [`InventoryReadService`] — status/peek/stats read accessors.

pub mod category;
pub mod code;
pub mod error;
pub mod inventory_service;
pub mod ports;
pub mod redeem_service;
pub mod redemption;

pub use self::category::{Category, CategoryParseError};
pub use self::code::{CategoryStats, Code, CodeId};
pub use self::error::{Error, ErrorCode};
pub use self::inventory_service::InventoryReadService;
pub use self::redeem_service::RedemptionCoordinator;
pub use self::redemption::{CorrelationId, PlayerId, PlayerIdError, RedemptionRecord};
