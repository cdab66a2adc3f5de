//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Concrete implementations of the domain store ports backed by PostgreSQL
//! via `diesel-async` with `bb8` connection pooling.
//!
//! # Architecture
//!
//! - **Thin adapters**: store implementations only translate between Diesel
//!   rows and domain types. The redeem algorithm's atomicity comes from a
//!   single database transaction, never from adapter-side sequencing.
//! - **Internal models**: Diesel row structs (`models.rs`) and schema
//!   definitions (`schema.rs`) are implementation details, never exposed to
//!   the domain layer.
//! - **Strongly typed errors**: pool and Diesel failures are mapped into
//!   [`crate::domain::ports::StoreError`] variants by cause.

mod diesel_helpers;
mod diesel_inventory_reader;
mod diesel_redemption_store;
mod models;
mod pool;
mod schema;

pub use diesel_inventory_reader::DieselInventoryReader;
pub use diesel_redemption_store::DieselRedemptionStore;
pub use pool::{DbPool, PoolConfig, PoolError};
