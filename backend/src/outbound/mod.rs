//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! Adapters are thin translators that convert between domain types and
//! infrastructure-specific representations. They contain no business logic;
//! in particular the atomicity guarantees of the redeem unit live in the
//! database transaction, not in adapter code paths.

pub mod persistence;
