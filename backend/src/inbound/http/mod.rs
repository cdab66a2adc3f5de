//! HTTP inbound adapter exposing the redemption REST endpoints.

pub mod auth;
pub mod error;
pub mod health;
pub mod inventory;
pub mod redemptions;
pub mod schemas;
pub mod state;
pub mod validation;

pub use error::ApiResult;
