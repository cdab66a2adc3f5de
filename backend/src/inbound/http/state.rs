//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{InventoryQuery, RedeemCommand};
use crate::inbound::http::auth::ApiCredential;

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub redeem: Arc<dyn RedeemCommand>,
    pub inventory: Arc<dyn InventoryQuery>,
    pub credential: ApiCredential,
}

impl HttpState {
    /// Bundle the driving ports with the caller credential.
    pub fn new(
        redeem: Arc<dyn RedeemCommand>,
        inventory: Arc<dyn InventoryQuery>,
        credential: ApiCredential,
    ) -> Self {
        Self {
            redeem,
            inventory,
            credential,
        }
    }
}
