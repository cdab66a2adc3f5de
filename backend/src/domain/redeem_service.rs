//! The redemption coordinator: the one use-case with real correctness risk.
//!
//! The store adapter owns atomicity (the whole lookup-allocate-record unit
//! runs inside one transaction); the coordinator owns everything around it:
//! correlation-id bounding, the invocation deadline, outcome shaping, and
//! the classification of store failures into retryable and non-retryable
//! errors. It never swallows a failure into a false success.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{error, info, warn};

use super::ports::{
    AllocationOutcome, IssuedCode, RedeemCommand, RedeemReceipt, RedeemRequest, RedemptionStore,
    StoreError,
};
use super::{Category, CorrelationId, Error, PlayerId};

/// Default bound on one redeem invocation, end to end.
pub const DEFAULT_DEADLINE: Duration = Duration::from_secs(10);

/// Coordinator implementing [`RedeemCommand`] over a [`RedemptionStore`].
#[derive(Clone)]
pub struct RedemptionCoordinator<S> {
    store: Arc<S>,
    deadline: Duration,
}

impl<S> RedemptionCoordinator<S> {
    /// Create a coordinator with the default deadline.
    pub fn new(store: Arc<S>) -> Self {
        Self {
            store,
            deadline: DEFAULT_DEADLINE,
        }
    }

    /// Override the invocation deadline.
    #[must_use]
    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = deadline;
        self
    }
}

fn classify_store_error(error: StoreError, category: Category, player: PlayerId) -> Error {
    match error {
        StoreError::Connection { message } => {
            warn!(%category, %player, %message, "store unreachable during redeem");
            Error::service_unavailable("inventory store is unavailable; retry with backoff")
        }
        StoreError::Timeout { message } => {
            warn!(%category, %player, %message, "store timed out during redeem");
            Error::gateway_timeout("redeem timed out; retry with backoff")
        }
        StoreError::Conflict { message } => {
            warn!(%category, %player, %message, "lost a race at the uniqueness backstop");
            Error::conflict("a concurrent redemption won the race; retry the request")
        }
        StoreError::Query { message } => {
            error!(%category, %player, %message, "store failure during redeem");
            Error::internal("redeem failed")
        }
    }
}

fn receipt(issued: IssuedCode, category: Category, replayed: bool) -> RedeemReceipt {
    RedeemReceipt {
        code_id: issued.code_id,
        code: issued.value,
        category,
        replayed,
        redeemed_at: issued.redeemed_at,
    }
}

#[async_trait]
impl<S> RedeemCommand for RedemptionCoordinator<S>
where
    S: RedemptionStore,
{
    async fn redeem(&self, request: RedeemRequest) -> Result<RedeemReceipt, Error> {
        let RedeemRequest {
            category,
            player,
            correlation_id,
        } = request;
        let correlation_id = correlation_id.map(CorrelationId::truncated);

        let attempt = self.store.redeem(category, player, correlation_id);
        let outcome = match tokio::time::timeout(self.deadline, attempt).await {
            Ok(result) => result.map_err(|err| classify_store_error(err, category, player))?,
            Err(_) => {
                // Dropping the in-flight future abandons the transaction,
                // which rolls back without partial mutation.
                warn!(
                    %category,
                    %player,
                    deadline_ms = self.deadline.as_millis() as u64,
                    "redeem exceeded its deadline"
                );
                return Err(Error::gateway_timeout(
                    "redeem exceeded its deadline; retry with backoff",
                ));
            }
        };

        match outcome {
            AllocationOutcome::Allocated(issued) => {
                info!(%category, %player, code_id = %issued.code_id, "code allocated");
                Ok(receipt(issued, category, false))
            }
            AllocationOutcome::AlreadyRedeemed(issued) => {
                info!(%category, %player, code_id = %issued.code_id, "redemption replayed");
                Ok(receipt(issued, category, true))
            }
            AllocationOutcome::OutOfStock => {
                warn!(%category, %player, "category out of stock");
                Err(Error::out_of_stock(format!(
                    "no {category} codes remain and the player has no prior redemption"
                )))
            }
        }
    }
}

#[cfg(test)]
#[path = "redeem_service_tests.rs"]
mod tests;
