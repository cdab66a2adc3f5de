//! Read accessors over the inventory and ledger.
//!
//! Status, peek, and stats are simple reads with no concurrency hazard; this
//! service only translates reader results into driving-port responses and
//! classifies store failures the same way the coordinator does.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{error, warn};

use super::ports::{CodeStatus, InventoryQuery, InventoryReader, NextAvailable, StoreError};
use super::{Category, CategoryStats, Error};

/// Read service implementing [`InventoryQuery`] over an [`InventoryReader`].
#[derive(Clone)]
pub struct InventoryReadService<R> {
    reader: Arc<R>,
}

impl<R> InventoryReadService<R> {
    /// Create a read service over the given reader.
    pub fn new(reader: Arc<R>) -> Self {
        Self { reader }
    }
}

fn classify_reader_error(error: StoreError, operation: &'static str) -> Error {
    match error {
        StoreError::Connection { message } => {
            warn!(operation, %message, "store unreachable during read");
            Error::service_unavailable("inventory store is unavailable; retry with backoff")
        }
        StoreError::Timeout { message } => {
            warn!(operation, %message, "store timed out during read");
            Error::gateway_timeout(format!("{operation} timed out; retry with backoff"))
        }
        StoreError::Conflict { message } => {
            warn!(operation, %message, "concurrent write detected during read");
            Error::conflict("a concurrent redemption interfered; retry the request")
        }
        StoreError::Query { message } => {
            error!(operation, %message, "store failure during read");
            Error::internal(format!("{operation} failed"))
        }
    }
}

#[async_trait]
impl<R> InventoryQuery for InventoryReadService<R>
where
    R: InventoryReader,
{
    async fn code_status(
        &self,
        value: &str,
        category: Option<Category>,
    ) -> Result<CodeStatus, Error> {
        self.reader
            .find_code(value, category)
            .await
            .map_err(|err| classify_reader_error(err, "status lookup"))?
            .ok_or_else(|| Error::not_found("no code matches the given value"))
    }

    async fn peek_next(&self, category: Category) -> Result<NextAvailable, Error> {
        self.reader
            .next_available(category)
            .await
            .map_err(|err| classify_reader_error(err, "peek"))?
            .ok_or_else(|| Error::out_of_stock(format!("no {category} codes remain")))
    }

    async fn stats(&self) -> Result<Vec<CategoryStats>, Error> {
        self.reader
            .category_stats()
            .await
            .map_err(|err| classify_reader_error(err, "stats"))
    }
}

#[cfg(test)]
#[path = "inventory_service_tests.rs"]
mod tests;
