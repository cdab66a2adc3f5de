//! Tests for the inventory read service.

use std::sync::Arc;

use chrono::Utc;

use super::*;
use crate::domain::ports::MockInventoryReader;
use crate::domain::{Code, CodeId, ErrorCode};

fn available_code(id: i64, category: Category, value: &str) -> Code {
    Code {
        id: CodeId::new(id),
        category,
        value: value.to_owned(),
        created_at: Utc::now(),
        consumed_at: None,
    }
}

#[tokio::test]
async fn code_status_returns_join_result() {
    let mut reader = MockInventoryReader::new();
    reader.expect_find_code().times(1).returning(|value, _| {
        Ok(Some(CodeStatus {
            code: available_code(1, Category::Coins, value),
            redemption: None,
        }))
    });

    let service = InventoryReadService::new(Arc::new(reader));
    let status = service
        .code_status("A1", Some(Category::Coins))
        .await
        .expect("found");

    assert_eq!(status.code.value, "A1");
    assert!(status.redemption.is_none());
}

#[tokio::test]
async fn missing_code_maps_to_not_found() {
    let mut reader = MockInventoryReader::new();
    reader.expect_find_code().times(1).returning(|_, _| Ok(None));

    let service = InventoryReadService::new(Arc::new(reader));
    let error = service
        .code_status("missing", None)
        .await
        .expect_err("not found");

    assert_eq!(error.code(), ErrorCode::NotFound);
}

#[tokio::test]
async fn peek_on_empty_category_maps_to_out_of_stock() {
    let mut reader = MockInventoryReader::new();
    reader
        .expect_next_available()
        .times(1)
        .returning(|_| Ok(None));

    let service = InventoryReadService::new(Arc::new(reader));
    let error = service
        .peek_next(Category::Cashback)
        .await
        .expect_err("empty");

    assert_eq!(error.code(), ErrorCode::OutOfStock);
    assert!(error.message().contains("CASHBACK"));
}

#[tokio::test]
async fn peek_returns_candidate_without_consuming() {
    let mut reader = MockInventoryReader::new();
    reader.expect_next_available().times(1).returning(|_| {
        Ok(Some(NextAvailable {
            code_id: CodeId::new(3),
            value: "B3".to_owned(),
        }))
    });

    let service = InventoryReadService::new(Arc::new(reader));
    let next = service.peek_next(Category::Coins).await.expect("candidate");

    assert_eq!(next.code_id, CodeId::new(3));
    assert_eq!(next.value, "B3");
}

#[tokio::test]
async fn reader_connection_failure_maps_to_service_unavailable() {
    let mut reader = MockInventoryReader::new();
    reader
        .expect_category_stats()
        .times(1)
        .returning(|| Err(StoreError::connection("pool checkout failed")));

    let service = InventoryReadService::new(Arc::new(reader));
    let error = service.stats().await.expect_err("unavailable");

    assert_eq!(error.code(), ErrorCode::ServiceUnavailable);
}

#[tokio::test]
async fn stats_pass_through() {
    let mut reader = MockInventoryReader::new();
    reader.expect_category_stats().times(1).returning(|| {
        Ok(vec![
            CategoryStats {
                category: Category::Cashback,
                remaining: 0,
                used: 0,
            },
            CategoryStats {
                category: Category::Coins,
                remaining: 1,
                used: 2,
            },
        ])
    });

    let service = InventoryReadService::new(Arc::new(reader));
    let stats = service.stats().await.expect("stats");

    assert_eq!(stats.len(), 2);
    let coins = stats
        .iter()
        .find(|entry| entry.category == Category::Coins)
        .expect("coins entry");
    assert_eq!((coins.remaining, coins.used), (1, 2));
}
