//! Concurrency properties of the redemption coordinator over the in-memory
//! store: exactly-once allocation under racing callers, FIFO issue order,
//! and idempotent convergence for a single player.

use std::collections::HashSet;
use std::sync::Arc;

use redeemd::domain::ports::{RedeemCommand, RedeemRequest};
use redeemd::domain::ports::memory::MemoryRedemptionStore;
use redeemd::domain::{Category, ErrorCode, PlayerId, RedemptionCoordinator};

fn request(player_id: i64) -> RedeemRequest {
    RedeemRequest {
        category: Category::Coins,
        player: PlayerId::new(player_id).expect("non-negative"),
        correlation_id: None,
    }
}

fn coordinator(store: Arc<MemoryRedemptionStore>) -> Arc<RedemptionCoordinator<MemoryRedemptionStore>> {
    Arc::new(RedemptionCoordinator::new(store))
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn one_code_many_players_allocates_exactly_once() {
    let store = Arc::new(MemoryRedemptionStore::new());
    store.seed_code(1, Category::Coins, "ONLY");
    let coordinator = coordinator(store);

    let mut handles = Vec::new();
    for player_id in 0..16 {
        let coordinator = Arc::clone(&coordinator);
        handles.push(tokio::spawn(async move {
            coordinator.redeem(request(player_id)).await
        }));
    }

    let mut winners = 0;
    let mut losers = 0;
    for handle in handles {
        match handle.await.expect("task completed") {
            Ok(receipt) => {
                assert_eq!(receipt.code, "ONLY");
                assert!(!receipt.replayed);
                winners += 1;
            }
            Err(error) => {
                assert_eq!(error.code(), ErrorCode::OutOfStock);
                losers += 1;
            }
        }
    }

    assert_eq!(winners, 1);
    assert_eq!(losers, 15);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn n_codes_n_players_each_get_a_distinct_code() {
    let store = Arc::new(MemoryRedemptionStore::new());
    for id in 1..=8 {
        store.seed_code(id, Category::Coins, format!("C{id}"));
    }
    let coordinator = coordinator(store);

    let mut handles = Vec::new();
    for player_id in 0..8 {
        let coordinator = Arc::clone(&coordinator);
        handles.push(tokio::spawn(async move {
            coordinator.redeem(request(player_id)).await
        }));
    }

    let mut issued = HashSet::new();
    for handle in handles {
        let receipt = handle.await.expect("task completed").expect("allocated");
        assert!(issued.insert(receipt.code), "code issued twice");
    }
    assert_eq!(issued.len(), 8);

    // The pool is now empty for a ninth player.
    let error = coordinator.redeem(request(99)).await.expect_err("empty");
    assert_eq!(error.code(), ErrorCode::OutOfStock);
}

#[tokio::test]
async fn sequential_players_receive_codes_in_fifo_order() {
    let store = Arc::new(MemoryRedemptionStore::new());
    for id in [3, 1, 2] {
        store.seed_code(id, Category::Coins, format!("C{id}"));
    }
    let coordinator = coordinator(store);

    for (player_id, expected) in [(1, "C1"), (2, "C2"), (3, "C3")] {
        let receipt = coordinator
            .redeem(request(player_id))
            .await
            .expect("allocated");
        assert_eq!(receipt.code, expected);
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn one_player_racing_itself_converges_on_one_code() {
    let store = Arc::new(MemoryRedemptionStore::new());
    for id in 1..=4 {
        store.seed_code(id, Category::Coins, format!("C{id}"));
    }
    let coordinator = coordinator(Arc::clone(&store));

    let mut handles = Vec::new();
    for _ in 0..8 {
        let coordinator = Arc::clone(&coordinator);
        handles.push(tokio::spawn(
            async move { coordinator.redeem(request(7)).await },
        ));
    }

    let mut codes = HashSet::new();
    let mut fresh = 0;
    for handle in handles {
        let receipt = handle.await.expect("task completed").expect("allocated");
        codes.insert(receipt.code);
        if !receipt.replayed {
            fresh += 1;
        }
    }

    // Every response is the same code and only one call allocated it.
    assert_eq!(codes.len(), 1);
    assert_eq!(fresh, 1);

    let stats = redeemd::domain::ports::InventoryReader::category_stats(store.as_ref())
        .await
        .expect("stats");
    let coins = stats
        .iter()
        .find(|entry| entry.category == Category::Coins)
        .expect("coins entry");
    assert_eq!((coins.remaining, coins.used), (3, 1));
}
