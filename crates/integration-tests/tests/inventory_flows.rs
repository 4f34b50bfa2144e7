//! Database tests for stocking, buying and returning.
//!
//! These tests require a scratch `PostgreSQL` database named by
//! `PANTRY_TEST_DATABASE_URL`. Migrations are applied on connect.
//!
//! Run with: cargo test -p pantry-integration-tests -- --ignored

#![allow(clippy::unwrap_used)]

use pantry_core::{IngestOutcome, ItemName, LogAction, ShopperName, TransferOutcome};
use pantry_integration_tests::{test_pool, unique_item, unique_name, unique_shopper};
use pantry_web::db::{
    ActionLogRepository, CartCleanup, CartRepository, InventoryRepository, TransferRepository,
};
use sqlx::PgPool;

async fn stock_of(pool: &PgPool, item: &ItemName) -> Option<i32> {
    InventoryRepository::new(pool)
        .get(item)
        .await
        .unwrap()
        .map(|row| row.quantity)
}

async fn cart_quantity(pool: &PgPool, shopper: &ShopperName, item: &ItemName) -> Option<i32> {
    CartRepository::new(pool)
        .list_for_shopper(shopper)
        .await
        .unwrap()
        .into_iter()
        .find(|line| &line.item == item)
        .map(|line| line.quantity)
}

/// Log actions recorded for `item`, oldest first.
async fn log_for(pool: &PgPool, item: &ItemName) -> Vec<(LogAction, Option<ShopperName>)> {
    let mut entries: Vec<_> = ActionLogRepository::new(pool)
        .list(None)
        .await
        .unwrap()
        .into_iter()
        .filter(|entry| &entry.item == item)
        .map(|entry| (entry.action, entry.shopper))
        .collect();
    entries.reverse();
    entries
}

/// Stock plus units in every cart.
async fn total_units(pool: &PgPool, item: &ItemName) -> i64 {
    let stock = i64::from(stock_of(pool, item).await.unwrap_or(0));
    stock + CartRepository::new(pool).units_in_carts(item).await.unwrap()
}

// =============================================================================
// Ingestion
// =============================================================================

#[tokio::test]
#[ignore = "Requires PANTRY_TEST_DATABASE_URL"]
async fn test_ingest_adds_and_logs_each_entry() {
    let pool = test_pool().await;
    let apple = unique_item("apple");
    let milk = unique_item("milk");

    let report = InventoryRepository::new(&pool)
        .ingest([apple.as_str(), "", milk.as_str(), "   ", apple.as_str()])
        .await
        .unwrap();

    let added: Vec<_> = report.added().cloned().collect();
    assert_eq!(added, vec![apple.clone(), milk.clone(), apple.clone()]);
    assert_eq!(report.skipped().count(), 0);

    assert_eq!(stock_of(&pool, &apple).await, Some(2));
    assert_eq!(stock_of(&pool, &milk).await, Some(1));
    assert_eq!(
        log_for(&pool, &apple).await,
        vec![(LogAction::Added, None), (LogAction::Added, None)]
    );
}

#[tokio::test]
#[ignore = "Requires PANTRY_TEST_DATABASE_URL"]
async fn test_ingest_uses_first_five_entries_only() {
    let pool = test_pool().await;
    let items: Vec<ItemName> = (0..6).map(|_| unique_item("bulk")).collect();

    let report = InventoryRepository::new(&pool)
        .ingest(items.iter().map(ItemName::as_str))
        .await
        .unwrap();

    assert_eq!(report.added().count(), 5);
    assert_eq!(stock_of(&pool, items.last().unwrap()).await, None);
}

#[tokio::test]
#[ignore = "Requires PANTRY_TEST_DATABASE_URL"]
async fn test_ingest_skips_invalid_entry_and_keeps_the_rest() {
    let pool = test_pool().await;
    let bread = unique_item("bread");
    let too_long = "x".repeat(ItemName::MAX_LENGTH + 1);

    let report = InventoryRepository::new(&pool)
        .ingest([too_long.as_str(), bread.as_str()])
        .await
        .unwrap();

    assert!(matches!(
        report.outcomes(),
        [IngestOutcome::Skipped { .. }, IngestOutcome::Added { .. }]
    ));
    assert_eq!(stock_of(&pool, &bread).await, Some(1));
}

/// Prefix of item names the database refuses, see `install_rejecting_trigger`.
const REJECTED_PREFIX: &str = "rejected-by-trigger";

/// Make the inventory table refuse any item named with [`REJECTED_PREFIX`].
async fn install_rejecting_trigger(pool: &PgPool) {
    sqlx::query(&format!(
        r"
        CREATE OR REPLACE FUNCTION pantry.reject_marked_items() RETURNS trigger AS $$
        BEGIN
            IF NEW.item LIKE '{REJECTED_PREFIX}%' THEN
                RAISE EXCEPTION 'item % is refused', NEW.item;
            END IF;
            RETURN NEW;
        END;
        $$ LANGUAGE plpgsql
        "
    ))
    .execute(pool)
    .await
    .unwrap();

    sqlx::query("DROP TRIGGER IF EXISTS reject_marked_items ON pantry.grocery_inventory")
        .execute(pool)
        .await
        .unwrap();

    sqlx::query(
        r"
        CREATE TRIGGER reject_marked_items
        BEFORE INSERT OR UPDATE ON pantry.grocery_inventory
        FOR EACH ROW EXECUTE FUNCTION pantry.reject_marked_items()
        ",
    )
    .execute(pool)
    .await
    .unwrap();
}

#[tokio::test]
#[ignore = "Requires PANTRY_TEST_DATABASE_URL"]
async fn test_ingest_skips_database_rejection_and_keeps_the_rest() {
    let pool = test_pool().await;
    install_rejecting_trigger(&pool).await;

    let first = unique_item("first");
    let refused = unique_item(REJECTED_PREFIX);
    let last = unique_item("last");

    let report = InventoryRepository::new(&pool)
        .ingest([first.as_str(), refused.as_str(), last.as_str()])
        .await
        .unwrap();

    match report.outcomes() {
        [
            IngestOutcome::Added { item: added_first },
            IngestOutcome::Skipped { input, .. },
            IngestOutcome::Added { item: added_last },
        ] => {
            assert_eq!(added_first, &first);
            assert_eq!(input, refused.as_str());
            assert_eq!(added_last, &last);
        }
        other => panic!("unexpected outcomes: {other:?}"),
    }

    assert_eq!(stock_of(&pool, &first).await, Some(1));
    assert_eq!(stock_of(&pool, &refused).await, None);
    assert_eq!(stock_of(&pool, &last).await, Some(1));
    assert!(log_for(&pool, &refused).await.is_empty());
    assert_eq!(log_for(&pool, &last).await, vec![(LogAction::Added, None)]);
}

#[tokio::test]
#[ignore = "Requires PANTRY_TEST_DATABASE_URL"]
async fn test_readding_zero_stock_item_restocks_it() {
    let pool = test_pool().await;
    let item = unique_item("yogurt");
    let shopper = unique_shopper("sam");
    let inventory = InventoryRepository::new(&pool);
    let transfers = TransferRepository::new(&pool, CartCleanup::Line);

    inventory.ingest([item.as_str()]).await.unwrap();
    transfers.buy(&shopper, &item).await.unwrap();
    assert_eq!(stock_of(&pool, &item).await, Some(0));

    inventory.ingest([item.as_str()]).await.unwrap();
    inventory.ingest([item.as_str()]).await.unwrap();
    assert_eq!(stock_of(&pool, &item).await, Some(2));
}

// =============================================================================
// Buy and return
// =============================================================================

#[tokio::test]
#[ignore = "Requires PANTRY_TEST_DATABASE_URL"]
async fn test_buy_then_return_round_trip() {
    let pool = test_pool().await;
    let item = unique_item("apple");
    let alice = unique_shopper("alice");
    let transfers = TransferRepository::new(&pool, CartCleanup::Line);

    InventoryRepository::new(&pool)
        .ingest([item.as_str(), item.as_str()])
        .await
        .unwrap();

    assert_eq!(
        transfers.buy(&alice, &item).await.unwrap(),
        TransferOutcome::Bought
    );
    assert_eq!(stock_of(&pool, &item).await, Some(1));
    assert_eq!(cart_quantity(&pool, &alice, &item).await, Some(1));

    assert_eq!(
        transfers.return_item(&alice, &item).await.unwrap(),
        TransferOutcome::Returned
    );
    assert_eq!(stock_of(&pool, &item).await, Some(2));
    assert_eq!(cart_quantity(&pool, &alice, &item).await, None);

    assert_eq!(
        log_for(&pool, &item).await,
        vec![
            (LogAction::Added, None),
            (LogAction::Added, None),
            (LogAction::Sold, Some(alice.clone())),
            (LogAction::Returned, Some(alice)),
        ]
    );
}

#[tokio::test]
#[ignore = "Requires PANTRY_TEST_DATABASE_URL"]
async fn test_buy_out_of_stock_changes_nothing() {
    let pool = test_pool().await;
    let item = unique_item("milk");
    let alice = unique_shopper("alice");
    let bob = unique_shopper("bob");
    let transfers = TransferRepository::new(&pool, CartCleanup::Line);

    InventoryRepository::new(&pool)
        .ingest([item.as_str()])
        .await
        .unwrap();
    transfers.buy(&alice, &item).await.unwrap();

    assert_eq!(
        transfers.buy(&bob, &item).await.unwrap(),
        TransferOutcome::OutOfStock
    );
    assert_eq!(stock_of(&pool, &item).await, Some(0));
    assert_eq!(cart_quantity(&pool, &bob, &item).await, None);
    assert_eq!(log_for(&pool, &item).await.len(), 2);
}

#[tokio::test]
#[ignore = "Requires PANTRY_TEST_DATABASE_URL"]
async fn test_buy_unknown_item_is_out_of_stock() {
    let pool = test_pool().await;
    let item = unique_item("ghost");
    let alice = unique_shopper("alice");

    let outcome = TransferRepository::new(&pool, CartCleanup::Line)
        .buy(&alice, &item)
        .await
        .unwrap();

    assert_eq!(outcome, TransferOutcome::OutOfStock);
    assert_eq!(stock_of(&pool, &item).await, None);
    assert!(log_for(&pool, &item).await.is_empty());
}

#[tokio::test]
#[ignore = "Requires PANTRY_TEST_DATABASE_URL"]
async fn test_return_without_holding_changes_nothing() {
    let pool = test_pool().await;
    let item = unique_item("bread");
    let alice = unique_shopper("alice");
    let bob = unique_shopper("bob");
    let transfers = TransferRepository::new(&pool, CartCleanup::Line);

    InventoryRepository::new(&pool)
        .ingest([item.as_str()])
        .await
        .unwrap();
    transfers.buy(&alice, &item).await.unwrap();

    assert_eq!(
        transfers.return_item(&bob, &item).await.unwrap(),
        TransferOutcome::NothingToReturn
    );
    assert_eq!(stock_of(&pool, &item).await, Some(0));
    assert_eq!(cart_quantity(&pool, &alice, &item).await, Some(1));
    assert_eq!(log_for(&pool, &item).await.len(), 2);
}

#[tokio::test]
#[ignore = "Requires PANTRY_TEST_DATABASE_URL"]
async fn test_partial_return_keeps_cart_line() {
    let pool = test_pool().await;
    let item = unique_item("egg");
    let alice = unique_shopper("alice");
    let transfers = TransferRepository::new(&pool, CartCleanup::Line);

    InventoryRepository::new(&pool)
        .ingest([item.as_str(), item.as_str(), item.as_str()])
        .await
        .unwrap();
    for _ in 0..3 {
        transfers.buy(&alice, &item).await.unwrap();
    }
    transfers.return_item(&alice, &item).await.unwrap();

    assert_eq!(stock_of(&pool, &item).await, Some(1));
    assert_eq!(cart_quantity(&pool, &alice, &item).await, Some(2));
}

#[tokio::test]
#[ignore = "Requires PANTRY_TEST_DATABASE_URL"]
async fn test_units_are_conserved_and_never_negative() {
    let pool = test_pool().await;
    let item = unique_item("pear");
    let shoppers = [unique_shopper("a"), unique_shopper("b")];
    let transfers = TransferRepository::new(&pool, CartCleanup::Line);

    InventoryRepository::new(&pool)
        .ingest([item.as_str(), item.as_str(), item.as_str()])
        .await
        .unwrap();

    // Buys past the stock and returns past the cart must both be refused
    let [a, b] = &shoppers;
    let steps = [
        (a, true),
        (b, true),
        (a, true),
        (b, true),
        (b, false),
        (b, false),
        (b, false),
        (a, false),
    ];
    for (shopper, buying) in steps {
        if buying {
            transfers.buy(shopper, &item).await.unwrap();
        } else {
            transfers.return_item(shopper, &item).await.unwrap();
        }

        assert_eq!(total_units(&pool, &item).await, 3);
        assert!(stock_of(&pool, &item).await.unwrap() >= 0);
        for shopper in &shoppers {
            assert!(cart_quantity(&pool, shopper, &item).await.unwrap_or(0) >= 0);
        }
    }

    let sold = log_for(&pool, &item)
        .await
        .into_iter()
        .filter(|(action, _)| *action == LogAction::Sold)
        .count();
    assert_eq!(sold, 3);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
#[ignore = "Requires PANTRY_TEST_DATABASE_URL"]
async fn test_concurrent_buys_of_last_unit() {
    let pool = test_pool().await;
    let item = unique_item("last");

    InventoryRepository::new(&pool)
        .ingest([item.as_str()])
        .await
        .unwrap();

    let mut handles = Vec::new();
    for _ in 0..8 {
        let pool = pool.clone();
        let item = item.clone();
        let shopper = unique_shopper("racer");
        handles.push(tokio::spawn(async move {
            TransferRepository::new(&pool, CartCleanup::Line)
                .buy(&shopper, &item)
                .await
                .unwrap()
        }));
    }

    let mut bought = 0;
    for handle in handles {
        if handle.await.unwrap() == TransferOutcome::Bought {
            bought += 1;
        }
    }

    assert_eq!(bought, 1);
    assert_eq!(stock_of(&pool, &item).await, Some(0));
    assert_eq!(total_units(&pool, &item).await, 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
#[ignore = "Requires PANTRY_TEST_DATABASE_URL"]
async fn test_interleaved_buys_and_returns_on_one_line() {
    let pool = test_pool().await;
    let item = unique_item("busy");
    let shopper = unique_shopper("juggler");
    let transfers = TransferRepository::new(&pool, CartCleanup::Line);

    let units: Vec<&str> = vec![item.as_str(); 20];
    for batch in units.chunks(5) {
        InventoryRepository::new(&pool).ingest(batch).await.unwrap();
    }
    for _ in 0..20 {
        transfers.buy(&shopper, &item).await.unwrap();
    }

    let mut handles = Vec::new();
    for n in 0..40 {
        let pool = pool.clone();
        let item = item.clone();
        let shopper = shopper.clone();
        handles.push(tokio::spawn(async move {
            let transfers = TransferRepository::new(&pool, CartCleanup::Line);
            if n % 2 == 0 {
                transfers.buy(&shopper, &item).await
            } else {
                transfers.return_item(&shopper, &item).await
            }
        }));
    }

    for handle in handles {
        let result = handle.await.unwrap();
        assert!(result.is_ok(), "transfer failed: {result:?}");
    }

    assert_eq!(total_units(&pool, &item).await, 20);
    assert!(stock_of(&pool, &item).await.unwrap() >= 0);
}

// =============================================================================
// Cart cleanup
// =============================================================================

async fn insert_zero_line(pool: &PgPool, shopper: &ShopperName, item: &ItemName) {
    sqlx::query(
        "INSERT INTO pantry.shopper_cart (shopper_name, item, quantity) VALUES ($1, $2, 0)",
    )
    .bind(shopper)
    .bind(item)
    .execute(pool)
    .await
    .unwrap();
}

/// Both cleanup modes in one test: a global cleanup would otherwise remove
/// the stray line another test depends on.
#[tokio::test]
#[ignore = "Requires PANTRY_TEST_DATABASE_URL"]
async fn test_cart_cleanup_scopes() {
    let pool = test_pool().await;
    let item = unique_item("plum");
    let shopper = unique_shopper("cleaner");
    let stray_shopper = unique_shopper("stray");
    let stray_item = unique_item("stray");

    InventoryRepository::new(&pool)
        .ingest([item.as_str()])
        .await
        .unwrap();

    // Line scope leaves other empty lines alone
    insert_zero_line(&pool, &stray_shopper, &stray_item).await;
    let line = TransferRepository::new(&pool, CartCleanup::Line);
    line.buy(&shopper, &item).await.unwrap();
    line.return_item(&shopper, &item).await.unwrap();
    assert_eq!(cart_quantity(&pool, &shopper, &item).await, None);
    assert_eq!(cart_quantity(&pool, &stray_shopper, &stray_item).await, Some(0));

    // Global scope sweeps every empty line
    let global = TransferRepository::new(&pool, CartCleanup::Global);
    global.buy(&shopper, &item).await.unwrap();
    global.return_item(&shopper, &item).await.unwrap();
    assert_eq!(cart_quantity(&pool, &shopper, &item).await, None);
    assert_eq!(cart_quantity(&pool, &stray_shopper, &stray_item).await, None);
}

#[tokio::test]
#[ignore = "Requires PANTRY_TEST_DATABASE_URL"]
async fn test_names_are_case_sensitive() {
    let pool = test_pool().await;
    let lower = ItemName::parse(&unique_name("kiwi")).unwrap();
    let upper = ItemName::parse(&lower.as_str().to_uppercase()).unwrap();

    InventoryRepository::new(&pool)
        .ingest([lower.as_str(), upper.as_str()])
        .await
        .unwrap();

    assert_eq!(stock_of(&pool, &lower).await, Some(1));
    assert_eq!(stock_of(&pool, &upper).await, Some(1));
}
