//! Integration tests for the decode → aggregate → merge → query pipeline,
//! exercised directly against the store without the HTTP layer

use orderfile::prelude::*;

fn build_line(
    customer_id: u64,
    customer_name: &str,
    order_id: u64,
    product_id: u64,
    value: &str,
    date: &str,
) -> String {
    format!(
        "{:010}{:<45}{:010}{:010}{:0>12}{}",
        customer_id, customer_name, order_id, product_id, value, date
    )
}

fn fixture_file() -> String {
    [
        build_line(2, "Medeiros", 12345, 111, "000000256.24", "20201201"),
        build_line(1, "Zarelli", 123, 111, "000000512.24", "20211201"),
        build_line(1, "Zarelli", 123, 122, "000000512.24", "20211201"),
        build_line(2, "Medeiros", 12345, 122, "000000256.24", "20201201"),
    ]
    .join("\n")
}

async fn ingest(store: &InMemoryOrderStore, text: &str) -> Vec<CustomerResponse> {
    let aggregate = FileAggregate::from_text(text).expect("fixture must decode");
    merge_file(store, &aggregate).await.expect("merge must succeed")
}

#[tokio::test]
async fn ingest_then_query_round_trips_the_hierarchy() {
    let store = InMemoryOrderStore::new();
    let uploaded = ingest(&store, &fixture_file()).await;
    assert_eq!(uploaded.len(), 2);

    // Query everything back: same customers, same orders, same totals.
    let queried = query_orders(&store, &OrderFilter::default()).await.unwrap();
    assert_eq!(queried.len(), 2);

    let zarelli = queried.iter().find(|c| c.user_id == 1).unwrap();
    assert_eq!(zarelli.name, "Zarelli");
    assert_eq!(zarelli.orders[0].total, "1024.48");
    assert_eq!(zarelli.orders[0].date, "2021-12-01");
    assert_eq!(zarelli.orders[0].products.len(), 2);

    let medeiros = queried.iter().find(|c| c.user_id == 2).unwrap();
    assert_eq!(medeiros.orders[0].total, "512.48");
}

#[tokio::test]
async fn query_by_order_id_after_ingestion() {
    let store = InMemoryOrderStore::new();
    ingest(&store, &fixture_file()).await;

    let filter = OrderFilter {
        order_id: Some(12345),
        ..Default::default()
    };
    let result = query_orders(&store, &filter).await.unwrap();

    assert_eq!(result.len(), 1);
    assert_eq!(result[0].user_id, 2);
    assert_eq!(result[0].orders.len(), 1);
    assert_eq!(result[0].orders[0].order_id, 12345);
}

#[tokio::test]
async fn query_by_date_range_after_ingestion() {
    let store = InMemoryOrderStore::new();
    ingest(&store, &fixture_file()).await;

    let filter = OrderFilter {
        start_date: Some("2021-01-01".parse().unwrap()),
        end_date: Some("2021-12-31".parse().unwrap()),
        ..Default::default()
    };
    let result = query_orders(&store, &filter).await.unwrap();

    assert_eq!(result.len(), 1);
    assert_eq!(result[0].user_id, 1);
    assert_eq!(result[0].orders[0].order_id, 123);
}

#[tokio::test]
async fn repeated_ingestion_leaves_the_store_unchanged() {
    let store = InMemoryOrderStore::new();
    ingest(&store, &fixture_file()).await;
    let after_first = query_orders(&store, &OrderFilter::default()).await.unwrap();

    ingest(&store, &fixture_file()).await;
    let after_second = query_orders(&store, &OrderFilter::default()).await.unwrap();

    assert_eq!(after_first, after_second);
}

#[tokio::test]
async fn a_second_file_updates_names_and_totals_in_place() {
    let store = InMemoryOrderStore::new();
    ingest(&store, &fixture_file()).await;

    // Same order, new name and value: the later file wins.
    let update = build_line(1, "Zarelli Jr", 123, 111, "000000100.00", "20220101");
    ingest(&store, &update).await;

    let filter = OrderFilter {
        order_id: Some(123),
        ..Default::default()
    };
    let result = query_orders(&store, &filter).await.unwrap();

    assert_eq!(result[0].name, "Zarelli Jr");
    assert_eq!(result[0].orders[0].total, "100.00");
    assert_eq!(result[0].orders[0].date, "2022-01-01");
}

#[tokio::test]
async fn duplicate_pairs_keep_the_documented_total_item_inconsistency() {
    let store = InMemoryOrderStore::new();
    let file = [
        build_line(1, "Zarelli", 10, 7, "000000002.50", "20210101"),
        build_line(1, "Zarelli", 10, 7, "000000004.00", "20210101"),
    ]
    .join("\n");

    // The upload response mirrors both lines...
    let uploaded = ingest(&store, &file).await;
    assert_eq!(uploaded[0].orders[0].products.len(), 2);
    assert_eq!(uploaded[0].orders[0].total, "6.50");

    // ...while a later query sees the single stored row at the last value,
    // under a total that still counts every line.
    let queried = query_orders(&store, &OrderFilter::default()).await.unwrap();
    assert_eq!(queried[0].orders[0].products.len(), 1);
    assert_eq!(queried[0].orders[0].products[0].value, "4.00");
    assert_eq!(queried[0].orders[0].total, "6.50");
}

#[tokio::test]
async fn deleting_an_order_leaves_no_orphaned_items() {
    let store = InMemoryOrderStore::new();
    ingest(&store, &fixture_file()).await;

    let mut tx = store.begin().await.unwrap();
    tx.delete_order(123).await.unwrap();
    tx.commit().await.unwrap();

    assert!(store.fetch_order(123).await.unwrap().is_none());

    // Products referenced by the deleted order survive in the catalog.
    assert!(store.find_product(111).await.unwrap().is_some());
    assert!(store.find_product(122).await.unwrap().is_some());

    // The other customer's order is untouched.
    let remaining = query_orders(&store, &OrderFilter::default()).await.unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].user_id, 2);
}
