//! Full-system order lifecycle tests: placement, stock accounting,
//! cancellation, quantity updates, payment, and session demarcation,
//! everything driven through the running system's client handle.

use rust_decimal::Decimal;

use maitred::clients::PlaceOrder;
use maitred::ledger;
use maitred::lifecycle::RestaurantSystem;
use maitred::model::{OrderId, OrderItemId};
use maitred::receipt;
use maitred::store::{Database, NewOffering};

/// One offering, "Margherita", price 9.00, stock 5.
fn menu() -> Database {
    let mut db = Database::new();
    db.insert_offering(NewOffering {
        name: "Margherita".to_string(),
        description: Some("The classic".to_string()),
        price: Decimal::new(900, 2),
        category_id: None,
        recommended: true,
        quantity: 5,
    })
    .unwrap();
    db
}

fn place(order_id: u64, quantity: u32) -> PlaceOrder {
    PlaceOrder {
        order_id: OrderId(order_id),
        item_name: "Margherita".to_string(),
        quantity,
        special_instructions: None,
        ingredients_to_exclude: Vec::new(),
    }
}

/// Pull the order item id out of a placement confirmation.
fn placed_item_id(message: &str) -> OrderItemId {
    let marker = "(Order Item ID: ";
    let start = message.find(marker).expect("placement message carries the item id") + marker.len();
    let end = message[start..].find(')').unwrap() + start;
    OrderItemId(message[start..end].parse().unwrap())
}

#[tokio::test]
async fn placement_decrements_stock_and_starts_pending() {
    let system = RestaurantSystem::start(menu()).await.unwrap();
    let client = system.client();

    let message = client.place_order(place(1, 3)).await.unwrap();
    assert!(message.contains("Successfully placed order for 3 x 'Margherita'"));
    let item_id = placed_item_id(&message);

    let receipt = client.receipt(OrderId(1), None, false, true).await.unwrap();
    assert_eq!(receipt.items.len(), 1);
    assert_eq!(receipt.items[0].order_item_id, item_id.0);
    assert_eq!(receipt.items[0].quantity, 3);
    assert_eq!(receipt.items[0].status.as_deref(), Some("pending"));

    // Stock went 5 -> 2: an oversized follow-up names the remainder.
    let refused = client.place_order(place(1, 10)).await.unwrap();
    assert!(refused.contains("only 2 in stock"));

    system.shutdown().await;
}

#[tokio::test]
async fn oversized_order_leaves_no_trace() {
    let system = RestaurantSystem::start(menu()).await.unwrap();
    let client = system.client();

    let refused = client.place_order(place(1, 10)).await.unwrap();
    assert!(refused.contains("only 5 in stock"));

    let receipt = client.receipt(OrderId(1), None, true, false).await.unwrap();
    assert!(receipt.items.is_empty());

    system.shutdown().await;
}

#[tokio::test]
async fn cancellation_restores_stock_and_is_idempotent() {
    let system = RestaurantSystem::start(menu()).await.unwrap();
    let client = system.client();

    let message = client.place_order(place(1, 3)).await.unwrap();
    let item_id = placed_item_id(&message);

    let cancelled = client.cancel_order_item(item_id).await.unwrap();
    assert!(cancelled.contains("has been successfully cancelled"));

    // Stock is back to 5; an order for all 5 now fits.
    let refill = client.place_order(place(2, 5)).await.unwrap();
    assert!(refill.contains("Successfully placed order for 5"));

    // The second cancel reports the status and credits nothing.
    let again = client.cancel_order_item(item_id).await.unwrap();
    assert!(again.contains("cannot be cancelled as its status is 'cancelled'"));
    let refused = client.place_order(place(3, 1)).await.unwrap();
    assert!(refused.contains("only 0 in stock"));

    system.shutdown().await;
}

#[tokio::test]
async fn cancelling_an_unknown_item_is_a_hard_error() {
    let system = RestaurantSystem::start(menu()).await.unwrap();
    let client = system.client();

    let error = client.cancel_order_item(OrderItemId(99)).await.unwrap_err();
    assert_eq!(error.to_string(), "Order Item with ID 99 not found.");

    system.shutdown().await;
}

#[tokio::test]
async fn pending_quantity_update_moves_the_delta() {
    let system = RestaurantSystem::start(menu()).await.unwrap();
    let client = system.client();

    let message = client.place_order(place(1, 3)).await.unwrap();
    let item_id = placed_item_id(&message);

    let updated = client.update_order_item_quantity(item_id, 5).await.unwrap();
    assert!(updated.contains("Successfully updated quantity for item"));

    let receipt = client.receipt(OrderId(1), None, false, false).await.unwrap();
    assert_eq!(receipt.items[0].quantity, 5);

    // All stock is now held by the item.
    let refused = client.place_order(place(2, 1)).await.unwrap();
    assert!(refused.contains("only 0 in stock"));

    system.shutdown().await;
}

#[tokio::test]
async fn quantity_update_on_a_paid_item_appends_a_fresh_one() {
    let system = RestaurantSystem::start(menu()).await.unwrap();
    let client = system.client();

    let message = client.place_order(place(1, 3)).await.unwrap();
    let item_id = placed_item_id(&message);
    client.payment(OrderId(1), None).await.unwrap();

    // The paid item is out of pending; updating re-places instead.
    let updated = client.update_order_item_quantity(item_id, 2).await.unwrap();
    assert!(updated.contains("Successfully placed order for 2 x 'Margherita'"));

    let receipt = client.receipt(OrderId(1), None, true, true).await.unwrap();
    assert_eq!(receipt.items.len(), 2);
    assert_eq!(receipt.items[0].order_item_id, item_id.0);
    assert_eq!(receipt.items[0].quantity, 3);
    assert_eq!(receipt.items[0].status.as_deref(), Some("paid"));
    assert_eq!(receipt.items[1].quantity, 2);
    assert_eq!(receipt.items[1].status.as_deref(), Some("pending"));

    system.shutdown().await;
}

#[tokio::test]
async fn payment_reports_counts_and_idempotence_distinctly() {
    let system = RestaurantSystem::start(menu()).await.unwrap();
    let client = system.client();

    client.place_order(place(1, 1)).await.unwrap();
    client.place_order(place(1, 2)).await.unwrap();

    let paid = client.payment(OrderId(1), None).await.unwrap();
    assert_eq!(paid, "Payment successful. 2 item(s) marked as paid.");

    let again = client.payment(OrderId(1), None).await.unwrap();
    assert_eq!(again, "All specified items were already paid.");

    let nothing = client.payment(OrderId(9), None).await.unwrap();
    assert_eq!(nothing, "No items found for the given criteria.");

    system.shutdown().await;
}

#[tokio::test]
async fn receipt_total_sums_unit_prices() {
    let system = RestaurantSystem::start(menu()).await.unwrap();
    let client = system.client();

    client.place_order(place(1, 3)).await.unwrap();
    client.place_order(place(1, 1)).await.unwrap();

    let receipt = client.receipt(OrderId(1), None, false, false).await.unwrap();
    // Two rows at 9.00 each; quantities are deliberately not multiplied in.
    assert_eq!(receipt.total, Decimal::new(1800, 2));

    system.shutdown().await;
}

#[tokio::test]
async fn session_start_archives_previous_terminal_statuses() {
    // A previous session left three paid items behind.
    let mut db = menu();
    let now = chrono::Utc::now();
    ledger::place_order(&mut db, OrderId(1), "Margherita", 1, None, &[], now).unwrap();
    ledger::place_order(&mut db, OrderId(1), "Margherita", 1, None, &[], now).unwrap();
    ledger::place_order(&mut db, OrderId(1), "Margherita", 1, None, &[], now).unwrap();
    receipt::payment(&mut db, OrderId(1), None, now);
    ledger::place_order(&mut db, OrderId(1), "Margherita", 2, None, &[], now).unwrap();

    let system = RestaurantSystem::start(db).await.unwrap();
    let client = system.client();

    // The three paid items became paid-completed and are gone from the
    // receipt even with include_paid; the fresh pending item survives.
    let receipt = client.receipt(OrderId(1), None, true, true).await.unwrap();
    assert_eq!(receipt.items.len(), 1);
    assert_eq!(receipt.items[0].quantity, 2);
    assert_eq!(receipt.items[0].status.as_deref(), Some("pending"));

    system.shutdown().await;
}
