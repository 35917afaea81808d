//! Tool-boundary contract tests: everything the conversational agent can
//! send, everything it may get back: always a string, never a panic.

use serde_json::{json, Value};

use maitred::dispatch::execute_tool;
use maitred::lifecycle::RestaurantSystem;
use maitred::store::seed;

async fn demo_system() -> RestaurantSystem {
    RestaurantSystem::start(seed::demo_database().unwrap()).await.unwrap()
}

#[tokio::test]
async fn unknown_tools_are_reported_not_crashed() {
    let system = demo_system().await;

    let output = execute_tool(system.client(), "get_weather", json!({})).await;
    assert_eq!(output, "Unknown tool: get_weather");

    system.shutdown().await;
}

#[tokio::test]
async fn malformed_input_is_reported_as_a_string() {
    let system = demo_system().await;

    let output = execute_tool(system.client(), "place_order", json!({ "order_id": 1 })).await;
    assert!(output.starts_with("Error executing place_order:"));
    assert!(output.contains("item_name"));

    system.shutdown().await;
}

#[tokio::test]
async fn categories_and_menu_render_as_json() {
    let system = demo_system().await;
    let client = system.client();

    let output = execute_tool(client, "get_categories", json!({ "is_food": true })).await;
    let parsed: Value = serde_json::from_str(&output).unwrap();
    assert_eq!(parsed["categories"], json!(["Pizze", "Primi"]));

    let output = execute_tool(
        client,
        "get_menu",
        json!({ "is_food": true, "is_recommended": true, "max_price": 10.0 }),
    )
    .await;
    let parsed: Value = serde_json::from_str(&output).unwrap();
    let items = parsed["items"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["food"], "Margherita");
    assert_eq!(items[0]["category"], "Pizze");
    assert_eq!(items[0]["excluded items"], json!(["Dairy", "Gluten"]));

    system.shutdown().await;
}

#[tokio::test]
async fn allergen_checks_answer_in_request_order() {
    let system = demo_system().await;

    let output = execute_tool(
        system.client(),
        "get_allergens",
        json!({ "item_name": "Spaghetti alla Carbonara", "allergens_to_check": ["Nuts", "Pork"] }),
    )
    .await;
    let parsed: Value = serde_json::from_str(&output).unwrap();
    assert_eq!(
        parsed,
        json!([
            "Spaghetti alla Carbonara does not contain Nuts",
            "Spaghetti alla Carbonara contains Pork"
        ])
    );

    let missing = execute_tool(
        system.client(),
        "get_allergens",
        json!({ "item_name": "Quattro Formaggi" }),
    )
    .await;
    assert_eq!(
        missing,
        "Error executing get_allergens: Offering 'Quattro Formaggi' not found."
    );

    system.shutdown().await;
}

#[tokio::test]
async fn special_instructions_drive_exclusions() {
    let system = demo_system().await;

    let output = execute_tool(
        system.client(),
        "place_order",
        json!({
            "order_id": 4,
            "item_name": "Marinara",
            "quantity": 1,
            "special_instructions": "no onions please"
        }),
    )
    .await;
    assert!(output.contains("Successfully placed order for 1 x 'Marinara'"));
    assert!(output.contains("Noted removable ingredient exclusions: Onions"));

    system.shutdown().await;
}

#[tokio::test]
async fn explicit_exclusions_report_all_three_buckets() {
    let system = demo_system().await;

    let output = execute_tool(
        system.client(),
        "place_order",
        json!({
            "order_id": 5,
            "item_name": "Margherita",
            "ingredients_to_exclude": ["olive  OIL", "Pineapple", "Wheat Dough"]
        }),
    )
    .await;
    assert!(output.contains("Noted removable ingredient exclusions: Olive Oil"));
    assert!(output.contains("Skipped unknown ingredients: Pineapple"));
    assert!(output.contains("Unable to remove protected ingredients: Wheat Dough"));

    system.shutdown().await;
}

#[tokio::test]
async fn negative_quantity_update_is_answered_conversationally() {
    let system = demo_system().await;

    let output = execute_tool(
        system.client(),
        "update_order_item_quantity",
        json!({ "order_item_id": 1, "new_quantity": -2 }),
    )
    .await;
    assert_eq!(output, "Quantity must be a non-negative number.");

    system.shutdown().await;
}

#[tokio::test]
async fn receipt_and_payment_round_trip_through_tools() {
    let system = demo_system().await;
    let client = system.client();

    execute_tool(
        client,
        "place_order",
        json!({ "order_id": 7, "item_name": "Margherita", "quantity": 2 }),
    )
    .await;
    execute_tool(client, "place_order", json!({ "order_id": 7, "item_name": "Lemonade" })).await;

    let output = execute_tool(client, "get_receipt", json!({ "order_id": 7 })).await;
    let parsed: Value = serde_json::from_str(&output).unwrap();
    let items = parsed["items"].as_array().unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["item name"], "Margherita");
    assert_eq!(items[0]["quantity"], 2);
    // 9.00 + 3.50: unit prices, not line totals.
    assert_eq!(parsed["total"], json!(12.5));

    let paid = execute_tool(client, "process_payment", json!({ "order_id": 7 })).await;
    assert_eq!(paid, "Payment successful. 2 item(s) marked as paid.");

    // Paid items drop off the default receipt.
    let output = execute_tool(client, "get_receipt", json!({ "order_id": 7 })).await;
    let parsed: Value = serde_json::from_str(&output).unwrap();
    assert_eq!(parsed["items"], json!([]));

    system.shutdown().await;
}

#[tokio::test]
async fn faq_tools_look_up_the_table() {
    let system = demo_system().await;
    let client = system.client();

    let keys = execute_tool(client, "get_faq_keys", json!({})).await;
    let parsed: Value = serde_json::from_str(&keys).unwrap();
    assert!(parsed.as_array().unwrap().contains(&json!("opening_hours")));

    let value = execute_tool(client, "get_faq_value", json!({ "key": "opening_hours" })).await;
    assert_eq!(value, "We are open every day from 11:00 to 23:00.");

    let missing = execute_tool(client, "get_faq_value", json!({ "key": "dress_code" })).await;
    assert_eq!(missing, "Error executing get_faq_value: FAQ entry 'dress_code' not found.");

    system.shutdown().await;
}
