//! Demo binary: seed the trattoria, start the engine, and drive it through
//! the same tool surface the conversational agent uses.

use serde_json::json;
use tracing::info;

use maitred::dispatch::execute_tool;
use maitred::lifecycle::{setup_tracing, RestaurantSystem};
use maitred::store::seed;

#[tokio::main]
async fn main() -> Result<(), String> {
    setup_tracing();

    info!("Starting demo ordering session");
    let db = seed::demo_database().map_err(|e| e.to_string())?;
    let system = RestaurantSystem::start(db).await.map_err(|e| e.to_string())?;
    let client = system.client();

    // The same call sequence an agent would make while waiting a table.
    let turns = [
        ("get_categories", json!({})),
        ("get_menu", json!({ "is_food": true, "is_recommended": true })),
        ("get_allergens", json!({ "item_name": "Margherita", "allergens_to_check": ["Gluten", "Nuts"] })),
        (
            "place_order",
            json!({
                "order_id": 1,
                "item_name": "Margherita",
                "quantity": 2,
                "special_instructions": "no basil please"
            }),
        ),
        ("place_order", json!({ "order_id": 1, "item_name": "Lemonade" })),
        ("get_receipt", json!({ "order_id": 1 })),
        ("process_payment", json!({ "order_id": 1 })),
        ("get_faq_keys", json!({})),
        ("get_faq_value", json!({ "key": "opening_hours" })),
    ];

    for (tool, input) in turns {
        let output = execute_tool(client, tool, input).await;
        println!("{tool}: {output}");
    }

    system.shutdown().await;
    Ok(())
}
