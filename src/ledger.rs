//! The order ledger: placement, cancellation, quantity updates, and the
//! session-start archival sweep.
//!
//! Every operation here is a synchronous function over `&mut Database`;
//! one call is one transaction. The store task invokes them one message at
//! a time, which serializes all stock accounting; each function validates
//! everything before its first mutation, so an early return leaves no
//! partial state behind.
//!
//! Stock accounting invariant: placement decrements offering stock,
//! cancellation from `pending` restores it, and no other transition touches
//! it. Business-rule rejections (insufficient stock, wrong status) come back
//! as `Ok` message strings; only missing rows are errors.

use chrono::{DateTime, Utc};

use crate::exclusions::{self, IngredientRef};
use crate::model::{OrderId, OrderItemId, OrderItemModification, OrderStatus};
use crate::store::{Database, StoreError};

/// Snapshot an offering's ingredient associations for the resolver.
fn association_refs(db: &Database, offering_id: crate::model::OfferingId) -> Vec<IngredientRef> {
    let Some(offering) = db.offering(offering_id) else {
        return Vec::new();
    };
    offering
        .ingredients
        .iter()
        .filter_map(|assoc| {
            db.ingredient(assoc.ingredient_id).map(|ingredient| IngredientRef {
                id: assoc.ingredient_id,
                name: ingredient.name.clone(),
                removable: assoc.is_removable,
            })
        })
        .collect()
}

/// Place an order for `quantity` of the offering named `item_name`.
///
/// Resolves ingredient exclusions first (the explicit list wins; free-text
/// instructions are only mined when no list was given), then checks stock,
/// then creates the `pending` item with one modification per applied
/// exclusion and decrements the offering's stock. The returned message
/// enumerates applied, unknown, and protected exclusion requests.
pub fn place_order(
    db: &mut Database,
    order_id: OrderId,
    item_name: &str,
    quantity: u32,
    special_instructions: Option<&str>,
    ingredients_to_exclude: &[String],
    now: DateTime<Utc>,
) -> Result<String, StoreError> {
    let offering = db
        .offering_by_name(item_name)
        .ok_or_else(|| StoreError::OfferingNotFound(item_name.to_string()))?;
    let offering_id = offering.id;
    let offering_name = offering.name.clone();
    let in_stock = offering.quantity;

    if quantity == 0 {
        return Ok("Quantity must be at least 1.".to_string());
    }

    let associations = association_refs(db, offering_id);
    let requested: Vec<String> = if ingredients_to_exclude.is_empty() {
        special_instructions
            .map(|text| exclusions::infer_exclusions(&associations, text))
            .unwrap_or_default()
    } else {
        ingredients_to_exclude.to_vec()
    };

    if in_stock < quantity {
        return Ok(format!(
            "Order cannot be placed as you requested {quantity} {offering_name} but only {in_stock} in stock"
        ));
    }

    let outcome = exclusions::classify_requests(&associations, &requested);
    let applied: Vec<String> = outcome.removable.iter().map(|a| a.name.clone()).collect();
    let modifications: Vec<OrderItemModification> = outcome
        .removable
        .iter()
        .map(|assoc| OrderItemModification { ingredient_id: assoc.id })
        .collect();

    let item_id = db.insert_order_item(
        order_id,
        offering_id,
        quantity,
        special_instructions.map(str::to_string),
        modifications,
        now,
    );
    if let Some(offering) = db.offering_mut(offering_id) {
        offering.quantity -= quantity;
    }

    let mut message = format!(
        "Successfully placed order for {quantity} x '{item_name}' (Order Item ID: {item_id})."
    );
    if !applied.is_empty() {
        message.push_str(&format!(
            " Noted removable ingredient exclusions: {}",
            applied.join(", ")
        ));
    }
    if !outcome.missing.is_empty() {
        message.push_str(&format!(" Skipped unknown ingredients: {}", outcome.missing.join(", ")));
    }
    if !outcome.locked.is_empty() {
        message.push_str(&format!(
            " Unable to remove protected ingredients: {}",
            outcome.locked.join(", ")
        ));
    }
    Ok(message)
}

/// Cancel an order item, restoring its quantity to the offering's stock.
///
/// Only a `pending` item can be cancelled; anything else is reported back
/// unchanged, so a second cancellation of the same item never credits stock
/// twice.
pub fn cancel_order_item(
    db: &mut Database,
    order_item_id: OrderItemId,
    now: DateTime<Utc>,
) -> Result<String, StoreError> {
    let item = db
        .order_item(order_item_id)
        .ok_or(StoreError::OrderItemNotFound(order_item_id.0))?;

    if item.status != OrderStatus::Pending {
        return Ok(format!(
            "Order item cannot be cancelled as its status is '{}'.",
            item.status
        ));
    }

    let offering_id = item.offering_id;
    let quantity = item.quantity;
    if let Some(offering) = db.offering_mut(offering_id) {
        offering.quantity += quantity;
    }
    if let Some(item) = db.order_item_mut(order_item_id) {
        item.status = OrderStatus::Cancelled;
        item.updated_at = Some(now);
    }

    Ok(format!("Order Item ID {order_item_id} has been successfully cancelled."))
}

/// Change the quantity of an order item.
///
/// Zero delegates to cancellation. A `pending` item is adjusted in place,
/// with the stock delta checked and applied. An item already in flight
/// (preparing, served, paid, ...) is never mutated: a fresh order item for
/// the same order and offering is placed instead.
pub fn update_order_item_quantity(
    db: &mut Database,
    order_item_id: OrderItemId,
    new_quantity: u32,
    now: DateTime<Utc>,
) -> Result<String, StoreError> {
    if new_quantity == 0 {
        return cancel_order_item(db, order_item_id, now);
    }

    let item = db
        .order_item(order_item_id)
        .ok_or(StoreError::OrderItemNotFound(order_item_id.0))?;

    if item.status == OrderStatus::Pending {
        let offering_id = item.offering_id;
        let delta = i64::from(new_quantity) - i64::from(item.quantity);

        let in_stock = db.offering(offering_id).map(|o| o.quantity).unwrap_or(0);
        if delta > 0 && i64::from(in_stock) < delta {
            return Ok(format!(
                "Cannot increase quantity. Only {in_stock} additional items are in stock."
            ));
        }

        if let Some(offering) = db.offering_mut(offering_id) {
            offering.quantity = (i64::from(offering.quantity) - delta) as u32;
        }
        if let Some(item) = db.order_item_mut(order_item_id) {
            item.quantity = new_quantity;
            item.updated_at = Some(now);
        }
        return Ok(format!(
            "Successfully updated quantity for item {order_item_id} to {new_quantity}."
        ));
    }

    // In-flight items are append-only: re-place under the same order key.
    let order_id = item.order_id;
    let Some(offering) = db.offering(item.offering_id) else {
        return Err(StoreError::OfferingNotFound(item.offering_id.to_string()));
    };
    let offering_name = offering.name.clone();
    place_order(db, order_id, &offering_name, new_quantity, None, &[], now)
}

/// Session-start archival sweep: rewrite terminal statuses from a previous
/// session to their `-completed` variants. Returns rows rewritten.
pub fn finalize_previous_orders(db: &mut Database, now: DateTime<Utc>) -> usize {
    let mut updated = 0;
    for item in db.order_items_mut() {
        let archived = match item.status {
            OrderStatus::Paid => OrderStatus::PaidCompleted,
            OrderStatus::Cancelled => OrderStatus::CancelledCompleted,
            _ => continue,
        };
        item.status = archived;
        item.updated_at = Some(now);
        updated += 1;
    }
    updated
}
