//! Receipt derivation and payment marking.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::daemon;
use crate::model::{OrderId, OrderItem, OrderStatus};
use crate::store::Database;

/// One itemized receipt row, in the wire shape the conversation layer
/// expects (`"item name"` / `"item value"` keys).
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ReceiptLine {
    pub order_item_id: u64,
    #[serde(rename = "item name")]
    pub item_name: String,
    #[serde(rename = "item value")]
    pub item_value: Decimal,
    pub quantity: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

/// An itemized receipt for one order.
///
/// The total is the sum of the selected rows' *unit* prices, not
/// price × quantity. That is the behavior existing totals were produced
/// with, and it is preserved bit-for-bit; do not "fix" it without revising
/// the external contract.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Receipt {
    pub items: Vec<ReceiptLine>,
    pub total: Decimal,
}

fn name_matches(db: &Database, item: &OrderItem, item_names: Option<&[String]>) -> bool {
    match item_names {
        None => true,
        Some(names) => db
            .offering(item.offering_id)
            .is_some_and(|offering| names.contains(&offering.name)),
    }
}

/// Itemize an order. Statuses are refreshed (scoped to this order) first, so
/// the receipt always reflects elapsed time.
///
/// Cancelled items never appear. Paid items appear only when `include_paid`
/// is set, and `paid-completed` items (prior sessions) never appear at all.
pub fn receipt(
    db: &mut Database,
    order_id: OrderId,
    item_names: Option<&[String]>,
    include_paid: bool,
    include_status: bool,
    now: DateTime<Utc>,
) -> Receipt {
    daemon::refresh_statuses(db, Some(order_id), now);

    let mut items = Vec::new();
    let mut total = Decimal::ZERO;
    for item in db.order_items() {
        if item.order_id != order_id || item.status.is_cancelled() {
            continue;
        }
        if item.status == OrderStatus::PaidCompleted {
            continue;
        }
        if !include_paid && item.status == OrderStatus::Paid {
            continue;
        }
        if !name_matches(db, item, item_names) {
            continue;
        }
        let Some(offering) = db.offering(item.offering_id) else {
            continue;
        };
        total += offering.price;
        items.push(ReceiptLine {
            order_item_id: item.id.0,
            item_name: offering.name.clone(),
            item_value: offering.price,
            quantity: item.quantity,
            status: include_status.then(|| item.status.to_string()),
        });
    }

    Receipt { items, total }
}

/// Mark an order's items as paid, optionally restricted by offering name.
///
/// Selection ignores status entirely; every selected item not already
/// exactly `paid` is rewritten to `paid`. "Nothing matched" and "everything
/// was already paid" are reported distinctly.
pub fn payment(
    db: &mut Database,
    order_id: OrderId,
    item_names: Option<&[String]>,
    now: DateTime<Utc>,
) -> String {
    let selected: Vec<_> = db
        .order_items()
        .filter(|item| item.order_id == order_id && name_matches(db, item, item_names))
        .map(|item| item.id)
        .collect();

    if selected.is_empty() {
        return "No items found for the given criteria.".to_string();
    }

    let mut count = 0;
    for id in selected {
        if let Some(item) = db.order_item_mut(id) {
            if item.status != OrderStatus::Paid {
                item.status = OrderStatus::Paid;
                item.updated_at = Some(now);
                count += 1;
            }
        }
    }

    if count > 0 {
        format!("Payment successful. {count} item(s) marked as paid.")
    } else {
        "All specified items were already paid.".to_string()
    }
}
