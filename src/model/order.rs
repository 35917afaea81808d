//! Order ledger row types and the order-item status machine.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Display;

use crate::model::{IngredientId, OfferingId};

/// Caller-supplied grouping key tying order items to one logical order/table.
///
/// Orders are not a first-class entity; the conversation layer hands us this
/// key and we group by it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct OrderId(pub u64);

/// Type-safe identifier for order items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct OrderItemId(pub u64);

impl Display for OrderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Display for OrderItemId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lifecycle status of an order item.
///
/// Forward edges only: `pending → preparing → served`, `pending → cancelled`,
/// any non-terminal → `paid`. The `-completed` variants are applied solely by
/// the session-start archival sweep, demarcating items from a previous
/// session without deleting history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OrderStatus {
    Pending,
    Preparing,
    Served,
    Paid,
    Cancelled,
    PaidCompleted,
    CancelledCompleted,
}

impl OrderStatus {
    /// Canonical lower-case rendering, as stored and as shown to customers.
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Preparing => "preparing",
            OrderStatus::Served => "served",
            OrderStatus::Paid => "paid",
            OrderStatus::Cancelled => "cancelled",
            OrderStatus::PaidCompleted => "paid-completed",
            OrderStatus::CancelledCompleted => "cancelled-completed",
        }
    }

    /// True for both cancellation variants.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, OrderStatus::Cancelled | OrderStatus::CancelledCompleted)
    }

    /// True while the item still counts against offering stock.
    pub fn holds_stock(&self) -> bool {
        !matches!(self, OrderStatus::Cancelled | OrderStatus::CancelledCompleted)
    }
}

impl Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One line of an order: a quantity of one offering, with optional exclusions.
///
/// Never physically deleted; cancellation is a status, not a row removal.
#[derive(Debug, Clone)]
pub struct OrderItem {
    pub id: OrderItemId,
    pub order_id: OrderId,
    pub offering_id: OfferingId,
    pub quantity: u32,
    pub special_instructions: Option<String>,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    /// Stamped on every row mutation; the status daemon measures elapsed time
    /// from here, falling back to `created_at`.
    pub updated_at: Option<DateTime<Utc>>,
    pub modifications: Vec<OrderItemModification>,
}

/// Records one ingredient excluded from one order item.
///
/// May only reference an ingredient that belongs to the item's offering and
/// was removable at placement time; the referenced ingredient cannot be
/// deleted from the catalog while referenced here.
#[derive(Debug, Clone, Copy)]
pub struct OrderItemModification {
    pub ingredient_id: IngredientId,
}
