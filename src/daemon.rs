//! Time-driven order-status advancement.
//!
//! [`refresh_statuses`] is the pure transition: an item sitting in `pending`
//! or `preparing` for a minute moves one step forward. The
//! [`StatusRefreshDaemon`] runs it on a fixed interval in the background;
//! receipts also run it synchronously, scoped to their order, so totals
//! always reflect up-to-date statuses. This is the only autonomous state
//! change in the system; everything else is caller-triggered.

use chrono::{DateTime, Utc};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::clients::StoreClient;
use crate::model::{OrderId, OrderStatus};
use crate::store::Database;

/// How often the background task refreshes statuses.
pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(30);

/// An item advances one step after sitting unchanged this long.
fn advance_after() -> chrono::Duration {
    chrono::Duration::minutes(1)
}

/// Advance `pending`/`preparing` items whose last change is at least a minute
/// old, optionally restricted to one order. At most one step per item per
/// invocation: an item two minutes stale still only moves `pending →
/// preparing` here, and converges to `served` over repeated calls. Returns
/// the number of rows advanced.
pub fn refresh_statuses(db: &mut Database, order_id: Option<OrderId>, now: DateTime<Utc>) -> usize {
    let mut updated = 0;
    for item in db.order_items_mut() {
        if let Some(order_id) = order_id {
            if item.order_id != order_id {
                continue;
            }
        }
        let reference = item.updated_at.unwrap_or(item.created_at);
        if now - reference < advance_after() {
            continue;
        }
        let next = match item.status {
            OrderStatus::Pending => OrderStatus::Preparing,
            OrderStatus::Preparing => OrderStatus::Served,
            _ => continue,
        };
        item.status = next;
        item.updated_at = Some(now);
        updated += 1;
    }
    updated
}

/// Background task advancing order statuses on a fixed interval.
///
/// Holds a clone of the store client like any foreground caller; the store
/// task serializes its refreshes against tool calls. Stopping is
/// cooperative: [`shutdown`](Self::shutdown) cancels the token and awaits
/// the task, which only ever parks between ticks.
pub struct StatusRefreshDaemon {
    cancel: CancellationToken,
    handle: JoinHandle<()>,
}

impl StatusRefreshDaemon {
    /// Spawn the refresh loop with the given tick interval.
    pub fn spawn(client: StoreClient, period: Duration) -> Self {
        let cancel = CancellationToken::new();
        let token = cancel.clone();
        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            info!(period_secs = period.as_secs(), "Status refresh daemon started");
            loop {
                tokio::select! {
                    _ = token.cancelled() => break,
                    _ = ticker.tick() => {
                        match client.refresh_statuses(None).await {
                            Ok(0) => debug!("No order statuses due"),
                            Ok(advanced) => info!(advanced, "Order statuses advanced"),
                            Err(error) => {
                                // The store is gone; nothing left to refresh.
                                warn!(%error, "Status refresh failed");
                                break;
                            }
                        }
                    }
                }
            }
            info!("Status refresh daemon stopped");
        });
        Self { cancel, handle }
    }

    /// Cancel the loop and wait for it to park.
    pub async fn shutdown(self) {
        self.cancel.cancel();
        let _ = self.handle.await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger;
    use crate::model::OrderItemId;
    use crate::store::NewOffering;
    use rust_decimal::Decimal;

    fn menu() -> Database {
        let mut db = Database::new();
        db.insert_offering(NewOffering {
            name: "Margherita".to_string(),
            description: None,
            price: Decimal::new(900, 2),
            category_id: None,
            recommended: false,
            quantity: 10,
        })
        .unwrap();
        db
    }

    fn place(db: &mut Database, order: u64) -> OrderItemId {
        let before: Vec<_> = db.order_items().map(|i| i.id).collect();
        ledger::place_order(db, OrderId(order), "Margherita", 1, None, &[], Utc::now()).unwrap();
        db.order_items().map(|i| i.id).find(|id| !before.contains(id)).unwrap()
    }

    fn backdate(db: &mut Database, id: OrderItemId, seconds: i64) {
        let item = db.order_item_mut(id).unwrap();
        item.created_at -= chrono::Duration::seconds(seconds);
        if let Some(updated) = item.updated_at.as_mut() {
            *updated -= chrono::Duration::seconds(seconds);
        }
    }

    #[test]
    fn fresh_items_do_not_advance() {
        let mut db = menu();
        place(&mut db, 1);
        assert_eq!(refresh_statuses(&mut db, None, Utc::now()), 0);
    }

    #[test]
    fn stale_pending_items_move_to_preparing() {
        let mut db = menu();
        let item = place(&mut db, 1);
        backdate(&mut db, item, 61);

        assert_eq!(refresh_statuses(&mut db, None, Utc::now()), 1);
        assert_eq!(db.order_item(item).unwrap().status, OrderStatus::Preparing);
    }

    #[test]
    fn one_step_per_invocation_even_when_very_stale() {
        let mut db = menu();
        let item = place(&mut db, 1);
        backdate(&mut db, item, 600);

        refresh_statuses(&mut db, None, Utc::now());
        assert_eq!(db.order_item(item).unwrap().status, OrderStatus::Preparing);

        // The advance stamped the update time, so the next step is not due
        // yet; backdate again to converge to served.
        assert_eq!(refresh_statuses(&mut db, None, Utc::now()), 0);
        backdate(&mut db, item, 61);
        refresh_statuses(&mut db, None, Utc::now());
        assert_eq!(db.order_item(item).unwrap().status, OrderStatus::Served);
    }

    #[test]
    fn served_items_never_move_again() {
        let mut db = menu();
        let item = place(&mut db, 1);
        backdate(&mut db, item, 61);
        refresh_statuses(&mut db, None, Utc::now());
        backdate(&mut db, item, 61);
        refresh_statuses(&mut db, None, Utc::now());
        assert_eq!(db.order_item(item).unwrap().status, OrderStatus::Served);

        backdate(&mut db, item, 3600);
        assert_eq!(refresh_statuses(&mut db, None, Utc::now()), 0);
        assert_eq!(db.order_item(item).unwrap().status, OrderStatus::Served);
    }

    #[test]
    fn scoped_refresh_leaves_other_orders_alone() {
        let mut db = menu();
        let mine = place(&mut db, 1);
        let other = place(&mut db, 2);
        backdate(&mut db, mine, 61);
        backdate(&mut db, other, 61);

        assert_eq!(refresh_statuses(&mut db, Some(OrderId(1)), Utc::now()), 1);
        assert_eq!(db.order_item(mine).unwrap().status, OrderStatus::Preparing);
        assert_eq!(db.order_item(other).unwrap().status, OrderStatus::Pending);
    }

    #[test]
    fn cancelled_and_paid_items_are_ignored() {
        let mut db = menu();
        let cancelled = place(&mut db, 1);
        let paid = place(&mut db, 1);
        ledger::cancel_order_item(&mut db, cancelled, Utc::now()).unwrap();
        db.order_item_mut(paid).unwrap().status = OrderStatus::Paid;
        backdate(&mut db, cancelled, 3600);
        backdate(&mut db, paid, 3600);

        assert_eq!(refresh_statuses(&mut db, None, Utc::now()), 0);
    }
}
