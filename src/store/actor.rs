//! The store task: a closed request protocol over the relational state.
//!
//! Every operation of the system arrives here as one [`StoreRequest`]
//! variant carrying its typed arguments and a oneshot responder. The actor
//! processes messages strictly in order, and each message is handled to
//! completion against the owned [`Database`] before the next is picked up.
//! That sequencing is the concurrency discipline: a request *is* a
//! transaction, serialized against every other transaction, so concurrent
//! placements against one offering can never oversell stock and concurrent
//! cancel/pay calls on one item can never double-account.

use chrono::Utc;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, warn};

use crate::catalog::{self, MenuEntry, MenuFilter};
use crate::model::{OrderId, OrderItemId};
use crate::receipt::{self, Receipt};
use crate::store::{Database, StoreError};
use crate::{daemon, ledger};

/// Response channel carried by every request.
pub type Respond<T> = oneshot::Sender<Result<T, StoreError>>;

/// The complete operation surface of the store, as a closed tagged union.
///
/// Adding an operation means adding a variant here, a handler arm in
/// [`StoreActor::handle`], and a method on
/// [`StoreClient`](crate::clients::StoreClient); the compiler walks you
/// through the rest.
#[derive(Debug)]
pub enum StoreRequest {
    ListCategories {
        is_food: Option<bool>,
        respond_to: Respond<Vec<String>>,
    },
    SearchMenu {
        filter: MenuFilter,
        respond_to: Respond<Vec<MenuEntry>>,
    },
    GetAllergens {
        item_name: String,
        allergens_to_check: Option<Vec<String>>,
        respond_to: Respond<Vec<String>>,
    },
    PlaceOrder {
        order_id: OrderId,
        item_name: String,
        quantity: u32,
        special_instructions: Option<String>,
        ingredients_to_exclude: Vec<String>,
        respond_to: Respond<String>,
    },
    CancelOrderItem {
        order_item_id: OrderItemId,
        respond_to: Respond<String>,
    },
    UpdateOrderItemQuantity {
        order_item_id: OrderItemId,
        new_quantity: u32,
        respond_to: Respond<String>,
    },
    GetReceipt {
        order_id: OrderId,
        item_names: Option<Vec<String>>,
        include_paid: bool,
        include_status: bool,
        respond_to: Respond<Receipt>,
    },
    ProcessPayment {
        order_id: OrderId,
        item_names: Option<Vec<String>>,
        respond_to: Respond<String>,
    },
    RefreshStatuses {
        order_id: Option<OrderId>,
        respond_to: Respond<usize>,
    },
    FinalizeSession {
        respond_to: Respond<usize>,
    },
    FaqKeys {
        respond_to: Respond<Vec<String>>,
    },
    FaqValue {
        key: String,
        respond_to: Respond<String>,
    },
}

/// Owns the [`Database`] and serializes all access to it.
pub struct StoreActor {
    receiver: mpsc::Receiver<StoreRequest>,
    db: Database,
}

impl StoreActor {
    pub(crate) fn new(receiver: mpsc::Receiver<StoreRequest>, db: Database) -> Self {
        Self { receiver, db }
    }

    /// Process requests until every client handle is dropped.
    pub async fn run(mut self) {
        info!("Store task started");
        while let Some(request) = self.receiver.recv().await {
            self.handle(request);
        }
        info!(order_items = self.db.order_items().count(), "Store task stopped");
    }

    fn handle(&mut self, request: StoreRequest) {
        match request {
            StoreRequest::ListCategories { is_food, respond_to } => {
                debug!(?is_food, "List categories");
                let _ = respond_to.send(Ok(catalog::list_categories(&self.db, is_food)));
            }
            StoreRequest::SearchMenu { filter, respond_to } => {
                debug!(?filter, "Search menu");
                let _ = respond_to.send(Ok(catalog::search_menu(&self.db, &filter)));
            }
            StoreRequest::GetAllergens { item_name, allergens_to_check, respond_to } => {
                debug!(item = %item_name, ?allergens_to_check, "Get allergens");
                let result =
                    catalog::get_allergens(&self.db, &item_name, allergens_to_check.as_deref());
                if let Err(error) = &result {
                    warn!(%error, "Allergen lookup failed");
                }
                let _ = respond_to.send(result);
            }
            StoreRequest::PlaceOrder {
                order_id,
                item_name,
                quantity,
                special_instructions,
                ingredients_to_exclude,
                respond_to,
            } => {
                debug!(%order_id, item = %item_name, quantity, "Place order");
                let result = ledger::place_order(
                    &mut self.db,
                    order_id,
                    &item_name,
                    quantity,
                    special_instructions.as_deref(),
                    &ingredients_to_exclude,
                    Utc::now(),
                );
                match &result {
                    Ok(message) => info!(%order_id, item = %item_name, %message, "Order placement handled"),
                    Err(error) => warn!(%order_id, %error, "Order placement failed"),
                }
                let _ = respond_to.send(result);
            }
            StoreRequest::CancelOrderItem { order_item_id, respond_to } => {
                debug!(%order_item_id, "Cancel order item");
                let result = ledger::cancel_order_item(&mut self.db, order_item_id, Utc::now());
                match &result {
                    Ok(message) => info!(%order_item_id, %message, "Cancellation handled"),
                    Err(error) => warn!(%order_item_id, %error, "Cancellation failed"),
                }
                let _ = respond_to.send(result);
            }
            StoreRequest::UpdateOrderItemQuantity { order_item_id, new_quantity, respond_to } => {
                debug!(%order_item_id, new_quantity, "Update order item quantity");
                let result = ledger::update_order_item_quantity(
                    &mut self.db,
                    order_item_id,
                    new_quantity,
                    Utc::now(),
                );
                match &result {
                    Ok(message) => info!(%order_item_id, %message, "Quantity update handled"),
                    Err(error) => warn!(%order_item_id, %error, "Quantity update failed"),
                }
                let _ = respond_to.send(result);
            }
            StoreRequest::GetReceipt {
                order_id,
                item_names,
                include_paid,
                include_status,
                respond_to,
            } => {
                debug!(%order_id, ?item_names, include_paid, "Get receipt");
                let receipt = receipt::receipt(
                    &mut self.db,
                    order_id,
                    item_names.as_deref(),
                    include_paid,
                    include_status,
                    Utc::now(),
                );
                let _ = respond_to.send(Ok(receipt));
            }
            StoreRequest::ProcessPayment { order_id, item_names, respond_to } => {
                debug!(%order_id, ?item_names, "Process payment");
                let message =
                    receipt::payment(&mut self.db, order_id, item_names.as_deref(), Utc::now());
                info!(%order_id, %message, "Payment handled");
                let _ = respond_to.send(Ok(message));
            }
            StoreRequest::RefreshStatuses { order_id, respond_to } => {
                let advanced = daemon::refresh_statuses(&mut self.db, order_id, Utc::now());
                debug!(?order_id, advanced, "Refresh statuses");
                let _ = respond_to.send(Ok(advanced));
            }
            StoreRequest::FinalizeSession { respond_to } => {
                let archived = ledger::finalize_previous_orders(&mut self.db, Utc::now());
                info!(archived, "Previous session orders archived");
                let _ = respond_to.send(Ok(archived));
            }
            StoreRequest::FaqKeys { respond_to } => {
                let _ = respond_to.send(Ok(catalog::faq_keys(&self.db)));
            }
            StoreRequest::FaqValue { key, respond_to } => {
                debug!(%key, "FAQ value");
                let result = catalog::faq_value(&self.db, &key);
                if let Err(error) = &result {
                    warn!(%error, "FAQ lookup failed");
                }
                let _ = respond_to.send(result);
            }
        }
    }
}
