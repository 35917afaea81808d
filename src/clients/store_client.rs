//! Typed async handle to the store task.
//!
//! This is the explicit store handle the rest of the system is built
//! around: constructed once, cloned into the dispatch layer, the status
//! daemon, and any embedding UI. No raw message passing leaks out of it.

use tokio::sync::{mpsc, oneshot};
use tracing::{debug, instrument};

use crate::catalog::{MenuEntry, MenuFilter};
use crate::model::{OrderId, OrderItemId};
use crate::receipt::Receipt;
use crate::store::{Respond, StoreError, StoreRequest};

/// Placement parameters, as the conversation layer supplies them.
#[derive(Debug, Clone)]
pub struct PlaceOrder {
    pub order_id: OrderId,
    pub item_name: String,
    pub quantity: u32,
    pub special_instructions: Option<String>,
    /// Explicit exclusions; when empty, the special instructions are mined
    /// for "without/no/hold" phrases instead.
    pub ingredients_to_exclude: Vec<String>,
}

/// Cheaply cloneable client for the store task.
#[derive(Clone)]
pub struct StoreClient {
    sender: mpsc::Sender<StoreRequest>,
}

impl StoreClient {
    pub(crate) fn new(sender: mpsc::Sender<StoreRequest>) -> Self {
        Self { sender }
    }

    /// One request round-trip: send, await the oneshot, surface channel
    /// failures as store errors.
    async fn request<T>(
        &self,
        make: impl FnOnce(Respond<T>) -> StoreRequest,
    ) -> Result<T, StoreError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(make(respond_to))
            .await
            .map_err(|_| StoreError::Closed)?;
        response.await.map_err(|_| StoreError::Dropped)?
    }

    pub async fn list_categories(&self, is_food: Option<bool>) -> Result<Vec<String>, StoreError> {
        self.request(|respond_to| StoreRequest::ListCategories { is_food, respond_to }).await
    }

    pub async fn search_menu(&self, filter: MenuFilter) -> Result<Vec<MenuEntry>, StoreError> {
        self.request(|respond_to| StoreRequest::SearchMenu { filter, respond_to }).await
    }

    pub async fn get_allergens(
        &self,
        item_name: impl Into<String>,
        allergens_to_check: Option<Vec<String>>,
    ) -> Result<Vec<String>, StoreError> {
        let item_name = item_name.into();
        self.request(|respond_to| StoreRequest::GetAllergens {
            item_name,
            allergens_to_check,
            respond_to,
        })
        .await
    }

    #[instrument(skip(self, order))]
    pub async fn place_order(&self, order: PlaceOrder) -> Result<String, StoreError> {
        debug!(?order, "Sending place_order to store");
        self.request(|respond_to| StoreRequest::PlaceOrder {
            order_id: order.order_id,
            item_name: order.item_name,
            quantity: order.quantity,
            special_instructions: order.special_instructions,
            ingredients_to_exclude: order.ingredients_to_exclude,
            respond_to,
        })
        .await
    }

    #[instrument(skip(self))]
    pub async fn cancel_order_item(&self, order_item_id: OrderItemId) -> Result<String, StoreError> {
        self.request(|respond_to| StoreRequest::CancelOrderItem { order_item_id, respond_to })
            .await
    }

    #[instrument(skip(self))]
    pub async fn update_order_item_quantity(
        &self,
        order_item_id: OrderItemId,
        new_quantity: u32,
    ) -> Result<String, StoreError> {
        self.request(|respond_to| StoreRequest::UpdateOrderItemQuantity {
            order_item_id,
            new_quantity,
            respond_to,
        })
        .await
    }

    pub async fn receipt(
        &self,
        order_id: OrderId,
        item_names: Option<Vec<String>>,
        include_paid: bool,
        include_status: bool,
    ) -> Result<Receipt, StoreError> {
        self.request(|respond_to| StoreRequest::GetReceipt {
            order_id,
            item_names,
            include_paid,
            include_status,
            respond_to,
        })
        .await
    }

    #[instrument(skip(self))]
    pub async fn payment(
        &self,
        order_id: OrderId,
        item_names: Option<Vec<String>>,
    ) -> Result<String, StoreError> {
        self.request(|respond_to| StoreRequest::ProcessPayment { order_id, item_names, respond_to })
            .await
    }

    /// Advance time-driven statuses, optionally scoped to one order.
    pub async fn refresh_statuses(&self, order_id: Option<OrderId>) -> Result<usize, StoreError> {
        self.request(|respond_to| StoreRequest::RefreshStatuses { order_id, respond_to }).await
    }

    /// Archive terminal statuses left over from a previous session.
    pub async fn finalize_session(&self) -> Result<usize, StoreError> {
        self.request(|respond_to| StoreRequest::FinalizeSession { respond_to }).await
    }

    pub async fn faq_keys(&self) -> Result<Vec<String>, StoreError> {
        self.request(|respond_to| StoreRequest::FaqKeys { respond_to }).await
    }

    pub async fn faq_value(&self, key: impl Into<String>) -> Result<String, StoreError> {
        let key = key.into();
        self.request(|respond_to| StoreRequest::FaqValue { key, respond_to }).await
    }
}
