//! Tool dispatch: the boundary the conversational agent drives.
//!
//! The agent hands over a tool name and a JSON argument object; it gets a
//! string back, always. Recognized tools form the closed [`ToolCall`] union,
//! each variant carrying its typed, serde-validated input. There is no
//! stringly-typed lookup table to fall through, and the input contract of
//! every tool is spelled out in its input struct. Failures of any kind
//! (unknown tool, malformed input, missing rows, a store that went away)
//! come back as error strings; nothing across this boundary ever panics or
//! propagates.

use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use thiserror::Error;
use tracing::{debug, warn};

use crate::catalog::MenuFilter;
use crate::clients::{PlaceOrder, StoreClient};
use crate::model::{OrderId, OrderItemId};
use crate::store::StoreError;

/// Dispatch-boundary failures, rendered to strings before they reach the
/// agent.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    #[error("invalid input: {0}")]
    InvalidInput(#[source] serde_json::Error),
}

fn default_quantity() -> u32 {
    1
}

#[derive(Debug, Clone, Deserialize)]
pub struct GetCategoriesInput {
    #[serde(default)]
    pub is_food: Option<bool>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GetMenuInput {
    #[serde(default)]
    pub is_food: Option<bool>,
    #[serde(default)]
    pub category: Option<Vec<String>>,
    #[serde(default)]
    pub is_recommended: Option<bool>,
    #[serde(default)]
    pub min_price: Option<Decimal>,
    #[serde(default)]
    pub max_price: Option<Decimal>,
    #[serde(default)]
    pub must_include: Option<Vec<String>>,
    #[serde(default)]
    pub must_exclude: Option<Vec<String>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GetAllergensInput {
    pub item_name: String,
    #[serde(default)]
    pub allergens_to_check: Option<Vec<String>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlaceOrderInput {
    pub order_id: u64,
    pub item_name: String,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
    #[serde(default)]
    pub special_instructions: Option<String>,
    #[serde(default)]
    pub ingredients_to_exclude: Option<Vec<String>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CancelOrderItemInput {
    pub order_item_id: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateOrderItemQuantityInput {
    pub order_item_id: u64,
    /// Signed on purpose: a negative request is answered conversationally,
    /// not rejected as malformed.
    pub new_quantity: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GetReceiptInput {
    pub order_id: u64,
    #[serde(default)]
    pub item_names: Option<Vec<String>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProcessPaymentInput {
    pub order_id: u64,
    #[serde(default)]
    pub item_names: Option<Vec<String>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GetFaqValueInput {
    pub key: String,
}

/// Every operation the conversational agent may invoke.
#[derive(Debug, Clone)]
pub enum ToolCall {
    GetCategories(GetCategoriesInput),
    GetMenu(GetMenuInput),
    GetAllergens(GetAllergensInput),
    PlaceOrder(PlaceOrderInput),
    CancelOrderItem(CancelOrderItemInput),
    UpdateOrderItemQuantity(UpdateOrderItemQuantityInput),
    GetReceipt(GetReceiptInput),
    ProcessPayment(ProcessPaymentInput),
    GetFaqKeys,
    GetFaqValue(GetFaqValueInput),
}

impl ToolCall {
    /// Resolve a tool name and raw JSON input to a typed call.
    pub fn parse(name: &str, input: Value) -> Result<Self, DispatchError> {
        fn typed<T: DeserializeOwned>(input: Value) -> Result<T, DispatchError> {
            serde_json::from_value(input).map_err(DispatchError::InvalidInput)
        }
        match name {
            "get_categories" => Ok(Self::GetCategories(typed(input)?)),
            "get_menu" => Ok(Self::GetMenu(typed(input)?)),
            "get_allergens" => Ok(Self::GetAllergens(typed(input)?)),
            "place_order" => Ok(Self::PlaceOrder(typed(input)?)),
            "cancel_order_item" => Ok(Self::CancelOrderItem(typed(input)?)),
            "update_order_item_quantity" => Ok(Self::UpdateOrderItemQuantity(typed(input)?)),
            "get_receipt" => Ok(Self::GetReceipt(typed(input)?)),
            "process_payment" => Ok(Self::ProcessPayment(typed(input)?)),
            "get_faq_keys" => Ok(Self::GetFaqKeys),
            "get_faq_value" => Ok(Self::GetFaqValue(typed(input)?)),
            _ => Err(DispatchError::UnknownTool(name.to_string())),
        }
    }

    /// Run the call against the store and render its result as a string.
    pub async fn execute(self, client: &StoreClient) -> Result<String, StoreError> {
        match self {
            ToolCall::GetCategories(input) => {
                let categories = client.list_categories(input.is_food).await?;
                Ok(json!({ "categories": categories }).to_string())
            }
            ToolCall::GetMenu(input) => {
                let filter = MenuFilter {
                    is_food: input.is_food,
                    categories: input.category,
                    is_recommended: input.is_recommended,
                    min_price: input.min_price,
                    max_price: input.max_price,
                    must_include: input.must_include,
                    must_exclude: input.must_exclude,
                };
                let items = client.search_menu(filter).await?;
                Ok(json!({ "items": items }).to_string())
            }
            ToolCall::GetAllergens(input) => {
                let report =
                    client.get_allergens(input.item_name, input.allergens_to_check).await?;
                Ok(json!(report).to_string())
            }
            ToolCall::PlaceOrder(input) => {
                client
                    .place_order(PlaceOrder {
                        order_id: OrderId(input.order_id),
                        item_name: input.item_name,
                        quantity: input.quantity,
                        special_instructions: input.special_instructions,
                        ingredients_to_exclude: input.ingredients_to_exclude.unwrap_or_default(),
                    })
                    .await
            }
            ToolCall::CancelOrderItem(input) => {
                client.cancel_order_item(OrderItemId(input.order_item_id)).await
            }
            ToolCall::UpdateOrderItemQuantity(input) => {
                if input.new_quantity < 0 {
                    return Ok("Quantity must be a non-negative number.".to_string());
                }
                client
                    .update_order_item_quantity(
                        OrderItemId(input.order_item_id),
                        input.new_quantity as u32,
                    )
                    .await
            }
            ToolCall::GetReceipt(input) => {
                let receipt = client
                    .receipt(OrderId(input.order_id), input.item_names, false, false)
                    .await?;
                Ok(json!(receipt).to_string())
            }
            ToolCall::ProcessPayment(input) => {
                client.payment(OrderId(input.order_id), input.item_names).await
            }
            ToolCall::GetFaqKeys => {
                let keys = client.faq_keys().await?;
                Ok(json!(keys).to_string())
            }
            ToolCall::GetFaqValue(input) => client.faq_value(input.key).await,
        }
    }
}

/// Execute a named tool against the store; the result is always a string.
///
/// This is the whole contract the conversation loop consumes: whatever
/// happens inside, the agent gets text it can relay.
pub async fn execute_tool(client: &StoreClient, name: &str, input: Value) -> String {
    debug!(tool = name, %input, "Tool invocation");
    let call = match ToolCall::parse(name, input) {
        Ok(call) => call,
        Err(error @ DispatchError::UnknownTool(_)) => {
            warn!(tool = name, "Unknown tool requested");
            return error.to_string();
        }
        Err(error) => {
            warn!(tool = name, %error, "Tool input rejected");
            return format!("Error executing {name}: {error}");
        }
    };
    match call.execute(client).await {
        Ok(output) => {
            debug!(tool = name, %output, "Tool result");
            output
        }
        Err(error) => {
            warn!(tool = name, %error, "Tool execution failed");
            format!("Error executing {name}: {error}")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_tool_names_are_rejected() {
        let err = ToolCall::parse("get_weather", json!({})).unwrap_err();
        assert_eq!(err.to_string(), "Unknown tool: get_weather");
    }

    #[test]
    fn place_order_quantity_defaults_to_one() {
        let call =
            ToolCall::parse("place_order", json!({ "order_id": 1, "item_name": "Margherita" }))
                .unwrap();
        match call {
            ToolCall::PlaceOrder(input) => assert_eq!(input.quantity, 1),
            other => panic!("unexpected call: {other:?}"),
        }
    }

    #[test]
    fn missing_required_fields_are_invalid_input() {
        let err = ToolCall::parse("place_order", json!({ "order_id": 1 })).unwrap_err();
        assert!(matches!(err, DispatchError::InvalidInput(_)));
        assert!(err.to_string().contains("item_name"));
    }

    #[test]
    fn unrecognized_fields_are_ignored() {
        let call = ToolCall::parse(
            "get_categories",
            json!({ "is_food": true, "locale": "it-IT" }),
        )
        .unwrap();
        match call {
            ToolCall::GetCategories(input) => assert_eq!(input.is_food, Some(true)),
            other => panic!("unexpected call: {other:?}"),
        }
    }

    #[test]
    fn faq_keys_accepts_an_empty_object() {
        assert!(matches!(ToolCall::parse("get_faq_keys", json!({})), Ok(ToolCall::GetFaqKeys)));
    }
}
