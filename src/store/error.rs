//! Error types for the store task and the relational tables.

use thiserror::Error;

use crate::model::{AttributeId, CategoryId, IngredientId, OfferingId};

/// Errors crossing the store boundary.
///
/// Only hard failures live here: rows that do not exist, or a store task that
/// is gone. Business-rule outcomes (insufficient stock, wrong status, locked
/// ingredient) are returned as explanatory message strings by design; they
/// are expected conversational results, not exceptional conditions.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum StoreError {
    /// The store task's channel is closed; no more requests can be sent.
    #[error("Store closed")]
    Closed,

    /// The store task dropped the response channel mid-request.
    #[error("Store dropped response channel")]
    Dropped,

    /// No offering matches the requested name exactly.
    #[error("Offering '{0}' not found.")]
    OfferingNotFound(String),

    /// No order item with the requested id.
    #[error("Order Item with ID {0} not found.")]
    OrderItemNotFound(u64),

    /// No FAQ entry under the requested key.
    #[error("FAQ entry '{0}' not found.")]
    FaqNotFound(String),
}

/// Relational-integrity violations raised by [`Database`](crate::store::Database)
/// mutation helpers.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum DatabaseError {
    #[error("duplicate category name '{0}'")]
    DuplicateCategory(String),

    #[error("duplicate ingredient name '{0}'")]
    DuplicateIngredient(String),

    #[error("duplicate attribute name '{0}'")]
    DuplicateAttribute(String),

    #[error("duplicate FAQ key '{0}'")]
    DuplicateFaqKey(String),

    #[error("unknown category id {0}")]
    UnknownCategory(CategoryId),

    #[error("unknown offering id {0}")]
    UnknownOffering(OfferingId),

    #[error("unknown ingredient id {0}")]
    UnknownIngredient(IngredientId),

    #[error("unknown attribute id {0}")]
    UnknownAttribute(AttributeId),

    #[error("ingredient {0} is already linked to offering {1}")]
    DuplicateLink(IngredientId, OfferingId),

    #[error("ingredient {0} is referenced by an order item modification")]
    IngredientInUse(IngredientId),

    #[error("offering {0} is referenced by an order item")]
    OfferingInUse(OfferingId),
}
