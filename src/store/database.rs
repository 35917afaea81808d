//! The in-memory relational store: tables, id allocation, and the integrity
//! rules between them (unique names, cascades, SET NULL, RESTRICT).
//!
//! `Database` is owned by exactly one [`StoreActor`](crate::store::StoreActor)
//! at runtime; the domain modules ([`crate::catalog`], [`crate::ledger`],
//! [`crate::receipt`]) operate on it through plain `&`/`&mut` borrows, which
//! keeps all of them testable without spawning the runtime.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use std::collections::BTreeMap;

use crate::model::{
    Attribute, AttributeId, CategoryId, Ingredient, IngredientId, MenuCategory, Offering,
    OfferingId, OfferingIngredient, OrderId, OrderItem, OrderItemId, OrderItemModification,
    OrderStatus,
};
use crate::store::DatabaseError;

/// Creation payload for an offering row.
#[derive(Debug, Clone)]
pub struct NewOffering {
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub category_id: Option<CategoryId>,
    pub recommended: bool,
    pub quantity: u32,
}

/// All tables of the catalog and the order ledger.
///
/// `BTreeMap` keyed by id gives deterministic id-order iteration, matching
/// the listing order of an autoincrement-keyed relational table.
#[derive(Debug, Default)]
pub struct Database {
    categories: BTreeMap<CategoryId, MenuCategory>,
    offerings: BTreeMap<OfferingId, Offering>,
    ingredients: BTreeMap<IngredientId, Ingredient>,
    attributes: BTreeMap<AttributeId, Attribute>,
    order_items: BTreeMap<OrderItemId, OrderItem>,
    faq: BTreeMap<String, String>,
    next_category_id: u32,
    next_offering_id: u32,
    next_ingredient_id: u32,
    next_attribute_id: u32,
    next_order_item_id: u64,
}

impl Database {
    pub fn new() -> Self {
        Self::default()
    }

    // --- Catalog provisioning (seed-time) ---

    /// Insert a category. Category names are unique.
    pub fn insert_category(
        &mut self,
        name: impl Into<String>,
        is_food: bool,
    ) -> Result<CategoryId, DatabaseError> {
        let name = name.into();
        if self.categories.values().any(|c| c.name == name) {
            return Err(DatabaseError::DuplicateCategory(name));
        }
        self.next_category_id += 1;
        let id = CategoryId(self.next_category_id);
        self.categories.insert(id, MenuCategory { id, name, is_food });
        Ok(id)
    }

    /// Insert an allergen attribute. Attribute names are unique.
    pub fn insert_attribute(&mut self, name: impl Into<String>) -> Result<AttributeId, DatabaseError> {
        let name = name.into();
        if self.attributes.values().any(|a| a.name == name) {
            return Err(DatabaseError::DuplicateAttribute(name));
        }
        self.next_attribute_id += 1;
        let id = AttributeId(self.next_attribute_id);
        self.attributes.insert(id, Attribute { id, name });
        Ok(id)
    }

    /// Insert an ingredient with its allergen memberships. Names are unique.
    pub fn insert_ingredient(
        &mut self,
        name: impl Into<String>,
        attributes: &[AttributeId],
    ) -> Result<IngredientId, DatabaseError> {
        let name = name.into();
        if self.ingredients.values().any(|i| i.name == name) {
            return Err(DatabaseError::DuplicateIngredient(name));
        }
        for attribute_id in attributes {
            if !self.attributes.contains_key(attribute_id) {
                return Err(DatabaseError::UnknownAttribute(*attribute_id));
            }
        }
        self.next_ingredient_id += 1;
        let id = IngredientId(self.next_ingredient_id);
        self.ingredients.insert(
            id,
            Ingredient { id, name, attributes: attributes.to_vec() },
        );
        Ok(id)
    }

    /// Insert an offering row. Offering names are deliberately not unique.
    pub fn insert_offering(&mut self, new: NewOffering) -> Result<OfferingId, DatabaseError> {
        if let Some(category_id) = new.category_id {
            if !self.categories.contains_key(&category_id) {
                return Err(DatabaseError::UnknownCategory(category_id));
            }
        }
        self.next_offering_id += 1;
        let id = OfferingId(self.next_offering_id);
        self.offerings.insert(
            id,
            Offering {
                id,
                name: new.name,
                description: new.description,
                price: new.price,
                category_id: new.category_id,
                recommended: new.recommended,
                quantity: new.quantity,
                ingredients: Vec::new(),
            },
        );
        Ok(id)
    }

    /// Associate an ingredient with an offering, with its removability flag.
    pub fn link_ingredient(
        &mut self,
        offering_id: OfferingId,
        ingredient_id: IngredientId,
        is_removable: bool,
    ) -> Result<(), DatabaseError> {
        if !self.ingredients.contains_key(&ingredient_id) {
            return Err(DatabaseError::UnknownIngredient(ingredient_id));
        }
        let offering = self
            .offerings
            .get_mut(&offering_id)
            .ok_or(DatabaseError::UnknownOffering(offering_id))?;
        if offering.ingredients.iter().any(|a| a.ingredient_id == ingredient_id) {
            return Err(DatabaseError::DuplicateLink(ingredient_id, offering_id));
        }
        offering.ingredients.push(OfferingIngredient { ingredient_id, is_removable });
        Ok(())
    }

    /// Insert an FAQ entry. Keys are unique.
    pub fn insert_faq(
        &mut self,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<(), DatabaseError> {
        let key = key.into();
        if self.faq.contains_key(&key) {
            return Err(DatabaseError::DuplicateFaqKey(key));
        }
        self.faq.insert(key, value.into());
        Ok(())
    }

    // --- Catalog maintenance ---

    /// Delete a category; offerings in it become uncategorized (SET NULL).
    pub fn delete_category(&mut self, id: CategoryId) -> Result<(), DatabaseError> {
        if self.categories.remove(&id).is_none() {
            return Err(DatabaseError::UnknownCategory(id));
        }
        for offering in self.offerings.values_mut() {
            if offering.category_id == Some(id) {
                offering.category_id = None;
            }
        }
        Ok(())
    }

    /// Delete an ingredient: cascades its offering associations, but is
    /// refused while any order-item modification references it (RESTRICT).
    pub fn delete_ingredient(&mut self, id: IngredientId) -> Result<(), DatabaseError> {
        if !self.ingredients.contains_key(&id) {
            return Err(DatabaseError::UnknownIngredient(id));
        }
        let referenced = self
            .order_items
            .values()
            .flat_map(|item| item.modifications.iter())
            .any(|m| m.ingredient_id == id);
        if referenced {
            return Err(DatabaseError::IngredientInUse(id));
        }
        self.ingredients.remove(&id);
        for offering in self.offerings.values_mut() {
            offering.ingredients.retain(|a| a.ingredient_id != id);
        }
        Ok(())
    }

    /// Delete an offering: cascades its ingredient associations, but is
    /// refused while any order item references it.
    pub fn delete_offering(&mut self, id: OfferingId) -> Result<(), DatabaseError> {
        if !self.offerings.contains_key(&id) {
            return Err(DatabaseError::UnknownOffering(id));
        }
        if self.order_items.values().any(|item| item.offering_id == id) {
            return Err(DatabaseError::OfferingInUse(id));
        }
        self.offerings.remove(&id);
        Ok(())
    }

    // --- Read access ---

    pub fn categories(&self) -> impl Iterator<Item = &MenuCategory> {
        self.categories.values()
    }

    pub fn offerings(&self) -> impl Iterator<Item = &Offering> {
        self.offerings.values()
    }

    pub fn offering(&self, id: OfferingId) -> Option<&Offering> {
        self.offerings.get(&id)
    }

    /// First offering with this exact name, in id order.
    pub fn offering_by_name(&self, name: &str) -> Option<&Offering> {
        self.offerings.values().find(|o| o.name == name)
    }

    pub fn category(&self, id: CategoryId) -> Option<&MenuCategory> {
        self.categories.get(&id)
    }

    pub fn ingredient(&self, id: IngredientId) -> Option<&Ingredient> {
        self.ingredients.get(&id)
    }

    pub fn attribute(&self, id: AttributeId) -> Option<&Attribute> {
        self.attributes.get(&id)
    }

    pub fn order_items(&self) -> impl Iterator<Item = &OrderItem> {
        self.order_items.values()
    }

    pub fn order_item(&self, id: OrderItemId) -> Option<&OrderItem> {
        self.order_items.get(&id)
    }

    pub fn faq_keys(&self) -> Vec<String> {
        self.faq.keys().cloned().collect()
    }

    pub fn faq_value(&self, key: &str) -> Option<&str> {
        self.faq.get(key).map(String::as_str)
    }

    // --- Ledger mutation (crate-internal; the ledger owns the invariants) ---

    pub(crate) fn offering_mut(&mut self, id: OfferingId) -> Option<&mut Offering> {
        self.offerings.get_mut(&id)
    }

    pub(crate) fn order_item_mut(&mut self, id: OrderItemId) -> Option<&mut OrderItem> {
        self.order_items.get_mut(&id)
    }

    pub(crate) fn order_items_mut(&mut self) -> impl Iterator<Item = &mut OrderItem> {
        self.order_items.values_mut()
    }

    /// Insert a new order item row in `pending` status and return its id.
    pub(crate) fn insert_order_item(
        &mut self,
        order_id: OrderId,
        offering_id: OfferingId,
        quantity: u32,
        special_instructions: Option<String>,
        modifications: Vec<OrderItemModification>,
        now: DateTime<Utc>,
    ) -> OrderItemId {
        self.next_order_item_id += 1;
        let id = OrderItemId(self.next_order_item_id);
        self.order_items.insert(
            id,
            OrderItem {
                id,
                order_id,
                offering_id,
                quantity,
                special_instructions,
                status: OrderStatus::Pending,
                created_at: now,
                updated_at: None,
                modifications,
            },
        );
        id
    }
}
