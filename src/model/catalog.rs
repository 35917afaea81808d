//! Catalog row types: categories, offerings, ingredients, allergen attributes.
//!
//! These are plain rows; the tables that own them (and enforce relational
//! integrity between them) live in [`crate::store::Database`].

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Type-safe identifier for menu categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CategoryId(pub u32);

/// Type-safe identifier for offerings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct OfferingId(pub u32);

/// Type-safe identifier for ingredients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct IngredientId(pub u32);

/// Type-safe identifier for allergen attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AttributeId(pub u32);

impl Display for CategoryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Display for OfferingId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Display for IngredientId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Display for AttributeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A menu category such as "Pizze" or "Beverages".
#[derive(Debug, Clone)]
pub struct MenuCategory {
    pub id: CategoryId,
    /// Unique category name.
    pub name: String,
    /// True for food categories, false for drinks.
    pub is_food: bool,
}

/// A purchasable menu item with price and stock.
///
/// Offering names are not required to be unique; lookups by name resolve to
/// the lowest id. `quantity` is the live stock counter, mutated only by the
/// order ledger's stock accounting.
#[derive(Debug, Clone)]
pub struct Offering {
    pub id: OfferingId,
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    /// Cleared (not cascaded) when the category is deleted.
    pub category_id: Option<CategoryId>,
    pub recommended: bool,
    pub quantity: u32,
    /// Ingredient associations, including the per-pair removability flag.
    pub ingredients: Vec<OfferingIngredient>,
}

/// Association between one offering and one ingredient.
///
/// The `is_removable` flag lives here and nowhere else: whether "Onions" can
/// be held is a property of the (offering, ingredient) pair, not of the
/// ingredient itself.
#[derive(Debug, Clone, Copy)]
pub struct OfferingIngredient {
    pub ingredient_id: IngredientId,
    pub is_removable: bool,
}

/// A globally unique ingredient, tagged with zero or more allergen attributes.
#[derive(Debug, Clone)]
pub struct Ingredient {
    pub id: IngredientId,
    /// Unique ingredient name ("Olive Oil", "Mozzarella").
    pub name: String,
    /// Allergen attribute memberships (many-to-many).
    pub attributes: Vec<AttributeId>,
}

/// An allergen or dietary tag ("Gluten", "Dairy").
#[derive(Debug, Clone)]
pub struct Attribute {
    pub id: AttributeId,
    /// Unique attribute name.
    pub name: String,
}
