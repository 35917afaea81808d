//! Read-only catalog queries: category listing, filtered menu search,
//! allergen lookups, and the FAQ table.

use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeSet;

use crate::model::Offering;
use crate::store::{Database, StoreError};

/// Conjunctive menu search filters; every supplied clause must hold.
#[derive(Debug, Clone, Default)]
pub struct MenuFilter {
    /// Food (true) or drink (false); offerings without a category never match.
    pub is_food: Option<bool>,
    /// Category names to include.
    pub categories: Option<Vec<String>>,
    pub is_recommended: Option<bool>,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
    /// Ingredient names that must all be present (exact names, AND).
    pub must_include: Option<Vec<String>>,
    /// Ingredient names that must all be absent (exact names, AND).
    pub must_exclude: Option<Vec<String>>,
}

/// One menu search result row, in the wire shape the conversation layer
/// expects (`"food"` is the offering name; `"excluded items"` is the allergen
/// union).
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MenuEntry {
    pub category: String,
    #[serde(rename = "food")]
    pub name: String,
    pub price: Decimal,
    pub description: Option<String>,
    pub ingredients: Vec<String>,
    #[serde(rename = "excluded items")]
    pub allergens: Vec<String>,
}

/// Category names, optionally filtered by the food/drink flag.
pub fn list_categories(db: &Database, is_food: Option<bool>) -> Vec<String> {
    db.categories()
        .filter(|category| is_food.is_none_or(|v| category.is_food == v))
        .map(|category| category.name.clone())
        .collect()
}

fn has_ingredient(db: &Database, offering: &Offering, name: &str) -> bool {
    offering.ingredients.iter().any(|assoc| {
        db.ingredient(assoc.ingredient_id)
            .is_some_and(|ingredient| ingredient.name == name)
    })
}

/// Sorted, deduplicated union of allergen-attribute names across an
/// offering's ingredients. Recomputed from memberships, never stored.
fn allergen_union(db: &Database, offering: &Offering) -> Vec<String> {
    let mut names: BTreeSet<String> = BTreeSet::new();
    for assoc in &offering.ingredients {
        let Some(ingredient) = db.ingredient(assoc.ingredient_id) else {
            continue;
        };
        for attribute_id in &ingredient.attributes {
            if let Some(attribute) = db.attribute(*attribute_id) {
                names.insert(attribute.name.clone());
            }
        }
    }
    names.into_iter().collect()
}

/// Offerings matching every supplied filter clause, in id order.
pub fn search_menu(db: &Database, filter: &MenuFilter) -> Vec<MenuEntry> {
    db.offerings()
        .filter(|offering| {
            let category = offering.category_id.and_then(|id| db.category(id));
            if let Some(is_food) = filter.is_food {
                if category.is_none_or(|c| c.is_food != is_food) {
                    return false;
                }
            }
            if let Some(names) = &filter.categories {
                if category.is_none_or(|c| !names.contains(&c.name)) {
                    return false;
                }
            }
            if let Some(recommended) = filter.is_recommended {
                if offering.recommended != recommended {
                    return false;
                }
            }
            if let Some(min) = filter.min_price {
                if offering.price < min {
                    return false;
                }
            }
            if let Some(max) = filter.max_price {
                if offering.price > max {
                    return false;
                }
            }
            if let Some(required) = &filter.must_include {
                if !required.iter().all(|name| has_ingredient(db, offering, name)) {
                    return false;
                }
            }
            if let Some(banned) = &filter.must_exclude {
                if banned.iter().any(|name| has_ingredient(db, offering, name)) {
                    return false;
                }
            }
            true
        })
        .map(|offering| MenuEntry {
            category: offering
                .category_id
                .and_then(|id| db.category(id))
                .map(|c| c.name.clone())
                .unwrap_or_else(|| "Uncategorized".to_string()),
            name: offering.name.clone(),
            price: offering.price,
            description: offering.description.clone(),
            ingredients: offering
                .ingredients
                .iter()
                .filter_map(|assoc| db.ingredient(assoc.ingredient_id).map(|i| i.name.clone()))
                .collect(),
            allergens: allergen_union(db, offering),
        })
        .collect()
}

/// Allergen information for one offering, resolved by exact name.
///
/// Without a check-list, the full deduplicated allergen name set. With one,
/// a containment statement per requested allergen, in the caller's order.
pub fn get_allergens(
    db: &Database,
    item_name: &str,
    allergens_to_check: Option<&[String]>,
) -> Result<Vec<String>, StoreError> {
    let offering = db
        .offering_by_name(item_name)
        .ok_or_else(|| StoreError::OfferingNotFound(item_name.to_string()))?;

    let actual = allergen_union(db, offering);

    match allergens_to_check {
        None => Ok(actual),
        Some(to_check) => {
            let actual: BTreeSet<&str> = actual.iter().map(String::as_str).collect();
            Ok(to_check
                .iter()
                .map(|allergen| {
                    if actual.contains(allergen.as_str()) {
                        format!("{} contains {}", offering.name, allergen)
                    } else {
                        format!("{} does not contain {}", offering.name, allergen)
                    }
                })
                .collect())
        }
    }
}

/// All FAQ keys the conversation layer may ask about.
pub fn faq_keys(db: &Database) -> Vec<String> {
    db.faq_keys()
}

/// The FAQ text under `key`.
pub fn faq_value(db: &Database, key: &str) -> Result<String, StoreError> {
    db.faq_value(key)
        .map(str::to_string)
        .ok_or_else(|| StoreError::FaqNotFound(key.to_string()))
}
