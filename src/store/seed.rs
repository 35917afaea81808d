//! Demo catalog provisioning.
//!
//! Offerings and their associations are provisioned out-of-band; this module
//! is that band for the demo binary and for anyone wanting a populated
//! engine to poke at. Production deployments build their own [`Database`]
//! the same way.

use rust_decimal::Decimal;

use crate::store::{Database, DatabaseError, NewOffering};

fn price(units: i64, cents: i64) -> Decimal {
    Decimal::new(units * 100 + cents, 2)
}

/// A small trattoria: two food categories, one drink category, allergen-
/// tagged ingredients, and a few FAQ entries.
pub fn demo_database() -> Result<Database, DatabaseError> {
    let mut db = Database::new();

    let pizze = db.insert_category("Pizze", true)?;
    let primi = db.insert_category("Primi", true)?;
    let drinks = db.insert_category("Beverages", false)?;

    let gluten = db.insert_attribute("Gluten")?;
    let dairy = db.insert_attribute("Dairy")?;
    let eggs = db.insert_attribute("Eggs")?;
    let pork = db.insert_attribute("Pork")?;

    let dough = db.insert_ingredient("Wheat Dough", &[gluten])?;
    let tomato_sauce = db.insert_ingredient("Tomato Sauce", &[])?;
    let mozzarella = db.insert_ingredient("Mozzarella", &[dairy])?;
    let basil = db.insert_ingredient("Basil", &[])?;
    let olive_oil = db.insert_ingredient("Olive Oil", &[])?;
    let onions = db.insert_ingredient("Onions", &[])?;
    let guanciale = db.insert_ingredient("Guanciale", &[pork])?;
    let egg_yolk = db.insert_ingredient("Egg Yolk", &[eggs])?;
    let pecorino = db.insert_ingredient("Pecorino", &[dairy])?;
    let spaghetti = db.insert_ingredient("Spaghetti", &[gluten, eggs])?;
    let lemon = db.insert_ingredient("Lemon", &[])?;
    let sparkling_water = db.insert_ingredient("Sparkling Water", &[])?;

    let margherita = db.insert_offering(NewOffering {
        name: "Margherita".to_string(),
        description: Some("Tomato, mozzarella and fresh basil".to_string()),
        price: price(9, 0),
        category_id: Some(pizze),
        recommended: true,
        quantity: 12,
    })?;
    db.link_ingredient(margherita, dough, false)?;
    db.link_ingredient(margherita, tomato_sauce, false)?;
    db.link_ingredient(margherita, mozzarella, true)?;
    db.link_ingredient(margherita, basil, true)?;
    db.link_ingredient(margherita, olive_oil, true)?;

    let marinara = db.insert_offering(NewOffering {
        name: "Marinara".to_string(),
        description: Some("Tomato, garlic and oregano, no cheese".to_string()),
        price: price(7, 50),
        category_id: Some(pizze),
        recommended: false,
        quantity: 10,
    })?;
    db.link_ingredient(marinara, dough, false)?;
    db.link_ingredient(marinara, tomato_sauce, false)?;
    db.link_ingredient(marinara, olive_oil, true)?;
    db.link_ingredient(marinara, onions, true)?;

    let carbonara = db.insert_offering(NewOffering {
        name: "Spaghetti alla Carbonara".to_string(),
        description: Some("Guanciale, egg yolk and pecorino".to_string()),
        price: price(12, 0),
        category_id: Some(primi),
        recommended: true,
        quantity: 8,
    })?;
    db.link_ingredient(carbonara, spaghetti, false)?;
    db.link_ingredient(carbonara, egg_yolk, false)?;
    db.link_ingredient(carbonara, guanciale, true)?;
    db.link_ingredient(carbonara, pecorino, true)?;

    let lemonade = db.insert_offering(NewOffering {
        name: "Lemonade".to_string(),
        description: Some("Fresh squeezed, lightly sparkling".to_string()),
        price: price(3, 50),
        category_id: Some(drinks),
        recommended: false,
        quantity: 30,
    })?;
    db.link_ingredient(lemonade, lemon, true)?;
    db.link_ingredient(lemonade, sparkling_water, false)?;

    db.insert_faq("opening_hours", "We are open every day from 11:00 to 23:00.")?;
    db.insert_faq("reservations", "Call us or just walk in; groups above 8 should book ahead.")?;
    db.insert_faq("payment_methods", "We take cards, cash and contactless payments.")?;

    Ok(db)
}
