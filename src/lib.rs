//! # Maitred
//!
//! > **A conversational restaurant ordering engine.**
//!
//! This crate is the core behind an LLM-driven waiter: a relational catalog
//! of menu offerings, ingredients and allergens, an order ledger with strict
//! stock accounting, and a fixed tool surface the conversation loop invokes
//! with JSON and reads back as text. The chat UI and the language-model
//! client live elsewhere; they only ever see `execute_tool(name, input) ->
//! String`.
//!
//! ## 🏗️ Design
//!
//! All state lives in one [`store::Database`], owned by a single store task
//! that handles one request at a time. That sequencing is the whole
//! concurrency story: a request is a transaction, transactions are
//! serialized, and the stock counter can never be raced. Handlers validate
//! before they mutate, so a rejected request leaves no partial state.
//!
//! The interesting invariants are in the ledger:
//!
//! - Stock conservation: placement decrements offering stock, cancellation
//!   from `pending` restores it, nothing else touches it.
//! - Status monotonicity: `pending → preparing → served` by elapsed time
//!   only; cancellation and payment are caller-triggered; nothing moves
//!   backward.
//! - Idempotent cancellation: the second cancel of an item is a report, not
//!   a second stock credit.
//!
//! ## 🗺️ Module Tour
//!
//! - [`model`]: row types: catalog entities, order items, the status enum.
//! - [`store`]: the tables ([`store::Database`]), the store task
//!   ([`store::StoreActor`]) and its closed request protocol, seed data.
//! - [`catalog`]: read-only queries: categories, filtered menu search,
//!   allergen lookups, FAQ.
//! - [`exclusions`]: which ingredients may be removed from an order item,
//!   from an explicit list or mined out of free-text instructions.
//! - [`ledger`]: placement, cancellation, quantity updates, the archival
//!   sweep; every stock-accounting rule lives here.
//! - [`daemon`]: the time-driven status advance and its background task.
//! - [`receipt`]: itemized receipts and payment marking.
//! - [`dispatch`]: the tool boundary: `(name, JSON) -> String`, closed
//!   [`dispatch::ToolCall`] union, never panics, never propagates.
//! - [`clients`]: the typed async handle everything shares.
//! - [`lifecycle`]: [`lifecycle::RestaurantSystem`] orchestration and
//!   tracing setup.
//!
//! ## 🚀 Quick Start
//!
//! ```bash
//! # Run the demo conversation against the seeded trattoria
//! RUST_LOG=info cargo run
//! ```

pub mod catalog;
pub mod clients;
pub mod daemon;
pub mod dispatch;
pub mod exclusions;
pub mod ledger;
pub mod lifecycle;
pub mod model;
pub mod receipt;
pub mod store;
