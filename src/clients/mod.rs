//! Type-safe client handles; no raw message passing leaks past this module.

pub mod store_client;

pub use store_client::*;
