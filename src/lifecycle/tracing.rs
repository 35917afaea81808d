//! # Observability & Tracing
//!
//! [`setup_tracing`] initializes structured logging for the whole engine.
//! Call it once, from the binary or a test harness.
//!
//! The compact format hides module paths (`with_target(false)`); log lines
//! carry structured fields instead (order ids, item names, advanced-row
//! counts). Verbosity is driven by `RUST_LOG`:
//!
//! ```bash
//! # Compact operational logs
//! RUST_LOG=info cargo run
//!
//! # Full request payloads at the store and dispatch boundaries
//! RUST_LOG=debug cargo run
//! ```
//!
//! What gets traced:
//!
//! - **Store task lifecycle**: startup, shutdown, final ledger size
//! - **Every store request**: payload at debug, outcome at info/warn
//! - **Dispatch boundary**: tool name, input, rendered output
//! - **Daemon**: tick outcomes and the cooperative stop
pub fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false) // Structured fields carry the context instead
        .compact()
        .init();
}
