//! System lifecycle and orchestration.
//!
//! [`RestaurantSystem`] is the conductor: it spawns the store task, runs the
//! one-time archival sweep, starts the status refresh daemon, hands out the
//! shared client, and coordinates a clean shutdown (daemon first, then the
//! store). [`setup_tracing`] lives here too, so a binary has a single place
//! to bring the whole runtime up.

pub mod system;
pub mod tracing;

pub use self::system::*;
pub use self::tracing::*;
