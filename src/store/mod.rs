//! The transactional store: relational tables behind a message-serialized
//! task.
//!
//! [`Database`] holds the rows; [`StoreActor`] owns the database and
//! processes [`StoreRequest`]s one at a time (each message is one
//! transaction); [`new`] wires the pair up with its client handle.

pub mod actor;
pub mod database;
pub mod error;
pub mod seed;

pub use actor::{Respond, StoreActor, StoreRequest};
pub use database::{Database, NewOffering};
pub use error::{DatabaseError, StoreError};

use tokio::sync::mpsc;

use crate::clients::StoreClient;

/// Create the store task over `db` and the client handle for talking to it.
///
/// The caller spawns the actor (`tokio::spawn(actor.run())`) and clones the
/// client for every component that needs store access; the actor exits when
/// the last clone is dropped.
pub fn new(db: Database) -> (StoreActor, StoreClient) {
    let (sender, receiver) = mpsc::channel(32);
    (StoreActor::new(receiver, db), StoreClient::new(sender))
}
