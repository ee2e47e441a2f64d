//! Named-record collection server
//!
//! Serves a small keyed collection of records over HTTP and persists it to a
//! single JSON file on shutdown.
//!
//! ## Modules
//!
//! - **`encoding`**: the wrapped JSON form of a collection and the whole-file
//!   persistence adapter.
//! - **`store`**: the lock-guarded in-memory `RecordStore`.
//! - **`record`**: the `Record` trait and the two shipped record types, pets and
//!   CI gating settings.
//! - **`protocol`**: the verb dispatcher and the stock PUT/GET/DELETE handlers.
//! - **`server`**: the axum listener, the `/close` endpoint and shutdown.
//! - **`config`**: TOML configuration.

pub mod config;
pub mod encoding;
pub mod error;
pub mod protocol;
pub mod record;
pub mod server;
pub mod store;

pub use error::{Error, Result};
pub use record::{IntegrationTestSettings, Pet, Record};
pub use server::{Server, ShutdownHandle};
pub use store::RecordStore;
