//! Stock collection handlers
//!
//! One handler per verb, each holding a handle to the record store.

pub mod delete;
pub mod get;
pub mod put;

pub use delete::DeleteHandler;
pub use get::GetHandler;
pub use put::PutHandler;
