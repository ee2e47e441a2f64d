//! Request dispatch
//!
//! This module turns HTTP requests on a collection route into store
//! operations: a [`Dispatcher`] picks the handler chain for the verb and each
//! [`RequestHandler`] in the chain writes into a shared [`Reply`].

pub mod dispatcher;
pub mod handlers;
pub mod message;

pub use dispatcher::{Dispatcher, RequestHandler};
pub use handlers::{DeleteHandler, GetHandler, PutHandler};
pub use message::{Reply, Request};
