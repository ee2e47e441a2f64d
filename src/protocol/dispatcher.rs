use std::sync::Arc;

use async_trait::async_trait;
use axum::http::Method;
use tracing::debug;

use crate::error::{Error, Result};
use crate::protocol::handlers::{DeleteHandler, GetHandler, PutHandler};
use crate::protocol::message::{Reply, Request};
use crate::record::Record;
use crate::store::RecordStore;

/// One link of a verb's handler chain
#[async_trait]
pub trait RequestHandler: Send + Sync {
    /// Handle the request, writing into `reply`; an error stops the chain
    async fn handle_request(&self, request: &Request, reply: &mut Reply) -> Result<()>;
}

type HandlerChain = Vec<Box<dyn RequestHandler>>;

/// Routes PUT, GET and DELETE to ordered handler chains
#[derive(Default)]
pub struct Dispatcher {
    put_handlers: HandlerChain,
    get_handlers: HandlerChain,
    delete_handlers: HandlerChain,
}

impl Dispatcher {
    /// Dispatcher with the stock put/get/delete handler over `store`
    pub fn new<R: Record>(store: Arc<RecordStore<R>>) -> Self {
        let mut dispatcher = Self::empty();
        dispatcher.add_put_handler(PutHandler::new(Arc::clone(&store)));
        dispatcher.add_get_handler(GetHandler::new(Arc::clone(&store)));
        dispatcher.add_delete_handler(DeleteHandler::new(store));
        dispatcher
    }

    /// Dispatcher with no handlers registered
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn add_put_handler(&mut self, handler: impl RequestHandler + 'static) {
        self.put_handlers.push(Box::new(handler));
    }

    pub fn add_get_handler(&mut self, handler: impl RequestHandler + 'static) {
        self.get_handlers.push(Box::new(handler));
    }

    pub fn add_delete_handler(&mut self, handler: impl RequestHandler + 'static) {
        self.delete_handlers.push(Box::new(handler));
    }

    /// Run the chain registered for the request's verb
    pub async fn handle_request(&self, request: &Request, reply: &mut Reply) -> Result<()> {
        let chain = match request.method {
            Method::PUT => &self.put_handlers,
            Method::GET => &self.get_handlers,
            Method::DELETE => &self.delete_handlers,
            _ => return Err(Error::UnsupportedMethod(request.method.clone())),
        };

        debug!("Dispatching {} to {} handler(s)", request.method, chain.len());

        for handler in chain {
            handler.handle_request(request, reply).await?;
        }

        Ok(())
    }
}
