use std::sync::Arc;

use async_trait::async_trait;

use crate::error::Result;
use crate::protocol::dispatcher::RequestHandler;
use crate::protocol::message::{Reply, Request};
use crate::record::Record;
use crate::store::RecordStore;

/// GET: the whole collection, or a single named record
pub struct GetHandler<R: Record> {
    store: Arc<RecordStore<R>>,
}

impl<R: Record> GetHandler<R> {
    pub fn new(store: Arc<RecordStore<R>>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl<R: Record> RequestHandler for GetHandler<R> {
    async fn handle_request(&self, request: &Request, reply: &mut Reply) -> Result<()> {
        let collection = match request.param(R::QUERY_PARAM) {
            Some(name) => self.store.one(name)?,
            None => self.store.all()?,
        };

        reply.json(&collection)
    }
}
