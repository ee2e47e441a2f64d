use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::error::{Error, Result};
use crate::protocol::dispatcher::RequestHandler;
use crate::protocol::message::{Reply, Request};
use crate::record::Record;
use crate::store::RecordStore;

/// DELETE: drop the named record
pub struct DeleteHandler<R: Record> {
    store: Arc<RecordStore<R>>,
}

impl<R: Record> DeleteHandler<R> {
    pub fn new(store: Arc<RecordStore<R>>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl<R: Record> RequestHandler for DeleteHandler<R> {
    async fn handle_request(&self, request: &Request, reply: &mut Reply) -> Result<()> {
        let name = request
            .param(R::QUERY_PARAM)
            .ok_or(Error::MissingParameter(R::QUERY_PARAM))?;

        debug!("Removing {} from {}", name, R::COLLECTION_KEY);
        let collection = self.store.remove(name)?;

        reply.json(&collection)
    }
}
