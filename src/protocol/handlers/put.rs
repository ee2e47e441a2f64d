use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::encoding::Collection;
use crate::error::Result;
use crate::protocol::dispatcher::RequestHandler;
use crate::protocol::message::{Reply, Request};
use crate::record::Record;
use crate::store::RecordStore;

/// PUT: merge the posted collection into the store
pub struct PutHandler<R: Record> {
    store: Arc<RecordStore<R>>,
}

impl<R: Record> PutHandler<R> {
    pub fn new(store: Arc<RecordStore<R>>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl<R: Record> RequestHandler for PutHandler<R> {
    async fn handle_request(&self, request: &Request, reply: &mut Reply) -> Result<()> {
        let payload: Collection<R> = serde_json::from_slice(&request.body).inspect_err(|e| {
            warn!("Failed to decode {} payload: {}", R::COLLECTION_KEY, e);
        })?;

        debug!("Merging {} records into {}", payload.len(), R::COLLECTION_KEY);

        for (name, record) in payload {
            R::apply(&self.store, &name, record)?;
        }

        reply.json(&self.store.all()?)
    }
}
