//! Record types served by the collection endpoints
//!
//! Every collection is the same shape: a JSON object keyed by record name,
//! wrapped under one top-level field. A [`Record`] describes the per-variant
//! details (wrapper key, route, query parameter, defaults) so the store,
//! handlers and server can be written once.

pub mod ci;
pub mod pet;

use std::fmt::Debug;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::Result;
use crate::store::RecordStore;

pub use ci::IntegrationTestSettings;
pub use pet::Pet;

/// A value stored under a name in a [`RecordStore`].
pub trait Record:
    Debug + Clone + Default + PartialEq + Serialize + DeserializeOwned + Send + Sync + 'static
{
    /// Top-level JSON field wrapping the collection.
    const COLLECTION_KEY: &'static str;

    /// HTTP path the collection is served on.
    const ROUTE: &'static str;

    /// Query parameter naming a single record.
    const QUERY_PARAM: &'static str;

    /// Whether every field holds its zero value.
    fn is_trivial(&self) -> bool {
        *self == Self::default()
    }

    /// Effective value of a name that was never stored, if the variant has one.
    fn fallback() -> Option<Self> {
        None
    }

    /// Merge one entry of a PUT payload into the store.
    fn apply(store: &RecordStore<Self>, name: &str, record: Self) -> Result<()> {
        store.add(name, record).map(|_| ())
    }
}
