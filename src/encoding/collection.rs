//! Named-record collection and its wrapped JSON form

use std::collections::BTreeMap;
use std::collections::btree_map;
use std::fmt;
use std::marker::PhantomData;

use serde::de::{self, IgnoredAny, MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::record::Record;

/// Records keyed by name.
///
/// Serializes as `{"<R::COLLECTION_KEY>": {"<name>": {...}, ...}}` with names
/// in ascending order. A missing or `null` wrapper field decodes to an empty
/// collection and unknown top-level fields are ignored.
#[derive(Debug, Clone, PartialEq)]
pub struct Collection<R> {
    records: BTreeMap<String, R>,
}

impl<R> Collection<R> {
    /// Create an empty collection
    pub fn new() -> Self {
        Self {
            records: BTreeMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&R> {
        self.records.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.records.contains_key(name)
    }

    /// Insert or overwrite the record at `name`
    pub fn insert(&mut self, name: impl Into<String>, record: R) -> Option<R> {
        self.records.insert(name.into(), record)
    }

    pub fn remove(&mut self, name: &str) -> Option<R> {
        self.records.remove(name)
    }

    pub(crate) fn entry(&mut self, name: impl Into<String>) -> btree_map::Entry<'_, String, R> {
        self.records.entry(name.into())
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, R> {
        self.records.iter()
    }
}

impl<R> Default for Collection<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R> IntoIterator for Collection<R> {
    type Item = (String, R);
    type IntoIter = btree_map::IntoIter<String, R>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.into_iter()
    }
}

impl<R, K: Into<String>> FromIterator<(K, R)> for Collection<R> {
    fn from_iter<I: IntoIterator<Item = (K, R)>>(iter: I) -> Self {
        Self {
            records: iter.into_iter().map(|(k, r)| (k.into(), r)).collect(),
        }
    }
}

impl<R: Record> Serialize for Collection<R> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(R::COLLECTION_KEY, &self.records)?;
        map.end()
    }
}

impl<'de, R: Record> Deserialize<'de> for Collection<R> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(CollectionVisitor(PhantomData))
    }
}

struct CollectionVisitor<R>(PhantomData<R>);

impl<'de, R: Record> Visitor<'de> for CollectionVisitor<R> {
    type Value = Collection<R>;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "an object with a `{}` field", R::COLLECTION_KEY)
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
        let mut records: Option<BTreeMap<String, R>> = None;

        while let Some(key) = map.next_key::<String>()? {
            if key != R::COLLECTION_KEY {
                map.next_value::<IgnoredAny>()?;
                continue;
            }
            if records.is_some() {
                return Err(de::Error::duplicate_field(R::COLLECTION_KEY));
            }
            records = Some(map.next_value::<Option<BTreeMap<String, R>>>()?.unwrap_or_default());
        }

        Ok(Collection {
            records: records.unwrap_or_default(),
        })
    }
}
