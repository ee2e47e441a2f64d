use serde::{Deserialize, Serialize};

use super::Record;

/// A pet, keyed by its name
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Pet {
    pub age: i64,
    pub breed: String,
}

impl Pet {
    pub fn new(age: i64, breed: impl Into<String>) -> Self {
        Self {
            age,
            breed: breed.into(),
        }
    }
}

impl Record for Pet {
    const COLLECTION_KEY: &'static str = "pets_collection";
    const ROUTE: &'static str = "/pet";
    const QUERY_PARAM: &'static str = "name";
}
