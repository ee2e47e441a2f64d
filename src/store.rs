use std::path::Path;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::{debug, info};

use crate::encoding::{Collection, JsonFile};
use crate::error::{Error, Result};
use crate::record::Record;

/// In-memory record collection backed by a JSON file.
///
/// Every operation holds the lock for its whole duration: `load`, `store`,
/// `add` and `remove` take it exclusively, `all` and `one` share it.
pub struct RecordStore<R: Record> {
    file: JsonFile,
    data: RwLock<Collection<R>>,
}

impl<R: Record> RecordStore<R> {
    /// Create an empty store bound to `path` without reading it
    pub fn new(path: impl AsRef<Path>) -> Result<Self> {
        Ok(Self {
            file: JsonFile::new(path)?,
            data: RwLock::new(Collection::new()),
        })
    }

    /// Create a store bound to `path`, loading it if the file exists
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let store = Self::new(path)?;

        match store.load() {
            Ok(()) => info!(
                "Loaded {} records from {}",
                store.len()?,
                store.path().display()
            ),
            Err(e) if e.is_not_found() => info!(
                "No data file at {}, starting empty",
                store.path().display()
            ),
            Err(e) => return Err(e),
        }

        Ok(store)
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// Replace the in-memory collection with the file contents
    pub fn load(&self) -> Result<()> {
        let mut data = self.write()?;
        *data = self.file.deserialize()?;
        Ok(())
    }

    /// Write the whole collection to the file
    pub fn store(&self) -> Result<()> {
        let data = self.write()?;
        self.file.serialize(&data)?;
        debug!("Stored {} records to {}", data.len(), self.path().display());
        Ok(())
    }

    /// Insert or overwrite `name`, returning the updated collection
    pub fn add(&self, name: impl Into<String>, record: R) -> Result<Collection<R>> {
        let name = name.into();
        if record.is_trivial() {
            debug!("Storing all-zero record {} in {}", name, R::COLLECTION_KEY);
        }

        let mut data = self.write()?;
        data.insert(name, record);
        Ok(data.clone())
    }

    /// Delete `name` if present, returning the updated collection
    pub fn remove(&self, name: &str) -> Result<Collection<R>> {
        let mut data = self.write()?;
        data.remove(name);
        Ok(data.clone())
    }

    /// Snapshot of the whole collection
    pub fn all(&self) -> Result<Collection<R>> {
        Ok(self.read()?.clone())
    }

    /// Collection holding `name` only, or nothing if it is unknown.
    ///
    /// A stored record is returned even when all of its fields are zero.
    /// Unknown names resolve through [`Record::fallback`].
    pub fn one(&self, name: &str) -> Result<Collection<R>> {
        let mut result = Collection::new();
        if let Some(record) = self.effective(name)? {
            result.insert(name, record);
        }
        Ok(result)
    }

    pub fn contains(&self, name: &str) -> Result<bool> {
        Ok(self.read()?.contains(name))
    }

    pub fn len(&self) -> Result<usize> {
        Ok(self.read()?.len())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.read()?.is_empty())
    }

    /// Stored value of `name`, else the variant's fallback
    pub(crate) fn effective(&self, name: &str) -> Result<Option<R>> {
        let data = self.read()?;
        Ok(data.get(name).cloned().or_else(R::fallback))
    }

    /// Modify `name` in place, seeding unknown names from the fallback
    pub(crate) fn update(&self, name: &str, f: impl FnOnce(&mut R)) -> Result<Collection<R>> {
        let mut data = self.write()?;
        let record = data
            .entry(name)
            .or_insert_with(|| R::fallback().unwrap_or_default());
        f(record);
        Ok(data.clone())
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Collection<R>>> {
        self.data.read().map_err(|_| Error::LockPoisoned)
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Collection<R>>> {
        self.data.write().map_err(|_| Error::LockPoisoned)
    }
}
