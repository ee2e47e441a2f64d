//! Whole-file JSON persistence for a collection

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::encoding::Collection;
use crate::error::{Error, Result};
use crate::record::Record;

/// Reads and writes one collection as a single JSON document.
///
/// Writes truncate and rewrite the file; there is no atomic rename and no
/// file-level locking, so callers serialize access themselves.
#[derive(Debug, Clone)]
pub struct JsonFile {
    path: PathBuf,
}

impl JsonFile {
    /// Bind the adapter to `path`
    pub fn new(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if path.as_os_str().is_empty() {
            return Err(Error::InvalidArgument(
                "settings file path may not be empty".to_string(),
            ));
        }

        Ok(Self {
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write `collection`, creating the file or truncating an existing one
    pub fn serialize<R: Record>(&self, collection: &Collection<R>) -> Result<()> {
        // Encode before touching the file so an encoding failure leaves it intact.
        let encoded = serde_json::to_vec(collection)?;

        let mut file = File::create(&self.path)?;
        file.write_all(&encoded)?;
        file.flush()?;

        Ok(())
    }

    /// Read the whole file back into a collection
    pub fn deserialize<R: Record>(&self) -> Result<Collection<R>> {
        let data = fs::read(&self.path)?;
        Ok(serde_json::from_slice(&data)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{IntegrationTestSettings, Pet};
    use tempfile::TempDir;

    const SHASTA: &str = "Shasta";
    const GRACIE: &str = "Gracie";
    const BUTTONS: &str = "Buttons";

    fn three_pets() -> Collection<Pet> {
        [
            (SHASTA, Pet::new(9, "Spitz")),
            (GRACIE, Pet::new(9, "Spitz")),
            (BUTTONS, Pet::new(2, "Terrier")),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_empty_path_rejected() {
        assert!(matches!(JsonFile::new(""), Err(Error::InvalidArgument(_))));
    }

    #[test]
    fn test_storing_one_pet() {
        let dir = TempDir::new().unwrap();
        let file = JsonFile::new(dir.path().join("pets.json")).unwrap();

        let mut pets = Collection::new();
        pets.insert(SHASTA, Pet::new(9, "Spitz"));
        file.serialize(&pets).unwrap();

        let decoded: Collection<Pet> = file.deserialize().unwrap();
        assert_eq!(decoded.len(), 1);
        assert_eq!(decoded.get(SHASTA), Some(&Pet::new(9, "Spitz")));
    }

    #[test]
    fn test_storing_three_pets() {
        let dir = TempDir::new().unwrap();
        let file = JsonFile::new(dir.path().join("pets.json")).unwrap();

        file.serialize(&three_pets()).unwrap();

        let decoded: Collection<Pet> = file.deserialize().unwrap();
        assert_eq!(decoded, three_pets());
    }

    #[test]
    fn test_overwrite_truncates() {
        let dir = TempDir::new().unwrap();
        let file = JsonFile::new(dir.path().join("pets.json")).unwrap();

        file.serialize(&three_pets()).unwrap();
        file.serialize(&Collection::<Pet>::new()).unwrap();

        let raw = fs::read_to_string(file.path()).unwrap();
        assert_eq!(raw, r#"{"pets_collection":{}}"#);
    }

    #[test]
    fn test_settings_round_trip() {
        let dir = TempDir::new().unwrap();
        let file = JsonFile::new(dir.path().join("settings.json")).unwrap();

        let mut settings = Collection::new();
        settings.insert("ick.json", IntegrationTestSettings::new(true, true));
        settings.insert("poo.json", IntegrationTestSettings::new(false, false));
        file.serialize(&settings).unwrap();

        let decoded: Collection<IntegrationTestSettings> = file.deserialize().unwrap();
        assert_eq!(decoded, settings);
    }

    #[test]
    fn test_missing_file_is_not_found() {
        let dir = TempDir::new().unwrap();
        let file = JsonFile::new(dir.path().join("absent.json")).unwrap();

        let err = file.deserialize::<Pet>().unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_malformed_file_is_encoding_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("broken.json");
        fs::write(&path, "{\"pets_collection\":").unwrap();

        let file = JsonFile::new(&path).unwrap();
        assert!(matches!(
            file.deserialize::<Pet>(),
            Err(Error::Encoding(_))
        ));
    }

    #[test]
    fn test_unwritable_path_is_io_error() {
        let dir = TempDir::new().unwrap();
        let file = JsonFile::new(dir.path().join("missing-dir").join("pets.json")).unwrap();

        assert!(matches!(
            file.serialize(&Collection::<Pet>::new()),
            Err(Error::Io(_))
        ));
    }
}
