//! CI gating settings
//!
//! Each record is keyed by an integration test path and says whether the test
//! runs at all and whether its failure blocks the CI build. A test nobody has
//! configured yet is treated as enabled and gating.

use serde::{Deserialize, Serialize};

use super::Record;
use crate::error::Result;
use crate::store::RecordStore;

/// Gating flags for one integration test
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IntegrationTestSettings {
    pub enabled: bool,
    pub gates_ci_build: bool,
}

impl IntegrationTestSettings {
    pub fn new(enabled: bool, gates_ci_build: bool) -> Self {
        Self {
            enabled,
            gates_ci_build,
        }
    }
}

impl Record for IntegrationTestSettings {
    const COLLECTION_KEY: &'static str = "settings_collection";
    const ROUTE: &'static str = "/integrationTest";
    const QUERY_PARAM: &'static str = "testPath";

    fn fallback() -> Option<Self> {
        Some(Self::new(true, true))
    }

    fn apply(store: &RecordStore<Self>, name: &str, record: Self) -> Result<()> {
        if record.enabled {
            store.enable_integration_test(name)?;
        } else {
            store.disable_integration_test(name)?;
        }

        if record.gates_ci_build {
            store.enable_gating(name)
        } else {
            store.disable_gating(name)
        }
    }
}

impl RecordStore<IntegrationTestSettings> {
    /// Whether the test at `test_path` should run
    pub fn is_enabled(&self, test_path: &str) -> Result<bool> {
        Ok(self.effective(test_path)?.is_some_and(|s| s.enabled))
    }

    /// Whether a failure of the test at `test_path` fails the build
    pub fn is_gating(&self, test_path: &str) -> Result<bool> {
        Ok(self.effective(test_path)?.is_some_and(|s| s.gates_ci_build))
    }

    pub fn enable_integration_test(&self, test_path: &str) -> Result<()> {
        self.update(test_path, |s| s.enabled = true).map(|_| ())
    }

    pub fn disable_integration_test(&self, test_path: &str) -> Result<()> {
        self.update(test_path, |s| s.enabled = false).map(|_| ())
    }

    pub fn enable_gating(&self, test_path: &str) -> Result<()> {
        self.update(test_path, |s| s.gates_ci_build = true).map(|_| ())
    }

    pub fn disable_gating(&self, test_path: &str) -> Result<()> {
        self.update(test_path, |s| s.gates_ci_build = false).map(|_| ())
    }
}
