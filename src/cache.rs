use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::data::error::DatasetLoadError;
use crate::data::loader::load_dataset;
use crate::data::model::RowTable;
use crate::predict::artifact::{load_artifact, ModelArtifact};
use crate::predict::error::ModelLoadError;

// ---------------------------------------------------------------------------
// Session cache: load each source path at most once per process
// ---------------------------------------------------------------------------

/// Loaded sources, keyed by path, kept for the life of the process.
///
/// Lookup is populate-on-miss behind a mutex (single writer on miss, shared
/// reads otherwise). Load errors are returned to the caller and never
/// cached, so fixing a file and re-triggering the action retries the load.
/// Entries never expire; the working set is a handful of paths.
#[derive(Default)]
pub struct SessionCache {
    datasets: Mutex<HashMap<PathBuf, Arc<RowTable>>>,
    artifacts: Mutex<HashMap<PathBuf, Arc<ModelArtifact>>>,
}

impl SessionCache {
    /// The dataset at `path`, loading it on first access.
    pub fn dataset(&self, path: &Path) -> Result<Arc<RowTable>, DatasetLoadError> {
        let mut map = self.datasets.lock().expect("dataset cache lock poisoned");
        if let Some(hit) = map.get(path) {
            return Ok(Arc::clone(hit));
        }
        let table = Arc::new(load_dataset(path)?);
        map.insert(path.to_path_buf(), Arc::clone(&table));
        Ok(table)
    }

    /// The model artifact at `path`, loading it on first access.
    pub fn artifact(&self, path: &Path) -> Result<Arc<ModelArtifact>, ModelLoadError> {
        let mut map = self.artifacts.lock().expect("artifact cache lock poisoned");
        if let Some(hit) = map.get(path) {
            return Ok(Arc::clone(hit));
        }
        let artifact = Arc::new(load_artifact(path)?);
        map.insert(path.to_path_buf(), Arc::clone(&artifact));
        Ok(artifact)
    }
}
