use crate::{data::Observation, error::MonitorError};
use std::{
    io::ErrorKind,
    path::{Path, PathBuf},
};
use tracing::debug;

/// Holds the single most recent observation as a JSON file.
pub struct SnapshotStore {
    path: PathBuf,
}

impl SnapshotStore {
    pub fn new<P: Into<PathBuf>>(path: P) -> SnapshotStore {
        SnapshotStore { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// `Ok(None)` when no snapshot was written yet.
    pub async fn load(&self) -> Result<Option<Observation>, MonitorError> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("No snapshot at {}", self.path.display());
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        };
        Ok(Some(serde_json::from_str(&content)?))
    }

    /// Replaces the snapshot via a sibling temp file renamed over the target.
    pub async fn save(&self, observation: &Observation) -> Result<(), MonitorError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        let json = serde_json::to_string_pretty(observation)?;
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, json).await?;
        tokio::fs::rename(&tmp, &self.path).await?;

        debug!("Saved snapshot to {}", self.path.display());
        Ok(())
    }
}
