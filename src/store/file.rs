//! JSON backing file for the event store.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Duration;

use super::Store;
use crate::error::{FeedError, Result};

pub const EVENTS_FILE: &str = "events.json";

/// The persisted copy of a [`Store`].
///
/// Writes go to a uniquely named sibling `.tmp` file that is then renamed
/// over the target, so readers see either the previous or the next complete
/// document.
#[derive(Debug, Clone)]
pub struct LogFile {
    path: PathBuf,
    timeout: Duration,
}

impl LogFile {
    pub fn new(path: impl Into<PathBuf>, timeout: Duration) -> Self {
        Self {
            path: path.into(),
            timeout,
        }
    }

    /// `events.json` inside `dir`.
    pub fn in_dir(dir: &Path, timeout: Duration) -> Self {
        Self::new(dir.join(EVENTS_FILE), timeout)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn dir(&self) -> &Path {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        }
    }

    /// Read the persisted store.
    ///
    /// A missing or unreadable file yields an empty store. The failure is
    /// logged but never returned: the service keeps running with an empty
    /// log instead.
    pub async fn load(&self) -> Store {
        match self.try_load().await {
            Ok(Some(store)) => {
                tracing::debug!(
                    path = %self.path.display(),
                    today = store.today.len(),
                    yesterday = store.yesterday.len(),
                    "Loaded event log"
                );
                store
            }
            Ok(None) => {
                tracing::info!(path = %self.path.display(), "No event log yet, starting empty");
                Store::default()
            }
            Err(e) => {
                tracing::error!(path = %self.path.display(), "Error loading events: {}", e);
                Store::default()
            }
        }
    }

    async fn try_load(&self) -> Result<Option<Store>> {
        let content = match tokio::time::timeout(self.timeout, tokio::fs::read(&self.path)).await
        {
            Err(_) => return Err(FeedError::Timeout(self.timeout)),
            Ok(Err(e)) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Ok(result) => result?,
        };
        Ok(Some(serde_json::from_slice(&content)?))
    }

    /// Overwrite the persisted store with `store`.
    pub async fn save(&self, store: &Store) -> Result<()> {
        let content = serde_json::to_vec_pretty(store)?;

        let write = async {
            tokio::fs::create_dir_all(self.dir()).await?;
            // Dropping the TempPath on an error or timeout removes the file.
            let temp = tempfile::Builder::new()
                .prefix(".events.")
                .suffix(".json.tmp")
                .tempfile_in(self.dir())?
                .into_temp_path();
            tokio::fs::write(&temp, &content).await?;
            temp.persist(&self.path).map_err(|e| e.error)
        };

        tokio::time::timeout(self.timeout, write)
            .await
            .map_err(|_| FeedError::Timeout(self.timeout))??;

        tracing::trace!(path = %self.path.display(), bytes = content.len(), "Saved event log");
        Ok(())
    }
}
