// # File Notification Store
//
// File-based implementation of NotificationStore.
//
// ## Layout
//
// One JSON file per property under a fixed state directory, named after the
// property (e.g. `miyakowasure-state.json`).
//
// ## Crash safety
//
// - Atomic replace: new state is written to a `.tmp` sibling and renamed
//   over the real file, so a crash mid-save leaves either the old or the
//   new state, never a hybrid
// - Corruption detection: JSON is validated on load; an unparseable file is
//   logged as a warning and treated as empty history (worst case: one extra
//   alert)
//
// ## File Format
//
// ```json
// {
//   "version": "1",
//   "notified": {
//     "00001:2026-03-15:2026-03-16": "2026-03-15T08:00:00Z"
//   }
// }
// ```

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};

use crate::domain::PropertyId;
use crate::error::{Error, Result};
use crate::state::record::NotificationRecord;
use crate::traits::NotificationStore;

/// State file format version, for future migrations
const STATE_FILE_VERSION: &str = "1";

/// Serializable state file format
#[derive(Debug, serde::Serialize, serde::Deserialize)]
struct StateFileFormat {
    version: String,
    #[serde(flatten)]
    record: NotificationRecord,
}

/// File-backed notification store, one file per property
#[derive(Debug, Clone)]
pub struct FileNotificationStore {
    dir: PathBuf,
}

impl FileNotificationStore {
    /// Create a store rooted at `dir`, creating the directory if needed
    pub async fn new(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        if !dir.exists() {
            fs::create_dir_all(&dir).await.map_err(|e| {
                Error::state(format!(
                    "failed to create state directory {}: {e}",
                    dir.display()
                ))
            })?;
        }
        Ok(Self { dir })
    }

    /// Path of one property's state file
    pub fn path_for(&self, property: PropertyId) -> PathBuf {
        self.dir.join(property.state_file_name())
    }

    fn temp_path(path: &Path) -> PathBuf {
        let mut temp = path.to_path_buf();
        temp.set_extension("tmp");
        temp
    }

    async fn read_record(path: &Path) -> Result<NotificationRecord> {
        let content = fs::read_to_string(path)
            .await
            .map_err(|e| Error::state(format!("failed to read {}: {e}", path.display())))?;

        let parsed: StateFileFormat = serde_json::from_str(&content)
            .map_err(|e| Error::state(format!("failed to parse {}: {e}", path.display())))?;

        if parsed.version != STATE_FILE_VERSION {
            warn!(
                file = %path.display(),
                got = %parsed.version,
                expected = STATE_FILE_VERSION,
                "state file version mismatch, loading anyway"
            );
        }

        Ok(parsed.record)
    }
}

#[async_trait]
impl NotificationStore for FileNotificationStore {
    async fn load(&self, property: PropertyId) -> Result<NotificationRecord> {
        let path = self.path_for(property);
        if !path.exists() {
            debug!(property = %property, "no state file, starting with empty history");
            return Ok(NotificationRecord::new());
        }

        match Self::read_record(&path).await {
            Ok(record) => {
                debug!(property = %property, entries = record.len(), "loaded notification state");
                Ok(record)
            }
            Err(e) => {
                // Corrupt or unreadable state degrades to "never alerted";
                // one duplicate alert beats a dead check cycle.
                warn!(
                    property = %property,
                    error = %e,
                    "notification state unreadable, treating as empty"
                );
                Ok(NotificationRecord::new())
            }
        }
    }

    async fn save(&self, property: PropertyId, record: &NotificationRecord) -> Result<()> {
        let path = self.path_for(property);
        let temp = Self::temp_path(&path);

        let json = serde_json::to_string_pretty(&StateFileFormat {
            version: STATE_FILE_VERSION.to_string(),
            record: record.clone(),
        })?;

        {
            let mut file = fs::File::create(&temp).await.map_err(|e| {
                Error::state(format!("failed to create temp file {}: {e}", temp.display()))
            })?;
            file.write_all(json.as_bytes()).await.map_err(|e| {
                Error::state(format!("failed to write temp file {}: {e}", temp.display()))
            })?;
            file.flush().await.map_err(|e| {
                Error::state(format!("failed to flush temp file {}: {e}", temp.display()))
            })?;
        }

        // Atomic rename (temp -> actual)
        fs::rename(&temp, &path).await.map_err(|e| {
            Error::state(format!(
                "failed to rename {} to {}: {e}",
                temp.display(),
                path.display()
            ))
        })?;

        debug!(property = %property, entries = record.len(), file = %path.display(), "saved notification state");
        Ok(())
    }
}
