// ABOUTME: Persistence for the in-progress sell-car draft
// One JSON document under the data directory, written atomically and migrated on read

pub mod migrate;
pub mod record;

pub use record::{SellCarDraft, DRAFT_SCHEMA_VERSION};

use chrono::Utc;
use serde_json::Value;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Storage key of the draft document
pub const DRAFT_KEY: &str = "sellCarDetails";

#[derive(Error, Debug)]
pub enum DraftError {
    #[error("Draft I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Failed to serialize draft: {0}")]
    Serialize(#[from] serde_json::Error),
}

#[derive(Debug, Clone)]
pub struct DraftStore {
    path: PathBuf,
}

impl DraftStore {
    /// Store rooted at the given data directory
    pub fn new(data_dir: impl AsRef<Path>) -> Self {
        Self {
            path: data_dir.as_ref().join(format!("{DRAFT_KEY}.json")),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the stored draft.
    ///
    /// Missing, corrupt and newer-schema documents all read as `None`.
    pub fn load(&self) -> Result<Option<SellCarDraft>, DraftError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let document: Value = match serde_json::from_str(&content) {
            Ok(document) => document,
            Err(e) => {
                warn!("Ignoring corrupt draft at {}: {}", self.path.display(), e);
                return Ok(None);
            }
        };

        Ok(decode(document).map(SellCarDraft::validate))
    }

    /// Persist the draft, stamping `saved_at`. Returns the stored record.
    pub fn save(&self, draft: &SellCarDraft) -> Result<SellCarDraft, DraftError> {
        let mut stored = draft.clone().validate();
        stored.saved_at = Some(Utc::now());

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(&stored)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, content)?;
        fs::rename(&tmp, &self.path)?;

        debug!("Saved draft {} to {}", stored.draft_id, self.path.display());
        Ok(stored)
    }

    /// Remove the stored draft; returns whether one existed
    pub fn clear(&self) -> Result<bool, DraftError> {
        match fs::remove_file(&self.path) {
            Ok(()) => {
                info!("Cleared sell-car draft");
                Ok(true)
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}

fn decode(document: Value) -> Option<SellCarDraft> {
    let Value::Object(object) = document else {
        warn!("Ignoring draft: expected a JSON object");
        return None;
    };

    let version = match object.get("schemaVersion") {
        None => return Some(migrate::from_legacy(&object)),
        Some(v) => v.as_u64(),
    };

    match version {
        Some(v) if v > u64::from(DRAFT_SCHEMA_VERSION) => {
            warn!("Ignoring draft with newer schema version {}", v);
            None
        }
        _ => match serde_json::from_value::<SellCarDraft>(Value::Object(object)) {
            Ok(draft) => Some(draft),
            Err(e) => {
                warn!("Ignoring unreadable draft: {}", e);
                None
            }
        },
    }
}
