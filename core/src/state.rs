//! Persisted pointer to the status document.
//!
//! Lets a restarted bot keep editing the same message instead of posting a
//! new one. The file holds a single JSON object: `{"message_id": <id>}`.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Contents of the state file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentPointer {
    #[serde(default)]
    pub message_id: Option<u64>,
}

impl DocumentPointer {
    pub fn new(message_id: u64) -> Self {
        Self {
            message_id: Some(message_id),
        }
    }

    /// Load the pointer from `path`.
    ///
    /// Returns an empty pointer if the file is missing or corrupt.
    pub fn load_from(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(contents) => match serde_json::from_str::<DocumentPointer>(&contents) {
                Ok(pointer) => {
                    debug!(
                        "Loaded document pointer {:?} from {}",
                        pointer.message_id,
                        path.display()
                    );
                    pointer
                }
                Err(e) => {
                    warn!("Failed to parse state file {}: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(_) => {
                debug!("No state file at {}", path.display());
                Self::default()
            }
        }
    }

    /// Write the pointer to `path`, creating parent directories as needed.
    ///
    /// Failures are logged; the bot keeps running with the in-memory handle.
    pub fn save_to(&self, path: &Path) {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            if let Err(e) = std::fs::create_dir_all(parent) {
                warn!(
                    "Failed to create state directory {}: {}",
                    parent.display(),
                    e
                );
                return;
            }
        }
        match serde_json::to_string(self) {
            Ok(json) => {
                if let Err(e) = std::fs::write(path, json) {
                    warn!("Failed to write state file {}: {}", path.display(), e);
                }
            }
            Err(e) => {
                warn!("Failed to serialize document pointer: {}", e);
            }
        }
    }
}
