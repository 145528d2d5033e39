//! On-device identity persistence.
//!
//! One JSON record per device: the display name chosen at onboarding plus a
//! uuid-v4 user id assigned when the name is first saved. The id doubles as
//! a room-id building block; being a random opaque token it can never
//! contain the room-id separator.

use std::fs;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use tracing::{info, warn};
use uuid::Uuid;

use pairlink_shared::Identity;

use crate::error::{ClientError, Result};

const IDENTITY_FILE: &str = "identity.json";

/// File-backed store for the local participant's identity.
pub struct IdentityStore {
    path: PathBuf,
}

impl IdentityStore {
    /// Keep the identity in the platform-appropriate data directory:
    /// - Linux:   `~/.local/share/pairlink/identity.json`
    /// - macOS:   `~/Library/Application Support/com.pairlink.pairlink/identity.json`
    /// - Windows: `{FOLDERID_RoamingAppData}\pairlink\pairlink\data\identity.json`
    pub fn new() -> Result<Self> {
        let project_dirs =
            ProjectDirs::from("com", "pairlink", "pairlink").ok_or(ClientError::NoDataDir)?;

        let data_dir = project_dirs.data_dir();
        fs::create_dir_all(data_dir)?;

        Ok(Self::open_at(&data_dir.join(IDENTITY_FILE)))
    }

    /// Use an explicit file path. Useful for tests and custom layouts.
    pub fn open_at(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
        }
    }

    /// Load the persisted identity, or `None` when the device has not
    /// onboarded yet. An unreadable or corrupt record degrades to `None` so
    /// the app falls back to onboarding instead of failing to start.
    pub fn load(&self) -> Option<Identity> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(_) => return None,
        };

        match serde_json::from_str::<Identity>(&raw) {
            Ok(identity) if identity.is_complete() => Some(identity),
            Ok(_) => None,
            Err(e) => {
                warn!(
                    path = %self.path.display(),
                    error = %e,
                    "corrupt identity record, re-onboarding"
                );
                None
            }
        }
    }

    /// Assign a fresh user id to `username`, persist the pair, and return
    /// it. The id is assigned exactly once; identities are immutable after
    /// this.
    pub fn save_username(&self, username: &str) -> Result<Identity> {
        let username = username.trim();
        if username.is_empty() {
            return Err(ClientError::EmptyUsername);
        }

        let identity = Identity::new(Uuid::new_v4().to_string(), username);
        let json = serde_json::to_string_pretty(&identity)?;
        fs::write(&self.path, json)?;

        info!(user = %identity.user_id, "identity saved");
        Ok(identity)
    }
}
