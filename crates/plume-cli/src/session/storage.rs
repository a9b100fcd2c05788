//! Session storage for persisting login state.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use tracing::debug;

use super::StoredSession;

#[cfg(unix)]
use std::os::unix::fs::PermissionsExt;

/// Location of the session file.
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    /// Use `path` if given, otherwise `session.json` in the user's data directory.
    pub fn locate(path: Option<PathBuf>) -> Result<Self> {
        let path = match path {
            Some(path) => path,
            None => ProjectDirs::from("", "", "plume")
                .context("Could not determine data directory")?
                .data_dir()
                .join("session.json"),
        };
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Save a session to disk.
    pub fn save(&self, stored: &StoredSession) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).context("Failed to create data directory")?;
        }

        let json = serde_json::to_string_pretty(stored)?;
        fs::write(&self.path, &json).context("Failed to write session file")?;

        // Set restrictive permissions (Unix only)
        #[cfg(unix)]
        {
            let mut perms = fs::metadata(&self.path)?.permissions();
            perms.set_mode(0o600);
            fs::set_permissions(&self.path, perms)?;
        }

        debug!(path = %self.path.display(), "Session saved");
        Ok(())
    }

    /// Load a session from disk.
    pub fn load(&self) -> Result<Option<StoredSession>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let json = fs::read_to_string(&self.path).context("Failed to read session file")?;
        let stored = serde_json::from_str(&json).context("Invalid session file")?;
        Ok(Some(stored))
    }

    /// Load a session, failing when none is stored.
    pub fn require(&self) -> Result<StoredSession> {
        self.load()?
            .context("No active session. Run 'plume login' first.")
    }

    /// Remove the stored session. Returns whether one existed.
    pub fn clear(&self) -> Result<bool> {
        if !self.path.exists() {
            return Ok(false);
        }
        fs::remove_file(&self.path).context("Failed to remove session file")?;
        Ok(true)
    }
}
