use anyhow::{Context, Result};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Longest cookie header we are willing to restore
const MAX_COOKIE_LEN: usize = 4096;

/// Persists the session cookie header between runs.
///
/// Stored in `~/.inkwell/session` with 0600 permissions so only the owner
/// can read it.
#[derive(Debug, Clone)]
pub struct SessionStore {
    file_path: PathBuf,
}

impl SessionStore {
    /// Store at the default path `~/.inkwell/session`.
    ///
    /// Returns an error if the home directory cannot be determined.
    pub fn new() -> Result<Self> {
        let home_dir = dirs::home_dir().context("Failed to determine home directory")?;
        Ok(Self::at(home_dir.join(".inkwell").join("session")))
    }

    pub fn at(file_path: impl Into<PathBuf>) -> Self {
        Self {
            file_path: file_path.into(),
        }
    }

    /// Load the saved cookie header.
    ///
    /// - `Ok(Some(cookies))` if the file holds something usable
    /// - `Ok(None)` if the file is missing, empty or looks corrupted
    /// - `Err(_)` if the file cannot be read
    pub fn load(&self) -> Result<Option<String>> {
        if !self.file_path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&self.file_path).context("Failed to read session file")?;
        let cookies = content.trim();

        if cookies.is_empty() {
            log::warn!(target: "session", "Session file is empty, treating as no session");
            return Ok(None);
        }

        if !cookies.contains('=') || cookies.len() > MAX_COOKIE_LEN {
            log::warn!(
                target: "session",
                "Session file has an unexpected shape ({} bytes), ignoring it",
                cookies.len()
            );
            return Ok(None);
        }

        if cookies.chars().any(|c| c.is_control()) {
            log::warn!(target: "session", "Session file contains control characters, ignoring it");
            return Ok(None);
        }

        log::debug!(target: "session", "Loaded session cookies from {}", self.file_path.display());
        Ok(Some(cookies.to_string()))
    }

    /// Save the cookie header with an atomic write and 0600 permissions.
    pub fn save(&self, cookies: &str) -> Result<()> {
        if let Some(parent) = self.file_path.parent() {
            fs::create_dir_all(parent).context("Failed to create session directory")?;
        }

        self.cleanup_stale_files()?;

        let temp_path = self.file_path.with_extension("tmp");
        let mut file =
            fs::File::create(&temp_path).context("Failed to create temporary session file")?;
        file.write_all(cookies.as_bytes())
            .context("Failed to write session cookies")?;
        file.sync_all().context("Failed to sync session file to disk")?;
        drop(file);

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&temp_path, fs::Permissions::from_mode(0o600))
                .context("Failed to set session file permissions")?;
        }

        fs::rename(&temp_path, &self.file_path).context("Failed to move session file into place")?;

        log::info!(target: "session", "Saved session to {}", self.file_path.display());
        Ok(())
    }

    /// Delete the session file. Missing files are not an error.
    pub fn delete(&self) -> Result<()> {
        if self.file_path.exists() {
            fs::remove_file(&self.file_path).context("Failed to delete session file")?;
            log::info!(target: "session", "Deleted session file at {}", self.file_path.display());
        }
        Ok(())
    }

    /// Remove leftover `session.*` files so only one session exists
    fn cleanup_stale_files(&self) -> Result<()> {
        let Some(parent) = self.file_path.parent() else {
            return Ok(());
        };
        if !parent.exists() {
            return Ok(());
        }

        for entry in fs::read_dir(parent).context("Failed to read session directory")? {
            let path = entry.context("Failed to read directory entry")?.path();
            if path == self.file_path {
                continue;
            }
            let stale = path
                .file_name()
                .and_then(|n| n.to_str())
                .map(|n| n.starts_with("session."))
                .unwrap_or(false);
            if stale {
                if let Err(e) = fs::remove_file(&path) {
                    log::warn!(target: "session", "Failed to remove {}: {}", path.display(), e);
                }
            }
        }
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.file_path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store_in(temp_dir: &TempDir) -> SessionStore {
        SessionStore::at(temp_dir.path().join("session"))
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let store = store_in(&temp_dir);

        store.save("connect.sid=s%3Aabc.def").unwrap();
        assert_eq!(store.load().unwrap(), Some("connect.sid=s%3Aabc.def".to_string()));
    }

    #[test]
    fn test_missing_file_is_no_session() {
        let temp_dir = TempDir::new().unwrap();
        assert_eq!(store_in(&temp_dir).load().unwrap(), None);
    }

    #[test]
    fn test_delete_is_idempotent() {
        let temp_dir = TempDir::new().unwrap();
        let store = store_in(&temp_dir);

        store.delete().unwrap();
        store.save("sid=1").unwrap();
        assert!(store.path().exists());
        store.delete().unwrap();
        assert!(!store.path().exists());
    }

    #[test]
    fn test_unusable_contents_are_ignored() {
        let temp_dir = TempDir::new().unwrap();
        let store = store_in(&temp_dir);

        fs::write(store.path(), "  \n").unwrap();
        assert_eq!(store.load().unwrap(), None);

        fs::write(store.path(), "no-equals-sign").unwrap();
        assert_eq!(store.load().unwrap(), None);

        fs::write(store.path(), format!("sid={}", "a".repeat(MAX_COOKIE_LEN))).unwrap();
        assert_eq!(store.load().unwrap(), None);

        fs::write(store.path(), b"sid=a\x00b").unwrap();
        assert_eq!(store.load().unwrap(), None);
    }

    #[test]
    fn test_stale_files_removed_on_save() {
        let temp_dir = TempDir::new().unwrap();
        let store = store_in(&temp_dir);

        fs::write(temp_dir.path().join("session.bak"), "old").unwrap();
        fs::write(temp_dir.path().join("session.tmp"), "temp").unwrap();
        fs::write(temp_dir.path().join("settings.toml"), "api_url = \"x\"").unwrap();

        store.save("sid=new").unwrap();

        assert!(!temp_dir.path().join("session.bak").exists());
        assert!(!temp_dir.path().join("session.tmp").exists());
        assert!(temp_dir.path().join("settings.toml").exists());
        assert!(store.path().exists());
    }

    #[test]
    #[cfg(unix)]
    fn test_file_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let temp_dir = TempDir::new().unwrap();
        let store = store_in(&temp_dir);
        store.save("sid=1").unwrap();

        let mode = fs::metadata(store.path()).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}
