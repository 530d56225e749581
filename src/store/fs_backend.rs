use super::backend::StorageBackend;
use super::Scope;
use crate::error::{Result, TickError};
use std::fs;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Filesystem backend: one directory per scope, one `<key>.json` file per key.
///
/// The session directory is expected to be wiped by the host between runs
/// (or explicitly through [`StorageBackend::clear`] on logout).
pub struct FsBackend {
    durable_root: PathBuf,
    session_root: PathBuf,
}

impl FsBackend {
    pub fn new(durable_root: PathBuf, session_root: PathBuf) -> Self {
        Self {
            durable_root,
            session_root,
        }
    }

    /// Place both scopes under `root` (`root/durable`, `root/session`).
    pub fn under(root: &Path) -> Self {
        Self::new(root.join("durable"), root.join("session"))
    }

    fn scope_root(&self, scope: Scope) -> &Path {
        match scope {
            Scope::Durable => &self.durable_root,
            Scope::Session => &self.session_root,
        }
    }

    fn key_path(&self, scope: Scope, key: &str) -> Result<PathBuf> {
        if key.is_empty() || !key.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return Err(TickError::Store(format!("invalid storage key '{}'", key)));
        }
        Ok(self.scope_root(scope).join(format!("{}.json", key)))
    }

    fn ensure_dir(&self, path: &Path) -> Result<()> {
        if !path.exists() {
            fs::create_dir_all(path).map_err(TickError::Io)?;
        }
        Ok(())
    }
}

impl StorageBackend for FsBackend {
    fn get(&self, scope: Scope, key: &str) -> Result<Option<String>> {
        let path = self.key_path(scope, key)?;
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(path).map_err(TickError::Io)?;
        Ok(Some(content))
    }

    fn set(&self, scope: Scope, key: &str, value: &str) -> Result<()> {
        let path = self.key_path(scope, key)?;
        let root = self.scope_root(scope);
        self.ensure_dir(root)?;

        // Atomic write
        let tmp_path = root.join(format!(".{}-{}.tmp", key, Uuid::new_v4()));
        fs::write(&tmp_path, value).map_err(TickError::Io)?;
        fs::rename(&tmp_path, path).map_err(TickError::Io)?;

        Ok(())
    }

    fn remove(&self, scope: Scope, key: &str) -> Result<()> {
        let path = self.key_path(scope, key)?;
        if path.exists() {
            fs::remove_file(path).map_err(TickError::Io)?;
        }
        Ok(())
    }

    fn clear(&self, scope: Scope) -> Result<()> {
        let root = self.scope_root(scope);
        if !root.exists() {
            return Ok(());
        }
        for entry in fs::read_dir(root).map_err(TickError::Io)? {
            let path = entry.map_err(TickError::Io)?.path();
            if path.is_file() && path.extension().is_some_and(|ext| ext == "json") {
                fs::remove_file(path).map_err(TickError::Io)?;
            }
        }
        Ok(())
    }
}
