//! Implements KeyValuePort using one JSON file per key.
//!
//! `<base_dir>/<key>.json`, replaced atomically on every write.

use crate::domain::DomainError;
use crate::ports::KeyValuePort;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;

/// File-backed key-value store.
pub struct JsonKvStore {
    base_dir: PathBuf,
}

impl JsonKvStore {
    pub fn new(base_dir: impl AsRef<Path>) -> Self {
        Self {
            base_dir: base_dir.as_ref().to_path_buf(),
        }
    }

    /// Keys are used as file stems; path separators are replaced.
    fn key_path(&self, key: &str) -> PathBuf {
        let stem: String = key
            .chars()
            .map(|c| if c == '/' || c == '\\' { '_' } else { c })
            .collect();
        self.base_dir.join(format!("{}.json", stem))
    }
}

#[async_trait::async_trait]
impl KeyValuePort for JsonKvStore {
    async fn get(&self, key: &str) -> Result<Option<String>, DomainError> {
        match fs::read_to_string(self.key_path(key)).await {
            Ok(s) => Ok(Some(s)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(DomainError::Persistence(format!("read {}: {}", key, e))),
        }
    }

    /// Write-replace: temp file, sync_all, then rename over the target.
    async fn set(&self, key: &str, value: &str) -> Result<(), DomainError> {
        fs::create_dir_all(&self.base_dir)
            .await
            .map_err(|e| DomainError::Persistence(format!("create data dir: {}", e)))?;

        let path = self.key_path(key);
        let temp_path = path.with_extension("json.tmp");
        let mut f = fs::File::create(&temp_path)
            .await
            .map_err(|e| DomainError::Persistence(format!("create temp file: {}", e)))?;
        f.write_all(value.as_bytes())
            .await
            .map_err(|e| DomainError::Persistence(format!("write temp file: {}", e)))?;
        f.sync_all()
            .await
            .map_err(|e| DomainError::Persistence(format!("sync temp file: {}", e)))?;
        drop(f);

        fs::rename(&temp_path, &path)
            .await
            .map_err(|e| DomainError::Persistence(format!("atomic rename failed: {}", e)))?;
        Ok(())
    }
}
