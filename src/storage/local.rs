use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use tokio::fs;
use tracing::debug;

use crate::storage::{ArchiveMetadata, ArchiveStore, StoredArchive};
use crate::utils::io::write_atomic;

const ARCHIVE_EXT: &str = "huf";

/// Archives on the local filesystem: `<root>/archives/<key>.huf` plus a
/// `<key>.meta.json` sidecar.
pub struct LocalStorage {
    root: PathBuf,
}

impl LocalStorage {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    fn archive_dir(&self) -> PathBuf {
        self.root.join("archives")
    }

    fn data_path(&self, key: &str) -> PathBuf {
        self.archive_dir().join(format!("{}.{}", key, ARCHIVE_EXT))
    }

    fn meta_path(&self, key: &str) -> PathBuf {
        self.archive_dir().join(format!("{}.meta.json", key))
    }
}

/// Remove a file that may already be gone.
async fn remove_if_present(path: &Path) -> anyhow::Result<()> {
    match fs::remove_file(path).await {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e).with_context(|| format!("removing {}", path.display())),
    }
}

/// Keys become file names, so they may not escape the archive directory.
pub fn validate_key(key: &str) -> anyhow::Result<()> {
    if key.is_empty()
        || key.starts_with('.')
        || key.contains(|c: char| c == '/' || c == '\\' || c.is_control())
    {
        bail!("invalid archive key {:?}", key);
    }
    Ok(())
}

#[async_trait::async_trait]
impl ArchiveStore for LocalStorage {
    async fn put(
        &self,
        key: &str,
        data: &[u8],
        meta: &ArchiveMetadata,
    ) -> anyhow::Result<()> {
        validate_key(key)?;
        fs::create_dir_all(self.archive_dir()).await?;
        write_atomic(&self.data_path(key), data).await?;
        write_atomic(
            &self.meta_path(key),
            &serde_json::to_vec_pretty(meta)?,
        ).await?;
        debug!(key, bytes = data.len(), "stored archive");
        Ok(())
    }

    async fn get(
        &self,
        key: &str,
    ) -> anyhow::Result<Option<StoredArchive>> {
        validate_key(key)?;
        let data_path = self.data_path(key);
        let data = match fs::read(&data_path).await {
            Ok(d) => d,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(e).with_context(|| format!("reading {}", data_path.display()));
            }
        };

        let meta_path = self.meta_path(key);
        let meta: ArchiveMetadata = serde_json::from_slice(
            &fs::read(&meta_path)
                .await
                .with_context(|| format!("reading {}", meta_path.display()))?,
        )?;

        Ok(Some(StoredArchive {
            data,
            metadata: meta,
        }))
    }

    async fn delete(&self, key: &str) -> anyhow::Result<()> {
        validate_key(key)?;
        remove_if_present(&self.data_path(key)).await?;
        remove_if_present(&self.meta_path(key)).await?;
        debug!(key, "deleted archive");
        Ok(())
    }

    async fn list(&self) -> anyhow::Result<Vec<String>> {
        let mut keys = Vec::new();
        let dir = self.archive_dir();
        let mut entries = match fs::read_dir(&dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(keys),
            Err(e) => return Err(e).with_context(|| format!("listing {}", dir.display())),
        };

        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) == Some(ARCHIVE_EXT) {
                if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                    keys.push(stem.to_string());
                }
            }
        }

        keys.sort();
        Ok(keys)
    }
}
