use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tokio::fs;

fn staging_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".partial");
    path.with_file_name(name)
}

/// Write `data` to a sibling temp file, then rename it into place, so a
/// failed run never leaves a partial output behind.
pub async fn write_atomic(path: &Path, data: &[u8]) -> Result<()> {
    let staging = staging_path(path);
    fs::write(&staging, data)
        .await
        .with_context(|| format!("writing {}", staging.display()))?;
    fs::rename(&staging, path)
        .await
        .with_context(|| format!("moving output into {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn staging_is_a_sibling() {
        let staging = staging_path(Path::new("/tmp/out/text.huf"));
        assert_eq!(staging, Path::new("/tmp/out/text.huf.partial"));
    }

    #[tokio::test]
    async fn writes_and_replaces() {
        let dir = std::env::temp_dir().join(format!("huffpack-io-{}", std::process::id()));
        fs::create_dir_all(&dir).await.unwrap();
        let path = dir.join("out.bin");

        write_atomic(&path, b"first").await.unwrap();
        write_atomic(&path, b"second").await.unwrap();

        assert_eq!(fs::read(&path).await.unwrap(), b"second");
        assert!(!staging_path(&path).exists());
        fs::remove_dir_all(&dir).await.unwrap();
    }
}
