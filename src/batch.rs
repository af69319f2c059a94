use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use tokio::sync::Semaphore;
use tracing::{debug, warn};

use crate::config::CodecConfig;
use crate::pipeline::encode_text_file;
use crate::report::BuildReport;
use crate::storage::local::validate_key;
use crate::storage::{ArchiveStore, TextSource};

#[derive(Debug)]
pub struct BatchOutcome {
    pub input: PathBuf,
    pub key: Option<String>,
    pub result: Result<BuildReport>,
}

/// Archive key for an input file: its file stem.
pub fn key_for(path: &Path) -> Result<String> {
    let key = path
        .file_stem()
        .and_then(|s| s.to_str())
        .with_context(|| format!("no usable file name in {}", path.display()))?
        .to_string();
    validate_key(&key)?;
    Ok(key)
}

/// Encode and store every input. Each file gets its own pipeline run on the
/// blocking pool, at most `batch_concurrency` at a time. Outcomes come back
/// in input order and one failure does not stop the others.
pub async fn encode_batch(
    inputs: Vec<PathBuf>,
    config: &CodecConfig,
    store: Arc<dyn ArchiveStore>,
) -> Vec<BatchOutcome> {
    let permits = Arc::new(Semaphore::new(config.batch_concurrency.max(1)));
    let mut seen = HashSet::new();
    let mut handles = Vec::with_capacity(inputs.len());

    for input in inputs {
        let key = match key_for(&input) {
            Ok(key) if !seen.insert(key.clone()) => Err(anyhow!("duplicate archive key {}", key)),
            other => other,
        };
        let shown_key = key.as_ref().ok().cloned();

        let source = TextSource::new(input.clone(), config.normalization, config.max_input_size);
        let width = config.source_bit_width;
        let store = Arc::clone(&store);
        let permits = Arc::clone(&permits);

        let handle = tokio::spawn(async move {
            let key = key?;
            let _permit = permits.acquire_owned().await?;
            debug!(key = %key, "batch job started");

            let artifact = encode_text_file(source, key.clone(), width).await?;

            store.put(&key, &artifact.archive, &artifact.metadata).await?;
            Ok::<_, anyhow::Error>(artifact.metadata.report)
        });

        handles.push((input, shown_key, handle));
    }

    let mut outcomes = Vec::with_capacity(handles.len());
    for (input, key, handle) in handles {
        let result = match handle.await {
            Ok(result) => result,
            Err(e) => Err(anyhow!("encode task failed: {}", e)),
        };
        if let Err(e) = &result {
            warn!("{}: {:#}", input.display(), e);
        }
        outcomes.push(BatchOutcome { input, key, result });
    }

    outcomes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::decode_bytes;
    use crate::storage::local::LocalStorage;

    fn temp_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("huffpack-batch-{}-{}", name, std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[tokio::test]
    async fn encodes_files_independently() {
        let dir = temp_dir("independent");
        let first = dir.join("first.txt");
        let second = dir.join("second.txt");
        std::fs::write(&first, "aaaa bbb cc d").unwrap();
        std::fs::write(&second, "zzzzzzz").unwrap();
        let missing = dir.join("missing.txt");

        let store: Arc<dyn ArchiveStore> = Arc::new(LocalStorage::new(dir.join("data")));
        let config = CodecConfig { batch_concurrency: 2, ..CodecConfig::default() };

        let outcomes = encode_batch(
            vec![first.clone(), missing.clone(), second.clone()],
            &config,
            Arc::clone(&store),
        )
        .await;

        assert_eq!(outcomes.len(), 3);
        assert_eq!(outcomes[0].input, first);
        assert_eq!(outcomes[0].result.as_ref().unwrap().leaf_count, 4);
        assert!(outcomes[1].result.is_err());
        assert_eq!(outcomes[2].key.as_deref(), Some("second"));
        assert_eq!(outcomes[2].result.as_ref().unwrap().packed_bits, 7);

        let stored = store.get("first").await.unwrap().unwrap();
        let decoded = decode_bytes(&stored.data).unwrap();
        assert_eq!(decoded.iter().collect::<String>(), "aaaabbbccd");
        assert!(stored.metadata.verify_integrity(&decoded));
        assert!(store.get("missing").await.unwrap().is_none());

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[tokio::test]
    async fn duplicate_keys_are_rejected() {
        let dir = temp_dir("duplicate");
        std::fs::create_dir_all(dir.join("other")).unwrap();
        let a = dir.join("same.txt");
        let b = dir.join("other").join("same.md");
        std::fs::write(&a, "abc").unwrap();
        std::fs::write(&b, "def").unwrap();

        let store: Arc<dyn ArchiveStore> = Arc::new(LocalStorage::new(dir.join("data")));
        let outcomes = encode_batch(vec![a, b], &CodecConfig::default(), store).await;

        assert!(outcomes[0].result.is_ok());
        assert!(outcomes[1].key.is_none());
        assert!(outcomes[1].result.is_err());

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn key_is_file_stem() {
        assert_eq!(key_for(Path::new("/tmp/some/book.txt")).unwrap(), "book");
        assert!(key_for(Path::new("/")).is_err());
    }
}
