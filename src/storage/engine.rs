use async_trait::async_trait;

use crate::storage::ArchiveMetadata;

#[derive(Debug)]
pub struct StoredArchive {
    pub data: Vec<u8>,
    pub metadata: ArchiveMetadata,
}

/// Persistence for encoded archives. The archive bytes already carry the
/// packed bits together with their exact bit length.
#[async_trait]
pub trait ArchiveStore: Send + Sync {
    async fn put(
        &self,
        key: &str,
        data: &[u8],
        meta: &ArchiveMetadata,
    ) -> anyhow::Result<()>;

    async fn get(
        &self,
        key: &str,
    ) -> anyhow::Result<Option<StoredArchive>>;

    async fn delete(
        &self,
        key: &str,
    ) -> anyhow::Result<()>;

    async fn list(&self) -> anyhow::Result<Vec<String>>;
}
