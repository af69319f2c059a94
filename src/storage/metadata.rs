use serde::{Deserialize, Serialize};

use crate::engine::hash::symbols_digest;
use crate::protocol::constants::FORMAT_VERSION;
use crate::report::BuildReport;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArchiveMetadata {
    pub key: String,
    pub original_hash: String,
    pub symbol_count: u64,
    pub archive_size: u64,
    pub stored_at: u64,
    pub codec_version: u16,
    pub report: BuildReport,
}

impl ArchiveMetadata {
    pub fn new(key: String, original: &[char], archive_size: u64, report: BuildReport) -> Self {
        Self {
            key,
            original_hash: symbols_digest(original),
            symbol_count: original.len() as u64,
            archive_size,
            stored_at: std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .map(|d| d.as_secs())
                .unwrap_or_default(),
            codec_version: FORMAT_VERSION,
            report,
        }
    }

    /// Compare a decoded sequence against the hash taken at encode time.
    pub fn verify_integrity(&self, decoded: &[char]) -> bool {
        decoded.len() as u64 == self.symbol_count && symbols_digest(decoded) == self.original_hash
    }
}
