use anyhow::{Context, Result};
use tracing::info;

use crate::engine::{compress, Encoded};
use crate::protocol::Archive;
use crate::report::{code_listing, BuildReport};
use crate::storage::{ArchiveMetadata, SymbolSource, TextSource};

/// Output of one encode run over a symbol source.
#[derive(Debug, Clone)]
pub struct EncodedArtifact {
    pub archive: Vec<u8>,
    pub metadata: ArchiveMetadata,
    pub listing: Vec<String>,
    pub encoded: Encoded<char>,
}

pub fn encode_source(
    source: &dyn SymbolSource,
    key: &str,
    source_bit_width: u32,
) -> Result<EncodedArtifact> {
    let symbols = source.symbols()?;
    let encoded = compress(&symbols).with_context(|| format!("encoding {}", key))?;

    let report = BuildReport::from_encoded(&encoded, source_bit_width);
    let archive = Archive::from_encoded(&encoded).to_bytes()?;
    let metadata = ArchiveMetadata::new(key.to_string(), &symbols, archive.len() as u64, report);
    let listing = code_listing(&encoded.frequencies, &encoded.codes);

    info!(
        key,
        symbols = metadata.symbol_count,
        bits = metadata.report.packed_bits,
        saved = metadata.report.space_saved_bits,
        "encoded"
    );

    Ok(EncodedArtifact {
        archive,
        metadata,
        listing,
        encoded,
    })
}

/// `encode_source` over a file, run on the blocking pool so the file read and
/// the tree build stay off the async workers.
pub async fn encode_text_file(
    source: TextSource,
    key: String,
    source_bit_width: u32,
) -> Result<EncodedArtifact> {
    tokio::task::spawn_blocking(move || encode_source(&source, &key, source_bit_width))
        .await
        .context("encode task failed")?
}

pub fn decode_bytes(data: &[u8]) -> Result<Vec<char>> {
    let archive = Archive::from_bytes(data)?;
    let symbols = archive.decode()?;
    info!(symbols = symbols.len(), "decoded");
    Ok(symbols)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::config::Normalization;
    use crate::engine::CodecError;
    use crate::report::DEFAULT_SOURCE_BIT_WIDTH;
    use crate::storage::StrSource;

    #[test]
    fn encode_then_decode() {
        let source = StrSource::new("To be, or not to be: that is the question.", Normalization::default());
        let artifact = encode_source(&source, "hamlet", DEFAULT_SOURCE_BIT_WIDTH).unwrap();

        let decoded = decode_bytes(&artifact.archive).unwrap();
        assert_eq!(decoded.iter().collect::<String>(), "tobeornottobethatisthequestion");
        assert!(artifact.metadata.verify_integrity(&decoded));
        assert_eq!(artifact.listing.len(), artifact.metadata.report.leaf_count);
    }

    #[test]
    fn empty_source_fails_with_empty_alphabet() {
        let source = StrSource::new("123 !!", Normalization::default());
        let err = encode_source(&source, "digits", DEFAULT_SOURCE_BIT_WIDTH).unwrap_err();
        assert_eq!(err.downcast_ref::<CodecError>(), Some(&CodecError::EmptyAlphabet));
    }

    #[tokio::test]
    async fn encodes_text_file_off_the_runtime() {
        let path = std::env::temp_dir().join(format!("huffpack-pipeline-{}.txt", std::process::id()));
        std::fs::write(&path, "Mississippi").unwrap();

        let source = TextSource::new(&path, Normalization::default(), 1024);
        let artifact = encode_text_file(source, "river".to_string(), DEFAULT_SOURCE_BIT_WIDTH)
            .await
            .unwrap();
        assert_eq!(decode_bytes(&artifact.archive).unwrap().iter().collect::<String>(), "mississippi");
        assert_eq!(artifact.metadata.report.leaf_count, 4);

        let missing = TextSource::new(path.with_extension("gone"), Normalization::default(), 1024);
        let err = encode_text_file(missing, "gone".to_string(), DEFAULT_SOURCE_BIT_WIDTH)
            .await
            .unwrap_err();
        assert!(format!("{:#}", err).contains("Input File Error"));

        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn garbage_is_not_an_archive() {
        assert!(decode_bytes(b"definitely not an archive").is_err());
    }
}
