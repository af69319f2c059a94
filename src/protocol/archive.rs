use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::engine::{decompress_parts, Encoded, FrequencyTable, PackedBits};
use crate::protocol::constants::{
    ARCHIVE_MAGIC, FLAGS_NONE, FORMAT_VERSION, HEADER_SIZE, KNOWN_FLAGS, MAX_PAYLOAD_SIZE,
};
use crate::protocol::error::FormatError;
use crate::utils::crc::{crc32, verify_crc32};

/// Fixed-size archive header (16 bytes, big-endian)
///
/// ```text
/// magic[4] | version u16 | flags u8 | reserved u8 | payload_len u32 | crc32 u32
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveHeader {
    pub version: u16,
    pub flags: u8,
    pub payload_len: u32,
    pub checksum: u32,
}

impl ArchiveHeader {
    pub const SIZE: usize = HEADER_SIZE;

    pub fn decode(buf: &[u8]) -> Result<Self, FormatError> {
        if buf.len() < Self::SIZE {
            error!("Archive header too short: {} bytes", buf.len());
            return Err(FormatError::Truncated);
        }

        if buf[0..4] != ARCHIVE_MAGIC {
            return Err(FormatError::InvalidMagic);
        }

        let version = u16::from_be_bytes([buf[4], buf[5]]);
        if version != FORMAT_VERSION {
            return Err(FormatError::UnsupportedVersion(version));
        }

        let flags = buf[6];
        if flags & !KNOWN_FLAGS != 0 {
            return Err(FormatError::Malformed(format!("unknown flags {:#04x}", flags)));
        }
        if buf[7] != 0 {
            return Err(FormatError::Malformed(format!("reserved byte is {:#04x}", buf[7])));
        }

        let payload_len = u32::from_be_bytes([buf[8], buf[9], buf[10], buf[11]]);
        if payload_len as usize > MAX_PAYLOAD_SIZE {
            return Err(FormatError::PayloadTooLarge(payload_len as usize));
        }

        Ok(Self {
            version,
            flags,
            payload_len,
            checksum: u32::from_be_bytes([buf[12], buf[13], buf[14], buf[15]]),
        })
    }

    pub fn encode(&self) -> [u8; Self::SIZE] {
        let mut buf = [0u8; Self::SIZE];
        buf[0..4].copy_from_slice(&ARCHIVE_MAGIC);
        buf[4..6].copy_from_slice(&self.version.to_be_bytes());
        buf[6] = self.flags;
        buf[7] = 0;
        buf[8..12].copy_from_slice(&self.payload_len.to_be_bytes());
        buf[12..16].copy_from_slice(&self.checksum.to_be_bytes());
        buf
    }
}

/// What the header protects: enough to rebuild the tree and find where the
/// packed stream ends.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArchiveBody {
    pub frequencies: Vec<(char, u64)>,
    pub symbol_count: u64,
    pub bit_len: u64,
    pub bits: Vec<u8>,
}

/// Self-decodable encoded text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Archive {
    pub body: ArchiveBody,
}

impl Archive {
    pub fn from_encoded(encoded: &Encoded<char>) -> Self {
        Self {
            body: ArchiveBody {
                frequencies: encoded.frequencies.to_pairs(),
                symbol_count: encoded.symbol_count,
                bit_len: encoded.packed.bit_len(),
                bits: encoded.packed.as_bytes().to_vec(),
            },
        }
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, FormatError> {
        let payload =
            bincode::serialize(&self.body).map_err(|e| FormatError::Malformed(e.to_string()))?;
        if payload.len() > MAX_PAYLOAD_SIZE {
            return Err(FormatError::PayloadTooLarge(payload.len()));
        }

        let header = ArchiveHeader {
            version: FORMAT_VERSION,
            flags: FLAGS_NONE,
            payload_len: payload.len() as u32,
            checksum: crc32(&payload),
        };

        let mut out = Vec::with_capacity(ArchiveHeader::SIZE + payload.len());
        out.extend_from_slice(&header.encode());
        out.extend(payload);
        Ok(out)
    }

    pub fn from_bytes(data: &[u8]) -> Result<Self, FormatError> {
        let header = ArchiveHeader::decode(data)?;

        let payload = &data[ArchiveHeader::SIZE..];
        if payload.len() != header.payload_len as usize {
            error!(
                expected = header.payload_len,
                actual = payload.len(),
                "archive payload length mismatch"
            );
            return Err(FormatError::Truncated);
        }

        if !verify_crc32(payload, header.checksum) {
            return Err(FormatError::ChecksumMismatch {
                expected: header.checksum,
                actual: crc32(payload),
            });
        }

        let body: ArchiveBody =
            bincode::deserialize(payload).map_err(|e| FormatError::Malformed(e.to_string()))?;
        debug!(
            symbols = body.symbol_count,
            bits = body.bit_len,
            alphabet = body.frequencies.len(),
            "read archive"
        );

        Ok(Self { body })
    }

    pub fn frequencies(&self) -> Result<FrequencyTable<char>, FormatError> {
        Ok(FrequencyTable::from_counts(self.body.frequencies.iter().copied())?)
    }

    pub fn packed(&self) -> Result<PackedBits, FormatError> {
        Ok(PackedBits::from_parts(self.body.bits.clone(), self.body.bit_len)?)
    }

    pub fn decode(&self) -> Result<Vec<char>, FormatError> {
        let frequencies = self.frequencies()?;
        let packed = self.packed()?;
        Ok(decompress_parts(&frequencies, &packed, self.body.symbol_count)?)
    }
}
