//! Archive container constants

/// Archive magic bytes: "HUFP"
pub const ARCHIVE_MAGIC: [u8; 4] = *b"HUFP";

/// Current container format version
pub const FORMAT_VERSION: u16 = 1;

/// Fixed header size in bytes
pub const HEADER_SIZE: usize = 16;

/// Hard safety limit on the encoded payload
pub const MAX_PAYLOAD_SIZE: usize = 1024 * 1024 * 1024; // 1GB

/// Feature flags (bitmask), none defined yet
pub const FLAGS_NONE: u8 = 0x00;

/// Every flag bit a reader of this version understands
pub const KNOWN_FLAGS: u8 = FLAGS_NONE;
