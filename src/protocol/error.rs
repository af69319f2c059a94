use std::fmt;

use crate::engine::CodecError;

#[derive(Debug)]
pub enum FormatError {
    InvalidMagic,
    UnsupportedVersion(u16),
    PayloadTooLarge(usize),
    ChecksumMismatch { expected: u32, actual: u32 },
    Truncated,
    Malformed(String),
    Codec(CodecError),
}

impl fmt::Display for FormatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormatError::InvalidMagic =>
                write!(f, "invalid archive magic"),
            FormatError::UnsupportedVersion(v) =>
                write!(f, "unsupported archive version {}", v),
            FormatError::PayloadTooLarge(size) =>
                write!(f, "archive payload too large: {}", size),
            FormatError::ChecksumMismatch { expected, actual } =>
                write!(f, "payload checksum mismatch: expected {:08x}, got {:08x}", expected, actual),
            FormatError::Truncated =>
                write!(f, "truncated archive"),
            FormatError::Malformed(reason) =>
                write!(f, "malformed archive payload: {}", reason),
            FormatError::Codec(e) =>
                write!(f, "{}", e),
        }
    }
}

impl std::error::Error for FormatError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FormatError::Codec(e) => Some(e),
            _ => None,
        }
    }
}

impl From<CodecError> for FormatError {
    fn from(e: CodecError) -> Self {
        FormatError::Codec(e)
    }
}
