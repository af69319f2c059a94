use std::fmt;

/// Failures of the core pipeline. All of them are terminal for the run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    EmptyAlphabet,
    UnknownSymbol(String),
    DecodeCorruption { consumed: u64, bit_len: u64 },
    InvalidFrequency(String),
    SymbolCountMismatch { expected: u64, actual: u64 },
}

impl fmt::Display for CodecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CodecError::EmptyAlphabet =>
                write!(f, "cannot build a code for an empty alphabet"),
            CodecError::UnknownSymbol(symbol) =>
                write!(f, "symbol {} is not in the code table", symbol),
            CodecError::DecodeCorruption { consumed, bit_len } =>
                write!(f, "corrupt bit stream: stopped after {} of {} bits", consumed, bit_len),
            CodecError::InvalidFrequency(reason) =>
                write!(f, "invalid frequency table: {}", reason),
            CodecError::SymbolCountMismatch { expected, actual } =>
                write!(f, "expected {} symbols, decoded {}", expected, actual),
        }
    }
}

impl std::error::Error for CodecError {}
