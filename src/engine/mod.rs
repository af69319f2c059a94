pub mod bits;
pub mod codes;
pub mod compressor;
pub mod config;
pub mod decompressor;
pub mod error;
pub mod frequency;
pub mod hash;
pub mod huffman;
pub mod symbols;
pub mod tokenizer;

pub use bits::PackedBits;
pub use codes::{Code, CodeTable};
pub use compressor::*;
pub use decompressor::*;
pub use error::CodecError;
pub use frequency::FrequencyTable;
pub use huffman::{HuffmanNode, HuffmanTree};
pub use symbols::Symbol;
