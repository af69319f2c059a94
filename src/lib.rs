//! Huffman coding for text: frequency counting, deterministic tree
//! construction, code assignment and exact bit packing, plus a
//! self-describing archive format and local archive storage.
//!
//! ```
//! use huffpack::engine::{compress, decompress};
//!
//! let symbols: Vec<char> = "abracadabra".chars().collect();
//! let encoded = compress(&symbols)?;
//! assert_eq!(decompress(&encoded)?, symbols);
//! # Ok::<(), huffpack::engine::CodecError>(())
//! ```

pub mod batch;
pub mod config;
pub mod engine;
pub mod pipeline;
pub mod protocol;
pub mod report;
pub mod storage;
pub mod utils;
