use tracing::{debug, error};

use crate::engine::{
    bits::PackedBits,
    compressor::Encoded,
    error::CodecError,
    frequency::FrequencyTable,
    huffman::{HuffmanNode, HuffmanTree},
    symbols::Symbol,
};

/// Walk the tree once per symbol: 0 goes left, 1 goes right, a leaf emits
/// its symbol and restarts at the root. The stream must end on a symbol
/// boundary.
pub fn unpack<S: Symbol>(packed: &PackedBits, tree: &HuffmanTree<S>) -> Result<Vec<S>, CodecError> {
    let bit_len = packed.bit_len();
    let root = tree.root();

    // A lone leaf is coded with the single fallback bit 0.
    if let HuffmanNode::Leaf { symbol, .. } = root {
        let mut symbols = Vec::with_capacity(bit_len as usize);
        for (index, bit) in packed.iter().enumerate() {
            if bit {
                error!(index, "unexpected 1 bit for single-symbol alphabet");
                return Err(CodecError::DecodeCorruption {
                    consumed: index as u64 + 1,
                    bit_len,
                });
            }
            symbols.push(symbol.clone());
        }
        return Ok(symbols);
    }

    let mut symbols = Vec::new();
    let mut current = root;
    let mut consumed = 0u64;

    for bit in packed.iter() {
        let (left, right) = current
            .children()
            .ok_or(CodecError::DecodeCorruption { consumed, bit_len })?;
        consumed += 1;

        current = if bit { right } else { left };

        if let Some(symbol) = current.symbol() {
            symbols.push(symbol.clone());
            current = root;
        }
    }

    if !std::ptr::eq(current, root) {
        error!(consumed, bit_len, "bit stream ended inside a code");
        return Err(CodecError::DecodeCorruption { consumed, bit_len });
    }

    debug!(symbols = symbols.len(), bits = bit_len, "unpacked symbols");
    Ok(symbols)
}

/// Rebuild the tree from persisted frequencies and unpack. The tie-break
/// rule guarantees the rebuilt tree matches the one used for packing.
pub fn decompress_parts<S: Symbol>(
    frequencies: &FrequencyTable<S>,
    packed: &PackedBits,
    symbol_count: u64,
) -> Result<Vec<S>, CodecError> {
    if frequencies.total() != symbol_count {
        return Err(CodecError::SymbolCountMismatch {
            expected: symbol_count,
            actual: frequencies.total(),
        });
    }

    let tree = HuffmanTree::build(frequencies)?;
    let symbols = unpack(packed, &tree)?;

    if symbols.len() as u64 != symbol_count {
        error!(expected = symbol_count, actual = symbols.len(), "decoded symbol count differs");
        return Err(CodecError::SymbolCountMismatch {
            expected: symbol_count,
            actual: symbols.len() as u64,
        });
    }

    Ok(symbols)
}

pub fn decompress<S: Symbol>(encoded: &Encoded<S>) -> Result<Vec<S>, CodecError> {
    decompress_parts(&encoded.frequencies, &encoded.packed, encoded.symbol_count)
}
