use tracing::{debug, error};

use crate::engine::{
    bits::PackedBits,
    codes::CodeTable,
    error::CodecError,
    frequency::FrequencyTable,
    huffman::HuffmanTree,
    symbols::{describe, Symbol},
};

/// Everything one encode run produces. Each run builds its own copy;
/// nothing is shared or reused between runs.
#[derive(Debug, Clone)]
pub struct Encoded<S> {
    pub frequencies: FrequencyTable<S>,
    pub tree: HuffmanTree<S>,
    pub codes: CodeTable<S>,
    pub packed: PackedBits,
    pub symbol_count: u64,
}

/// Concatenate the code of every symbol, in input order.
pub fn pack<S: Symbol>(symbols: &[S], table: &CodeTable<S>) -> Result<PackedBits, CodecError> {
    let mut packed = PackedBits::with_capacity(symbols.len() as u64);

    for symbol in symbols {
        let Some(code) = table.get(symbol) else {
            error!("symbol {} missing from code table", describe(symbol));
            return Err(CodecError::UnknownSymbol(describe(symbol)));
        };
        packed.extend_code(code);
    }

    debug!(symbols = symbols.len(), bits = packed.bit_len(), "packed symbols");
    Ok(packed)
}

pub fn compress<S: Symbol>(symbols: &[S]) -> Result<Encoded<S>, CodecError> {
    let frequencies = FrequencyTable::count(symbols.iter().cloned());
    debug!(distinct = frequencies.len(), total = frequencies.total(), "counted frequencies");

    let tree = HuffmanTree::build(&frequencies)?;
    let codes = CodeTable::from_tree(&tree);
    let packed = pack(symbols, &codes)?;

    Ok(Encoded {
        symbol_count: frequencies.total(),
        frequencies,
        tree,
        codes,
        packed,
    })
}
