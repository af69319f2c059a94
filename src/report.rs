use std::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::engine::{codes::format_code, CodeTable, Encoded, FrequencyTable, Symbol};

/// Bits per symbol in the uncompressed source (one byte per letter).
pub const DEFAULT_SOURCE_BIT_WIDTH: u32 = 8;

/// Observability snapshot of one encode run. Nothing here feeds back into coding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildReport {
    pub leaf_count: usize,
    pub height: usize,
    pub symbol_count: u64,
    pub packed_bits: u64,
    pub original_bits: u64,
    pub space_saved_bits: i64,
    pub weighted_path_length: u64,
    pub compression_ratio: f64,
}

impl BuildReport {
    pub fn from_encoded<S: Symbol>(encoded: &Encoded<S>, source_bit_width: u32) -> Self {
        let packed_bits = encoded.packed.bit_len();
        let original_bits = encoded.symbol_count * source_bit_width as u64;

        let compression_ratio = if original_bits > 0 {
            packed_bits as f64 / original_bits as f64
        } else {
            0.0
        };

        Self {
            leaf_count: encoded.tree.leaf_count(),
            height: encoded.tree.height(),
            symbol_count: encoded.symbol_count,
            packed_bits,
            original_bits,
            space_saved_bits: original_bits as i64 - packed_bits as i64,
            weighted_path_length: encoded.tree.weighted_path_length(),
            compression_ratio,
        }
    }

    pub fn summary_lines(&self) -> Vec<String> {
        vec![
            format!("Number of Leaves: {}", self.leaf_count),
            format!("Height of Tree: {}", self.height),
            format!("Space saved: {} bits", self.space_saved_bits),
        ]
    }
}

/// One `symbol:frequency:code` line per symbol, in symbol order.
pub fn code_listing<S>(frequencies: &FrequencyTable<S>, codes: &CodeTable<S>) -> Vec<String>
where
    S: Symbol + Display,
{
    frequencies
        .iter()
        .map(|(symbol, freq)| {
            let code = codes.get(symbol).map(format_code).unwrap_or_default();
            format!("{}:{}:{}", symbol, freq, code)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::compress;

    #[test]
    fn single_symbol_report() {
        let symbols: Vec<char> = "xxxxxxx".chars().collect();
        let report = BuildReport::from_encoded(&compress(&symbols).unwrap(), DEFAULT_SOURCE_BIT_WIDTH);

        assert_eq!(report.leaf_count, 1);
        assert_eq!(report.height, 0);
        assert_eq!(report.packed_bits, 7);
        assert_eq!(report.original_bits, 56);
        assert_eq!(report.space_saved_bits, 49);
        assert_eq!(report.compression_ratio, 0.125);
    }

    #[test]
    fn textbook_report() {
        let mut symbols = Vec::new();
        for (symbol, count) in [('a', 5), ('b', 9), ('c', 12), ('d', 13), ('e', 16), ('f', 45)] {
            symbols.extend(std::iter::repeat(symbol).take(count));
        }
        let report = BuildReport::from_encoded(&compress(&symbols).unwrap(), DEFAULT_SOURCE_BIT_WIDTH);

        assert_eq!(report.leaf_count, 6);
        assert_eq!(report.height, 4);
        assert_eq!(report.symbol_count, 100);
        assert_eq!(report.packed_bits, 224);
        assert_eq!(report.weighted_path_length, 224);
        assert_eq!(report.space_saved_bits, 800 - 224);
        assert_eq!(
            report.summary_lines(),
            vec!["Number of Leaves: 6", "Height of Tree: 4", "Space saved: 576 bits"]
        );
    }

    #[test]
    fn space_saved_can_be_negative() {
        // Eight distinct symbols at one bit of source width need three bits each.
        let symbols: Vec<char> = "abcdefgh".chars().collect();
        let report = BuildReport::from_encoded(&compress(&symbols).unwrap(), 1);
        assert_eq!(report.packed_bits, 24);
        assert_eq!(report.space_saved_bits, -16);
    }

    #[test]
    fn listing_has_symbol_frequency_code() {
        let symbols: Vec<char> = "aab".chars().collect();
        let encoded = compress(&symbols).unwrap();
        assert_eq!(
            code_listing(&encoded.frequencies, &encoded.codes),
            vec!["a:2:1", "b:1:0"]
        );
    }
}
