use std::collections::BTreeMap;

use crate::engine::frequency::FrequencyTable;
use crate::engine::huffman::{HuffmanNode, HuffmanTree};
use crate::engine::symbols::Symbol;

/// A code word, most significant bit first. `false` is 0 (left), `true` is 1 (right).
pub type Code = Vec<bool>;

/// Code assigned to a lone-leaf tree, which has no root-to-leaf edge to derive one from.
pub const FALLBACK_CODE: [bool; 1] = [false];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeTable<S> {
    codes: BTreeMap<S, Code>,
}

impl<S: Symbol> CodeTable<S> {
    pub fn from_tree(tree: &HuffmanTree<S>) -> Self {
        fn build_codes<S: Symbol>(
            node: &HuffmanNode<S>,
            code: &mut Code,
            table: &mut BTreeMap<S, Code>,
        ) {
            match node {
                HuffmanNode::Leaf { symbol, .. } => {
                    let assigned = if code.is_empty() {
                        FALLBACK_CODE.to_vec()
                    } else {
                        code.clone()
                    };
                    table.insert(symbol.clone(), assigned);
                }
                HuffmanNode::Internal { left, right, .. } => {
                    code.push(false);
                    build_codes(left, code, table);
                    code.pop();

                    code.push(true);
                    build_codes(right, code, table);
                    code.pop();
                }
            }
        }

        let mut codes = BTreeMap::new();
        build_codes(tree.root(), &mut Vec::new(), &mut codes);
        Self { codes }
    }

    pub fn get(&self, symbol: &S) -> Option<&[bool]> {
        self.codes.get(symbol).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&S, &[bool])> + '_ {
        self.codes.iter().map(|(symbol, code)| (symbol, code.as_slice()))
    }

    pub fn code_string(&self, symbol: &S) -> Option<String> {
        self.get(symbol).map(format_code)
    }

    pub fn max_code_len(&self) -> usize {
        self.codes.values().map(Vec::len).max().unwrap_or(0)
    }

    /// True when no code is a prefix of another.
    pub fn is_prefix_free(&self) -> bool {
        // In lexicographic order a prefix sorts directly before some extension of it.
        let mut sorted: Vec<&Code> = self.codes.values().collect();
        sorted.sort();
        sorted.windows(2).all(|pair| !pair[1].starts_with(pair[0]))
    }

    /// Bits needed to pack every symbol counted in `frequencies`.
    /// `None` if a counted symbol has no code.
    pub fn packed_len(&self, frequencies: &FrequencyTable<S>) -> Option<u64> {
        frequencies.iter().try_fold(0u64, |acc, (symbol, freq)| {
            self.get(symbol).map(|code| acc + freq * code.len() as u64)
        })
    }
}

pub fn format_code(code: &[bool]) -> String {
    code.iter().map(|&bit| if bit { '1' } else { '0' }).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table_for(text: &str) -> CodeTable<char> {
        let frequencies = FrequencyTable::count(text.chars());
        CodeTable::from_tree(&HuffmanTree::build(&frequencies).unwrap())
    }

    #[test]
    fn textbook_codes() {
        let frequencies = FrequencyTable::from_counts(vec![
            ('a', 5),
            ('b', 9),
            ('c', 12),
            ('d', 13),
            ('e', 16),
            ('f', 45),
        ])
        .unwrap();
        let table = CodeTable::from_tree(&HuffmanTree::build(&frequencies).unwrap());

        assert_eq!(table.code_string(&'f').as_deref(), Some("0"));
        assert_eq!(table.code_string(&'c').as_deref(), Some("100"));
        assert_eq!(table.code_string(&'d').as_deref(), Some("101"));
        assert_eq!(table.code_string(&'a').as_deref(), Some("1100"));
        assert_eq!(table.code_string(&'b').as_deref(), Some("1101"));
        assert_eq!(table.code_string(&'e').as_deref(), Some("111"));
        assert_eq!(table.max_code_len(), 4);
        assert_eq!(table.packed_len(&frequencies), Some(224));
    }

    #[test]
    fn single_symbol_gets_fallback_code() {
        let table = table_for("xxxxxxx");
        assert_eq!(table.len(), 1);
        assert_eq!(table.get(&'x'), Some(&FALLBACK_CODE[..]));
        assert_eq!(table.code_string(&'x').as_deref(), Some("0"));
    }

    #[test]
    fn codes_are_prefix_free() {
        let table = table_for("she sells sea shells by the sea shore");
        assert!(table.is_prefix_free());
        assert!(table.iter().all(|(_, code)| !code.is_empty()));
    }

    #[test]
    fn detects_prefix_violation() {
        let mut codes = BTreeMap::new();
        codes.insert('a', vec![false]);
        codes.insert('b', vec![false, true]);
        let table = CodeTable { codes };
        assert!(!table.is_prefix_free());
    }

    #[test]
    fn unknown_symbol_has_no_code() {
        let table = table_for("ab");
        assert_eq!(table.get(&'z'), None);
        let other = FrequencyTable::count("az".chars());
        assert_eq!(table.packed_len(&other), None);
    }

    #[test]
    fn format_code_renders_bits() {
        assert_eq!(format_code(&[true, false, true, true]), "1011");
        assert_eq!(format_code(&[]), "");
    }
}
