use std::cmp::Ordering;
use std::collections::{BTreeMap, BinaryHeap};
use std::fmt::Write;

use tracing::debug;

use crate::engine::error::CodecError;
use crate::engine::frequency::FrequencyTable;
use crate::engine::symbols::Symbol;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HuffmanNode<S> {
    Leaf {
        symbol: S,
        freq: u64,
    },
    Internal {
        freq: u64,
        leaves: usize,
        height: usize,
        left: Box<HuffmanNode<S>>,
        right: Box<HuffmanNode<S>>,
    },
}

impl<S> HuffmanNode<S> {
    pub fn leaf(symbol: S, freq: u64) -> Self {
        HuffmanNode::Leaf { symbol, freq }
    }

    /// Join two subtrees under a fresh parent. `left` is reached with a 0 bit.
    pub fn merge(left: Self, right: Self) -> Self {
        HuffmanNode::Internal {
            freq: left.freq() + right.freq(),
            leaves: left.leaf_count() + right.leaf_count(),
            height: 1 + left.height().max(right.height()),
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn freq(&self) -> u64 {
        match self {
            HuffmanNode::Leaf { freq, .. } => *freq,
            HuffmanNode::Internal { freq, .. } => *freq,
        }
    }

    pub fn leaf_count(&self) -> usize {
        match self {
            HuffmanNode::Leaf { .. } => 1,
            HuffmanNode::Internal { leaves, .. } => *leaves,
        }
    }

    pub fn height(&self) -> usize {
        match self {
            HuffmanNode::Leaf { .. } => 0,
            HuffmanNode::Internal { height, .. } => *height,
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, HuffmanNode::Leaf { .. })
    }

    pub fn symbol(&self) -> Option<&S> {
        match self {
            HuffmanNode::Leaf { symbol, .. } => Some(symbol),
            HuffmanNode::Internal { .. } => None,
        }
    }

    pub fn children(&self) -> Option<(&HuffmanNode<S>, &HuffmanNode<S>)> {
        match self {
            HuffmanNode::Leaf { .. } => None,
            HuffmanNode::Internal { left, right, .. } => Some((left, right)),
        }
    }
}

// Min-heap entry. Equal frequencies fall back to the creation sequence: leaves
// are numbered in symbol order first, then every merge takes the next number.
struct HeapEntry<S> {
    freq: u64,
    seq: usize,
    node: HuffmanNode<S>,
}

impl<S> PartialEq for HeapEntry<S> {
    fn eq(&self, other: &Self) -> bool {
        self.freq == other.freq && self.seq == other.seq
    }
}

impl<S> Eq for HeapEntry<S> {}

impl<S> PartialOrd for HeapEntry<S> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<S> Ord for HeapEntry<S> {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse for min-heap
        other
            .freq
            .cmp(&self.freq)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

/// An immutable Huffman tree.
///
/// Construction repeatedly removes the two lowest `(frequency, sequence)`
/// nodes and merges them, the first removed becoming the left child. Leaves
/// carry sequence numbers `0..n` in ascending symbol order and each merged
/// node takes the next free number, so identical tables always produce
/// identical trees. A single-symbol table produces a lone leaf root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HuffmanTree<S> {
    root: HuffmanNode<S>,
}

impl<S: Symbol> HuffmanTree<S> {
    pub fn build(frequencies: &FrequencyTable<S>) -> Result<Self, CodecError> {
        if frequencies.is_empty() {
            return Err(CodecError::EmptyAlphabet);
        }

        let mut heap = BinaryHeap::with_capacity(frequencies.len());
        let mut seq = 0usize;
        for (symbol, freq) in frequencies.iter() {
            heap.push(HeapEntry {
                freq,
                seq,
                node: HuffmanNode::leaf(symbol.clone(), freq),
            });
            seq += 1;
        }

        let root = loop {
            let first = heap.pop().ok_or(CodecError::EmptyAlphabet)?;
            let Some(second) = heap.pop() else {
                break first.node;
            };

            let node = HuffmanNode::merge(first.node, second.node);
            heap.push(HeapEntry {
                freq: node.freq(),
                seq,
                node,
            });
            seq += 1;
        };

        debug!(
            leaves = root.leaf_count(),
            height = root.height(),
            weight = root.freq(),
            "built huffman tree"
        );

        Ok(Self { root })
    }

    pub fn root(&self) -> &HuffmanNode<S> {
        &self.root
    }

    pub fn leaf_count(&self) -> usize {
        self.root.leaf_count()
    }

    /// Edges on the longest root-to-leaf path. A lone leaf has height 0.
    pub fn height(&self) -> usize {
        self.root.height()
    }

    /// Number of distinct depths in the tree.
    pub fn levels(&self) -> usize {
        self.root.height() + 1
    }

    /// Sum of all leaf frequencies.
    pub fn weight(&self) -> u64 {
        self.root.freq()
    }

    /// Depth of every leaf, keyed by symbol.
    pub fn depths(&self) -> BTreeMap<S, usize> {
        fn walk<S: Symbol>(node: &HuffmanNode<S>, depth: usize, out: &mut BTreeMap<S, usize>) {
            match node {
                HuffmanNode::Leaf { symbol, .. } => {
                    out.insert(symbol.clone(), depth);
                }
                HuffmanNode::Internal { left, right, .. } => {
                    walk(left, depth + 1, out);
                    walk(right, depth + 1, out);
                }
            }
        }

        let mut out = BTreeMap::new();
        walk(&self.root, 0, &mut out);
        out
    }

    /// Σ frequency × depth over all leaves.
    pub fn weighted_path_length(&self) -> u64 {
        fn walk<S>(node: &HuffmanNode<S>, depth: u64) -> u64 {
            match node {
                HuffmanNode::Leaf { freq, .. } => freq * depth,
                HuffmanNode::Internal { left, right, .. } => {
                    walk(left, depth + 1) + walk(right, depth + 1)
                }
            }
        }

        walk(&self.root, 0)
    }

    /// Indented dump of the tree, one node per line.
    pub fn render(&self) -> String {
        fn walk<S: Symbol>(node: &HuffmanNode<S>, depth: usize, label: &str, out: &mut String) {
            let indent = "  ".repeat(depth);
            match node {
                HuffmanNode::Leaf { symbol, freq } => {
                    let _ = writeln!(out, "{}{} leaf {:?} [{}]", indent, label, symbol, freq);
                }
                HuffmanNode::Internal { freq, left, right, .. } => {
                    let _ = writeln!(out, "{}{} internal [{}]", indent, label, freq);
                    walk(left, depth + 1, "0", out);
                    walk(right, depth + 1, "1", out);
                }
            }
        }

        let mut out = String::new();
        walk(&self.root, 0, "root", &mut out);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn textbook() -> FrequencyTable<char> {
        FrequencyTable::from_counts(vec![
            ('a', 5),
            ('b', 9),
            ('c', 12),
            ('d', 13),
            ('e', 16),
            ('f', 45),
        ])
        .unwrap()
    }

    #[test]
    fn textbook_tree_metadata() {
        let tree = HuffmanTree::build(&textbook()).unwrap();
        assert_eq!(tree.leaf_count(), 6);
        assert_eq!(tree.height(), 4);
        assert_eq!(tree.levels(), 5);
        assert_eq!(tree.weight(), 100);
        assert_eq!(tree.weighted_path_length(), 224);
    }

    #[test]
    fn textbook_depths() {
        let depths = HuffmanTree::build(&textbook()).unwrap().depths();
        let expected: BTreeMap<char, usize> =
            [('a', 4), ('b', 4), ('c', 3), ('d', 3), ('e', 3), ('f', 1)].into_iter().collect();
        assert_eq!(depths, expected);
    }

    #[test]
    fn empty_table_is_an_error() {
        let table = FrequencyTable::count(std::iter::empty::<char>());
        assert_eq!(HuffmanTree::build(&table), Err(CodecError::EmptyAlphabet));
    }

    #[test]
    fn single_symbol_is_a_lone_leaf() {
        let table = FrequencyTable::from_counts(vec![('x', 7)]).unwrap();
        let tree = HuffmanTree::build(&table).unwrap();
        assert_eq!(tree.root(), &HuffmanNode::leaf('x', 7));
        assert_eq!(tree.leaf_count(), 1);
        assert_eq!(tree.height(), 0);
        assert_eq!(tree.weighted_path_length(), 0);
    }

    #[test]
    fn ties_break_on_symbol_order_then_creation() {
        // a and b merge first (lowest sequence), then c (a leaf) sorts ahead
        // of the equally weighted merged node.
        let table = FrequencyTable::from_counts(vec![('c', 2), ('b', 1), ('a', 1)]).unwrap();
        let tree = HuffmanTree::build(&table).unwrap();

        let expected = HuffmanNode::merge(
            HuffmanNode::leaf('c', 2),
            HuffmanNode::merge(HuffmanNode::leaf('a', 1), HuffmanNode::leaf('b', 1)),
        );
        assert_eq!(tree.root(), &expected);
    }

    #[test]
    fn uniform_weights_form_balanced_tree() {
        let table = FrequencyTable::count("abcd".chars());
        let tree = HuffmanTree::build(&table).unwrap();

        let expected = HuffmanNode::merge(
            HuffmanNode::merge(HuffmanNode::leaf('a', 1), HuffmanNode::leaf('b', 1)),
            HuffmanNode::merge(HuffmanNode::leaf('c', 1), HuffmanNode::leaf('d', 1)),
        );
        assert_eq!(tree.root(), &expected);
        assert_eq!(tree.height(), 2);
    }

    #[test]
    fn building_twice_gives_the_same_tree() {
        let table = FrequencyTable::count("the quick brown fox jumps over the lazy dog".chars());
        let first = HuffmanTree::build(&table).unwrap();
        let second = HuffmanTree::build(&table.clone()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn merge_tracks_metadata() {
        let node = HuffmanNode::merge(
            HuffmanNode::leaf('a', 3),
            HuffmanNode::merge(HuffmanNode::leaf('b', 1), HuffmanNode::leaf('c', 1)),
        );
        assert_eq!(node.freq(), 5);
        assert_eq!(node.leaf_count(), 3);
        assert_eq!(node.height(), 2);
        assert!(!node.is_leaf());
        assert_eq!(node.symbol(), None);
    }

    #[test]
    fn render_lists_every_node() {
        let tree = HuffmanTree::build(&FrequencyTable::count("aab".chars())).unwrap();
        let rendered = tree.render();
        assert_eq!(rendered.lines().count(), 3);
        assert!(rendered.starts_with("root internal [3]"));
        assert!(rendered.contains("0 leaf 'b' [1]"));
        assert!(rendered.contains("1 leaf 'a' [2]"));
    }
}
