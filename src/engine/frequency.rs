use std::collections::BTreeMap;

use crate::engine::error::CodecError;
use crate::engine::symbols::{describe, Symbol};

/// Occurrence count per symbol.
///
/// Backed by an ordered map, so iteration always runs in symbol order. That
/// order is what the tree builder numbers leaves by when breaking ties.
/// Every stored count is at least one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrequencyTable<S> {
    counts: BTreeMap<S, u64>,
    total: u64,
}

impl<S: Symbol> FrequencyTable<S> {
    pub fn count<I>(symbols: I) -> Self
    where
        I: IntoIterator<Item = S>,
    {
        let mut counts = BTreeMap::new();
        let mut total = 0u64;

        for symbol in symbols {
            *counts.entry(symbol).or_insert(0u64) += 1;
            total += 1;
        }

        Self { counts, total }
    }

    /// Rebuild a table from persisted `(symbol, count)` pairs.
    pub fn from_counts<I>(pairs: I) -> Result<Self, CodecError>
    where
        I: IntoIterator<Item = (S, u64)>,
    {
        let mut counts = BTreeMap::new();
        let mut total = 0u64;

        for (symbol, freq) in pairs {
            if freq == 0 {
                return Err(CodecError::InvalidFrequency(format!(
                    "symbol {} has zero frequency",
                    describe(&symbol)
                )));
            }
            total = total.checked_add(freq).ok_or_else(|| {
                CodecError::InvalidFrequency("total frequency overflows".to_string())
            })?;
            if counts.insert(symbol.clone(), freq).is_some() {
                return Err(CodecError::InvalidFrequency(format!(
                    "symbol {} listed twice",
                    describe(&symbol)
                )));
            }
        }

        Ok(Self { counts, total })
    }

    pub fn get(&self, symbol: &S) -> Option<u64> {
        self.counts.get(symbol).copied()
    }

    /// Number of distinct symbols.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Number of symbols counted, i.e. the sum of all frequencies.
    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn iter(&self) -> impl Iterator<Item = (&S, u64)> + '_ {
        self.counts.iter().map(|(symbol, &freq)| (symbol, freq))
    }

    pub fn symbols(&self) -> impl Iterator<Item = &S> + '_ {
        self.counts.keys()
    }

    pub fn to_pairs(&self) -> Vec<(S, u64)> {
        self.iter().map(|(symbol, freq)| (symbol.clone(), freq)).collect()
    }
}
