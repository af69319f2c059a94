use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use tracing::debug;

use crate::engine::config::Normalization;
use crate::engine::tokenizer::tokenize;

/// Anything that can hand the codec a materialized symbol sequence.
pub trait SymbolSource {
    fn symbols(&self) -> Result<Vec<char>>;
}

/// UTF-8 text file, normalized on read.
#[derive(Debug, Clone)]
pub struct TextSource {
    path: PathBuf,
    normalization: Normalization,
    max_input_size: u64,
}

impl TextSource {
    pub fn new(path: impl Into<PathBuf>, normalization: Normalization, max_input_size: u64) -> Self {
        Self {
            path: path.into(),
            normalization,
            max_input_size,
        }
    }
}

impl SymbolSource for TextSource {
    fn symbols(&self) -> Result<Vec<char>> {
        let size = std::fs::metadata(&self.path)
            .with_context(|| format!("Input File Error: {}", self.path.display()))?
            .len();
        if size > self.max_input_size {
            bail!(
                "Input File Error: {} is {} bytes, limit is {}",
                self.path.display(),
                size,
                self.max_input_size
            );
        }

        let text = std::fs::read_to_string(&self.path)
            .with_context(|| format!("Input File Error: {}", self.path.display()))?;
        let symbols = tokenize(&text, &self.normalization);
        debug!(path = %self.path.display(), bytes = size, symbols = symbols.len(), "read text source");
        Ok(symbols)
    }
}

/// In-memory text.
#[derive(Debug, Clone)]
pub struct StrSource<'a> {
    text: &'a str,
    normalization: Normalization,
}

impl<'a> StrSource<'a> {
    pub fn new(text: &'a str, normalization: Normalization) -> Self {
        Self { text, normalization }
    }
}

impl SymbolSource for StrSource<'_> {
    fn symbols(&self) -> Result<Vec<char>> {
        Ok(tokenize(self.text, &self.normalization))
    }
}
