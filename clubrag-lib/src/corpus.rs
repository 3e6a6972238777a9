//! Corpus store
//!
//! Holds the ordered, immutable sequence of retrievable units. A `Corpus`
//! is never empty: construction fails with [`Error::EmptyCorpus`] instead.

use std::fs;
use std::path::Path;

use tracing::{debug, info};

use crate::chunk::{Chunk, Chunker, LineChunker};
use crate::{Error, Result};

#[derive(Debug, Clone)]
pub struct Corpus {
    units: Vec<Chunk>,
}

impl Corpus {
    /// Segment raw text into line units, keeping lines longer than `min_chars`.
    pub fn load(raw: &str, min_chars: usize) -> Result<Self> {
        Self::load_with(raw, &LineChunker { min_chars })
    }

    /// Segment raw text with an arbitrary chunking strategy.
    pub fn load_with(raw: &str, chunker: &dyn Chunker) -> Result<Self> {
        let units = chunker.chunk(raw);
        if units.is_empty() {
            return Err(Error::EmptyCorpus);
        }
        debug!(strategy = chunker.name(), units = units.len(), "segmented corpus");
        Ok(Self { units })
    }

    /// Read a UTF-8 corpus file and segment it.
    pub fn from_path(path: impl AsRef<Path>, min_chars: usize) -> Result<Self> {
        let path = path.as_ref();
        let bytes = fs::read(path)?;
        let raw = String::from_utf8(bytes)
            .map_err(|e| Error::Corpus(format!("{} is not valid UTF-8: {e}", path.display())))?;
        let corpus = Self::load(&raw, min_chars)?;
        info!(path = %path.display(), units = corpus.len(), "loaded corpus");
        Ok(corpus)
    }

    #[must_use]
    pub fn units(&self) -> &[Chunk] {
        &self.units
    }

    /// The first `n` units in corpus order (fewer if the corpus is shorter).
    #[must_use]
    pub fn head(&self, n: usize) -> &[Chunk] {
        &self.units[..n.min(self.units.len())]
    }

    /// Units containing any of `markers`, compared case-insensitively.
    #[must_use]
    pub fn matching(&self, markers: &[String]) -> Vec<Chunk> {
        let markers: Vec<String> = markers
            .iter()
            .filter(|m| !m.is_empty())
            .map(|m| m.to_uppercase())
            .collect();

        self.units
            .iter()
            .filter(|unit| {
                let text = unit.content.to_uppercase();
                markers.iter().any(|m| text.contains(m.as_str()))
            })
            .cloned()
            .collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.units.len()
    }

    /// Always `false`; kept for API symmetry with `len`.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }
}
