//! Corpus segmentation
//!
//! Club data files are plain text with one fact per line, so the default
//! strategy treats every meaningful line as a retrievable unit.
//!
//! # Implementing a Chunker
//!
//! ```ignore
//! use clubrag_lib::chunk::{Chunker, Chunk};
//!
//! struct MyChunker { /* ... */ }
//!
//! impl Chunker for MyChunker {
//!     fn chunk(&self, content: &str) -> Vec<Chunk> {
//!         // Your segmentation logic here
//!         todo!()
//!     }
//!
//!     fn name(&self) -> &str {
//!         "mine"
//!     }
//! }
//! ```

use serde::{Deserialize, Serialize};

/// One retrievable unit of corpus text
#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
pub struct Chunk {
    /// Position in the ordered corpus (0-indexed); this is the unit's identity
    pub position: usize,
    /// The trimmed text of this unit
    pub content: String,
}

impl Chunk {
    #[must_use]
    pub fn new(position: usize, content: impl Into<String>) -> Self {
        Self {
            position,
            content: content.into(),
        }
    }
}

/// Trait for corpus segmentation strategies
pub trait Chunker: Send + Sync {
    /// Split content into chunks
    ///
    /// # Returns
    /// Chunks in source order, with `position` numbered from zero
    fn chunk(&self, content: &str) -> Vec<Chunk>;

    /// Returns the name of this chunking strategy
    fn name(&self) -> &str;
}

mod line;

pub use line::*;
