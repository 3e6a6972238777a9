//! High-level search interface
//!
//! Combines an embedder and a shared, read-only [`VectorIndex`].
//!
//! # Usage
//!
//! ```ignore
//! use clubrag_lib::search::SearchEngine;
//!
//! let mut engine = SearchEngine::build(embedder, corpus.units().to_vec())?;
//! let retrieval = engine.query("When is the next hackathon?", 3)?;
//! println!("{}", retrieval.context());
//! ```

use std::sync::Arc;

use tracing::debug;

use crate::chunk::Chunk;
use crate::embed::{normalize, Embedder};
use crate::index::{Retrieval, VectorIndex};
use crate::{Error, Result};

/// Search engine combining a query embedder with a prebuilt index.
pub struct SearchEngine<E: Embedder> {
    embedder: E,
    index: Arc<VectorIndex>,
}

impl<E: Embedder> SearchEngine<E> {
    /// Embed `units` and build a fresh index.
    ///
    /// Embedding failures here are fatal: without an index there is no service.
    pub fn build(mut embedder: E, units: Vec<Chunk>) -> Result<Self> {
        let index = VectorIndex::build(units, &mut embedder)?;
        Ok(Self::new(embedder, Arc::new(index)))
    }

    /// Wrap an existing index. The embedder must be the one the index was built with.
    #[must_use]
    pub fn new(embedder: E, index: Arc<VectorIndex>) -> Self {
        Self { embedder, index }
    }

    /// Return the `k` units most similar to `query`.
    ///
    /// Failures to embed or score the query surface as [`Error::Retrieval`];
    /// an empty result only ever means `k` was zero.
    pub fn query(&mut self, query: &str, k: usize) -> Result<Retrieval> {
        let raw = self
            .embedder
            .embed_query(query)
            .map_err(|e| Error::Retrieval(format!("failed to embed query: {e}")))?;
        let query_vector = normalize(raw)
            .ok_or_else(|| Error::Retrieval("query embedded to a zero vector".to_string()))?;

        let results = self.index.search(&query_vector, k)?;
        debug!(k, returned = results.len(), top = ?results.first().map(|r| r.score), "retrieved");
        Ok(Retrieval { results })
    }

    /// Returns the number of indexed units.
    #[must_use]
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// Returns `true` if no units are indexed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Returns a reference to the embedder.
    #[must_use]
    pub fn embedder(&self) -> &E {
        &self.embedder
    }

    /// Returns a mutable reference to the embedder.
    pub fn embedder_mut(&mut self) -> &mut E {
        &mut self.embedder
    }

    /// Returns a shared handle to the index.
    #[must_use]
    pub fn index(&self) -> &Arc<VectorIndex> {
        &self.index
    }
}
