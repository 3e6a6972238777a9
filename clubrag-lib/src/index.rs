//! In-memory embedding index
//!
//! Holds one unit-length vector per corpus unit, computed once by
//! [`VectorIndex::build`]. The index has no mutating methods, so it can be
//! shared behind an `Arc` between any number of readers.
//!
//! # Storage Model
//!
//! Units and vectors are stored in two parallel vectors indexed by corpus
//! position. Search is a brute-force dot-product scan, which is plenty for
//! corpora of a few thousand lines.

use std::cmp::Ordering;

use tracing::{debug, info};

use crate::chunk::Chunk;
use crate::embed::{normalize, Embedder, Embedding};
use crate::{Error, Result};

/// A search result with similarity score
#[derive(Debug, Clone, PartialEq)]
pub struct SearchResult {
    /// The matched unit
    pub chunk: Chunk,
    /// Cosine similarity: -1.0 to 1.0, higher is more similar
    pub score: f32,
}

/// Ranked results for one query, highest score first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Retrieval {
    pub results: Vec<SearchResult>,
}

impl Retrieval {
    /// The matched units, best first, one per line.
    #[must_use]
    pub fn context(&self) -> String {
        self.results
            .iter()
            .map(|r| r.chunk.content.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.results.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}

#[derive(Debug)]
pub struct VectorIndex {
    units: Vec<Chunk>,
    vectors: Vec<Embedding>,
    dimension: usize,
}

impl VectorIndex {
    /// Embed every unit and store its normalized vector.
    ///
    /// Any embedding failure is returned as-is; callers treat it as fatal.
    pub fn build<E: Embedder + ?Sized>(units: Vec<Chunk>, embedder: &mut E) -> Result<Self> {
        if units.is_empty() {
            return Err(Error::EmptyCorpus);
        }

        let texts: Vec<&str> = units.iter().map(|u| u.content.as_str()).collect();
        debug!(units = texts.len(), model = embedder.model_name(), "embedding corpus");
        let raw = embedder.embed_documents(&texts)?;

        let index = Self::from_embeddings(units, raw)?;
        info!(
            units = index.len(),
            dimension = index.dimension,
            model = embedder.model_name(),
            "built embedding index"
        );
        Ok(index)
    }

    /// Build from precomputed embeddings (must be one per unit, same order).
    pub fn from_embeddings(units: Vec<Chunk>, embeddings: Vec<Embedding>) -> Result<Self> {
        if units.is_empty() {
            return Err(Error::EmptyCorpus);
        }
        if embeddings.len() != units.len() {
            return Err(Error::Embedding(format!(
                "expected {} embeddings, got {}",
                units.len(),
                embeddings.len()
            )));
        }

        let dimension = embeddings[0].len();
        let mut vectors = Vec::with_capacity(embeddings.len());
        for (unit, embedding) in units.iter().zip(embeddings) {
            if embedding.len() != dimension {
                return Err(Error::Embedding(format!(
                    "unit {} has dimension {}, expected {dimension}",
                    unit.position,
                    embedding.len()
                )));
            }
            let vector = normalize(embedding).ok_or_else(|| {
                Error::Embedding(format!("unit {} embedded to a zero vector", unit.position))
            })?;
            vectors.push(vector);
        }

        Ok(Self {
            units,
            vectors,
            dimension,
        })
    }

    /// Rank all units against an already-normalized query vector.
    ///
    /// Returns `min(k, len)` results in descending score order. Equal scores
    /// keep corpus order.
    pub fn search(&self, query: &[f32], k: usize) -> Result<Vec<SearchResult>> {
        if query.len() != self.dimension {
            return Err(Error::Retrieval(format!(
                "query has dimension {}, index expects {}",
                query.len(),
                self.dimension
            )));
        }

        let mut scored: Vec<(usize, f32)> = self
            .vectors
            .iter()
            .map(|v| dot(query, v))
            .enumerate()
            .collect();
        if scored.iter().any(|(_, s)| s.is_nan()) {
            return Err(Error::Retrieval("similarity produced NaN".to_string()));
        }

        // stable: ties (including -0.0 vs 0.0) stay in corpus order
        scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));

        Ok(scored
            .into_iter()
            .take(k.min(self.units.len()))
            .map(|(i, score)| SearchResult {
                chunk: self.units[i].clone(),
                score,
            })
            .collect())
    }

    #[must_use]
    pub fn units(&self) -> &[Chunk] {
        &self.units
    }

    #[must_use]
    pub fn vectors(&self) -> &[Embedding] {
        &self.vectors
    }

    #[must_use]
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.units.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }
}

/// Dot product; equals cosine similarity for unit vectors.
fn dot(a: &[f32], b: &[f32]) -> f32 {
    debug_assert_eq!(a.len(), b.len(), "vectors must have same length");
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embed::norm;

    fn units(texts: &[&str]) -> Vec<Chunk> {
        texts
            .iter()
            .enumerate()
            .map(|(i, t)| Chunk::new(i, *t))
            .collect()
    }

    #[test]
    fn test_dot_identical() {
        let a = vec![1.0, 0.0, 0.0];
        assert!((dot(&a, &a) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_dot_orthogonal() {
        assert!(dot(&[1.0, 0.0], &[0.0, 1.0]).abs() < 1e-6);
    }

    #[test]
    fn test_stored_vectors_are_unit_length() {
        let index = VectorIndex::from_embeddings(
            units(&["a", "b", "c"]),
            vec![vec![3.0, 4.0], vec![0.0, 10.0], vec![0.1, 0.1]],
        )
        .unwrap();

        for v in index.vectors() {
            assert!((norm(v) - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn test_search_returns_sorted() {
        let index = VectorIndex::from_embeddings(
            units(&["far away", "very close", "medium"]),
            vec![
                vec![0.0, 1.0, 0.0], // orthogonal to query
                vec![1.0, 0.0, 0.0], // identical to query
                vec![0.5, 0.5, 0.0], // somewhat similar
            ],
        )
        .unwrap();

        let results = index.search(&[1.0, 0.0, 0.0], 3).unwrap();

        let order: Vec<_> = results.iter().map(|r| r.chunk.position).collect();
        assert_eq!(order, vec![1, 2, 0]);
        for window in results.windows(2) {
            assert!(window[0].score >= window[1].score);
        }
    }

    #[test]
    fn test_search_respects_k() {
        let index = VectorIndex::from_embeddings(
            units(&["a", "b", "c"]),
            vec![vec![1.0, 0.0], vec![0.9, 0.1], vec![0.8, 0.2]],
        )
        .unwrap();

        assert_eq!(index.search(&[1.0, 0.0], 2).unwrap().len(), 2);
        assert!(index.search(&[1.0, 0.0], 0).unwrap().is_empty());
    }

    #[test]
    fn test_search_k_larger_than_index() {
        let index = VectorIndex::from_embeddings(
            units(&["only one", "only two"]),
            vec![vec![1.0, 0.0], vec![0.0, 1.0]],
        )
        .unwrap();

        let results = index.search(&[1.0, 0.0], 5).unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].chunk.content, "only one");
    }

    #[test]
    fn test_ties_keep_corpus_order() {
        let index = VectorIndex::from_embeddings(
            units(&["first", "second", "third", "fourth"]),
            vec![
                vec![0.0, 1.0],
                vec![1.0, 0.0],
                vec![0.0, 1.0],
                vec![0.0, 1.0],
            ],
        )
        .unwrap();

        let results = index.search(&[0.0, 1.0], 4).unwrap();
        let order: Vec<_> = results.iter().map(|r| r.chunk.content.as_str()).collect();
        assert_eq!(order, vec!["first", "third", "fourth", "second"]);

        // deterministic across calls
        assert_eq!(index.search(&[0.0, 1.0], 4).unwrap(), results);
    }

    #[test]
    fn test_signed_zero_tie_keeps_corpus_order() {
        let index = VectorIndex::from_embeddings(
            units(&["left", "right"]),
            vec![vec![-1.0, 0.0], vec![1.0, 0.0]],
        )
        .unwrap();

        // both units are orthogonal to the query; the first can score -0.0
        let results = index.search(&[0.0, -1.0], 2).unwrap();
        assert_eq!(results[0].score, results[1].score);

        let order: Vec<_> = results.iter().map(|r| r.chunk.position).collect();
        assert_eq!(order, vec![0, 1]);
    }

    #[test]
    fn test_search_dimension_mismatch() {
        let index =
            VectorIndex::from_embeddings(units(&["a"]), vec![vec![1.0, 0.0]]).unwrap();
        let err = index.search(&[1.0, 0.0, 0.0], 1).unwrap_err();
        assert!(matches!(err, Error::Retrieval(_)));
    }

    #[test]
    fn test_embedding_count_mismatch() {
        let err = VectorIndex::from_embeddings(units(&["a", "b"]), vec![vec![1.0]]).unwrap_err();
        assert!(matches!(err, Error::Embedding(_)));
    }

    #[test]
    fn test_inconsistent_dimensions_rejected() {
        let err = VectorIndex::from_embeddings(
            units(&["a", "b"]),
            vec![vec![1.0, 0.0], vec![1.0]],
        )
        .unwrap_err();
        assert!(matches!(err, Error::Embedding(_)));
    }

    #[test]
    fn test_zero_vector_rejected() {
        let err =
            VectorIndex::from_embeddings(units(&["a"]), vec![vec![0.0, 0.0]]).unwrap_err();
        assert!(matches!(err, Error::Embedding(_)));
    }

    #[test]
    fn test_empty_units_rejected() {
        let err = VectorIndex::from_embeddings(Vec::new(), Vec::new()).unwrap_err();
        assert!(matches!(err, Error::EmptyCorpus));
    }

    #[test]
    fn test_context_joins_lines_in_rank_order() {
        let retrieval = Retrieval {
            results: vec![
                SearchResult { chunk: Chunk::new(2, "best"), score: 0.9 },
                SearchResult { chunk: Chunk::new(0, "runner up"), score: 0.4 },
            ],
        };
        assert_eq!(retrieval.context(), "best\nrunner up");
        assert_eq!(Retrieval::default().context(), "");
    }
}
