//! Text embedding using local models
//!
//! Uses sentence-transformers/all-MiniLM-L6-v2 via the fastembed crate (ONNX
//! runtime) by default. Other fastembed models can be selected by name.
//!
//! Vectors leaving this module are not assumed to be normalized; the index
//! normalizes corpus and query vectors the same way with [`normalize`].
//!
//! # Usage
//!
//! ```ignore
//! use clubrag_lib::embed::{Embedder, OnnxEmbedder};
//!
//! let mut embedder = OnnxEmbedder::new("all-MiniLM-L6-v2")?;
//!
//! // Embed documents (for indexing)
//! let doc_embeddings = embedder.embed_documents(&["GDGC hosts weekly meetups"])?;
//!
//! // Embed query (for searching)
//! let query_embedding = embedder.embed_query("When are the meetups?")?;
//! ```

use crate::Result;

/// A vector embedding - fixed size array of floats
pub type Embedding = Vec<f32>;

/// Trait for text embedding models
pub trait Embedder: Send + Sync {
    /// Embed multiple documents for indexing
    ///
    /// Documents may be batched for efficiency. Must return one vector per
    /// input, in input order.
    fn embed_documents(&mut self, texts: &[&str]) -> Result<Vec<Embedding>>;

    /// Embed a single query for searching
    fn embed_query(&mut self, text: &str) -> Result<Embedding>;

    /// Returns the embedding dimension
    fn dimension(&self) -> usize;

    /// Returns the model name/identifier
    fn model_name(&self) -> &str;
}

/// Euclidean length of a vector.
#[must_use]
pub fn norm(v: &[f32]) -> f32 {
    v.iter().map(|x| x * x).sum::<f32>().sqrt()
}

/// Scale a vector to unit length.
///
/// Returns `None` for zero or non-finite vectors, which have no direction.
#[must_use]
pub fn normalize(mut v: Embedding) -> Option<Embedding> {
    let n = norm(&v);
    if n == 0.0 || !n.is_finite() {
        return None;
    }
    v.iter_mut().for_each(|x| *x /= n);
    Some(v)
}

mod onnx;
pub use onnx::*;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_unit_length() {
        let v = normalize(vec![3.0, 4.0]).unwrap();
        assert!((norm(&v) - 1.0).abs() < 1e-6);
        assert!((v[0] - 0.6).abs() < 1e-6);
        assert!((v[1] - 0.8).abs() < 1e-6);
    }

    #[test]
    fn test_normalize_already_unit() {
        let v = normalize(vec![0.0, 1.0, 0.0]).unwrap();
        assert_eq!(v, vec![0.0, 1.0, 0.0]);
    }

    #[test]
    fn test_normalize_zero_vector() {
        assert!(normalize(vec![0.0, 0.0]).is_none());
    }

    #[test]
    fn test_normalize_non_finite() {
        assert!(normalize(vec![f32::NAN, 1.0]).is_none());
        assert!(normalize(vec![f32::INFINITY, 1.0]).is_none());
    }
}
