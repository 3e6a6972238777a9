use fastembed::{EmbeddingModel, InitOptions, TextEmbedding};
use tracing::info;

use crate::embed::{Embedder, Embedding};
use crate::{Error, Result};

/// Default model, matching the original club chatbot.
pub const DEFAULT_EMBEDDING_MODEL: &str = "all-MiniLM-L6-v2";

/// Supported models: (accepted name, fastembed model, dimension).
const MODELS: &[(&str, EmbeddingModel, usize)] = &[
    ("all-MiniLM-L6-v2", EmbeddingModel::AllMiniLML6V2, 384),
    ("all-MiniLM-L12-v2", EmbeddingModel::AllMiniLML12V2, 384),
    ("bge-small-en-v1.5", EmbeddingModel::BGESmallENV15, 384),
    ("bge-base-en-v1.5", EmbeddingModel::BGEBaseENV15, 768),
    ("bge-large-en-v1.5", EmbeddingModel::BGELargeENV15, 1024),
];

/// Local sentence embedder backed by fastembed.
///
/// The same model call is used for documents and queries so both live in
/// one embedding space.
pub struct OnnxEmbedder {
    model: TextEmbedding,
    name: String,
    dimension: usize,
}

impl OnnxEmbedder {
    /// Load a model by name, e.g. `all-MiniLM-L6-v2` or `BAAI/bge-small-en-v1.5`.
    ///
    /// Downloads the model on first use.
    pub fn new(name: &str) -> Result<Self> {
        let (canonical, model, dimension) = lookup(name)?;

        let opts = InitOptions::new(model).with_show_download_progress(true);
        let model = TextEmbedding::try_new(opts).map_err(|e| Error::Embedding(e.to_string()))?;
        info!(model = canonical, dimension, "loaded embedding model");

        Ok(Self {
            model,
            name: canonical.to_string(),
            dimension,
        })
    }
}

/// Resolve a model name, ignoring case and an optional organisation prefix.
fn lookup(name: &str) -> Result<(&'static str, EmbeddingModel, usize)> {
    let bare = name.rsplit('/').next().unwrap_or(name);
    MODELS
        .iter()
        .find(|(known, _, _)| known.eq_ignore_ascii_case(bare))
        .map(|(known, model, dim)| (*known, model.clone(), *dim))
        .ok_or_else(|| {
            let known: Vec<&str> = MODELS.iter().map(|(n, _, _)| *n).collect();
            Error::Embedding(format!(
                "unsupported embedding model '{name}' (supported: {})",
                known.join(", ")
            ))
        })
}

impl Embedder for OnnxEmbedder {
    fn model_name(&self) -> &str {
        &self.name
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn embed_documents(&mut self, texts: &[&str]) -> Result<Vec<Embedding>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        self.model
            .embed(texts, None)
            .map_err(|e| Error::Embedding(e.to_string()))
    }

    fn embed_query(&mut self, text: &str) -> Result<Embedding> {
        self.model
            .embed(vec![text], None)
            .map_err(|e| Error::Embedding(e.to_string()))?
            .into_iter()
            .next()
            .ok_or_else(|| Error::Embedding("model returned no embeddings".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embed::norm;

    #[test]
    fn test_lookup_accepts_prefixed_and_mixed_case() {
        let (name, _, dim) = lookup("sentence-transformers/ALL-MiniLM-L6-v2").unwrap();
        assert_eq!(name, "all-MiniLM-L6-v2");
        assert_eq!(dim, 384);

        let (name, _, dim) = lookup("BAAI/bge-large-en-v1.5").unwrap();
        assert_eq!(name, "bge-large-en-v1.5");
        assert_eq!(dim, 1024);
    }

    #[test]
    fn test_lookup_rejects_unknown() {
        let err = lookup("word2vec").unwrap_err();
        assert!(matches!(err, Error::Embedding(msg) if msg.contains("word2vec")));
    }

    #[test]
    #[ignore] // Requires model download, run with: cargo test -- --ignored
    fn test_query_and_document_share_space() {
        let mut embedder = OnnxEmbedder::new(DEFAULT_EMBEDDING_MODEL).unwrap();

        let docs = embedder
            .embed_documents(&["The club meets every Friday.", "Pizza is served at hackathons."])
            .unwrap();
        let query = embedder.embed_query("When does the club meet?").unwrap();

        assert_eq!(docs.len(), 2);
        assert_eq!(query.len(), embedder.dimension());
        assert!(norm(&query) > 0.0);
    }
}
