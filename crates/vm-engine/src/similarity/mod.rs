pub mod tfidf;

pub use tfidf::TfIdfSimilarity;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimilarityError {
    /// Neither text produced an indexable term after preprocessing.
    #[error("no indexable terms in input text")]
    EmptyVocabulary,
}

/// Text-similarity capability injected into the skill scorer.
///
/// Implementations must be deterministic for a given input pair. Callers
/// treat any `Err` as "backend unavailable" and degrade to the lexical
/// fallback, so implementations are free to refuse inputs they cannot
/// score meaningfully.
pub trait TextSimilarity: Send + Sync {
    /// Implementation name, recorded in logs.
    fn name(&self) -> &'static str;

    /// Similarity of two texts in [0.0, 1.0].
    fn similarity(&self, a: &str, b: &str) -> Result<f64, SimilarityError>;
}

/// Backend factory. Unknown names fall back to the TF-IDF implementation;
/// `"none"`/`"off"` disables the semantic path entirely, which routes the
/// skill scorer onto its lexical fallback.
pub fn create_similarity(name: &str) -> Option<Box<dyn TextSimilarity>> {
    match name {
        "none" | "off" => None,
        "tfidf" => Some(Box::new(TfIdfSimilarity::default())),
        _ => Some(Box::new(TfIdfSimilarity::default())),
    }
}

/// Select the similarity backend from `VM_SIMILARITY` (default: tfidf).
pub fn init_similarity_from_env() -> Option<Box<dyn TextSimilarity>> {
    let name = std::env::var("VM_SIMILARITY").unwrap_or_else(|_| "tfidf".into());
    create_similarity(&name)
}
