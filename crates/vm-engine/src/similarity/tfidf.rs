use std::collections::{HashMap, HashSet};

use super::{SimilarityError, TextSimilarity};
use crate::text;

/// TF-IDF cosine similarity fit jointly on the two input texts.
///
/// The vector space is rebuilt per call from exactly two documents, so the
/// smoothed idf is `ln((1 + 2) / (1 + df)) + 1` with df in {1, 2}. Vectors
/// are L2-normalized, making the cosine a plain dot product. Deterministic
/// and allocation-bounded by the vocabulary of the two texts.
#[derive(Debug, Default)]
pub struct TfIdfSimilarity;

impl TfIdfSimilarity {
    fn vectorize(
        tokens: &[String],
        vocabulary: &HashMap<&str, usize>,
        doc_frequency: &[usize],
    ) -> Vec<f64> {
        let mut counts = vec![0usize; vocabulary.len()];
        for token in tokens {
            if let Some(&idx) = vocabulary.get(token.as_str()) {
                counts[idx] += 1;
            }
        }

        let total = tokens.len() as f64;
        let mut vector: Vec<f64> = counts
            .iter()
            .zip(doc_frequency)
            .map(|(&count, &df)| {
                let tf = count as f64 / total;
                let idf = (3.0 / (1.0 + df as f64)).ln() + 1.0;
                tf * idf
            })
            .collect();

        let norm: f64 = vector.iter().map(|v| v * v).sum::<f64>().sqrt();
        if norm > 0.0 {
            for v in &mut vector {
                *v /= norm;
            }
        }
        vector
    }
}

impl TextSimilarity for TfIdfSimilarity {
    fn name(&self) -> &'static str {
        "tfidf"
    }

    fn similarity(&self, a: &str, b: &str) -> Result<f64, SimilarityError> {
        let tokens_a = text::tokens(a);
        let tokens_b = text::tokens(b);
        if tokens_a.is_empty() || tokens_b.is_empty() {
            return Err(SimilarityError::EmptyVocabulary);
        }

        let mut vocabulary: HashMap<&str, usize> = HashMap::new();
        for token in tokens_a.iter().chain(tokens_b.iter()) {
            let next = vocabulary.len();
            vocabulary.entry(token.as_str()).or_insert(next);
        }

        let set_a: HashSet<&str> = tokens_a.iter().map(String::as_str).collect();
        let set_b: HashSet<&str> = tokens_b.iter().map(String::as_str).collect();
        let mut doc_frequency = vec![0usize; vocabulary.len()];
        for (token, &idx) in &vocabulary {
            doc_frequency[idx] =
                usize::from(set_a.contains(token)) + usize::from(set_b.contains(token));
        }

        let vec_a = Self::vectorize(&tokens_a, &vocabulary, &doc_frequency);
        let vec_b = Self::vectorize(&tokens_b, &vocabulary, &doc_frequency);

        let dot: f64 = vec_a.iter().zip(&vec_b).map(|(x, y)| x * y).sum();
        Ok(dot.clamp(0.0, 1.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_texts_score_one() {
        let sim = TfIdfSimilarity::default();
        let score = sim.similarity("python teaching", "python teaching").unwrap();
        assert!((score - 1.0).abs() < 1e-9, "got {score}");
    }

    #[test]
    fn disjoint_texts_score_zero() {
        let sim = TfIdfSimilarity::default();
        let score = sim.similarity("python pandas", "carpentry welding").unwrap();
        assert_eq!(score, 0.0);
    }

    #[test]
    fn partial_overlap_scores_between() {
        let sim = TfIdfSimilarity::default();
        let score = sim
            .similarity("python teaching communication", "python gardening")
            .unwrap();
        assert!(score > 0.0 && score < 1.0, "got {score}");
    }

    #[test]
    fn overlapping_pair_beats_disjoint_pair() {
        let sim = TfIdfSimilarity::default();
        let close = sim.similarity("python data analysis", "python analysis").unwrap();
        let far = sim.similarity("python data analysis", "first aid").unwrap();
        assert!(close > far);
    }

    #[test]
    fn empty_text_is_an_error() {
        let sim = TfIdfSimilarity::default();
        assert!(sim.similarity("", "python").is_err());
        assert!(sim.similarity("python", "   !!!").is_err());
    }

    #[test]
    fn deterministic_across_calls() {
        let sim = TfIdfSimilarity::default();
        let first = sim.similarity("a b c d", "c d e f").unwrap();
        let second = sim.similarity("a b c d", "c d e f").unwrap();
        assert_eq!(first, second);
    }
}
