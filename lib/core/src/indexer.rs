//! Corpus indexer
//!
//! Turns items into a shared vocabulary and a sparse term-count matrix.
//! Runs once at load time; the result is never mutated afterwards.

use crate::config::EngineConfig;
use crate::item::{FeatureField, Item};
use crate::matrix::{SparseRow, TermCountMatrix};
use crate::tokenize::Tokenizer;
use crate::vocabulary::Vocabulary;
use crate::{Error, Result};
use ahash::AHashMap;
use rayon::prelude::*;
use tracing::debug;

/// Builds the vocabulary and term-count matrix for a corpus
#[derive(Debug, Clone)]
pub struct CorpusIndexer {
    features: Vec<FeatureField>,
    tokenizer: Tokenizer,
}

impl CorpusIndexer {
    pub fn new(features: Vec<FeatureField>, tokenizer: Tokenizer) -> Self {
        Self { features, tokenizer }
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(config.features.clone(), config.tokenizer())
    }

    #[inline]
    pub fn features(&self) -> &[FeatureField] {
        &self.features
    }

    #[inline]
    pub fn tokenizer(&self) -> Tokenizer {
        self.tokenizer
    }

    /// Build `(vocabulary, matrix)` with one matrix row per item
    pub fn build(&self, items: &[Item]) -> Result<(Vocabulary, TermCountMatrix)> {
        if items.is_empty() {
            return Err(Error::EmptyCorpus);
        }

        // Tokenizing is independent per item; interning stays sequential so
        // column numbering is deterministic.
        let tokenized: Vec<Vec<String>> = items
            .par_iter()
            .map(|item| self.tokenizer.tokenize(&item.surrogate_text(&self.features)))
            .collect();

        let mut vocabulary = Vocabulary::new();
        let mut rows = Vec::with_capacity(items.len());
        for tokens in &tokenized {
            let mut counts: AHashMap<u32, u32> = AHashMap::with_capacity(tokens.len());
            for token in tokens {
                *counts.entry(vocabulary.intern(token)).or_insert(0) += 1;
            }
            rows.push(SparseRow::from_pairs(counts.into_iter().collect()));
        }

        debug!(
            items = items.len(),
            vocabulary = vocabulary.len(),
            "built term-count matrix"
        );

        let n_cols = vocabulary.len();
        Ok((vocabulary, TermCountMatrix::new(rows, n_cols)))
    }

    /// Count the tokens of arbitrary text against an existing vocabulary
    ///
    /// Tokens outside the vocabulary are ignored.
    pub fn vectorize(&self, vocabulary: &Vocabulary, text: &str) -> SparseRow {
        let pairs = self
            .tokenizer
            .tokenize(text)
            .iter()
            .filter_map(|t| vocabulary.get(t))
            .map(|col| (col, 1))
            .collect();
        SparseRow::from_pairs(pairs)
    }
}

impl Default for CorpusIndexer {
    fn default() -> Self {
        Self::from_config(&EngineConfig::default())
    }
}

/// Build with the default feature order and tokenizer
pub fn build(items: &[Item]) -> Result<(Vocabulary, TermCountMatrix)> {
    CorpusIndexer::default().build(items)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenize::TokenizerKind;

    fn sample() -> Vec<Item> {
        vec![
            Item::new("Avatar").with_genres("Action Adventure"),
            Item::new("Avengers").with_genres("Action Adventure"),
            Item::new("Titanic").with_genres("Drama Romance"),
        ]
    }

    #[test]
    fn test_empty_corpus() {
        assert!(matches!(build(&[]), Err(Error::EmptyCorpus)));
    }

    #[test]
    fn test_shape() {
        let (vocab, matrix) = build(&sample()).unwrap();
        assert_eq!(matrix.n_rows(), 3);
        assert_eq!(vocab.len(), 4);
        assert_eq!(matrix.n_cols(), vocab.len());
    }

    #[test]
    fn test_counts() {
        let items = vec![Item::new("A")
            .with_field(FeatureField::Keywords, "space space alien")
            .with_genres("Space")];
        let (vocab, matrix) = build(&items).unwrap();

        let space = vocab.get("space").unwrap() as usize;
        let alien = vocab.get("alien").unwrap() as usize;
        assert_eq!(matrix.get(0, space), 3);
        assert_eq!(matrix.get(0, alien), 1);
    }

    #[test]
    fn test_case_folding_is_consistent() {
        let items = vec![
            Item::new("A").with_genres("Drama"),
            Item::new("B").with_genres("DRAMA drama"),
        ];
        let (vocab, matrix) = build(&items).unwrap();
        assert_eq!(vocab.len(), 1);
        assert_eq!(matrix.get(1, 0), 2);
    }

    #[test]
    fn test_case_sensitive_when_configured() {
        let indexer = CorpusIndexer::new(
            FeatureField::ALL.to_vec(),
            Tokenizer::new(TokenizerKind::Whitespace, false),
        );
        let (vocab, _) = indexer.build(&[Item::new("A").with_genres("Drama drama")]).unwrap();
        assert_eq!(vocab.len(), 2);
    }

    #[test]
    fn test_item_without_attributes_has_empty_row() {
        let items = vec![Item::new("Blank"), Item::new("Full").with_genres("Comedy")];
        let (_, matrix) = build(&items).unwrap();
        assert!(matrix.row(0).unwrap().is_empty());
        assert_eq!(matrix.row(1).unwrap().nnz(), 1);
    }

    #[test]
    fn test_feature_selection() {
        let indexer = CorpusIndexer::new(vec![FeatureField::Director], Tokenizer::default());
        let items = vec![Item::new("A")
            .with_genres("Action")
            .with_field(FeatureField::Director, "Cameron")];
        let (vocab, _) = indexer.build(&items).unwrap();
        assert_eq!(vocab.terms().collect::<Vec<_>>(), vec!["cameron"]);
    }

    #[test]
    fn test_vectorize_ignores_unknown_tokens() {
        let indexer = CorpusIndexer::default();
        let (vocab, _) = indexer.build(&sample()).unwrap();
        let row = indexer.vectorize(&vocab, "Action thriller action");
        assert_eq!(row.nnz(), 1);
        assert_eq!(row.get(vocab.get("action").unwrap()), 2);
    }
}
