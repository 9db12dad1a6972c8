//! # reelmatch Core
//!
//! Core library for the reelmatch content-based recommender.
//!
//! This crate provides the indexing and ranking engine:
//!
//! - [`Item`] - A typed movie record with normalized attribute columns
//! - [`CorpusIndexer`] - Builds a [`Vocabulary`] and sparse [`TermCountMatrix`]
//! - [`CorpusHandle`] - Immutable loaded corpus, shareable across threads
//! - [`recommend`] - Resolves a title query and ranks items by cosine similarity
//! - [`QuerySession`] - Background dispatch with last-query-wins semantics
//!
//! ## Example
//!
//! ```rust
//! use reelmatch_core::{recommend, CorpusHandle, EngineConfig, Item};
//!
//! let items = vec![
//!     Item::new("Avatar").with_genres("Action Adventure"),
//!     Item::new("Avengers").with_genres("Action Adventure"),
//!     Item::new("Titanic").with_genres("Drama Romance"),
//! ];
//! let corpus = CorpusHandle::from_items(items, EngineConfig::default()).unwrap();
//!
//! let recs = recommend(&corpus, "avatar", 2).unwrap();
//! assert_eq!(recs.items[0].title, "Avengers");
//! ```

pub mod config;
pub mod corpus;
pub mod error;
pub mod indexer;
pub mod item;
pub mod matrix;
pub mod ranker;
pub mod session;
pub mod similarity;
pub mod tokenize;
pub mod vocabulary;

pub use config::{EngineConfig, DEFAULT_TOP_K};
pub use corpus::{CorpusHandle, CorpusStats};
pub use error::{Error, Result};
pub use indexer::{build, CorpusIndexer};
pub use item::{FeatureField, Item};
pub use matrix::{SparseRow, TermCountMatrix};
pub use ranker::{
    rank, recommend, recommend_default, resolve_query, MatchKind, QueryMatch, Recommendation,
    Recommendations,
};
pub use session::{QueryOutcome, QuerySession};
pub use similarity::{cosine, SimilarityMatrix};
pub use tokenize::{Tokenizer, TokenizerKind};
pub use vocabulary::Vocabulary;

/// Load a corpus file with the given configuration
pub fn load_corpus<P: AsRef<std::path::Path>>(path: P, config: EngineConfig) -> Result<CorpusHandle> {
    CorpusHandle::load(path, config)
}
