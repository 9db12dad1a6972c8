//! # reelmatch
//!
//! A content-based movie recommender.
//!
//! reelmatch concatenates the categorical attributes of every movie
//! (keywords, cast, genres, director) into one text surrogate, counts tokens
//! into a sparse term-count matrix, and ranks movies by cosine similarity to
//! a query title.
//!
//! ## Quick Start
//!
//! ### From the command line
//!
//! ```bash
//! reelmatch --dataset movie_dataset.csv recommend "Avatar"
//! reelmatch --dataset movie_dataset.csv interactive
//! reelmatch --dataset movie_dataset.csv serve --port 8080
//! ```
//!
//! ### As a Library
//!
//! ```rust,no_run
//! use reelmatch::prelude::*;
//!
//! let corpus = load_corpus("movie_dataset.csv", EngineConfig::default()).unwrap();
//! let recs = recommend(&corpus, "avatar", 20).unwrap();
//! for rec in &recs.items {
//!     println!("{} ({:.3})", rec.title, rec.score);
//! }
//! ```
//!
//! ## Crate Structure
//!
//! - `reelmatch-core` - Items, indexing, similarity, ranking, query sessions
//! - `reelmatch-api` - REST API

// Re-export core types
pub use reelmatch_core::{
    load_corpus, rank, recommend, recommend_default, resolve_query,
    CorpusHandle, CorpusIndexer, CorpusStats, EngineConfig,
    Error, FeatureField, Item, MatchKind, QueryMatch, QueryOutcome, QuerySession,
    Recommendation, Recommendations, Result, TermCountMatrix, TokenizerKind, Vocabulary,
    DEFAULT_TOP_K,
};

// Re-export API
pub use reelmatch_api::RestApi;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        load_corpus, recommend, recommend_default,
        CorpusHandle, EngineConfig, Error, FeatureField, Item,
        QuerySession, Recommendation, Recommendations, Result, TokenizerKind,
        RestApi,
    };
}
