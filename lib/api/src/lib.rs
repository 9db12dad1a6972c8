//! # reelmatch API
//!
//! REST front end over a loaded [`reelmatch_core::CorpusHandle`].
//!
//! - `GET /` - banner with the crate version
//! - `GET /stats` - corpus size, vocabulary size, non-zero entries
//! - `GET /recommend?title=...&k=...` - ranked recommendations

pub mod rest;

pub use rest::{routes, RestApi};
