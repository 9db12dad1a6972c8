//! Engine configuration
//!
//! Controls which attribute columns feed the surrogate text, how it is
//! tokenized, how many results a query returns, and whether the all-pairs
//! similarity matrix is materialized at load time.

use crate::item::FeatureField;
use crate::tokenize::{Tokenizer, TokenizerKind};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Number of recommendations returned when the caller does not ask otherwise
pub const DEFAULT_TOP_K: usize = 20;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EngineConfig {
    /// Attribute columns concatenated into the surrogate text, in this order
    pub features: Vec<FeatureField>,
    pub top_k: usize,
    pub tokenizer: TokenizerKind,
    pub lowercase: bool,
    /// Build the full `n x n` similarity matrix once instead of per query
    pub precompute: bool,
    pub delimiter: u8,
    pub title_column: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            features: FeatureField::ALL.to_vec(),
            top_k: DEFAULT_TOP_K,
            tokenizer: TokenizerKind::Whitespace,
            lowercase: true,
            precompute: false,
            delimiter: b',',
            title_column: "title".to_string(),
        }
    }
}

impl EngineConfig {
    /// Read a JSON config file; absent keys keep their defaults
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        let config: EngineConfig = serde_json::from_str(&raw)
            .map_err(|e| Error::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.top_k == 0 {
            return Err(Error::InvalidConfig("top_k must be at least 1".into()));
        }
        if self.features.is_empty() {
            return Err(Error::InvalidConfig("at least one feature field is required".into()));
        }
        for (i, field) in self.features.iter().enumerate() {
            if self.features[..i].contains(field) {
                return Err(Error::InvalidConfig(format!("feature '{}' listed twice", field)));
            }
        }
        if self.title_column.trim().is_empty() {
            return Err(Error::InvalidConfig("title column name is empty".into()));
        }
        Ok(())
    }

    #[inline]
    pub fn tokenizer(&self) -> Tokenizer {
        Tokenizer::new(self.tokenizer, self.lowercase)
    }

    #[inline]
    #[must_use]
    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    #[inline]
    #[must_use]
    pub fn with_precompute(mut self, precompute: bool) -> Self {
        self.precompute = precompute;
        self
    }

    #[inline]
    #[must_use]
    pub fn with_tokenizer(mut self, tokenizer: TokenizerKind) -> Self {
        self.tokenizer = tokenizer;
        self
    }

    #[inline]
    #[must_use]
    pub fn with_features(mut self, features: Vec<FeatureField>) -> Self {
        self.features = features;
        self
    }
}
