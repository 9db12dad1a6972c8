// Tokenization for the attribute surrogate text
use serde::{Deserialize, Serialize};

/// How surrogate text is split into vocabulary tokens
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum TokenizerKind {
    /// Split on whitespace only; punctuation stays part of the token
    #[default]
    Whitespace,
    /// Runs of alphanumeric or `_` characters, at least two chars long
    Word,
}

impl std::str::FromStr for TokenizerKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "whitespace" => Ok(TokenizerKind::Whitespace),
            "word" => Ok(TokenizerKind::Word),
            other => Err(format!("unknown tokenizer '{}'", other)),
        }
    }
}

/// Tokenizer shared by vocabulary construction and row counting
///
/// The same instance must be used for both, otherwise tokens fragment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tokenizer {
    kind: TokenizerKind,
    lowercase: bool,
}

impl Tokenizer {
    #[inline]
    #[must_use]
    pub fn new(kind: TokenizerKind, lowercase: bool) -> Self {
        Self { kind, lowercase }
    }

    #[inline]
    pub fn kind(&self) -> TokenizerKind {
        self.kind
    }

    /// Tokenize text into owned tokens
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        let text = if self.lowercase {
            text.to_lowercase()
        } else {
            text.to_string()
        };

        match self.kind {
            TokenizerKind::Whitespace => text.split_whitespace().map(str::to_string).collect(),
            TokenizerKind::Word => text
                .split(|c: char| !(c.is_alphanumeric() || c == '_'))
                .filter(|s| s.chars().count() > 1)
                .map(str::to_string)
                .collect(),
        }
    }
}

impl Default for Tokenizer {
    fn default() -> Self {
        Self::new(TokenizerKind::Whitespace, true)
    }
}
