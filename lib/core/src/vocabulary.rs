use ahash::AHashMap;

/// Mapping from distinct token to its column in the term-count matrix
///
/// Columns are assigned in first-seen order while scanning the corpus.
#[derive(Debug, Clone, Default)]
pub struct Vocabulary {
    positions: AHashMap<String, u32>,
    terms: Vec<String>,
}

impl Vocabulary {
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Column for `token`, inserting it if unseen
    pub fn intern(&mut self, token: &str) -> u32 {
        if let Some(&pos) = self.positions.get(token) {
            return pos;
        }
        let pos = self.terms.len() as u32;
        self.positions.insert(token.to_string(), pos);
        self.terms.push(token.to_string());
        pos
    }

    #[inline]
    pub fn get(&self, token: &str) -> Option<u32> {
        self.positions.get(token).copied()
    }

    #[inline]
    pub fn term(&self, position: u32) -> Option<&str> {
        self.terms.get(position as usize).map(String::as_str)
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Tokens in column order
    pub fn terms(&self) -> impl Iterator<Item = &str> {
        self.terms.iter().map(String::as_str)
    }
}
