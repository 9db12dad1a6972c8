//! Item records
//!
//! A typed movie row. Attribute columns are normalized to empty text once,
//! at construction, so nothing downstream ever sees a missing value.

use serde::{Deserialize, Serialize};

/// Categorical attribute columns that can feed the text surrogate
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum FeatureField {
    Keywords,
    Cast,
    Genres,
    Director,
}

impl FeatureField {
    /// All attribute fields in their default concatenation order
    pub const ALL: [FeatureField; 4] = [
        FeatureField::Keywords,
        FeatureField::Cast,
        FeatureField::Genres,
        FeatureField::Director,
    ];

    /// Column header this field is read from
    pub fn column(&self) -> &'static str {
        match self {
            FeatureField::Keywords => "keywords",
            FeatureField::Cast => "cast",
            FeatureField::Genres => "genres",
            FeatureField::Director => "director",
        }
    }
}

impl std::fmt::Display for FeatureField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.column())
    }
}

impl std::str::FromStr for FeatureField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "keywords" => Ok(FeatureField::Keywords),
            "cast" => Ok(FeatureField::Cast),
            "genres" => Ok(FeatureField::Genres),
            "director" => Ok(FeatureField::Director),
            other => Err(format!("unknown feature field '{}'", other)),
        }
    }
}

/// A single movie in the corpus
///
/// The row index inside the loaded corpus is the item's identity; titles may
/// repeat.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Item {
    pub title: String,
    #[serde(default)]
    pub keywords: String,
    #[serde(default)]
    pub cast: String,
    #[serde(default)]
    pub genres: String,
    #[serde(default)]
    pub director: String,
}

impl Item {
    #[inline]
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    /// Build an item from optional attribute values, missing ones become `""`
    pub fn from_parts(
        title: impl Into<String>,
        keywords: Option<String>,
        cast: Option<String>,
        genres: Option<String>,
        director: Option<String>,
    ) -> Self {
        Self {
            title: title.into(),
            keywords: keywords.unwrap_or_default(),
            cast: cast.unwrap_or_default(),
            genres: genres.unwrap_or_default(),
            director: director.unwrap_or_default(),
        }
    }

    #[inline]
    #[must_use]
    pub fn with_field(mut self, field: FeatureField, value: impl Into<String>) -> Self {
        *self.field_mut(field) = value.into();
        self
    }

    #[inline]
    #[must_use]
    pub fn with_genres(self, genres: impl Into<String>) -> Self {
        self.with_field(FeatureField::Genres, genres)
    }

    #[inline]
    pub fn field(&self, field: FeatureField) -> &str {
        match field {
            FeatureField::Keywords => &self.keywords,
            FeatureField::Cast => &self.cast,
            FeatureField::Genres => &self.genres,
            FeatureField::Director => &self.director,
        }
    }

    fn field_mut(&mut self, field: FeatureField) -> &mut String {
        match field {
            FeatureField::Keywords => &mut self.keywords,
            FeatureField::Cast => &mut self.cast,
            FeatureField::Genres => &mut self.genres,
            FeatureField::Director => &mut self.director,
        }
    }

    /// Concatenate the given fields, in order, separated by single spaces
    ///
    /// Empty fields still contribute their separator; whitespace tokenization
    /// makes the extra spaces irrelevant.
    pub fn surrogate_text(&self, fields: &[FeatureField]) -> String {
        fields
            .iter()
            .map(|f| self.field(*f))
            .collect::<Vec<_>>()
            .join(" ")
    }
}
