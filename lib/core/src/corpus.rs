//! Loaded corpus
//!
//! [`CorpusHandle`] bundles the items with their vocabulary, term-count
//! matrix and (optionally) the precomputed similarity matrix. It is built
//! once and is read-only afterwards, so one handle can be shared behind an
//! `Arc` by any number of concurrent queries.

use crate::config::EngineConfig;
use crate::indexer::CorpusIndexer;
use crate::item::{FeatureField, Item};
use crate::matrix::TermCountMatrix;
use crate::similarity::{cosine, cosine_row, SimilarityMatrix};
use crate::vocabulary::Vocabulary;
use crate::{Error, Result};
use csv::ReaderBuilder;
use serde::Serialize;
use std::borrow::Cow;
use std::io::Read;
use std::path::Path;
use std::time::Instant;
use tracing::{info, warn};

/// Summary numbers for a loaded corpus
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CorpusStats {
    pub item_count: usize,
    pub vocabulary_size: usize,
    pub nonzero_entries: usize,
    pub precomputed: bool,
}

pub struct CorpusHandle {
    config: EngineConfig,
    items: Vec<Item>,
    lowered_titles: Vec<String>,
    vocabulary: Vocabulary,
    matrix: TermCountMatrix,
    similarity: Option<SimilarityMatrix>,
}

impl std::fmt::Debug for CorpusHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CorpusHandle")
            .field("stats", &self.stats())
            .finish()
    }
}

impl CorpusHandle {
    /// Load a delimited file with a header row
    pub fn load<P: AsRef<Path>>(path: P, config: EngineConfig) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading corpus from {}", path.display());
        let file = std::fs::File::open(path)?;
        Self::from_reader(file, config)
    }

    /// Load delimited records from any reader
    pub fn from_reader<R: Read>(reader: R, config: EngineConfig) -> Result<Self> {
        config.validate()?;
        let items = read_items(reader, &config)?;
        Self::from_items(items, config)
    }

    /// Index items that are already in memory
    pub fn from_items(items: Vec<Item>, config: EngineConfig) -> Result<Self> {
        config.validate()?;
        if items.is_empty() {
            return Err(Error::EmptyCorpus);
        }

        let start = Instant::now();
        let (vocabulary, matrix) = CorpusIndexer::from_config(&config).build(&items)?;
        info!(
            "Indexed {} items, vocabulary size {} in {:?}",
            items.len(),
            vocabulary.len(),
            start.elapsed()
        );

        let similarity = if config.precompute {
            let start = Instant::now();
            let sims = SimilarityMatrix::build(&matrix);
            info!("Precomputed {}x{} similarity matrix in {:?}", sims.len(), sims.len(), start.elapsed());
            Some(sims)
        } else {
            None
        };

        let lowered_titles = items.iter().map(|item| item.title.to_lowercase()).collect();

        Ok(Self {
            config,
            items,
            lowered_titles,
            vocabulary,
            matrix,
            similarity,
        })
    }

    #[inline]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    #[inline]
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    #[inline]
    pub fn item(&self, index: usize) -> Option<&Item> {
        self.items.get(index)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[inline]
    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    #[inline]
    pub fn matrix(&self) -> &TermCountMatrix {
        &self.matrix
    }

    #[inline]
    pub fn is_precomputed(&self) -> bool {
        self.similarity.is_some()
    }

    #[inline]
    pub(crate) fn lowered_titles(&self) -> &[String] {
        &self.lowered_titles
    }

    pub fn stats(&self) -> CorpusStats {
        CorpusStats {
            item_count: self.items.len(),
            vocabulary_size: self.vocabulary.len(),
            nonzero_entries: self.matrix.nnz(),
            precomputed: self.similarity.is_some(),
        }
    }

    /// Similarity between two items, `None` if either index is out of range
    pub fn similarity(&self, a: usize, b: usize) -> Option<f32> {
        if let Some(sims) = &self.similarity {
            return sims.get(a, b);
        }
        Some(cosine(self.matrix.row(a)?, self.matrix.row(b)?))
    }

    /// Scores of item `index` against every item, in corpus order
    pub fn scores_for(&self, index: usize) -> Option<Cow<'_, [f32]>> {
        if let Some(sims) = &self.similarity {
            return sims.row(index).map(Cow::Borrowed);
        }
        let row = self.matrix.row(index)?;
        Some(Cow::Owned(cosine_row(row, &self.matrix)))
    }
}

struct ColumnLayout {
    title: usize,
    features: Vec<(FeatureField, Option<usize>)>,
}

impl ColumnLayout {
    fn resolve(headers: &csv::StringRecord, config: &EngineConfig) -> Result<Self> {
        let find = |name: &str| headers.iter().position(|h| h.trim().eq_ignore_ascii_case(name));

        let title = find(&config.title_column)
            .ok_or_else(|| Error::MissingColumn(config.title_column.clone()))?;

        let mut features = Vec::with_capacity(FeatureField::ALL.len());
        for field in FeatureField::ALL {
            let pos = find(field.column());
            if pos.is_none() && config.features.contains(&field) {
                return Err(Error::MissingColumn(field.column().to_string()));
            }
            features.push((field, pos));
        }

        Ok(Self { title, features })
    }
}

fn read_items<R: Read>(reader: R, config: &EngineConfig) -> Result<Vec<Item>> {
    let mut reader = ReaderBuilder::new()
        .delimiter(config.delimiter)
        .flexible(true)
        .from_reader(reader);

    let layout = ColumnLayout::resolve(reader.headers()?, config)?;

    let mut items = Vec::new();
    let mut skipped = 0usize;
    for (line, record) in reader.records().enumerate() {
        let record = record?;
        let title = record.get(layout.title).unwrap_or("");
        if title.trim().is_empty() {
            skipped += 1;
            warn!("Skipping record {}: empty title", line + 1);
            continue;
        }

        let mut item = Item::new(title);
        for &(field, pos) in &layout.features {
            let value = pos.and_then(|p| record.get(p)).unwrap_or("");
            item = item.with_field(field, value);
        }
        items.push(item);
    }

    if skipped > 0 {
        warn!("Skipped {} records without a title", skipped);
    }
    Ok(items)
}
