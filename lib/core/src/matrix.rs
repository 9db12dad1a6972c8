//! Sparse term-count matrix
//!
//! One row per item, one column per vocabulary token. Rows store only
//! non-zero counts, sorted by column, so two rows can be dotted with a
//! single merge pass.

/// Non-zero term counts of one item
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SparseRow {
    indices: Vec<u32>,
    counts: Vec<u32>,
    norm_sq: u64,
}

impl SparseRow {
    /// Build a row from `(column, count)` pairs
    ///
    /// Pairs may arrive in any order; repeated columns are summed and zero
    /// counts are dropped.
    pub fn from_pairs(mut pairs: Vec<(u32, u32)>) -> Self {
        pairs.sort_unstable_by_key(|&(col, _)| col);

        let mut indices: Vec<u32> = Vec::with_capacity(pairs.len());
        let mut counts: Vec<u32> = Vec::with_capacity(pairs.len());
        for (col, count) in pairs {
            if count == 0 {
                continue;
            }
            match indices.last() {
                Some(&last) if last == col => {
                    if let Some(c) = counts.last_mut() {
                        *c += count;
                    }
                }
                _ => {
                    indices.push(col);
                    counts.push(count);
                }
            }
        }

        let norm_sq = counts.iter().map(|&c| c as u64 * c as u64).sum();
        Self { indices, counts, norm_sq }
    }

    #[inline]
    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    #[inline]
    pub fn counts(&self) -> &[u32] {
        &self.counts
    }

    /// Number of stored (non-zero) entries
    #[inline]
    #[must_use]
    pub fn nnz(&self) -> usize {
        self.indices.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Count at `col`, zero when absent
    pub fn get(&self, col: u32) -> u32 {
        match self.indices.binary_search(&col) {
            Ok(pos) => self.counts[pos],
            Err(_) => 0,
        }
    }

    /// Exact squared Euclidean norm
    #[inline]
    pub fn norm_sq(&self) -> u64 {
        self.norm_sq
    }

    #[inline]
    pub fn norm(&self) -> f64 {
        (self.norm_sq as f64).sqrt()
    }

    /// Exact dot product with another row
    pub fn dot(&self, other: &SparseRow) -> u64 {
        let (mut i, mut j) = (0, 0);
        let mut sum = 0u64;
        while i < self.indices.len() && j < other.indices.len() {
            match self.indices[i].cmp(&other.indices[j]) {
                std::cmp::Ordering::Less => i += 1,
                std::cmp::Ordering::Greater => j += 1,
                std::cmp::Ordering::Equal => {
                    sum += self.counts[i] as u64 * other.counts[j] as u64;
                    i += 1;
                    j += 1;
                }
            }
        }
        sum
    }

    pub fn iter(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        self.indices.iter().copied().zip(self.counts.iter().copied())
    }
}

/// Immutable item-by-token count matrix
#[derive(Debug, Clone, Default)]
pub struct TermCountMatrix {
    rows: Vec<SparseRow>,
    n_cols: usize,
}

impl TermCountMatrix {
    pub(crate) fn new(rows: Vec<SparseRow>, n_cols: usize) -> Self {
        debug_assert!(rows
            .iter()
            .all(|r| r.indices().last().map_or(true, |&c| (c as usize) < n_cols)));
        Self { rows, n_cols }
    }

    #[inline]
    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    #[inline]
    pub fn n_cols(&self) -> usize {
        self.n_cols
    }

    #[inline]
    pub fn row(&self, index: usize) -> Option<&SparseRow> {
        self.rows.get(index)
    }

    #[inline]
    pub fn rows(&self) -> &[SparseRow] {
        &self.rows
    }

    /// Entry at `(row, col)`, zero outside the stored entries
    pub fn get(&self, row: usize, col: usize) -> u32 {
        match self.rows.get(row) {
            Some(r) if col < self.n_cols => r.get(col as u32),
            _ => 0,
        }
    }

    /// Total number of non-zero entries
    pub fn nnz(&self) -> usize {
        self.rows.iter().map(SparseRow::nnz).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_pairs_sorts_and_merges() {
        let row = SparseRow::from_pairs(vec![(5, 1), (2, 2), (5, 3), (9, 0)]);
        assert_eq!(row.indices(), &[2, 5]);
        assert_eq!(row.counts(), &[2, 4]);
        assert_eq!(row.norm_sq(), 4 + 16);
        assert_eq!(row.get(5), 4);
        assert_eq!(row.get(9), 0);
    }

    #[test]
    fn test_dot_product() {
        let a = SparseRow::from_pairs(vec![(0, 1), (1, 2), (3, 1)]);
        let b = SparseRow::from_pairs(vec![(1, 3), (2, 5), (3, 2)]);
        assert_eq!(a.dot(&b), 6 + 2);
        assert_eq!(a.dot(&b), b.dot(&a));
    }

    #[test]
    fn test_empty_row() {
        let row = SparseRow::from_pairs(Vec::new());
        assert!(row.is_empty());
        assert_eq!(row.norm(), 0.0);
        assert_eq!(row.dot(&SparseRow::from_pairs(vec![(0, 1)])), 0);
    }

    #[test]
    fn test_matrix_get_out_of_range() {
        let m = TermCountMatrix::new(vec![SparseRow::from_pairs(vec![(1, 2)])], 2);
        assert_eq!(m.get(0, 1), 2);
        assert_eq!(m.get(0, 7), 0);
        assert_eq!(m.get(3, 0), 0);
        assert_eq!(m.nnz(), 1);
    }
}
