//! Cosine similarity over term-count rows
//!
//! All scores lie in `[0.0, 1.0]`. A row with no tokens scores 0 against
//! everything, including itself.

use crate::matrix::{SparseRow, TermCountMatrix};
use rayon::prelude::*;

/// Cosine similarity of two term-count rows
///
/// The dot product and both squared norms are exact integers, so the score
/// is bit-for-bit symmetric in its arguments.
#[inline]
pub fn cosine(a: &SparseRow, b: &SparseRow) -> f32 {
    if a.norm_sq() == 0 || b.norm_sq() == 0 {
        return 0.0;
    }
    let dot = a.dot(b) as f64;
    let score = dot / (a.norm() * b.norm());
    score.clamp(0.0, 1.0) as f32
}

/// Scores of `query` against every row of `matrix`, in row order
pub fn cosine_row(query: &SparseRow, matrix: &TermCountMatrix) -> Vec<f32> {
    matrix.rows().iter().map(|row| cosine(query, row)).collect()
}

/// Dense all-pairs similarity matrix
///
/// Costs `n^2` floats; only built when the engine is configured to
/// precompute.
#[derive(Debug, Clone)]
pub struct SimilarityMatrix {
    n: usize,
    data: Vec<f32>,
}

impl SimilarityMatrix {
    /// Compute the upper triangle in parallel and mirror it
    pub fn build(matrix: &TermCountMatrix) -> Self {
        let rows = matrix.rows();
        let n = rows.len();

        let upper: Vec<Vec<f32>> = (0..n)
            .into_par_iter()
            .map(|i| rows[i..].iter().map(|other| cosine(&rows[i], other)).collect())
            .collect();

        let mut data = vec![0.0f32; n * n];
        for (i, tail) in upper.into_iter().enumerate() {
            for (offset, score) in tail.into_iter().enumerate() {
                let j = i + offset;
                data[i * n + j] = score;
                data[j * n + i] = score;
            }
        }

        Self { n, data }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.n
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    #[inline]
    pub fn get(&self, a: usize, b: usize) -> Option<f32> {
        if a < self.n && b < self.n {
            Some(self.data[a * self.n + b])
        } else {
            None
        }
    }

    /// All scores of item `index`, in row order
    #[inline]
    pub fn row(&self, index: usize) -> Option<&[f32]> {
        if index < self.n {
            Some(&self.data[index * self.n..(index + 1) * self.n])
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indexer::build;
    use crate::item::Item;

    fn row(pairs: &[(u32, u32)]) -> SparseRow {
        SparseRow::from_pairs(pairs.to_vec())
    }

    #[test]
    fn test_cosine_identical() {
        let a = row(&[(0, 1), (1, 2)]);
        assert!((cosine(&a, &a) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_cosine_orthogonal() {
        assert_eq!(cosine(&row(&[(0, 1)]), &row(&[(1, 1)])), 0.0);
    }

    #[test]
    fn test_cosine_zero_norm() {
        let empty = row(&[]);
        assert_eq!(cosine(&empty, &row(&[(0, 3)])), 0.0);
        assert_eq!(cosine(&empty, &empty), 0.0);
    }

    #[test]
    fn test_cosine_known_value() {
        // [1, 1, 0] vs [1, 0, 1] -> 1 / 2
        let sim = cosine(&row(&[(0, 1), (1, 1)]), &row(&[(0, 1), (2, 1)]));
        assert!((sim - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_cosine_symmetric_bitwise() {
        let a = row(&[(0, 3), (2, 1), (5, 7)]);
        let b = row(&[(0, 1), (5, 2), (6, 4)]);
        assert_eq!(cosine(&a, &b).to_bits(), cosine(&b, &a).to_bits());
    }

    #[test]
    fn test_precomputed_matches_on_demand() {
        let items = vec![
            Item::new("Avatar").with_genres("Action Adventure Fantasy"),
            Item::new("Avengers").with_genres("Action Adventure"),
            Item::new("Titanic").with_genres("Drama Romance"),
            Item::new("Blank"),
        ];
        let (_, matrix) = build(&items).unwrap();
        let sims = SimilarityMatrix::build(&matrix);

        assert_eq!(sims.len(), 4);
        for i in 0..4 {
            let on_demand = cosine_row(&matrix.rows()[i], &matrix);
            assert_eq!(sims.row(i).unwrap(), on_demand.as_slice());
            for j in 0..4 {
                assert_eq!(sims.get(i, j), sims.get(j, i));
            }
        }
        assert_eq!(sims.get(3, 3), Some(0.0));
        assert_eq!(sims.get(4, 0), None);
        assert!(sims.row(4).is_none());
    }
}
