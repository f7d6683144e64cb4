//! Exact nearest-neighbor search over unit vectors.

use serde::{Deserialize, Serialize};

use ragstore_core::error::{Result, StoreError};

/// Flat inner-product index.
///
/// Every query is compared against every stored vector. Scores are inner
/// products, which equal cosine similarity because the encoder emits
/// unit-length vectors. There is no removal primitive; deletion is handled
/// upstream by rebuilding the whole index.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FlatIndex {
    dim: usize,
    vectors: Vec<Vec<f32>>,
}

impl FlatIndex {
    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }

    /// Dimensionality, fixed by the first batch added; 0 while empty.
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Append a batch of vectors. All-or-nothing: a dimension mismatch
    /// anywhere in the batch leaves the index untouched.
    pub fn add_batch(&mut self, vectors: Vec<Vec<f32>>) -> Result<()> {
        if self.dim == 0 {
            if let Some(first) = vectors.first() {
                self.dim = first.len();
            }
        }
        if let Some(bad) = vectors.iter().find(|v| v.len() != self.dim) {
            return Err(StoreError::DimensionMismatch { expected: self.dim, actual: bad.len() });
        }
        self.vectors.extend(vectors);
        Ok(())
    }

    /// Top-`k` stored vectors by inner product with `query`, descending.
    pub fn search(&self, query: &[f32], k: usize) -> Vec<(usize, f32)> {
        let k = k.min(self.vectors.len());
        if k == 0 {
            return Vec::new();
        }
        let mut scored: Vec<(usize, f32)> = self
            .vectors
            .iter()
            .enumerate()
            .map(|(i, v)| (i, dot(query, v)))
            .collect();
        scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(k);
        scored
    }
}

fn dot(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b.iter()).map(|(x, y)| x * y).sum()
}

/// Scale `v` to unit length in place. Zero vectors are left untouched.
pub fn l2_normalize(v: &mut [f32]) {
    let norm = v.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > f32::EPSILON {
        for x in v.iter_mut() {
            *x /= norm;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_ranks_by_inner_product() {
        let mut index = FlatIndex::default();
        index
            .add_batch(vec![
                vec![1.0, 0.0],
                vec![0.0, 1.0],
                vec![0.7071, 0.7071],
            ])
            .unwrap();

        let hits = index.search(&[1.0, 0.0], 3);
        assert_eq!(hits.len(), 3);
        assert_eq!(hits[0].0, 0);
        assert_eq!(hits[1].0, 2);
        assert!(hits[0].1 >= hits[1].1 && hits[1].1 >= hits[2].1);
    }

    #[test]
    fn k_is_capped_at_stored_count() {
        let mut index = FlatIndex::default();
        index.add_batch(vec![vec![1.0, 0.0]]).unwrap();
        assert_eq!(index.search(&[1.0, 0.0], 10).len(), 1);
        assert!(FlatIndex::default().search(&[1.0, 0.0], 10).is_empty());
    }

    #[test]
    fn mismatched_batch_is_rejected_whole() {
        let mut index = FlatIndex::default();
        let err = index.add_batch(vec![vec![1.0, 0.0], vec![1.0, 0.0, 0.0]]);
        assert!(err.is_err());
        assert_eq!(index.len(), 0, "nothing from the bad batch is kept");
    }

    #[test]
    fn normalize_produces_unit_vectors() {
        let mut v = vec![3.0, 4.0];
        l2_normalize(&mut v);
        assert!((v[0] - 0.6).abs() < 1e-6 && (v[1] - 0.8).abs() < 1e-6);

        let mut zero = vec![0.0, 0.0];
        l2_normalize(&mut zero);
        assert_eq!(zero, vec![0.0, 0.0]);
    }
}
