//! Pairwise cosine similarity over the whole corpus
//!
//! The matrix is dense, row-major and `N×N`, so memory grows quadratically
//! with the corpus. Only the upper triangle is computed; the lower half is a
//! mirror of it, which keeps `get(i, j) == get(j, i)` exact.

use rayon::prelude::*;
use thiserror::Error;

use super::vectorizer::FeatureVector;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SimilarityError {
    #[error("index {index} out of range for {len} items")]
    IndexOutOfRange { index: usize, len: usize },
}

/// A ranked neighbor of a query item
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor {
    pub index: usize,
    pub score: f32,
}

/// Cosine similarity at full precision, 0 when either vector has zero magnitude
pub fn cosine(a: &FeatureVector, b: &FeatureVector) -> f64 {
    let norms = a.magnitude() * b.magnitude();
    if norms == 0.0 {
        return 0.0;
    }
    (a.dot(b) / norms).min(1.0)
}

/// Scores are held as `f32`; use [`cosine`] when an exact value is needed
#[derive(Debug, Clone, Default)]
pub struct SimilarityMatrix {
    len: usize,
    scores: Vec<f32>,
}

impl SimilarityMatrix {
    /// Computes every pairwise cosine score, rows fanned out across threads
    ///
    /// A zero-magnitude vector scores 0 against everything, itself included.
    pub fn build(vectors: &[FeatureVector]) -> Self {
        let len = vectors.len();
        let magnitudes: Vec<f64> = vectors.par_iter().map(FeatureVector::magnitude).collect();

        // Row i holds scores for j in i..len
        let upper: Vec<Vec<f32>> = (0..len)
            .into_par_iter()
            .map(|i| {
                (i..len)
                    .map(|j| {
                        let norms = magnitudes[i] * magnitudes[j];
                        if norms == 0.0 {
                            0.0
                        } else if i == j {
                            1.0
                        } else {
                            (vectors[i].dot(&vectors[j]) / norms).min(1.0) as f32
                        }
                    })
                    .collect()
            })
            .collect();

        let mut scores = vec![0.0_f32; len * len];
        for (i, row) in upper.into_iter().enumerate() {
            for (offset, score) in row.into_iter().enumerate() {
                let j = i + offset;
                scores[i * len + j] = score;
                scores[j * len + i] = score;
            }
        }

        tracing::debug!(items = len, "Built similarity matrix");

        Self { len, scores }
    }

    /// Number of items (rows)
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    fn check(&self, index: usize) -> Result<(), SimilarityError> {
        if index >= self.len {
            return Err(SimilarityError::IndexOutOfRange {
                index,
                len: self.len,
            });
        }
        Ok(())
    }

    pub fn get(&self, i: usize, j: usize) -> Result<f32, SimilarityError> {
        self.check(i)?;
        self.check(j)?;
        Ok(self.scores[i * self.len + j])
    }

    pub fn row(&self, index: usize) -> Result<&[f32], SimilarityError> {
        self.check(index)?;
        let start = index * self.len;
        Ok(&self.scores[start..start + self.len])
    }

    /// Up to `k` most similar items, excluding `index` itself
    ///
    /// Ordered by descending score; equal scores keep ascending index order.
    pub fn neighbors(&self, index: usize, k: usize) -> Result<Vec<Neighbor>, SimilarityError> {
        let row = self.row(index)?;

        let mut ranked: Vec<Neighbor> = row
            .iter()
            .enumerate()
            .filter(|&(j, _)| j != index)
            .map(|(j, &score)| Neighbor { index: j, score })
            .collect();
        // Stable sort keeps ascending index among equal scores
        ranked.sort_by(|a, b| b.score.total_cmp(&a.score));
        ranked.truncate(k);

        Ok(ranked)
    }
}
