use burn::data::dataset::Dataset;
use serde::{Deserialize, Serialize};

use crate::data::cache::check_alignment;
use crate::domain::split::Split;
use crate::error::TopicResult;
use crate::infra::array_store::Matrix;

/// One training example: a feature vector and its multi-hot topics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopicSample {
    pub features: Vec<f32>,
    pub topics:   Vec<f32>,
}

/// Row-aligned features and topics of one split.
pub struct TopicDataset {
    features: Matrix,
    topics:   Matrix,
}

impl TopicDataset {
    /// Fails with `RowMismatch` when the two matrices disagree on rows.
    pub fn new(split: Split, features: Matrix, topics: Matrix) -> TopicResult<Self> {
        check_alignment(split, &features, &topics)?;
        Ok(Self { features, topics })
    }

    pub fn rows(&self) -> usize { self.features.rows() }

    pub fn feature_dim(&self) -> usize { self.features.cols() }

    pub fn num_topics(&self) -> usize { self.topics.cols() }
}

impl Dataset<TopicSample> for TopicDataset {
    fn get(&self, index: usize) -> Option<TopicSample> {
        Some(TopicSample {
            features: self.features.row(index)?.to_vec(),
            topics:   self.topics.row(index)?.to_vec(),
        })
    }

    fn len(&self) -> usize {
        self.features.rows()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_returns_aligned_rows() {
        let features = Matrix::new(2, 2, vec![1.0, 2.0, 3.0, 4.0]).unwrap();
        let topics   = Matrix::new(2, 3, vec![1.0, 0.0, 0.0, 0.0, 1.0, 1.0]).unwrap();
        let ds       = TopicDataset::new(Split::Train, features, topics).unwrap();

        assert_eq!(ds.len(), 2);
        assert_eq!(ds.get(1).unwrap(), TopicSample { features: vec![3.0, 4.0], topics: vec![0.0, 1.0, 1.0] });
        assert!(ds.get(2).is_none());
    }

    #[test]
    fn test_misaligned_rows_are_rejected() {
        let features = Matrix::new(3, 1, vec![0.0; 3]).unwrap();
        let topics   = Matrix::new(2, 1, vec![0.0; 2]).unwrap();
        assert!(TopicDataset::new(Split::Val, features, topics).is_err());
    }
}
