// ============================================================
// Layer 5 — Topic Predictor
// ============================================================
use anyhow::{ensure, Result};
use burn::{
    backend::{ndarray::NdArrayDevice, NdArray},
    prelude::*,
};
use std::path::Path;

use crate::ml::model::{load_category_model, CategoryModel};

type InferBackend = NdArray;

pub struct TopicPredictor {
    model:  CategoryModel<InferBackend>,
    device: NdArrayDevice,
}

impl TopicPredictor {
    /// Weights that fail to load leave the model randomly
    /// initialised; see `load_category_model`.
    pub fn from_weights(feature_dim: usize, num_topics: usize, weights_path: &Path) -> Self {
        let device = NdArrayDevice::default();
        let model  = load_category_model(feature_dim, num_topics, weights_path, &device);
        Self { model, device }
    }

    pub fn feature_dim(&self) -> usize {
        self.model.feature_dim()
    }

    /// Topic probabilities for one feature vector.
    pub fn predict(&self, features: &[f32]) -> Result<Vec<f32>> {
        ensure!(
            features.len() == self.feature_dim(),
            "expected {} features, got {}",
            self.feature_dim(),
            features.len()
        );
        let input = Tensor::<InferBackend, 1>::from_floats(features, &self.device).unsqueeze::<2>();
        let probs = self.model.forward(input).flatten::<1>(0, 1);
        probs
            .into_data()
            .to_vec::<f32>()
            .map_err(|e| anyhow::anyhow!("Cannot read probabilities: {e:?}"))
    }
}

/// Indices of the `k` highest probabilities, best first.
pub fn top_k(probs: &[f32], k: usize) -> Vec<(usize, f32)> {
    let mut ranked: Vec<(usize, f32)> = probs.iter().copied().enumerate().collect();
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
    ranked.truncate(k);
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_top_k_orders_descending() {
        let ranked = top_k(&[0.1, 0.9, 0.5, 0.7], 3);
        assert_eq!(ranked.iter().map(|(i, _)| *i).collect::<Vec<_>>(), vec![1, 3, 2]);
        assert_eq!(top_k(&[0.3], 5).len(), 1);
    }

    #[test]
    fn test_predict_checks_width() {
        let predictor = TopicPredictor::from_weights(4, 2, Path::new("missing.mpk"));
        assert_eq!(predictor.predict(&[0.0; 4]).unwrap().len(), 2);
        assert!(predictor.predict(&[0.0; 3]).is_err());
    }
}
