// ============================================================
// Layer 5 — Category Model
// ============================================================
// A single dense layer with sigmoid activation on top of
// pre-extracted image features. Each output unit is an
// independent "is this topic present" probability, so the
// head is trained with binary cross-entropy rather than
// softmax cross-entropy.
//
//   features [batch, feature_dim]
//       │  Linear
//       ▼
//   logits   [batch, num_topics]
//       │  sigmoid
//       ▼
//   probs    [batch, num_topics]

use std::path::Path;

use burn::{
    nn::{loss::BinaryCrossEntropyLossConfig, Linear, LinearConfig},
    prelude::*,
    tensor::activation::sigmoid,
};

use crate::infra::checkpoint::load_weights;

/// A topic is predicted present when its probability reaches this
pub const THRESHOLD: f32 = 0.5;

#[derive(Config, Debug)]
pub struct CategoryModelConfig {
    pub feature_dim: usize,
    pub num_topics:  usize,
}

impl CategoryModelConfig {
    pub fn init<B: Backend>(&self, device: &B::Device) -> CategoryModel<B> {
        let classifier = LinearConfig::new(self.feature_dim, self.num_topics).init(device);
        CategoryModel { classifier }
    }
}

#[derive(Module, Debug)]
pub struct CategoryModel<B: Backend> {
    pub classifier: Linear<B>,
}

/// Result of a forward pass with loss
pub struct TopicOutput<B: Backend> {
    pub loss:    Tensor<B, 1>,
    pub probs:   Tensor<B, 2>,
    pub targets: Tensor<B, 2>,
}

impl<B: Backend> TopicOutput<B> {
    pub fn loss_value(&self) -> f64 {
        self.loss.clone().into_scalar().elem::<f64>()
    }

    /// (correct cells, total cells) at THRESHOLD
    pub fn accuracy_counts(&self) -> (usize, usize) {
        binary_accuracy_counts(self.probs.clone(), self.targets.clone())
    }
}

impl<B: Backend> CategoryModel<B> {
    /// Width of the feature input
    pub fn feature_dim(&self) -> usize {
        self.classifier.weight.val().dims()[0]
    }

    /// Width of the topic output
    pub fn num_topics(&self) -> usize {
        self.classifier.weight.val().dims()[1]
    }

    /// features: [batch, feature_dim] → logits: [batch, num_topics]
    pub fn logits(&self, features: Tensor<B, 2>) -> Tensor<B, 2> {
        self.classifier.forward(features)
    }

    /// features: [batch, feature_dim] → probs: [batch, num_topics]
    pub fn forward(&self, features: Tensor<B, 2>) -> Tensor<B, 2> {
        sigmoid(self.logits(features))
    }

    pub fn forward_loss(&self, features: Tensor<B, 2>, targets: Tensor<B, 2>) -> TopicOutput<B> {
        let logits = self.logits(features);
        let loss   = binary_cross_entropy(logits.clone(), targets.clone());
        TopicOutput { loss, probs: sigmoid(logits), targets }
    }
}

/// Mean binary cross-entropy over every cell of the batch, taken
/// on logits so saturated outputs stay finite.
pub fn binary_cross_entropy<B: Backend>(logits: Tensor<B, 2>, targets: Tensor<B, 2>) -> Tensor<B, 1> {
    let bce = BinaryCrossEntropyLossConfig::new()
        .with_logits(true)
        .init(&logits.device());
    bce.forward(logits, targets.greater_equal_elem(THRESHOLD).int())
}

/// Count label cells where thresholded prediction equals the target.
pub fn binary_accuracy_counts<B: Backend>(probs: Tensor<B, 2>, targets: Tensor<B, 2>) -> (usize, usize) {
    let [rows, cols] = probs.dims();
    let correct: i64 = probs
        .greater_equal_elem(THRESHOLD)
        .equal(targets.greater_equal_elem(THRESHOLD))
        .int()
        .sum()
        .into_scalar()
        .elem::<i64>();
    (correct as usize, rows * cols)
}

/// Build a fresh, randomly initialised topic classifier.
pub fn create_category_model<B: Backend>(
    feature_dim: usize,
    num_topics:  usize,
    device:      &B::Device,
) -> CategoryModel<B> {
    CategoryModelConfig::new(feature_dim, num_topics).init(device)
}

/// Build a topic classifier and try to restore weights from disk.
///
/// A failed restore is logged and the freshly initialised model
/// is returned instead; this never fails.
pub fn load_category_model<B: Backend>(
    feature_dim:  usize,
    num_topics:   usize,
    weights_path: &Path,
    device:       &B::Device,
) -> CategoryModel<B> {
    let model = create_category_model(feature_dim, num_topics, device);

    match load_weights(model.clone(), weights_path, device) {
        Ok(loaded) => {
            tracing::info!("Weights loaded from '{}'", weights_path.display());
            loaded
        }
        Err(e) => {
            tracing::warn!("Error trying to load weights: {e:#}");
            model
        }
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::NdArray;

    type TestBackend = NdArray;

    #[test]
    fn test_shapes_match_requested_dims() {
        let device = Default::default();
        let model  = create_category_model::<TestBackend>(16, 5, &device);
        assert_eq!(model.feature_dim(), 16);
        assert_eq!(model.num_topics(), 5);

        let features = Tensor::<TestBackend, 2>::zeros([3, 16], &device);
        assert_eq!(model.forward(features).dims(), [3, 5]);
    }

    #[test]
    fn test_outputs_are_probabilities() {
        let device   = Default::default();
        let model    = create_category_model::<TestBackend>(4, 3, &device);
        let features = Tensor::<TestBackend, 2>::ones([2, 4], &device).mul_scalar(10.0);
        let probs: Vec<f32> = model.forward(features).into_data().to_vec::<f32>().unwrap();
        assert!(probs.iter().all(|p| (0.0..=1.0).contains(p)));
    }

    // logit(0.99) = ln(99)
    const CONFIDENT: f32 = 4.59512;

    #[test]
    fn test_bce_is_small_for_confident_correct_predictions() {
        let device  = Default::default();
        let c       = CONFIDENT;
        let targets = Tensor::<TestBackend, 2>::from_floats([[1.0, 0.0], [0.0, 1.0]], &device);
        let good    = Tensor::<TestBackend, 2>::from_floats([[c, -c], [-c, c]], &device);
        let bad     = Tensor::<TestBackend, 2>::from_floats([[-c, c], [c, -c]], &device);

        let good_loss = binary_cross_entropy(good, targets.clone()).into_scalar().elem::<f64>();
        let bad_loss  = binary_cross_entropy(bad, targets).into_scalar().elem::<f64>();
        assert!((good_loss - 0.01005).abs() < 1e-3, "got {good_loss}");
        assert!(bad_loss > 4.0, "got {bad_loss}");
    }

    #[test]
    fn test_bce_is_finite_at_saturation() {
        let device  = Default::default();
        let targets = Tensor::<TestBackend, 2>::from_floats([[1.0, 0.0]], &device);
        let logits  = Tensor::<TestBackend, 2>::from_floats([[-100.0, 100.0]], &device);
        let loss    = binary_cross_entropy(logits, targets).into_scalar().elem::<f64>();
        assert!(loss.is_finite());
    }

    #[test]
    fn test_forward_loss_reports_sigmoid_of_logits() {
        let device   = Default::default();
        let model    = create_category_model::<TestBackend>(3, 2, &device);
        let features = Tensor::<TestBackend, 2>::from_floats([[0.5, -1.0, 2.0]], &device);
        let targets  = Tensor::<TestBackend, 2>::from_floats([[1.0, 0.0]], &device);

        let expected: Vec<f32> = model.forward(features.clone()).into_data().to_vec().unwrap();
        let output = model.forward_loss(features, targets);
        let actual: Vec<f32>   = output.probs.clone().into_data().to_vec().unwrap();
        for (a, b) in expected.iter().zip(&actual) {
            assert!((a - b).abs() < 1e-6);
        }
        assert!(output.loss_value() > 0.0);
    }

    #[test]
    fn test_load_restores_weights_named_by_best_checkpoint() {
        let dir     = tempfile::tempdir().unwrap();
        let manager = crate::infra::checkpoint::CheckpointManager::new(dir.path()).unwrap();
        let device  = Default::default();
        let trained = create_category_model::<TestBackend>(5, 3, &device);
        manager.save_best(&trained, 1, 0.25).unwrap();

        let loaded = load_category_model::<TestBackend>(5, 3, &manager.best_path().unwrap(), &device);
        let expected: Vec<f32> = trained.classifier.weight.val().into_data().to_vec().unwrap();
        let actual: Vec<f32>   = loaded.classifier.weight.val().into_data().to_vec().unwrap();
        for (a, b) in expected.iter().zip(&actual) {
            // half precision on disk
            assert!((a - b).abs() < 1e-2, "{a} vs {b}");
        }
    }

    #[test]
    fn test_accuracy_counts_cells() {
        let device  = Default::default();
        let targets = Tensor::<TestBackend, 2>::from_floats([[1.0, 0.0, 1.0]], &device);
        let probs   = Tensor::<TestBackend, 2>::from_floats([[0.7, 0.6, 0.2]], &device);
        assert_eq!(binary_accuracy_counts(probs, targets), (1, 3));
    }

    #[test]
    fn test_failed_weight_load_returns_fresh_architecture() {
        let device = Default::default();
        let model  = load_category_model::<TestBackend>(
            8, 4, Path::new("does/not/exist/topic-weights.mpk"), &device,
        );
        assert_eq!(model.feature_dim(), 8);
        assert_eq!(model.num_topics(), 4);
    }
}
