// ============================================================
// Layer 4 — Topic Batcher
// ============================================================
// Implements burn's Batcher trait: stacks N TopicSamples into
// two [N, width] float tensors on the target device.
//
//   features: [f1_1 .. f1_D, f2_1 .. f2_D, ...] → [N, D]
//   topics:   [t1_1 .. t1_K, t2_1 .. t2_K, ...] → [N, K]

use burn::{
    data::dataloader::batcher::Batcher,
    prelude::*,
};

use crate::data::dataset::TopicSample;

#[derive(Debug, Clone)]
pub struct TopicBatch<B: Backend> {
    /// [batch_size, feature_dim]
    pub features: Tensor<B, 2>,

    /// [batch_size, num_topics], 0.0 / 1.0
    pub topics: Tensor<B, 2>,
}

#[derive(Clone, Debug)]
pub struct TopicBatcher<B: Backend> {
    pub device: B::Device,
}

impl<B: Backend> TopicBatcher<B> {
    pub fn new(device: B::Device) -> Self {
        Self { device }
    }
}

impl<B: Backend> Batcher<TopicSample, TopicBatch<B>> for TopicBatcher<B> {
    fn batch(&self, items: Vec<TopicSample>) -> TopicBatch<B> {
        let batch_size  = items.len();
        let feature_dim = items.first().map_or(0, |s| s.features.len());
        let num_topics  = items.first().map_or(0, |s| s.topics.len());

        let features: Vec<f32> = items.iter().flat_map(|s| s.features.iter().copied()).collect();
        let topics: Vec<f32>   = items.iter().flat_map(|s| s.topics.iter().copied()).collect();

        let features = Tensor::<B, 2>::from_data(
            TensorData::new(features, [batch_size, feature_dim]), &self.device,
        );
        let topics = Tensor::<B, 2>::from_data(
            TensorData::new(topics, [batch_size, num_topics]), &self.device,
        );

        TopicBatch { features, topics }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::NdArray;

    #[test]
    fn test_batch_shapes() {
        let batcher = TopicBatcher::<NdArray>::new(Default::default());
        let batch   = batcher.batch(vec![
            TopicSample { features: vec![1.0, 2.0, 3.0], topics: vec![1.0, 0.0] },
            TopicSample { features: vec![4.0, 5.0, 6.0], topics: vec![0.0, 1.0] },
        ]);
        assert_eq!(batch.features.dims(), [2, 3]);
        assert_eq!(batch.topics.dims(), [2, 2]);

        let topics: Vec<f32> = batch.topics.into_data().to_vec().unwrap();
        assert_eq!(topics, vec![1.0, 0.0, 0.0, 1.0]);
    }
}
