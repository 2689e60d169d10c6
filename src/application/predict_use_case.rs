// ============================================================
// Layer 2 — PredictUseCase
// ============================================================
// Scores one cached feature row with trained weights and names
// the most likely topics:
//
//   Step 1: Load category names from coco_raw.json
//   Step 2: Load the split's feature cache
//   Step 3: Restore weights (explicit path or best checkpoint)
//   Step 4: Rank topics for the chosen row

use anyhow::{ensure, Result};
use rand::Rng;
use std::path::PathBuf;

use crate::data::cache::{load_features, load_image_ids};
use crate::data::raw::CocoRaw;
use crate::domain::split::Split;
use crate::infra::checkpoint::CheckpointManager;
use crate::ml::inferencer::{top_k, TopicPredictor};

#[derive(Debug, Clone)]
pub struct PredictConfig {
    pub data_dir:    PathBuf,
    pub raw_path:    PathBuf,
    /// Falls back to the best checkpoint in `weights_dir`
    pub weights:     Option<PathBuf>,
    pub weights_dir: PathBuf,
    pub split:       Split,
    /// Random row when absent
    pub index:       Option<usize>,
    pub top_k:       usize,
}

#[derive(Debug, Clone)]
pub struct Prediction {
    pub row:      usize,
    pub image_id: Option<u64>,
    /// (category name, probability), best first
    pub topics:   Vec<(String, f32)>,
    /// Ground-truth categories when the image id is known
    pub actual:   Vec<String>,
}

pub struct PredictUseCase {
    config: PredictConfig,
}

impl PredictUseCase {
    pub fn new(config: PredictConfig) -> Self {
        Self { config }
    }

    pub fn execute(&self) -> Result<Prediction> {
        let cfg = &self.config;

        let raw        = CocoRaw::load(&cfg.raw_path)?;
        let categories = raw.category_map();
        let features   = load_features(cfg.split, &cfg.data_dir)?;
        ensure!(features.rows() > 0, "{} feature cache is empty", cfg.split);

        let row = match cfg.index {
            Some(i) => i,
            None => rand::thread_rng().gen_range(0..features.rows()),
        };
        let Some(vector) = features.row(row) else {
            anyhow::bail!("row {} out of range, {} cache has {} rows", row, cfg.split, features.rows());
        };

        let weights = match &cfg.weights {
            Some(path) => path.clone(),
            None => CheckpointManager::new(&cfg.weights_dir)?.best_path()?,
        };

        let predictor = TopicPredictor::from_weights(features.cols(), categories.len(), &weights);
        let probs     = predictor.predict(vector)?;

        let topics = top_k(&probs, cfg.top_k)
            .into_iter()
            .map(|(id, p)| (categories.name(id).unwrap_or("<unknown>").to_string(), p))
            .collect();

        let image_id = load_image_ids(cfg.split, &cfg.data_dir)?
            .and_then(|ids| ids.get(row).copied());
        let actual = image_id
            .and_then(|id| raw.images(cfg.split).get(&id))
            .map(|record| record.categories.clone())
            .unwrap_or_default();

        Ok(Prediction { row, image_id, topics, actual })
    }
}
