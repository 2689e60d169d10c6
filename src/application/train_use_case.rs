// ============================================================
// Layer 2 — TrainUseCase
// ============================================================
// Orchestrates one training run:
//
//   Step 1: Load train / val caches       (Layer 4 - data)
//   Step 2: Check row alignment           (Layer 4 - data)
//   Step 3: Save config                   (Layer 6 - infra)
//   Step 4: Run training loop             (Layer 5 - ml)

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::data::{cache::load_data, dataset::TopicDataset};
use crate::domain::split::Split;
use crate::infra::checkpoint::CheckpointManager;
use crate::ml::trainer::{run_training, TrainingSummary};

// ─── Training Configuration ──────────────────────────────────────────────────
// Saved next to the checkpoints so a run can be reproduced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainConfig {
    pub data_dir:    PathBuf,
    pub raw_path:    PathBuf,
    pub weights_dir: PathBuf,
    pub batch_size:  usize,
    pub epochs:      usize,
    pub lr:          f64,
    /// Early stopping patience in epochs
    pub early_stop:  usize,
    /// Multiplier applied to lr on a val_loss plateau
    pub lr_decay:    f64,
    /// Flat epochs before lr is reduced
    pub lr_patience: usize,
    pub min_lr:      f64,
    pub num_workers: usize,
    pub seed:        u64,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            data_dir:    PathBuf::from("dataset/processed_data"),
            raw_path:    PathBuf::from("dataset/coco_raw.json"),
            weights_dir: PathBuf::from("weights"),
            batch_size:  128,
            epochs:      100,
            lr:          1e-3,
            early_stop:  10,
            lr_decay:    0.1,
            lr_patience: 4,
            min_lr:      1e-7,
            num_workers: 1,
            seed:        42,
        }
    }
}

impl TrainConfig {
    /// Directory of the per-epoch run log
    pub fn log_dir(&self) -> PathBuf {
        self.weights_dir.join("topic-logs")
    }

    pub fn validate(&self) -> Result<()> {
        if self.batch_size == 0 {
            bail!("batch_size must be at least 1");
        }
        if !(self.lr_decay > 0.0 && self.lr_decay < 1.0) {
            bail!("lr_decay must be in (0, 1), got {}", self.lr_decay);
        }
        if self.min_lr < 0.0 || self.lr <= 0.0 {
            bail!("learning rates must be positive");
        }
        Ok(())
    }
}

pub struct TrainUseCase {
    config: TrainConfig,
}

impl TrainUseCase {
    pub fn new(config: TrainConfig) -> Self {
        Self { config }
    }

    pub fn execute(&self) -> Result<TrainingSummary> {
        let cfg = &self.config;
        cfg.validate()?;

        // The parsed dataset is not needed to train; keep the flag for parity
        // with the other commands.
        tracing::debug!("Raw dataset path: '{}'", cfg.raw_path.display());

        // ── Step 1: Load cached features and topics ──────────────────────────
        let (features_train, topics_train) = load_data(Split::Train, &cfg.data_dir)?;
        let (features_val, topics_val)     = load_data(Split::Val, &cfg.data_dir)?;

        tracing::info!("Features shape: {:?}", features_train.shape());
        tracing::info!("Topics shape: {:?}", topics_train.shape());

        if features_val.cols() != features_train.cols() || topics_val.cols() != topics_train.cols() {
            bail!(
                "train and val caches disagree on widths: features {} vs {}, topics {} vs {}",
                features_train.cols(), features_val.cols(),
                topics_train.cols(), topics_val.cols(),
            );
        }

        // ── Step 2: Row alignment ────────────────────────────────────────────
        let train_dataset = TopicDataset::new(Split::Train, features_train, topics_train)?;
        let val_dataset   = TopicDataset::new(Split::Val, features_val, topics_val)?;

        if train_dataset.rows() == 0 || val_dataset.rows() == 0 {
            bail!("train and val caches must each contain at least one row");
        }

        // ── Step 3: Save config ──────────────────────────────────────────────
        let ckpt_manager = CheckpointManager::new(&cfg.weights_dir)?;
        ckpt_manager.save_config(cfg)?;

        // ── Step 4: Train ────────────────────────────────────────────────────
        let summary = run_training(cfg, train_dataset, val_dataset, &ckpt_manager)
            .context("Training failed")?;

        tracing::info!(
            "Model training finished after {} epoch(s); best val_loss {:.4}",
            summary.epochs_run, summary.best_val_loss
        );
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(TrainConfig::default().validate().is_ok());
    }

    #[test]
    fn test_invalid_decay_is_rejected() {
        let cfg = TrainConfig { lr_decay: 1.5, ..TrainConfig::default() };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_log_dir_is_under_weights() {
        let cfg = TrainConfig { weights_dir: PathBuf::from("w"), ..TrainConfig::default() };
        assert_eq!(cfg.log_dir(), PathBuf::from("w/topic-logs"));
    }
}
