// ============================================================
// Layer 6 — Checkpoint Manager
// ============================================================
// Saves and restores CategoryModel weights with burn's
// CompactRecorder (named MessagePack, half precision).
//
// Layout of the weights directory:
//
//   weights/
//     topic-weights-01-0.21.mpk   ← only written when val_loss improves
//     topic-weights-04-0.17.mpk
//     best_checkpoint.json        ← file name of the best weights so far
//     train_config.json           ← hyperparameters of the run
//     topic-logs/metrics.csv      ← see infra::metrics
//
// The recorder replaces the last extension of the path it is
// given with its own. Checkpoint names contain a decimal point,
// so they always carry that extension already and the swap is
// a no-op.

use anyhow::{Context, Result};
use std::{
    fs,
    path::{Path, PathBuf},
};
use burn::{
    prelude::*,
    record::{CompactRecorder, FileRecorder, Recorder},
};
use serde::{Deserialize, Serialize};

use crate::application::train_use_case::TrainConfig;
use crate::ml::model::CategoryModel;

const BEST_POINTER: &str = "best_checkpoint.json";
const CONFIG_FILE: &str = "train_config.json";

/// Contents of best_checkpoint.json
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BestCheckpoint {
    pub epoch:     usize,
    pub val_loss:  f64,
    pub file_name: String,
}

pub struct CheckpointManager {
    dir: PathBuf,
}

impl CheckpointManager {
    /// Creates the directory if it does not exist yet.
    pub fn new(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)
            .with_context(|| format!("Cannot create weights directory '{}'", dir.display()))?;
        Ok(Self { dir })
    }

    /// `topic-weights-{epoch:02}-{val_loss:.2}.mpk`
    pub fn weights_file_name<B: Backend>(epoch: usize, val_loss: f64) -> String {
        let ext = <CompactRecorder as FileRecorder<B>>::file_extension();
        format!("topic-weights-{epoch:02}-{val_loss:.2}.{ext}")
    }

    /// Write weights for `epoch` and point best_checkpoint.json at them.
    /// Returns the path of the written file.
    pub fn save_best<B: Backend>(
        &self,
        model:    &CategoryModel<B>,
        epoch:    usize,
        val_loss: f64,
    ) -> Result<PathBuf> {
        let file_name = Self::weights_file_name::<B>(epoch, val_loss);
        let path      = self.dir.join(&file_name);

        CompactRecorder::new()
            .record(model.clone().into_record(), path.clone())
            .with_context(|| format!("Failed to save checkpoint to '{}'", path.display()))?;

        let best = BestCheckpoint { epoch, val_loss, file_name };
        fs::write(self.dir.join(BEST_POINTER), serde_json::to_string_pretty(&best)?)
            .with_context(|| format!("Failed to write {BEST_POINTER}"))?;

        tracing::debug!("Saved checkpoint: '{}'", path.display());
        Ok(path)
    }

    pub fn best(&self) -> Result<BestCheckpoint> {
        let path = self.dir.join(BEST_POINTER);
        let s = fs::read_to_string(&path).with_context(|| {
            format!("Cannot find '{}'. Have you run 'train' first?", path.display())
        })?;
        Ok(serde_json::from_str(&s)?)
    }

    pub fn best_path(&self) -> Result<PathBuf> {
        Ok(self.dir.join(self.best()?.file_name))
    }

    /// Save the run configuration before training starts.
    pub fn save_config(&self, cfg: &TrainConfig) -> Result<()> {
        let path = self.dir.join(CONFIG_FILE);
        let json = serde_json::to_string_pretty(cfg)?;
        fs::write(&path, json)
            .with_context(|| format!("Cannot write config to '{}'", path.display()))?;
        tracing::debug!("Saved training config to '{}'", path.display());
        Ok(())
    }
}

/// Restore weights at `path` into `model`.
pub fn load_weights<B: Backend>(
    model:  CategoryModel<B>,
    path:   &Path,
    device: &B::Device,
) -> Result<CategoryModel<B>> {
    if !path.exists() {
        anyhow::bail!("weights file '{}' does not exist", path.display());
    }
    let record = CompactRecorder::new()
        .load(path.to_path_buf(), device)
        .with_context(|| format!("Cannot load weights from '{}'", path.display()))?;
    Ok(model.load_record(record))
}
