// ============================================================
// Layer 6 — Run Log
// ============================================================
// Appends one CSV row per epoch to `<log_dir>/metrics.csv`.
//
//   epoch,train_loss,train_acc,val_loss,val_acc,lr
//   1,0.182340,0.951200,0.120110,0.962030,0.001000
//   2,0.104200,0.963800,0.097310,0.966500,0.001000
//
// Rows are appended so several runs pointed at the same log
// directory build one history.

use anyhow::{Context, Result};
use std::{
    fs::{self, OpenOptions},
    io::Write,
    path::{Path, PathBuf},
};
use serde::{Deserialize, Serialize};

const HEADER: &str = "epoch,train_loss,train_acc,val_loss,val_acc,lr";

/// Metrics for a single training epoch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpochMetrics {
    /// Starts at 1
    pub epoch: usize,

    /// Mean binary cross-entropy over training batches
    pub train_loss: f64,

    /// Fraction of label cells predicted correctly at threshold 0.5
    pub train_acc: f64,

    pub val_loss: f64,

    pub val_acc: f64,

    /// Learning rate the epoch was trained with
    pub lr: f64,
}

pub struct MetricsLogger {
    csv_path: PathBuf,
}

impl MetricsLogger {
    /// Create the log directory and write the header if the CSV is new.
    pub fn new(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)
            .with_context(|| format!("Cannot create log directory '{}'", dir.display()))?;

        let csv_path = dir.join("metrics.csv");
        if !csv_path.exists() {
            let mut f = fs::File::create(&csv_path)
                .with_context(|| format!("Cannot create '{}'", csv_path.display()))?;
            writeln!(f, "{HEADER}")?;
            tracing::debug!("Created metrics CSV: '{}'", csv_path.display());
        }

        Ok(Self { csv_path })
    }

    pub fn log(&self, m: &EpochMetrics) -> Result<()> {
        let mut f = OpenOptions::new()
            .append(true)
            .open(&self.csv_path)
            .with_context(|| format!("Cannot open '{}'", self.csv_path.display()))?;

        writeln!(
            f,
            "{},{:.6},{:.6},{:.6},{:.6},{:.6}",
            m.epoch, m.train_loss, m.train_acc, m.val_loss, m.val_acc, m.lr,
        )?;

        tracing::debug!(
            "Logged epoch {} metrics: train_loss={:.4}, val_loss={:.4}",
            m.epoch, m.train_loss, m.val_loss,
        );
        Ok(())
    }

    pub fn csv_path(&self) -> &Path {
        &self.csv_path
    }
}
