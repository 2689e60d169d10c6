// ============================================================
// Layer 1 — CLI Commands and Arguments
// ============================================================
// Flag names keep the snake_case spelling of the training
// scripts (`--batch_size`, `--early_stop`, ...).

use clap::{Args, Subcommand};
use std::path::PathBuf;

use crate::application::predict_use_case::PredictConfig;
use crate::application::train_use_case::TrainConfig;
use crate::domain::split::Split;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Parse MSCOCO 2017 annotations into coco_raw.json
    Parse(ParseArgs),

    /// Build multi-hot topic caches from coco_raw.json
    Topics(TopicsArgs),

    /// Train the topic classifier on cached features
    Train(TrainArgs),

    /// Rank topics for one cached feature row
    Predict(PredictArgs),
}

#[derive(Args, Debug)]
pub struct ParseArgs {
    /// Root directory containing the `annotations` folder
    #[arg(long, default_value = "dataset")]
    pub root: PathBuf,
}

#[derive(Args, Debug)]
pub struct TopicsArgs {
    /// Path to the parsed coco file
    #[arg(long, default_value = "dataset/coco_raw.json")]
    pub raw: PathBuf,

    /// Directory to write topics_{split}.bin into
    #[arg(long, default_value = "dataset/processed_data")]
    pub data: PathBuf,
}

#[derive(Args, Debug)]
pub struct TrainArgs {
    /// Directory containing the processed dataset
    #[arg(long, default_value = "dataset/processed_data")]
    pub data: PathBuf,

    /// Path to the parsed coco file
    #[arg(long, default_value = "dataset/coco_raw.json")]
    pub raw: PathBuf,

    /// Directory for checkpoints and the run log
    #[arg(long = "weights_dir", default_value = "weights")]
    pub weights_dir: PathBuf,

    /// Samples per mini-batch
    #[arg(long = "batch_size", default_value_t = 128)]
    pub batch_size: usize,

    /// Upper bound on training epochs
    #[arg(long, default_value_t = 100)]
    pub epochs: usize,

    /// Initial Adam learning rate
    #[arg(long, default_value_t = 1e-3)]
    pub lr: f64,

    /// Epochs without val_loss improvement before stopping
    #[arg(long = "early_stop", default_value_t = 10)]
    pub early_stop: usize,

    /// Factor applied to the learning rate on a val_loss plateau
    #[arg(long = "lr_decay", default_value_t = 0.1)]
    pub lr_decay: f64,

    /// Epochs without improvement before the learning rate is reduced
    #[arg(long = "lr_patience", default_value_t = 4)]
    pub lr_patience: usize,

    /// Learning rate floor
    #[arg(long = "min_lr", default_value_t = 1e-7)]
    pub min_lr: f64,

    /// Data loader worker threads
    #[arg(long = "num_workers", default_value_t = 1)]
    pub num_workers: usize,

    /// Seed for weight init and batch shuffling
    #[arg(long, default_value_t = 42)]
    pub seed: u64,
}

/// The application layer never sees clap types.
impl From<TrainArgs> for TrainConfig {
    fn from(a: TrainArgs) -> Self {
        TrainConfig {
            data_dir:    a.data,
            raw_path:    a.raw,
            weights_dir: a.weights_dir,
            batch_size:  a.batch_size,
            epochs:      a.epochs,
            lr:          a.lr,
            early_stop:  a.early_stop,
            lr_decay:    a.lr_decay,
            lr_patience: a.lr_patience,
            min_lr:      a.min_lr,
            num_workers: a.num_workers,
            seed:        a.seed,
        }
    }
}

#[derive(Args, Debug)]
pub struct PredictArgs {
    #[arg(long, default_value = "dataset/processed_data")]
    pub data: PathBuf,

    #[arg(long, default_value = "dataset/coco_raw.json")]
    pub raw: PathBuf,

    /// Weights file; defaults to the best checkpoint in --weights_dir
    #[arg(long)]
    pub weights: Option<PathBuf>,

    #[arg(long = "weights_dir", default_value = "weights")]
    pub weights_dir: PathBuf,

    #[arg(long, default_value = "val")]
    pub split: Split,

    /// Row of the feature cache; random when omitted
    #[arg(long)]
    pub index: Option<usize>,

    #[arg(long = "top_k", default_value_t = 5)]
    pub top_k: usize,
}

impl From<PredictArgs> for PredictConfig {
    fn from(a: PredictArgs) -> Self {
        PredictConfig {
            data_dir:    a.data,
            raw_path:    a.raw,
            weights:     a.weights,
            weights_dir: a.weights_dir,
            split:       a.split,
            index:       a.index,
            top_k:       a.top_k,
        }
    }
}
