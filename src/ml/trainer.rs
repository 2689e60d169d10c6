// ============================================================
// Layer 5 — Training Loop
// ============================================================
// Train + validation loop over burn DataLoaders with Adam.
//
//   - Training runs on TrainBackend (Autodiff<NdArray>)
//   - model.valid() drops autodiff for the validation pass,
//     so the validation batcher uses ValidBackend
//   - After each epoch: checkpoint → run log → lr decay → early stop
//
// Reference: Burn Book §5, Kingma & Ba (2015) Adam

use anyhow::Result;
use burn::{
    backend::{ndarray::NdArrayDevice, Autodiff, NdArray},
    data::dataloader::DataLoaderBuilder,
    module::AutodiffModule,
    optim::{AdamConfig, GradientsParams, Optimizer},
    prelude::*,
};
use std::path::PathBuf;

use crate::application::train_use_case::TrainConfig;
use crate::data::{batcher::TopicBatcher, dataset::TopicDataset};
use crate::infra::checkpoint::CheckpointManager;
use crate::infra::metrics::{EpochMetrics, MetricsLogger};
use crate::ml::callbacks::{BestOnlyCheckpoint, EarlyStopping, ReduceLrOnPlateau};
use crate::ml::model::{create_category_model, CategoryModel};

pub type ValidBackend = NdArray;
pub type TrainBackend = Autodiff<ValidBackend>;

/// What a finished run produced
#[derive(Debug, Clone)]
pub struct TrainingSummary {
    pub epochs_run:      usize,
    pub best_epoch:      Option<usize>,
    pub best_val_loss:   f64,
    pub best_checkpoint: Option<PathBuf>,
    pub stopped_early:   bool,
    pub final_lr:        f64,
}

#[derive(Default)]
struct RunningMetrics {
    loss_sum: f64,
    samples:  usize,
    correct:  usize,
    cells:    usize,
}

impl RunningMetrics {
    fn add(&mut self, batch_loss: f64, batch_rows: usize, (correct, cells): (usize, usize)) {
        self.loss_sum += batch_loss * batch_rows as f64;
        self.samples  += batch_rows;
        self.correct  += correct;
        self.cells    += cells;
    }

    fn loss(&self) -> f64 {
        if self.samples > 0 { self.loss_sum / self.samples as f64 } else { f64::NAN }
    }

    fn accuracy(&self) -> f64 {
        if self.cells > 0 { self.correct as f64 / self.cells as f64 } else { 0.0 }
    }
}

pub fn run_training(
    cfg:           &TrainConfig,
    train_dataset: TopicDataset,
    val_dataset:   TopicDataset,
    ckpt_manager:  &CheckpointManager,
) -> Result<TrainingSummary> {
    let device = NdArrayDevice::default();
    tracing::info!("Using device: {:?}", device);
    TrainBackend::seed(cfg.seed);

    let model = create_category_model::<TrainBackend>(
        train_dataset.feature_dim(),
        train_dataset.num_topics(),
        &device,
    );
    train_loop(cfg, model, train_dataset, val_dataset, ckpt_manager, device)
}

fn train_loop(
    cfg:           &TrainConfig,
    mut model:     CategoryModel<TrainBackend>,
    train_dataset: TopicDataset,
    val_dataset:   TopicDataset,
    ckpt_manager:  &CheckpointManager,
    device:        NdArrayDevice,
) -> Result<TrainingSummary> {
    tracing::info!(
        "Model ready: {} features -> {} topics",
        model.feature_dim(),
        model.num_topics()
    );

    let mut optim = AdamConfig::new().with_epsilon(1e-7).init();

    let mut train_builder = DataLoaderBuilder::new(TopicBatcher::<TrainBackend>::new(device.clone()))
        .batch_size(cfg.batch_size)
        .shuffle(cfg.seed);
    let mut val_builder = DataLoaderBuilder::new(TopicBatcher::<ValidBackend>::new(device.clone()))
        .batch_size(cfg.batch_size);
    // Zero or one worker: batch on the training thread
    if cfg.num_workers > 1 {
        train_builder = train_builder.num_workers(cfg.num_workers);
        val_builder   = val_builder.num_workers(cfg.num_workers);
    }
    let train_loader = train_builder.build(train_dataset);
    let val_loader   = val_builder.build(val_dataset);

    // ── Callbacks ────────────────────────────────────────────────────────────
    let mut checkpoint = BestOnlyCheckpoint::new();
    let run_log        = MetricsLogger::new(cfg.log_dir())?;
    let mut reduce_lr  = ReduceLrOnPlateau::new(cfg.lr_decay, cfg.lr_patience, cfg.min_lr);
    let mut early_stop = EarlyStopping::new(cfg.early_stop);

    let mut summary = TrainingSummary {
        epochs_run:      0,
        best_epoch:      None,
        best_val_loss:   f64::INFINITY,
        best_checkpoint: None,
        stopped_early:   false,
        final_lr:        cfg.lr,
    };
    let mut lr = cfg.lr;

    for epoch in 1..=cfg.epochs {
        // ── Training phase ───────────────────────────────────────────────────
        let mut train = RunningMetrics::default();
        for batch in train_loader.iter() {
            let rows   = batch.features.dims()[0];
            let output = model.forward_loss(batch.features, batch.topics);
            train.add(output.loss_value(), rows, output.accuracy_counts());

            let grads = output.loss.backward();
            let grads = GradientsParams::from_grads(grads, &model);
            model = optim.step(lr, model, grads);
        }

        // ── Validation phase ─────────────────────────────────────────────────
        let model_valid = model.valid();
        let mut val = RunningMetrics::default();
        for batch in val_loader.iter() {
            let rows   = batch.features.dims()[0];
            let output = model_valid.forward_loss(batch.features, batch.topics);
            val.add(output.loss_value(), rows, output.accuracy_counts());
        }

        let metrics = EpochMetrics {
            epoch,
            train_loss: train.loss(),
            train_acc:  train.accuracy(),
            val_loss:   val.loss(),
            val_acc:    val.accuracy(),
            lr,
        };
        summary.epochs_run = epoch;

        println!(
            "Epoch {:>3}/{} | loss={:.4} | binary_accuracy={:.4} | val_loss={:.4} | val_binary_accuracy={:.4}",
            epoch, cfg.epochs, metrics.train_loss, metrics.train_acc, metrics.val_loss, metrics.val_acc,
        );

        // ── Callbacks ────────────────────────────────────────────────────────
        let previous_best = checkpoint.best();
        if checkpoint.should_save(metrics.val_loss) {
            let path = ckpt_manager.save_best(&model, epoch, metrics.val_loss)?;
            tracing::info!(
                "Epoch {}: val_loss improved from {:.5} to {:.5}, saving model to '{}'",
                epoch, previous_best, metrics.val_loss, path.display()
            );
            summary.best_epoch      = Some(epoch);
            summary.best_val_loss   = metrics.val_loss;
            summary.best_checkpoint = Some(path);
        } else {
            tracing::info!("Epoch {}: val_loss did not improve from {:.5}", epoch, previous_best);
        }

        run_log.log(&metrics)?;

        lr = reduce_lr.next_lr(metrics.val_loss, lr);
        summary.final_lr = lr;

        if early_stop.should_stop(metrics.val_loss) {
            tracing::info!("Epoch {}: early stopping", epoch);
            summary.stopped_early = true;
            break;
        }
    }

    tracing::info!("Training complete!");
    Ok(summary)
}
