// ============================================================
// Layer 5 — Epoch Callbacks
// ============================================================
// State machines the trainer consults after every validation
// pass. All of them watch val_loss; lower is better.
//
//   BestOnlyCheckpoint — save weights only on a new best
//   ReduceLrOnPlateau  — lr *= factor after `patience` flat epochs
//   EarlyStopping      — stop after `patience` flat epochs
//
// The per-epoch CSV run log lives in infra::metrics.

/// Decides whether an epoch's weights are worth keeping.
#[derive(Debug, Clone)]
pub struct BestOnlyCheckpoint {
    best: f64,
}

impl BestOnlyCheckpoint {
    pub fn new() -> Self {
        Self { best: f64::INFINITY }
    }

    pub fn best(&self) -> f64 {
        self.best
    }

    /// True (and records the new best) when `val_loss` improves.
    pub fn should_save(&mut self, val_loss: f64) -> bool {
        if val_loss < self.best {
            self.best = val_loss;
            true
        } else {
            false
        }
    }
}

impl Default for BestOnlyCheckpoint {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone)]
pub struct EarlyStopping {
    patience: usize,
    best:     f64,
    wait:     usize,
}

impl EarlyStopping {
    pub fn new(patience: usize) -> Self {
        Self { patience, best: f64::INFINITY, wait: 0 }
    }

    /// Returns true when training should stop.
    pub fn should_stop(&mut self, val_loss: f64) -> bool {
        if val_loss < self.best {
            self.best = val_loss;
            self.wait = 0;
            return false;
        }
        self.wait += 1;
        self.wait >= self.patience
    }
}

/// Smallest val_loss drop that counts as progress for the LR schedule
pub const PLATEAU_MIN_DELTA: f64 = 1e-4;

#[derive(Debug, Clone)]
pub struct ReduceLrOnPlateau {
    factor:    f64,
    patience:  usize,
    min_lr:    f64,
    min_delta: f64,
    best:      f64,
    wait:      usize,
}

impl ReduceLrOnPlateau {
    /// `factor` must lie in (0, 1).
    pub fn new(factor: f64, patience: usize, min_lr: f64) -> Self {
        Self {
            factor,
            patience,
            min_lr,
            min_delta: PLATEAU_MIN_DELTA,
            best: f64::INFINITY,
            wait: 0,
        }
    }

    pub fn with_min_delta(mut self, min_delta: f64) -> Self {
        self.min_delta = min_delta;
        self
    }

    /// Returns the learning rate for the next epoch.
    pub fn next_lr(&mut self, val_loss: f64, lr: f64) -> f64 {
        if val_loss < self.best - self.min_delta {
            self.best = val_loss;
            self.wait = 0;
            return lr;
        }

        self.wait += 1;
        if self.wait < self.patience || lr <= self.min_lr {
            return lr;
        }

        self.wait = 0;
        let reduced = (lr * self.factor).max(self.min_lr);
        tracing::info!("ReduceLROnPlateau reducing learning rate to {:e}", reduced);
        reduced
    }
}
