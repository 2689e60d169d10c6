// ============================================================
// Layer 6 — Infrastructure Layer
// ============================================================
//   array_store.rs — named f32 matrices on disk (bincode)
//   checkpoint.rs  — model weights via burn's CompactRecorder,
//                    best-checkpoint pointer, run config
//   metrics.rs     — per-epoch CSV run log

/// Feature / topic cache container
pub mod array_store;

/// Model checkpoint saving and loading
pub mod checkpoint;

/// Training metrics CSV logger
pub mod metrics;
