// ============================================================
// Layer 4 — Data Pipeline
// ============================================================
//
//   COCO annotation JSON
//       │
//       ▼
//   coco.rs      → per-image records, category list
//       │
//       ▼
//   raw.rs       → coco_raw.json (parse output)
//       │
//       ▼  (topics command + external feature extraction)
//   cache.rs     → feature / topic matrices per split
//       │
//       ▼
//   dataset.rs   → burn Dataset over aligned rows
//       │
//       ▼
//   batcher.rs   → [N, D] / [N, K] tensors for the trainer

/// COCO 2017 annotation parsing
pub mod coco;

/// The parsed dataset file
pub mod raw;

/// Feature and topic cache files
pub mod cache;

/// Implements burn's Dataset trait over cached matrices
pub mod dataset;

/// Implements burn's Batcher trait
pub mod batcher;
