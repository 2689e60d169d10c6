// ============================================================
// Layer 5 — ML Layer (burn)
// ============================================================
// The only layer that builds models and runs tensors through
// them (data::batcher stacks rows into tensors for it).
//
//   model.rs      — dense + sigmoid topic head, BCE loss
//   callbacks.rs  — checkpoint / lr decay / early stopping rules
//   trainer.rs    — the epoch loop
//   inferencer.rs — restores weights and ranks topics
//
// Reference: Burn Book §3 (Building Blocks), §5 (Training)

pub mod model;

pub mod callbacks;

pub mod trainer;

pub mod inferencer;
