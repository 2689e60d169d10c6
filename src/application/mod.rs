// ============================================================
// Layer 2 — Application / Use Cases
// ============================================================
// One use case per CLI command. This layer only sequences the
// other layers: no tensor code, no printing.

/// COCO annotations → coco_raw.json
pub mod parse_use_case;

/// coco_raw.json → topic label caches
pub mod topics_use_case;

/// Cached features + topics → trained weights
pub mod train_use_case;

/// Trained weights + one feature row → ranked topics
pub mod predict_use_case;
