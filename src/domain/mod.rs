// ============================================================
// Layer 3 — Domain Layer
// ============================================================
// Plain Rust types describing the parsed dataset:
//
//   split.rs        — the two COCO 2017 splits (train / val)
//   image_record.rs — one image with its categories and captions
//   category_map.rs — dense category name <-> id mapping
//   traits.rs       — the seam between parsing and persistence
//
// Rules for this layer:
//   - NO burn types
//   - NO file I/O
//
// Reference: Rust Book §5 (Structs), §10 (Traits)

pub mod split;

pub mod image_record;

pub mod category_map;

pub mod traits;
