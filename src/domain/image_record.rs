// ============================================================
// Layer 3 — ImageRecord Domain Type
// ============================================================
// Everything the pipeline keeps about one COCO image:
//
//   file_name        "train2017/000000391895.jpg"
//   categories       ["person", "motorcycle", "bicycle"]
//   supercategories  ["person", "vehicle"]
//   captions         ["A man with a red helmet on a small moped ...", ...]
//
// Built once by the parser and never mutated afterwards.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageRecord {
    /// Path relative to the dataset root: `<split folder>/<file name>`
    pub file_name: String,

    /// Category names in first-seen annotation order, no duplicates
    pub categories: Vec<String>,

    /// Coarser grouping of `categories`, sorted, no duplicates.
    /// Not consumed by training.
    #[serde(default)]
    pub supercategories: Vec<String>,

    /// Captions in annotation order
    pub captions: Vec<String>,
}

impl ImageRecord {
    pub fn new(
        file_name:       impl Into<String>,
        categories:      Vec<String>,
        supercategories: Vec<String>,
        captions:        Vec<String>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            categories,
            supercategories,
            captions,
        }
    }
}
