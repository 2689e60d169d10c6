// ============================================================
// Layer 3 — Core Traits
// ============================================================
// The application layer only talks to these abstractions, so
// the parse workflow can run against in-memory annotations in
// tests and against the real COCO files in production.

use anyhow::Result;
use std::collections::BTreeMap;

use crate::domain::category_map::CategoryMap;
use crate::domain::image_record::ImageRecord;
use crate::domain::split::Split;

/// Everything parsed from one split's annotation files.
#[derive(Debug, Clone, Default)]
pub struct SplitAnnotations {
    /// Per-image records keyed by COCO image id
    pub images: BTreeMap<u64, ImageRecord>,

    /// Category names in the order the instances file lists them
    pub category_names: Vec<String>,

    /// Category name -> supercategory name
    pub category_supercategory: BTreeMap<String, String>,
}

impl SplitAnnotations {
    pub fn category_map(&self) -> CategoryMap {
        CategoryMap::from_names(self.category_names.iter().cloned())
    }
}

// ─── AnnotationSource ─────────────────────────────────────────────────────────
/// Anything that can produce grouped annotations for a split.
///
/// Implementations:
///   - CocoParser → reads `annotations/*_{split}2017.json`
pub trait AnnotationSource {
    fn load_split(&self, split: Split) -> Result<SplitAnnotations>;
}
