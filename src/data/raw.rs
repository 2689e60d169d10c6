// ============================================================
// Layer 4 — Parsed Dataset File
// ============================================================
// The single output of the `parse` command, `coco_raw.json`:
//
//   {
//     "images_data_train": { "<image id>": ImageRecord, ... },
//     "images_data_val":   { ... },
//     "category_id":       { "person": 0, "bicycle": 1, ... },
//     "id_category":       { "0": "person", "1": "bicycle", ... },
//     "category_supercategory": { "person": "person", ... }
//   }

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    collections::BTreeMap,
    fs::File,
    io::{BufReader, BufWriter},
    path::Path,
};

use crate::domain::category_map::CategoryMap;
use crate::domain::image_record::ImageRecord;
use crate::domain::split::Split;

pub const RAW_FILE_NAME: &str = "coco_raw.json";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CocoRaw {
    pub images_data_train: BTreeMap<u64, ImageRecord>,
    pub images_data_val:   BTreeMap<u64, ImageRecord>,

    pub category_id: BTreeMap<String, usize>,
    pub id_category: BTreeMap<usize, String>,

    #[serde(default)]
    pub category_supercategory: BTreeMap<String, String>,
}

impl CocoRaw {
    pub fn new(
        images_data_train:      BTreeMap<u64, ImageRecord>,
        images_data_val:        BTreeMap<u64, ImageRecord>,
        categories:             CategoryMap,
        category_supercategory: BTreeMap<String, String>,
    ) -> Self {
        Self {
            images_data_train,
            images_data_val,
            category_id: categories.category_id,
            id_category: categories.id_category,
            category_supercategory,
        }
    }

    pub fn category_map(&self) -> CategoryMap {
        CategoryMap {
            category_id: self.category_id.clone(),
            id_category: self.id_category.clone(),
        }
    }

    pub fn images(&self, split: Split) -> &BTreeMap<u64, ImageRecord> {
        match split {
            Split::Train => &self.images_data_train,
            Split::Val => &self.images_data_val,
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let file = File::create(path)
            .with_context(|| format!("Cannot create '{}'", path.display()))?;
        serde_json::to_writer(BufWriter::new(file), self)
            .with_context(|| format!("Cannot write '{}'", path.display()))?;
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path).with_context(|| {
            format!("Cannot open '{}'. Have you run 'parse' first?", path.display())
        })?;
        serde_json::from_reader(BufReader::new(file))
            .with_context(|| format!("Malformed parsed dataset '{}'", path.display()))
    }
}
