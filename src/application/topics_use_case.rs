// ============================================================
// Layer 2 — TopicsUseCase
// ============================================================
// Turns coco_raw.json into the label half of the training
// caches. For each split, images are taken in ascending id
// order; row i of topics_{split}.bin is the multi-hot category
// vector of image_ids_{split}.json[i]. The feature extractor
// must write its rows in the same order.

use anyhow::Result;
use std::{collections::BTreeMap, path::PathBuf};

use crate::data::cache::{save_image_ids, save_topics};
use crate::data::raw::CocoRaw;
use crate::domain::category_map::CategoryMap;
use crate::domain::image_record::ImageRecord;
use crate::domain::split::Split;
use crate::error::TopicResult;
use crate::infra::array_store::Matrix;

/// Image ids (row order) and their multi-hot topic rows.
pub fn build_topic_matrix(
    images:     &BTreeMap<u64, ImageRecord>,
    categories: &CategoryMap,
) -> TopicResult<(Vec<u64>, Matrix)> {
    let ids: Vec<u64> = images.keys().copied().collect();
    let rows = images.values().map(|record| categories.multi_hot(&record.categories));
    Ok((ids, Matrix::from_rows(categories.len(), rows)?))
}

pub struct TopicsUseCase {
    raw_path: PathBuf,
    data_dir: PathBuf,
}

impl TopicsUseCase {
    pub fn new(raw_path: impl Into<PathBuf>, data_dir: impl Into<PathBuf>) -> Self {
        Self { raw_path: raw_path.into(), data_dir: data_dir.into() }
    }

    /// Returns the topic matrix shape written for each split.
    pub fn execute(&self) -> Result<Vec<(Split, [usize; 2])>> {
        let raw        = CocoRaw::load(&self.raw_path)?;
        let categories = raw.category_map();
        std::fs::create_dir_all(&self.data_dir)?;

        let mut written = Vec::new();
        for split in Split::ALL {
            let (ids, topics) = build_topic_matrix(raw.images(split), &categories)?;
            let shape = topics.shape();

            let path = save_topics(split, &self.data_dir, topics)?;
            save_image_ids(split, &self.data_dir, &ids)?;

            tracing::info!("Wrote {} topics {:?} to '{}'", split, shape, path.display());
            written.push((split, shape));
        }
        Ok(written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(categories: &[&str]) -> ImageRecord {
        ImageRecord::new(
            "x.jpg",
            categories.iter().map(|c| c.to_string()).collect(),
            Vec::new(),
            vec!["caption".into()],
        )
    }

    #[test]
    fn test_rows_follow_ascending_image_id() {
        let categories = CategoryMap::from_names(["person", "dog", "cat"]);
        let images = BTreeMap::from([
            (30, record(&["cat"])),
            (10, record(&["dog", "person"])),
        ]);

        let (ids, topics) = build_topic_matrix(&images, &categories).unwrap();
        assert_eq!(ids, vec![10, 30]);
        assert_eq!(topics.shape(), [2, 3]);
        assert_eq!(topics.row(0), Some(&[1.0, 1.0, 0.0][..]));
        assert_eq!(topics.row(1), Some(&[0.0, 0.0, 1.0][..]));
    }
}
