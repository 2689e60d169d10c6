// ============================================================
// Layer 4 — Feature / Topic Cache Loader
// ============================================================
// Per split, training reads two files from the data directory:
//
//   feature_transfer_values_{split}.bin   dataset "feature_values"
//   topics_{split}.bin                    dataset "topic_values"
//
// Row i of both matrices describes the same image; the image id
// of row i is entry i of `image_ids_{split}.json`.

use anyhow::{Context, Result};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::domain::split::Split;
use crate::error::{TopicError, TopicResult};
use crate::infra::array_store::{ArrayStore, Matrix, FEATURE_DATASET, TOPIC_DATASET};

pub fn feature_cache_path(data_dir: &Path, split: Split) -> PathBuf {
    data_dir.join(format!("feature_transfer_values_{split}.bin"))
}

pub fn topics_cache_path(data_dir: &Path, split: Split) -> PathBuf {
    data_dir.join(format!("topics_{split}.bin"))
}

pub fn image_ids_path(data_dir: &Path, split: Split) -> PathBuf {
    data_dir.join(format!("image_ids_{split}.json"))
}

fn require(path: PathBuf, split: Split) -> TopicResult<PathBuf> {
    if path.exists() {
        Ok(path)
    } else {
        Err(TopicError::MissingCache { split, path })
    }
}

/// Load the feature matrix of a split.
pub fn load_features(split: Split, data_dir: &Path) -> TopicResult<Matrix> {
    let path = require(feature_cache_path(data_dir, split), split)?;
    ArrayStore::load_dataset(&path, FEATURE_DATASET)
}

/// Load features and topic labels of a split.
///
/// Both files are checked before either is read, so a missing
/// cache never leaves a half-loaded result behind.
pub fn load_data(split: Split, data_dir: &Path) -> TopicResult<(Matrix, Matrix)> {
    let feature_path = require(feature_cache_path(data_dir, split), split)?;
    let topics_path  = require(topics_cache_path(data_dir, split), split)?;

    let features = ArrayStore::load_dataset(&feature_path, FEATURE_DATASET)?;
    let topics   = ArrayStore::load_dataset(&topics_path, TOPIC_DATASET)?;

    tracing::info!("{} data loaded from cache-file.", split);
    Ok((features, topics))
}

/// Feature and topic caches must describe the same images row for row.
pub fn check_alignment(split: Split, features: &Matrix, topics: &Matrix) -> TopicResult<()> {
    if features.rows() != topics.rows() {
        return Err(TopicError::RowMismatch {
            split,
            features: features.rows(),
            topics:   topics.rows(),
        });
    }
    Ok(())
}

pub fn save_topics(split: Split, data_dir: &Path, topics: Matrix) -> TopicResult<PathBuf> {
    let path = topics_cache_path(data_dir, split);
    ArrayStore::new().with_dataset(TOPIC_DATASET, topics).save(&path)?;
    Ok(path)
}

pub fn save_features(split: Split, data_dir: &Path, features: Matrix) -> TopicResult<PathBuf> {
    let path = feature_cache_path(data_dir, split);
    ArrayStore::new().with_dataset(FEATURE_DATASET, features).save(&path)?;
    Ok(path)
}

pub fn save_image_ids(split: Split, data_dir: &Path, ids: &[u64]) -> Result<PathBuf> {
    let path = image_ids_path(data_dir, split);
    fs::write(&path, serde_json::to_string(ids)?)
        .with_context(|| format!("Cannot write '{}'", path.display()))?;
    Ok(path)
}

/// Row order of a split's caches, if the topics step recorded it.
pub fn load_image_ids(split: Split, data_dir: &Path) -> Result<Option<Vec<u64>>> {
    let path = image_ids_path(data_dir, split);
    if !path.exists() {
        return Ok(None);
    }
    let s = fs::read_to_string(&path)
        .with_context(|| format!("Cannot read '{}'", path.display()))?;
    Ok(Some(serde_json::from_str(&s)?))
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn matrix(rows: usize, cols: usize) -> Matrix {
        Matrix::new(rows, cols, vec![0.25; rows * cols]).unwrap()
    }

    #[test]
    fn test_missing_cache_for_each_split() {
        let dir = tempdir().unwrap();
        for split in Split::ALL {
            let err = load_data(split, dir.path()).unwrap_err();
            assert!(matches!(err, TopicError::MissingCache { split: s, .. } if s == split));
            assert_eq!(err.to_string(), format!("processed {split} data does not exist."));
        }
    }

    #[test]
    fn test_missing_topics_with_features_present() {
        let dir = tempdir().unwrap();
        save_features(Split::Val, dir.path(), matrix(2, 3)).unwrap();
        let err = load_data(Split::Val, dir.path()).unwrap_err();
        match err {
            TopicError::MissingCache { path, .. } => assert_eq!(path, topics_cache_path(dir.path(), Split::Val)),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_load_data_returns_both_matrices() {
        let dir = tempdir().unwrap();
        save_features(Split::Train, dir.path(), matrix(4, 3)).unwrap();
        save_topics(Split::Train, dir.path(), matrix(4, 2)).unwrap();

        let (features, topics) = load_data(Split::Train, dir.path()).unwrap();
        assert_eq!(features.shape(), [4, 3]);
        assert_eq!(topics.shape(), [4, 2]);
        assert!(check_alignment(Split::Train, &features, &topics).is_ok());
    }

    #[test]
    fn test_row_mismatch_is_detected() {
        let err = check_alignment(Split::Train, &matrix(5, 3), &matrix(4, 2)).unwrap_err();
        assert!(matches!(err, TopicError::RowMismatch { features: 5, topics: 4, .. }));
    }

    #[test]
    fn test_image_ids_are_optional() {
        let dir = tempdir().unwrap();
        assert!(load_image_ids(Split::Val, dir.path()).unwrap().is_none());
        save_image_ids(Split::Val, dir.path(), &[9, 3]).unwrap();
        assert_eq!(load_image_ids(Split::Val, dir.path()).unwrap(), Some(vec![9, 3]));
    }
}
