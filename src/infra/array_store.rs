// ============================================================
// Layer 6 — Array Store
// ============================================================
// The on-disk container for feature and topic caches.
//
// A file holds any number of named dense f32 matrices, encoded
// with bincode:
//
//   feature_transfer_values_train.bin
//     └── "feature_values"  [118287, 4096]
//   topics_train.bin
//     └── "topic_values"    [118287, 80]
//
// Matrices are row-major so one training example is one
// contiguous slice.

use serde::{Deserialize, Serialize};
use std::{
    collections::BTreeMap,
    fs::{self, File},
    io::{BufReader, BufWriter},
    path::Path,
};

use crate::error::{TopicError, TopicResult};

/// Dataset name of the feature vectors inside a feature cache
pub const FEATURE_DATASET: &str = "feature_values";

/// Dataset name of the multi-hot labels inside a topic cache
pub const TOPIC_DATASET: &str = "topic_values";

/// Dense row-major f32 matrix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Matrix {
    rows: usize,
    cols: usize,
    data: Vec<f32>,
}

impl Matrix {
    pub fn new(rows: usize, cols: usize, data: Vec<f32>) -> TopicResult<Self> {
        let m = Self { rows, cols, data };
        m.validate()?;
        Ok(m)
    }

    /// Stack equally long rows. Every row must have `cols` values.
    pub fn from_rows<I>(cols: usize, rows: I) -> TopicResult<Self>
    where
        I: IntoIterator<Item = Vec<f32>>,
    {
        let mut data = Vec::new();
        let mut n = 0usize;
        for row in rows {
            if row.len() != cols {
                return Err(TopicError::ShapeMismatch { rows: n + 1, cols, len: data.len() + row.len() });
            }
            data.extend(row);
            n += 1;
        }
        Self::new(n, cols, data)
    }

    fn validate(&self) -> TopicResult<()> {
        if self.rows * self.cols != self.data.len() {
            return Err(TopicError::ShapeMismatch {
                rows: self.rows,
                cols: self.cols,
                len:  self.data.len(),
            });
        }
        Ok(())
    }

    pub fn rows(&self) -> usize { self.rows }

    pub fn cols(&self) -> usize { self.cols }

    pub fn shape(&self) -> [usize; 2] { [self.rows, self.cols] }

    pub fn row(&self, index: usize) -> Option<&[f32]> {
        if index >= self.rows {
            return None;
        }
        let start = index * self.cols;
        Some(&self.data[start..start + self.cols])
    }
}

/// A set of named matrices persisted as one file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ArrayStore {
    datasets: BTreeMap<String, Matrix>,
}

impl ArrayStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_dataset(mut self, name: impl Into<String>, matrix: Matrix) -> Self {
        self.insert(name, matrix);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, matrix: Matrix) {
        self.datasets.insert(name.into(), matrix);
    }

    pub fn save(&self, path: &Path) -> TopicResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|source| TopicError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        let file = File::create(path).map_err(|source| TopicError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        bincode::serialize_into(BufWriter::new(file), self).map_err(|source| TopicError::Codec {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!("Wrote {} dataset(s) to '{}'", self.datasets.len(), path.display());
        Ok(())
    }

    pub fn load(path: &Path) -> TopicResult<Self> {
        let file = File::open(path).map_err(|source| TopicError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let store: Self = bincode::deserialize_from(BufReader::new(file)).map_err(|source| {
            TopicError::Codec { path: path.to_path_buf(), source }
        })?;
        for matrix in store.datasets.values() {
            matrix.validate()?;
        }
        Ok(store)
    }

    /// Load `path` and pull out a single named dataset.
    pub fn load_dataset(path: &Path, name: &str) -> TopicResult<Matrix> {
        let mut store = Self::load(path)?;
        store.datasets.remove(name).ok_or_else(|| TopicError::MissingDataset {
            name: name.to_string(),
            path: path.to_path_buf(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_row_access() {
        let m = Matrix::new(2, 3, vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]).unwrap();
        assert_eq!(m.row(1), Some(&[4.0, 5.0, 6.0][..]));
        assert_eq!(m.row(2), None);
    }

    #[test]
    fn test_shape_must_match_data() {
        assert!(matches!(
            Matrix::new(2, 2, vec![0.0; 3]),
            Err(TopicError::ShapeMismatch { rows: 2, cols: 2, len: 3 })
        ));
        assert!(Matrix::from_rows(2, vec![vec![0.0, 1.0], vec![1.0]]).is_err());
    }

    #[test]
    fn test_named_dataset_survives_disk() {
        let dir  = tempdir().unwrap();
        let path = dir.path().join("nested").join("features.bin");
        let m    = Matrix::from_rows(2, vec![vec![0.5, 1.5], vec![2.5, 3.5]]).unwrap();
        ArrayStore::new().with_dataset(FEATURE_DATASET, m.clone()).save(&path).unwrap();

        assert_eq!(ArrayStore::load_dataset(&path, FEATURE_DATASET).unwrap(), m);
        assert!(matches!(
            ArrayStore::load_dataset(&path, TOPIC_DATASET),
            Err(TopicError::MissingDataset { .. })
        ));
    }
}
