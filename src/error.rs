// ============================================================
// Typed errors
// ============================================================
// Errors that callers need to tell apart. Everything above the
// data layer wraps these in anyhow with extra context.

use std::path::PathBuf;
use thiserror::Error;

use crate::domain::split::Split;

#[derive(Debug, Error)]
pub enum TopicError {
    /// Feature or topic cache for a split is not on disk
    #[error("processed {split} data does not exist.")]
    MissingCache { split: Split, path: PathBuf },

    /// Container file exists but lacks the named dataset
    #[error("dataset '{name}' not found in '{}'", path.display())]
    MissingDataset { name: String, path: PathBuf },

    #[error("{split} split has {features} feature rows but {topics} topic rows")]
    RowMismatch { split: Split, features: usize, topics: usize },

    #[error("matrix shape [{rows}, {cols}] does not match {len} stored values")]
    ShapeMismatch { rows: usize, cols: usize, len: usize },

    #[error("I/O error on '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot decode '{}': {source}", path.display())]
    Codec {
        path: PathBuf,
        #[source]
        source: bincode::Error,
    },
}

pub type TopicResult<T> = Result<T, TopicError>;
