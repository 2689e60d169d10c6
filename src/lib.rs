//! Preprocess MSCOCO 2017 annotations and train a topic
//! classification head on pre-extracted image features.
//!
//! The crate is split into layers, each in its own module:
//!
//! - [`cli`]: argument parsing and printing
//! - [`application`]: one use case per command
//! - [`domain`]: plain dataset types
//! - [`data`]: COCO parsing, caches, burn dataset/batcher
//! - [`ml`]: model, callbacks, training loop, prediction
//! - [`infra`]: on-disk containers, checkpoints, run log

pub mod application;
pub mod cli;
pub mod data;
pub mod domain;
pub mod error;
pub mod infra;
pub mod ml;

pub use error::{TopicError, TopicResult};
