use serde::{Serialize, Deserialize};

use crate::data::image::DEFAULT_IMG_SIZE;
use crate::error::EvalError;
use crate::Result;

/// Configuration for a `BatchedDataset`.
///
/// # Fields
/// - `img_size`         — side length every image is resized to
/// - `batch_size`       — samples per batch; the last batch may be smaller
/// - `workers`          — decode threads per traversal
/// - `prefetch_batches` — batches dispatched to the workers beyond the one
///                        currently requested; `0` disables pipelining
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetConfig {
    pub img_size: u32,
    pub batch_size: usize,
    pub workers: usize,
    pub prefetch_batches: usize,
}

impl DatasetConfig {
    /// Creates a config with the default worker count and prefetch depth.
    pub fn new(img_size: u32, batch_size: usize) -> Self {
        DatasetConfig {
            img_size,
            batch_size,
            ..DatasetConfig::default()
        }
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    pub fn with_prefetch(mut self, prefetch_batches: usize) -> Self {
        self.prefetch_batches = prefetch_batches;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.img_size == 0 {
            return Err(EvalError::InvalidConfig("img_size must be at least 1".into()));
        }
        if self.batch_size == 0 {
            return Err(EvalError::InvalidConfig("batch_size must be at least 1".into()));
        }
        if self.workers == 0 {
            return Err(EvalError::InvalidConfig("workers must be at least 1".into()));
        }
        Ok(())
    }
}

impl Default for DatasetConfig {
    fn default() -> Self {
        let workers = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        DatasetConfig {
            img_size: DEFAULT_IMG_SIZE,
            batch_size: 32,
            workers,
            prefetch_batches: 2,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_helper_defaults() {
        let cfg = DatasetConfig::default();
        assert_eq!(cfg.img_size, 32);
        assert_eq!(cfg.batch_size, 32);
        assert!(cfg.workers >= 1);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn zero_sizes_are_rejected() {
        assert!(DatasetConfig::new(0, 8).validate().is_err());
        assert!(DatasetConfig::new(8, 0).validate().is_err());
        assert!(DatasetConfig::new(8, 8).with_workers(0).validate().is_err());
    }
}
