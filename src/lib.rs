pub mod error;
pub mod math;
pub mod data;
pub mod metrics;
pub mod history;
pub mod plot;

pub type Result<T> = std::result::Result<T, EvalError>;

// Convenience re-exports
pub use error::EvalError;
pub use math::matrix::Matrix;
pub use data::image::{load_image, ImageTensor, DEFAULT_IMG_SIZE};
pub use data::record::{ImageRecord, RecordTable};
pub use data::dataset::{prepare_dataset, Batch, BatchedDataset, Batches};
pub use data::dataset_config::DatasetConfig;
pub use metrics::curve::{PrCurve, RocCurve, UndefinedMetric};
pub use metrics::roc::{roc, RocSummary};
pub use metrics::pr::{pr, PrSummary};
pub use history::{EpochStats, TrainingHistory};
