pub mod image;
pub mod record;
pub mod dataset_config;
pub mod dataset;

pub use self::image::{load_image, ImageTensor};
pub use record::{ImageRecord, RecordTable};
pub use dataset_config::DatasetConfig;
pub use dataset::{prepare_dataset, Batch, BatchedDataset, Batches};
