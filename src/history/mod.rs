pub mod epoch_stats;
pub mod training_history;

pub use epoch_stats::EpochStats;
pub use training_history::TrainingHistory;
