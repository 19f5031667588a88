use serde::{Serialize, Deserialize};

/// Accuracy and loss recorded at the end of one training epoch.
///
/// A training loop that emits one of these per epoch can be turned into a
/// [`TrainingHistory`](crate::history::TrainingHistory) with
/// `TrainingHistory::from_epoch_stats`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpochStats {
    /// 0-based epoch number.
    pub epoch: usize,
    /// Mean training loss over all samples in this epoch.
    pub train_loss: f64,
    /// Mean validation loss.
    pub val_loss: f64,
    /// Training accuracy as a fraction in [0, 1].
    pub train_accuracy: f64,
    /// Validation accuracy as a fraction in [0, 1].
    pub val_accuracy: f64,
}
