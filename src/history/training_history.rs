use std::ops::Range;
use std::path::Path;

use serde::{Serialize, Deserialize};

use crate::error::EvalError;
use crate::history::epoch_stats::EpochStats;
use crate::Result;

/// Four per-epoch series produced by a training run, indexed from epoch 0.
///
/// The JSON form uses the conventional history keys:
/// `{"accuracy": [..], "val_accuracy": [..], "loss": [..], "val_loss": [..]}`.
/// Any other keys in the document are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingHistory {
    accuracy: Vec<f64>,
    val_accuracy: Vec<f64>,
    loss: Vec<f64>,
    val_loss: Vec<f64>,
}

impl TrainingHistory {
    /// Fails with `ShapeMismatch` unless all four series have the same length.
    pub fn new(
        accuracy: Vec<f64>,
        val_accuracy: Vec<f64>,
        loss: Vec<f64>,
        val_loss: Vec<f64>,
    ) -> Result<Self> {
        let history = TrainingHistory { accuracy, val_accuracy, loss, val_loss };
        history.check_lengths()?;
        Ok(history)
    }

    /// Builds the history from per-epoch records, sorted by `epoch`.
    pub fn from_epoch_stats(stats: &[EpochStats]) -> Self {
        let mut sorted: Vec<&EpochStats> = stats.iter().collect();
        sorted.sort_by_key(|s| s.epoch);
        TrainingHistory {
            accuracy: sorted.iter().map(|s| s.train_accuracy).collect(),
            val_accuracy: sorted.iter().map(|s| s.val_accuracy).collect(),
            loss: sorted.iter().map(|s| s.train_loss).collect(),
            val_loss: sorted.iter().map(|s| s.val_loss).collect(),
        }
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let history: TrainingHistory = serde_json::from_str(json)?;
        history.check_lengths()?;
        Ok(history)
    }

    /// Reads a history JSON file previously written by `save_json` (or any
    /// dump using the same keys).
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn save_json(&self, path: impl AsRef<Path>) -> Result<()> {
        let file = std::fs::File::create(path)?;
        let writer = std::io::BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.accuracy.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accuracy.is_empty()
    }

    /// Epoch indices `0..len`.
    pub fn epochs(&self) -> Range<usize> {
        0..self.len()
    }

    pub fn accuracy(&self) -> &[f64] {
        &self.accuracy
    }

    pub fn val_accuracy(&self) -> &[f64] {
        &self.val_accuracy
    }

    pub fn loss(&self) -> &[f64] {
        &self.loss
    }

    pub fn val_loss(&self) -> &[f64] {
        &self.val_loss
    }

    fn check_lengths(&self) -> Result<()> {
        let n = self.accuracy.len();
        let others = [
            ("val_accuracy", self.val_accuracy.len()),
            ("loss", self.loss.len()),
            ("val_loss", self.val_loss.len()),
        ];
        if let Some((name, len)) = others.iter().find(|(_, len)| *len != n) {
            return Err(EvalError::ShapeMismatch(format!(
                "history series '{}' has {} epochs, 'accuracy' has {}",
                name, len, n
            )));
        }
        Ok(())
    }
}
