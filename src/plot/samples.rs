//! Sample grids: decoded images paired with their true and predicted labels.

use rand::Rng;
use serde::Serialize;

use crate::data::dataset::BatchedDataset;
use crate::data::image::ImageTensor;
use crate::error::EvalError;
use crate::math::matrix::Matrix;
use crate::Result;

/// One cell of a sample grid.
#[derive(Debug, Clone, Serialize)]
pub struct PredictionSample {
    /// Row index in the dataset.
    pub index: usize,
    #[serde(skip)]
    pub image: ImageTensor,
    pub true_label: usize,
    pub predicted_label: usize,
}

impl PredictionSample {
    /// Caption in the usual "True: t, Pred: p" form.
    pub fn title(&self) -> String {
        format!("True: {}, Pred: {}", self.true_label, self.predicted_label)
    }
}

/// Picks up to `total` distinct samples at random and pairs each with its
/// argmax prediction from `y_pred_probs`.
pub fn random_predictions<R: Rng + ?Sized>(
    dataset: &BatchedDataset,
    y_pred_probs: &Matrix,
    total: usize,
    rng: &mut R,
) -> Result<Vec<PredictionSample>> {
    if y_pred_probs.rows != dataset.len() {
        return Err(EvalError::ShapeMismatch(format!(
            "dataset has {} samples but y_pred_probs has {} rows",
            dataset.len(),
            y_pred_probs.rows
        )));
    }
    let y_pred = y_pred_probs.argmax_rows();
    let candidates: Vec<usize> = (0..dataset.len()).collect();
    collect_samples(dataset, &dataset.labels(), &y_pred, &pick(&candidates, total, rng))
}

/// Picks up to `total` distinct samples whose prediction differs from the
/// ground truth. Returns fewer when there are not enough mistakes.
///
/// Captions use `y_true`, the same labels the mistakes were selected with.
pub fn misclassified<R: Rng + ?Sized>(
    dataset: &BatchedDataset,
    y_true: &[usize],
    y_pred: &[usize],
    total: usize,
    rng: &mut R,
) -> Result<Vec<PredictionSample>> {
    if y_true.len() != dataset.len() || y_pred.len() != dataset.len() {
        return Err(EvalError::ShapeMismatch(format!(
            "dataset has {} samples, y_true {}, y_pred {}",
            dataset.len(),
            y_true.len(),
            y_pred.len()
        )));
    }
    let wrong: Vec<usize> = y_true.iter().zip(y_pred)
        .enumerate()
        .filter(|(_, (t, p))| t != p)
        .map(|(i, _)| i)
        .collect();
    collect_samples(dataset, y_true, y_pred, &pick(&wrong, total, rng))
}

/// Random selection without replacement, capped at `candidates.len()`.
fn pick<R: Rng + ?Sized>(candidates: &[usize], total: usize, rng: &mut R) -> Vec<usize> {
    let amount = total.min(candidates.len());
    rand::seq::index::sample(rng, candidates.len(), amount)
        .into_iter()
        .map(|i| candidates[i])
        .collect()
}

fn collect_samples(
    dataset: &BatchedDataset,
    y_true: &[usize],
    y_pred: &[usize],
    indices: &[usize],
) -> Result<Vec<PredictionSample>> {
    indices
        .iter()
        .map(|&index| {
            let (image, _) = dataset.get(index)?;
            Ok(PredictionSample {
                index,
                image,
                true_label: y_true[index],
                predicted_label: y_pred[index],
            })
        })
        .collect()
}
