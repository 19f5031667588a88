use std::collections::BTreeMap;

use serde::{Serialize, Deserialize};
use tracing::warn;

use crate::math::matrix::Matrix;
use crate::metrics::binarize::{as_flags, binarize, check_shapes};
use crate::metrics::binary::precision_recall_curve;
use crate::metrics::curve::{PrCurve, UndefinedMetric, UndefinedReason};
use crate::Result;

/// Per-class and macro precision-recall results.
///
/// The macro curve is computed on the flattened one-hot/probability pair;
/// its `average_precision` is the unweighted mean of the per-class values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrSummary {
    pub per_class: BTreeMap<usize, PrCurve>,
    pub macro_avg: PrCurve,
    pub warnings: Vec<UndefinedMetric>,
}

/// Computes one PR curve per class plus the macro aggregate.
///
/// A class with no positive samples keeps its curve (recall fixed at 1.0),
/// contributes an average precision of 0 to the macro mean, and is reported
/// in `warnings`.
pub fn pr(y_true: &[usize], y_pred_probs: &Matrix, n_classes: usize) -> Result<PrSummary> {
    check_shapes(y_true, y_pred_probs, n_classes)?;
    let binarized = binarize(y_true, n_classes);

    let mut per_class = BTreeMap::new();
    let mut warnings = Vec::new();
    for class in 0..n_classes {
        let truth = as_flags(&binarized.column(class));
        if !truth.iter().any(|&t| t) {
            let w = UndefinedMetric { class, reason: UndefinedReason::NoPositives };
            warn!("average precision undefined, counted as 0: {}", w);
            warnings.push(w);
        }
        let curve = precision_recall_curve(&truth, &y_pred_probs.column(class))?;
        per_class.insert(class, curve);
    }

    let mut macro_avg = precision_recall_curve(&as_flags(&binarized.ravel()), &y_pred_probs.ravel())?;
    macro_avg.average_precision = per_class.values()
        .map(|c| c.average_precision)
        .sum::<f64>() / n_classes as f64;

    Ok(PrSummary { per_class, macro_avg, warnings })
}
