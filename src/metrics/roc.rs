use std::collections::BTreeMap;

use serde::{Serialize, Deserialize};
use tracing::warn;

use crate::math::matrix::Matrix;
use crate::metrics::binarize::{as_flags, binarize, check_shapes};
use crate::metrics::binary::roc_curve;
use crate::metrics::curve::{RocCurve, UndefinedMetric, UndefinedReason};
use crate::Result;

/// Micro- and macro-averaged ROC results for a multi-class problem.
///
/// `macro_avg` carries the same curve points as `micro` (both are computed
/// on the flattened one-hot/probability pair); only its `auc` differs, being
/// the unweighted mean of the per-class AUCs. Consumers plotting the macro
/// curve should be aware the shape is the pooled one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RocSummary {
    pub micro: RocCurve,
    pub macro_avg: RocCurve,
    /// AUC of every class that has both positive and negative samples.
    pub per_class_auc: BTreeMap<usize, f64>,
    pub warnings: Vec<UndefinedMetric>,
}

/// Computes micro and macro ROC for `y_true` against `y_pred_probs`
/// (`n_samples × n_classes`).
///
/// Classes with no positive (or no negative) samples are left out of the
/// macro average and reported in `warnings`. If no class is usable the macro
/// AUC is NaN.
pub fn roc(y_true: &[usize], y_pred_probs: &Matrix, n_classes: usize) -> Result<RocSummary> {
    check_shapes(y_true, y_pred_probs, n_classes)?;
    let binarized = binarize(y_true, n_classes);

    let micro = roc_curve(&as_flags(&binarized.ravel()), &y_pred_probs.ravel())?;

    let mut per_class_auc = BTreeMap::new();
    let mut warnings = Vec::new();
    for class in 0..n_classes {
        let truth = as_flags(&binarized.column(class));
        let positives = truth.iter().filter(|&&t| t).count();
        let reason = if positives == 0 {
            Some(UndefinedReason::NoPositives)
        } else if positives == truth.len() {
            Some(UndefinedReason::NoNegatives)
        } else {
            None
        };
        if let Some(reason) = reason {
            let w = UndefinedMetric { class, reason };
            warn!("ROC AUC undefined, skipping in macro average: {}", w);
            warnings.push(w);
            continue;
        }
        let curve = roc_curve(&truth, &y_pred_probs.column(class))?;
        per_class_auc.insert(class, curve.auc);
    }

    let macro_auc = if per_class_auc.is_empty() {
        f64::NAN
    } else {
        per_class_auc.values().sum::<f64>() / per_class_auc.len() as f64
    };
    let macro_avg = RocCurve { auc: macro_auc, ..micro.clone() };

    Ok(RocSummary { micro, macro_avg, per_class_auc, warnings })
}
