use std::fmt;

use serde::{Serialize, Deserialize};

/// ROC curve for one binary problem (one class column, or a flattened pair).
///
/// Points are ordered by decreasing threshold; the first point is always
/// `(0, 0)` with an infinite threshold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RocCurve {
    pub false_positive_rate: Vec<f64>,
    pub true_positive_rate: Vec<f64>,
    pub thresholds: Vec<f64>,
    /// Area under the curve. NaN when the curve itself is undefined.
    pub auc: f64,
}

/// Precision-recall curve for one binary problem.
///
/// Points are ordered by increasing threshold, so recall is non-increasing
/// along the sequence; the final point is `(recall 0, precision 1)` and has
/// no threshold, hence `thresholds.len() == precision.len() - 1`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrCurve {
    pub precision: Vec<f64>,
    pub recall: Vec<f64>,
    pub thresholds: Vec<f64>,
    pub average_precision: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UndefinedReason {
    NoPositives,
    NoNegatives,
}

/// Non-fatal warning: a per-class metric could not be computed meaningfully.
///
/// ROC skips such classes in its macro average; PR counts them with an
/// average precision of 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UndefinedMetric {
    pub class: usize,
    pub reason: UndefinedReason,
}

impl fmt::Display for UndefinedMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let what = match self.reason {
            UndefinedReason::NoPositives => "no positive samples",
            UndefinedReason::NoNegatives => "no negative samples",
        };
        write!(f, "class {} has {} in y_true", self.class, what)
    }
}
