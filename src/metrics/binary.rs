//! Binary curve primitives.
//!
//! Each function takes per-sample ground truth (`true` = positive) and a
//! score where larger means "more positive". Thresholds are the distinct
//! score values.

use crate::error::EvalError;
use crate::metrics::curve::{PrCurve, RocCurve};
use crate::Result;

// ---------------------------------------------------------------------------
// Threshold sweep
// ---------------------------------------------------------------------------

/// Cumulative true/false positive counts at each distinct threshold,
/// highest threshold first.
struct ThresholdCounts {
    tps: Vec<f64>,
    fps: Vec<f64>,
    thresholds: Vec<f64>,
}

fn threshold_counts(y_true: &[bool], scores: &[f64]) -> Result<ThresholdCounts> {
    if scores.is_empty() {
        return Err(EvalError::InvalidInput("empty input".into()));
    }
    if scores.len() != y_true.len() {
        return Err(EvalError::ShapeMismatch(format!(
            "scores length {} != labels length {}",
            scores.len(),
            y_true.len()
        )));
    }
    if scores.iter().any(|s| !s.is_finite()) {
        return Err(EvalError::InvalidInput("scores contain NaN or infinite values".into()));
    }

    let mut order: Vec<usize> = (0..scores.len()).collect();
    order.sort_by(|&a, &b| scores[b].total_cmp(&scores[a]));

    let mut counts = ThresholdCounts { tps: Vec::new(), fps: Vec::new(), thresholds: Vec::new() };
    let (mut tp, mut fp) = (0usize, 0usize);
    for (pos, &idx) in order.iter().enumerate() {
        if y_true[idx] {
            tp += 1;
        } else {
            fp += 1;
        }
        // Close a threshold at the last sample of each run of equal scores.
        let last_of_run = order.get(pos + 1).map_or(true, |&next| scores[next] != scores[idx]);
        if last_of_run {
            counts.tps.push(tp as f64);
            counts.fps.push(fp as f64);
            counts.thresholds.push(scores[idx]);
        }
    }
    Ok(counts)
}

// ---------------------------------------------------------------------------
// ROC
// ---------------------------------------------------------------------------

/// Receiver operating characteristic curve with its trapezoidal AUC.
///
/// Collinear intermediate points are dropped, and an extra point at `(0, 0)`
/// with an infinite threshold is prepended. With no positives the TPR is NaN
/// everywhere; with no negatives the FPR is. The AUC is NaN in both cases.
pub fn roc_curve(y_true: &[bool], scores: &[f64]) -> Result<RocCurve> {
    let counts = threshold_counts(y_true, scores)?;
    let keep = non_collinear(&counts.fps, &counts.tps);

    let mut fps = vec![0.0];
    let mut tps = vec![0.0];
    let mut thresholds = vec![f64::INFINITY];
    for i in keep {
        fps.push(counts.fps[i]);
        tps.push(counts.tps[i]);
        thresholds.push(counts.thresholds[i]);
    }

    let total_fp = *fps.last().unwrap_or(&0.0);
    let total_tp = *tps.last().unwrap_or(&0.0);
    let false_positive_rate: Vec<f64> = fps.iter().map(|&f| rate(f, total_fp)).collect();
    let true_positive_rate: Vec<f64> = tps.iter().map(|&t| rate(t, total_tp)).collect();
    let auc = auc(&false_positive_rate, &true_positive_rate)?;

    Ok(RocCurve { false_positive_rate, true_positive_rate, thresholds, auc })
}

/// Indices whose point does not lie on a straight segment between its
/// neighbours. The first and last points are always kept.
fn non_collinear(fps: &[f64], tps: &[f64]) -> Vec<usize> {
    let n = fps.len();
    if n <= 2 {
        return (0..n).collect();
    }
    (0..n)
        .filter(|&i| {
            i == 0
                || i == n - 1
                || fps[i + 1] - 2.0 * fps[i] + fps[i - 1] != 0.0
                || tps[i + 1] - 2.0 * tps[i] + tps[i - 1] != 0.0
        })
        .collect()
}

fn rate(count: f64, total: f64) -> f64 {
    if total == 0.0 { f64::NAN } else { count / total }
}

// ---------------------------------------------------------------------------
// Precision-recall
// ---------------------------------------------------------------------------

/// Precision-recall curve with its (uninterpolated) average precision.
///
/// With no positive samples recall is reported as 1.0 at every threshold
/// and the average precision is 0.
pub fn precision_recall_curve(y_true: &[bool], scores: &[f64]) -> Result<PrCurve> {
    let counts = threshold_counts(y_true, scores)?;
    let total_tp = *counts.tps.last().unwrap_or(&0.0);

    let mut precision: Vec<f64> = counts.tps.iter().zip(&counts.fps)
        .map(|(&tp, &fp)| if tp + fp == 0.0 { 0.0 } else { tp / (tp + fp) })
        .collect();
    let mut recall: Vec<f64> = counts.tps.iter()
        .map(|&tp| if total_tp == 0.0 { 1.0 } else { tp / total_tp })
        .collect();
    let mut thresholds = counts.thresholds;

    precision.reverse();
    recall.reverse();
    thresholds.reverse();
    precision.push(1.0);
    recall.push(0.0);

    let average_precision = step_area(&recall, &precision);
    Ok(PrCurve { precision, recall, thresholds, average_precision })
}

/// Average precision: `Σ (R_n − R_{n−1}) · P_n` over the threshold sweep.
pub fn average_precision(y_true: &[bool], scores: &[f64]) -> Result<f64> {
    Ok(precision_recall_curve(y_true, scores)?.average_precision)
}

/// Step-wise area for a curve ordered by non-increasing recall.
fn step_area(recall: &[f64], precision: &[f64]) -> f64 {
    let area: f64 = recall.windows(2).zip(precision)
        .map(|(r, &p)| -(r[1] - r[0]) * p)
        .sum();
    area.max(0.0)
}

// ---------------------------------------------------------------------------
// Area under a curve
// ---------------------------------------------------------------------------

/// Trapezoidal area under `(x, y)`.
///
/// `x` must be monotonic (either direction); decreasing `x` still yields a
/// positive area. NaNs propagate into the result.
pub fn auc(x: &[f64], y: &[f64]) -> Result<f64> {
    if x.len() != y.len() {
        return Err(EvalError::ShapeMismatch(format!(
            "x length {} != y length {}",
            x.len(),
            y.len()
        )));
    }
    if x.len() < 2 {
        return Err(EvalError::InvalidInput(format!(
            "at least 2 points are needed to compute an area, got {}",
            x.len()
        )));
    }

    let dx: Vec<f64> = x.windows(2).map(|w| w[1] - w[0]).collect();
    let direction = if dx.iter().any(|&d| d < 0.0) {
        if dx.iter().all(|&d| d <= 0.0) {
            -1.0
        } else {
            return Err(EvalError::InvalidInput("x is neither increasing nor decreasing".into()));
        }
    } else {
        1.0
    };

    let area: f64 = dx.iter().zip(y.windows(2))
        .map(|(d, w)| d * (w[0] + w[1]) / 2.0)
        .sum();
    Ok(direction * area)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
