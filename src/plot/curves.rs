//! Plot descriptions for evaluation curves and training history.

use crate::history::TrainingHistory;
use crate::metrics::pr::PrSummary;
use crate::metrics::roc::RocSummary;
use crate::plot::spec::{CurvePlot, LegendLoc, LineStyle, Series};

/// Micro ROC (solid), macro ROC (dashed) and the chance diagonal.
///
/// The macro line reuses the pooled curve points; its legend reports the
/// class-averaged AUC.
pub fn roc_plot(summary: &RocSummary) -> CurvePlot {
    let micro = &summary.micro;
    let macro_avg = &summary.macro_avg;
    CurvePlot {
        title: "ROC Curve".into(),
        x_label: "False Positive Rate".into(),
        y_label: "True Positive Rate".into(),
        x_range: Some((0.0, 1.0)),
        y_range: Some((0.0, 1.05)),
        series: vec![
            Series::new(
                format!("Micro-average ROC curve (area = {:.2})", micro.auc),
                micro.false_positive_rate.clone(),
                micro.true_positive_rate.clone(),
                LineStyle::Solid,
            ),
            Series::new(
                format!("Macro-average ROC curve (area = {:.2})", macro_avg.auc),
                macro_avg.false_positive_rate.clone(),
                macro_avg.true_positive_rate.clone(),
                LineStyle::Dashed,
            ),
            Series::unlabelled(vec![0.0, 1.0], vec![0.0, 1.0], LineStyle::Reference),
        ],
        legend: LegendLoc::LowerRight,
    }
}

/// The macro precision-recall curve, recall on x.
pub fn pr_plot(summary: &PrSummary) -> CurvePlot {
    let curve = &summary.macro_avg;
    CurvePlot {
        title: "Macro-average Precision-Recall Curve".into(),
        x_label: "Recall".into(),
        y_label: "Precision".into(),
        x_range: Some((0.0, 1.0)),
        y_range: Some((0.0, 1.05)),
        series: vec![Series::new(
            format!(
                "Macro-average Precision-Recall curve (average precision = {:.2})",
                curve.average_precision
            ),
            curve.recall.clone(),
            curve.precision.clone(),
            LineStyle::Solid,
        )],
        legend: LegendLoc::LowerLeft,
    }
}

/// Accuracy panel and loss panel, epochs on x starting at 0.
pub fn history_plots(history: &TrainingHistory) -> [CurvePlot; 2] {
    let epochs: Vec<f64> = history.epochs().map(|e| e as f64).collect();
    [
        history_panel(
            "Training and Validation Accuracy",
            "Accuracy",
            &epochs,
            ("Training Accuracy", history.accuracy()),
            ("Validation Accuracy", history.val_accuracy()),
            LegendLoc::LowerRight,
        ),
        history_panel(
            "Training and Validation Loss",
            "Loss",
            &epochs,
            ("Training Loss", history.loss()),
            ("Validation Loss", history.val_loss()),
            LegendLoc::UpperRight,
        ),
    ]
}

fn history_panel(
    title: &str,
    y_label: &str,
    epochs: &[f64],
    train: (&str, &[f64]),
    val: (&str, &[f64]),
    legend: LegendLoc,
) -> CurvePlot {
    CurvePlot {
        title: title.into(),
        x_label: "Epoch".into(),
        y_label: y_label.into(),
        x_range: None,
        y_range: None,
        series: vec![
            Series::new(train.0, epochs.to_vec(), train.1.to_vec(), LineStyle::Solid),
            Series::new(val.0, epochs.to_vec(), val.1.to_vec(), LineStyle::Solid),
        ],
        legend,
    }
}
