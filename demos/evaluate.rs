//! End-to-end walk through the evaluation helpers.
//!
//! Generates a handful of synthetic JPEGs (bright images are class 1, dark
//! images class 0) plus a CSV index, streams them through a batched dataset,
//! scores them with a brightness "model", and prints the ROC / PR summaries
//! and plot specs as JSON.
//!
//! Run with:
//!   RUST_LOG=debug cargo run --example evaluate

use ferrite_eval::plot::{history_plots, misclassified, pr_plot, roc_plot};
use ferrite_eval::{
    pr, roc, BatchedDataset, DatasetConfig, EpochStats, Matrix, RecordTable, TrainingHistory,
};
use image::{Rgb, RgbImage};
use rand::SeedableRng;
use tracing_subscriber::EnvFilter;

const N_IMAGES: usize = 24;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .init();

    // ── Synthetic data on disk ────────────────────────────────────────────
    let dir = tempfile::tempdir()?;
    let mut csv = String::from("filename,label\n");
    for i in 0..N_IMAGES {
        let label = i % 2;
        let level = if label == 1 { 140 + (i * 4) as u8 } else { 20 + (i * 5) as u8 };
        let path = dir.path().join(format!("img_{:02}.jpg", i));
        RgbImage::from_pixel(40, 40, Rgb([level, level, level])).save(&path)?;
        csv.push_str(&format!("{},{}\n", path.display(), label));
    }
    let csv_path = dir.path().join("index.csv");
    std::fs::write(&csv_path, csv)?;

    // ── Dataset ───────────────────────────────────────────────────────────
    let records = RecordTable::from_csv_path(&csv_path)?.image_records("filename", "label")?;
    let dataset = BatchedDataset::build(records, DatasetConfig::new(16, 5).with_prefetch(1))?;

    let mut y_true = Vec::with_capacity(dataset.len());
    let mut probs = Vec::with_capacity(dataset.len());
    for batch in &dataset {
        let batch = batch?;
        for (img, &label) in batch.images.iter().zip(&batch.labels) {
            let brightness = img.view().mean().unwrap_or(0.0) as f64;
            probs.push(vec![1.0 - brightness, brightness]);
            y_true.push(label);
        }
    }
    let y_pred_probs = Matrix::from_data(probs)?;

    // ── Curves ────────────────────────────────────────────────────────────
    let roc_summary = roc(&y_true, &y_pred_probs, 2)?;
    let pr_summary = pr(&y_true, &y_pred_probs, 2)?;
    println!("micro ROC AUC:   {:.4}", roc_summary.micro.auc);
    println!("macro ROC AUC:   {:.4}", roc_summary.macro_avg.auc);
    println!("macro avg prec.: {:.4}", pr_summary.macro_avg.average_precision);

    println!("{}", serde_json::to_string_pretty(&roc_plot(&roc_summary))?);
    println!("{}", serde_json::to_string_pretty(&pr_plot(&pr_summary))?);

    // ── Mistakes ──────────────────────────────────────────────────────────
    let y_pred = y_pred_probs.argmax_rows();
    let mut rng = rand::rngs::StdRng::seed_from_u64(42);
    for sample in misclassified(&dataset, &y_true, &y_pred, 9, &mut rng)? {
        println!("#{:02} {}", sample.index, sample.title());
    }

    // ── Training history ──────────────────────────────────────────────────
    let stats: Vec<EpochStats> = (0..5)
        .map(|epoch| {
            let t = epoch as f64;
            EpochStats {
                epoch,
                train_loss: 1.0 / (1.0 + t),
                val_loss: 1.1 / (1.0 + 0.8 * t),
                train_accuracy: 0.5 + 0.09 * t,
                val_accuracy: 0.48 + 0.08 * t,
            }
        })
        .collect();
    let history = TrainingHistory::from_epoch_stats(&stats);
    let [acc_panel, loss_panel] = history_plots(&history);
    println!("{}: {} series", acc_panel.title, acc_panel.series.len());
    println!("{}: {} series", loss_panel.title, loss_panel.series.len());

    Ok(())
}
