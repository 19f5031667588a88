use ferrite_eval::metrics::UndefinedReason;
use ferrite_eval::plot::{misclassified, random_predictions, roc_plot};
use ferrite_eval::{pr, prepare_dataset, roc, EvalError, ImageRecord, Matrix};
use image::{Rgb, RgbImage};
use rand::rngs::StdRng;
use rand::SeedableRng;

const EPS: f64 = 1e-12;

#[test]
fn perfect_separation_gives_unit_scores() {
    let y_true = [0, 1, 1, 0];
    let probs = Matrix::one_hot(&y_true, 2);

    let r = roc(&y_true, &probs, 2).unwrap();
    assert!((r.micro.auc - 1.0).abs() < EPS);

    let p = pr(&y_true, &probs, 2).unwrap();
    assert!((p.macro_avg.average_precision - 1.0).abs() < EPS);
}

#[test]
fn missing_class_never_crashes() {
    let y_true = [0, 0, 1, 1, 0];
    let probs = Matrix::from_data(vec![
        vec![0.7, 0.2, 0.1],
        vec![0.5, 0.3, 0.2],
        vec![0.1, 0.8, 0.1],
        vec![0.3, 0.4, 0.3],
        vec![0.6, 0.1, 0.3],
    ]).unwrap();

    let r = roc(&y_true, &probs, 3).unwrap();
    assert!(r.macro_avg.auc.is_finite());
    assert_eq!(r.warnings.len(), 1);
    assert_eq!(r.warnings[0].reason, UndefinedReason::NoPositives);

    let p = pr(&y_true, &probs, 3).unwrap();
    assert_eq!(p.warnings.len(), 1);
    assert_eq!(p.per_class.len(), 3);
}

#[test]
fn realistic_scores_stay_in_range() {
    let y_true = [0, 1, 2, 2, 1, 0, 2, 1];
    let probs = Matrix::from_data(vec![
        vec![0.6, 0.3, 0.1],
        vec![0.2, 0.5, 0.3],
        vec![0.1, 0.2, 0.7],
        vec![0.4, 0.1, 0.5],
        vec![0.3, 0.3, 0.4],
        vec![0.5, 0.4, 0.1],
        vec![0.2, 0.6, 0.2],
        vec![0.1, 0.8, 0.1],
    ]).unwrap();

    let r = roc(&y_true, &probs, 3).unwrap();
    for curve in [&r.micro, &r.macro_avg] {
        assert!((0.0..=1.0).contains(&curve.auc));
        assert!(curve.false_positive_rate.windows(2).all(|w| w[0] <= w[1]));
        assert!(curve.true_positive_rate.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(*curve.false_positive_rate.last().unwrap(), 1.0);
    }

    let p = pr(&y_true, &probs, 3).unwrap();
    for curve in p.per_class.values().chain(std::iter::once(&p.macro_avg)) {
        assert!(curve.recall.windows(2).all(|w| w[1] <= w[0]));
        assert!((0.0..=1.0).contains(&curve.average_precision));
    }

    let plot = roc_plot(&r);
    assert_eq!(plot.series[0].x.len(), plot.series[0].y.len());
}

#[test]
fn shape_errors_are_reported_up_front() {
    let probs = Matrix::zeros(2, 3);
    assert!(matches!(roc(&[0, 1], &probs, 2), Err(EvalError::ShapeMismatch(_))));
    assert!(matches!(pr(&[0, 1, 2], &probs, 3), Err(EvalError::ShapeMismatch(_))));
}

#[test]
fn sample_grids_respect_selection_rules() {
    let dir = tempfile::tempdir().unwrap();
    let records: Vec<ImageRecord> = (0..6)
        .map(|i| {
            let path = dir.path().join(format!("{}.jpg", i));
            RgbImage::from_pixel(6, 6, Rgb([10 * i as u8, 0, 0])).save(&path).unwrap();
            ImageRecord::new(path, i % 2)
        })
        .collect();
    let ds = prepare_dataset(records, 4, 4).unwrap();
    let y_true = ds.labels();
    let y_pred = vec![0, 0, 0, 1, 1, 1];
    let probs = Matrix::one_hot(&y_pred, 2);
    let mut rng = StdRng::seed_from_u64(7);

    let picks = random_predictions(&ds, &probs, 9, &mut rng).unwrap();
    assert_eq!(picks.len(), 6);
    let mut seen: Vec<usize> = picks.iter().map(|s| s.index).collect();
    seen.sort_unstable();
    assert_eq!(seen, (0..6).collect::<Vec<_>>());
    assert!(picks.iter().all(|s| s.image.shape() == (4, 4, 3)));

    let wrong = misclassified(&ds, &y_true, &y_pred, 2, &mut rng).unwrap();
    assert_eq!(wrong.len(), 2);
    assert!(wrong.iter().all(|s| s.true_label != s.predicted_label));
    assert!(wrong[0].title().starts_with("True: "));

    assert!(random_predictions(&ds, &Matrix::zeros(5, 2), 1, &mut rng).is_err());
}

#[test]
fn misclassified_captions_use_the_supplied_truth() {
    let dir = tempfile::tempdir().unwrap();
    let records: Vec<ImageRecord> = (0..4)
        .map(|i| {
            let path = dir.path().join(format!("{}.jpg", i));
            RgbImage::from_pixel(6, 6, Rgb([0, 30 * i as u8, 0])).save(&path).unwrap();
            ImageRecord::new(path, i % 2)
        })
        .collect();
    let ds = prepare_dataset(records, 4, 2).unwrap();

    // Predictions agree with the stored labels but not with the relabelled truth.
    let y_pred = ds.labels();
    let y_true = vec![2; 4];
    let mut rng = StdRng::seed_from_u64(11);

    let wrong = misclassified(&ds, &y_true, &y_pred, 4, &mut rng).unwrap();
    assert_eq!(wrong.len(), 4);
    for sample in &wrong {
        assert_eq!(sample.true_label, 2);
        assert_ne!(sample.true_label, sample.predicted_label);
        assert_eq!(sample.title(), format!("True: 2, Pred: {}", sample.index % 2));
    }
}
