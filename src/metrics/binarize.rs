use crate::error::EvalError;
use crate::math::matrix::Matrix;
use crate::Result;

/// One-hot expansion of `y_true` over classes `0..n_classes`.
pub fn binarize(y_true: &[usize], n_classes: usize) -> Matrix {
    Matrix::one_hot(y_true, n_classes)
}

/// Fails fast when labels and probabilities cannot describe the same problem.
pub(crate) fn check_shapes(y_true: &[usize], y_pred_probs: &Matrix, n_classes: usize) -> Result<()> {
    if n_classes < 2 {
        return Err(EvalError::ShapeMismatch(format!(
            "at least 2 classes are required, got {}",
            n_classes
        )));
    }
    if y_true.is_empty() {
        return Err(EvalError::ShapeMismatch("y_true is empty".into()));
    }
    if y_true.len() != y_pred_probs.rows {
        return Err(EvalError::ShapeMismatch(format!(
            "y_true has {} samples but y_pred_probs has {} rows",
            y_true.len(),
            y_pred_probs.rows
        )));
    }
    if y_pred_probs.cols != n_classes {
        return Err(EvalError::ShapeMismatch(format!(
            "y_pred_probs has {} columns but n_classes is {}",
            y_pred_probs.cols, n_classes
        )));
    }
    if y_pred_probs.data.len() != y_pred_probs.rows {
        return Err(EvalError::ShapeMismatch(format!(
            "y_pred_probs declares {} rows but holds {}",
            y_pred_probs.rows,
            y_pred_probs.data.len()
        )));
    }
    if let Some((i, row)) = y_pred_probs.data.iter().enumerate().find(|(_, r)| r.len() != y_pred_probs.cols) {
        return Err(EvalError::ShapeMismatch(format!(
            "y_pred_probs row {} has {} columns, expected {}",
            i,
            row.len(),
            y_pred_probs.cols
        )));
    }
    if let Some((i, &label)) = y_true.iter().enumerate().find(|(_, &l)| l >= n_classes) {
        return Err(EvalError::ShapeMismatch(format!(
            "y_true[{}] = {} is outside 0..{}",
            i, label, n_classes
        )));
    }
    Ok(())
}

pub(crate) fn as_flags(values: &[f64]) -> Vec<bool> {
    values.iter().map(|&v| v > 0.5).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn probs(rows: usize, cols: usize) -> Matrix {
        Matrix::zeros(rows, cols)
    }

    #[test]
    fn accepts_consistent_shapes() {
        assert!(check_shapes(&[0, 2, 1], &probs(3, 3), 3).is_ok());
    }

    #[test]
    fn rejects_every_mismatch() {
        assert!(check_shapes(&[0, 1], &probs(3, 2), 2).is_err());
        assert!(check_shapes(&[0, 1], &probs(2, 3), 2).is_err());
        assert!(check_shapes(&[0, 2], &probs(2, 2), 2).is_err());
        assert!(check_shapes(&[], &probs(0, 2), 2).is_err());
        assert!(check_shapes(&[0], &probs(1, 1), 1).is_err());
    }

    #[test]
    fn rejects_data_that_disagrees_with_declared_shape() {
        let short = Matrix { rows: 3, cols: 2, data: vec![vec![0.4, 0.6], vec![0.7, 0.3]] };
        assert!(matches!(check_shapes(&[0, 1, 1], &short, 2), Err(EvalError::ShapeMismatch(_))));

        let ragged = Matrix { rows: 2, cols: 2, data: vec![vec![0.4, 0.6], vec![0.7]] };
        assert!(matches!(
            crate::metrics::roc::roc(&[0, 1], &ragged, 2),
            Err(EvalError::ShapeMismatch(_))
        ));
        assert!(matches!(
            crate::metrics::pr::pr(&[0, 1], &ragged, 2),
            Err(EvalError::ShapeMismatch(_))
        ));
    }

    #[test]
    fn binarize_keeps_class_order() {
        let m = binarize(&[1, 0, 1], 2);
        assert_eq!(m.data, vec![vec![0.0, 1.0], vec![1.0, 0.0], vec![0.0, 1.0]]);
        assert_eq!(as_flags(&m.column(1)), vec![true, false, true]);
    }
}
