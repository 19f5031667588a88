use serde::{Serialize, Deserialize};

use crate::error::EvalError;
use crate::Result;

/// Row-major dense matrix of `f64`.
///
/// Used for predicted-probability matrices (`rows` = samples, `cols` =
/// classes) and for one-hot label matrices derived from them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Matrix{
    pub rows: usize,
    pub cols: usize,
    pub data: Vec<Vec<f64>>
}

impl Matrix{
    pub fn zeros(rows: usize, cols: usize) -> Matrix {
        Matrix{
            rows,
            cols,
            data: vec![vec![0.0; cols]; rows]
        }
    }

    /// Builds a matrix from row vectors.
    ///
    /// Fails with `ShapeMismatch` if the rows are ragged. An empty `data`
    /// yields a `0 × 0` matrix.
    pub fn from_data(data: Vec<Vec<f64>>) -> Result<Matrix> {
        let cols = data.first().map(|r| r.len()).unwrap_or(0);
        if let Some((i, row)) = data.iter().enumerate().find(|(_, r)| r.len() != cols) {
            return Err(EvalError::ShapeMismatch(format!(
                "row {} has {} columns, expected {}",
                i, row.len(), cols
            )));
        }
        Ok(Matrix {
            rows: data.len(),
            cols,
            data
        })
    }

    /// One-hot expansion of class indices over classes `0..n_classes`.
    ///
    /// Labels outside the range produce an all-zero row; callers that need
    /// strict validation check the range beforehand.
    pub fn one_hot(labels: &[usize], n_classes: usize) -> Matrix {
        let mut res = Matrix::zeros(labels.len(), n_classes);
        for (row, &label) in res.data.iter_mut().zip(labels) {
            if label < n_classes {
                row[label] = 1.0;
            }
        }
        res
    }

    /// Copies column `j` out as a vector. Panics if `j >= cols`.
    pub fn column(&self, j: usize) -> Vec<f64> {
        assert!(j < self.cols, "column index {} out of range for {} columns", j, self.cols);
        self.data.iter().map(|row| row[j]).collect()
    }

    /// Flattens the matrix row by row.
    pub fn ravel(&self) -> Vec<f64> {
        self.data.iter().flat_map(|row| row.iter().copied()).collect()
    }

    /// Index of the largest entry of every row (ties resolve to the lowest index).
    pub fn argmax_rows(&self) -> Vec<usize> {
        self.data.iter().map(|row| argmax(row)).collect()
    }
}

impl Default for Matrix {
    fn default() -> Self {
        Matrix { rows: 0, cols: 0, data: vec![] }
    }
}

/// Index of the maximum element in a slice.
pub fn argmax(v: &[f64]) -> usize {
    v.iter()
        .enumerate()
        .fold(None, |best: Option<(usize, f64)>, (i, &x)| match best {
            Some((_, b)) if b >= x => best,
            _ => Some((i, x)),
        })
        .map(|(i, _)| i)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_data_rejects_ragged_rows() {
        let err = Matrix::from_data(vec![vec![0.1, 0.9], vec![1.0]]).unwrap_err();
        assert!(matches!(err, EvalError::ShapeMismatch(_)));
    }

    #[test]
    fn one_hot_and_ravel_are_row_major() {
        let m = Matrix::one_hot(&[2, 0], 3);
        assert_eq!(m.ravel(), vec![0.0, 0.0, 1.0, 1.0, 0.0, 0.0]);
        assert_eq!(m.column(0), vec![0.0, 1.0]);
    }

    #[test]
    fn argmax_prefers_first_on_ties() {
        let m = Matrix::from_data(vec![vec![0.5, 0.5], vec![0.2, 0.8]]).unwrap();
        assert_eq!(m.argmax_rows(), vec![0, 1]);
    }
}
