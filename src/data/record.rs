//! Tabular input for the dataset pipeline.
//!
//! A `RecordTable` is an ordered set of string rows with named columns, read
//! from CSV with a mandatory header row. The dataset builder only needs two
//! columns from it: an image path and an integer class label.

use std::io::Read;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::EvalError;
use crate::Result;

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

/// One `(path, label)` row of the input table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageRecord {
    pub path: PathBuf,
    /// 0-based class index.
    pub label: usize,
}

impl ImageRecord {
    pub fn new(path: impl Into<PathBuf>, label: usize) -> Self {
        ImageRecord { path: path.into(), label }
    }
}

/// Rows of string cells addressed by header name.
#[derive(Debug, Clone, Default)]
pub struct RecordTable {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

impl RecordTable {
    /// Builds a table directly from headers and rows.
    ///
    /// Every row must have exactly `headers.len()` cells.
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Result<Self> {
        if let Some((i, row)) = rows.iter().enumerate().find(|(_, r)| r.len() != headers.len()) {
            return Err(EvalError::ShapeMismatch(format!(
                "row {} has {} cells, header has {}",
                i + 1, row.len(), headers.len()
            )));
        }
        Ok(RecordTable { headers, rows })
    }

    /// Reads a headed CSV file.
    pub fn from_csv_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = std::fs::File::open(path)?;
        let table = Self::from_reader(file)?;
        info!(path = %path.display(), rows = table.len(), "loaded record table");
        Ok(table)
    }

    /// Reads headed CSV from any reader. Surrounding whitespace in cells is trimmed.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers = rdr.headers()?.iter().map(str::to_owned).collect();
        let rows = rdr
            .records()
            .map(|rec| rec.map(|r| r.iter().map(str::to_owned).collect()))
            .collect::<std::result::Result<Vec<Vec<String>>, _>>()?;

        Ok(RecordTable { headers, rows })
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> impl Iterator<Item = &[String]> {
        self.rows.iter().map(Vec::as_slice)
    }

    /// All cells of the column named `name`, in row order.
    pub fn column(&self, name: &str) -> Result<Vec<&str>> {
        let idx = self.column_index(name)?;
        Ok(self.rows.iter().map(|row| row[idx].as_str()).collect())
    }

    /// Extracts `(path, label)` records, preserving row order.
    pub fn image_records(&self, path_column: &str, label_column: &str) -> Result<Vec<ImageRecord>> {
        let paths = self.column(path_column)?;
        let labels = self.column(label_column)?;

        paths
            .into_iter()
            .zip(labels)
            .enumerate()
            .map(|(i, (path, label))| {
                let label = parse_label(label).ok_or_else(|| EvalError::InvalidLabel {
                    row: i + 1,
                    value: label.to_owned(),
                })?;
                Ok(ImageRecord::new(path, label))
            })
            .collect()
    }

    fn column_index(&self, name: &str) -> Result<usize> {
        self.headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| EvalError::MissingColumn(name.to_owned()))
    }
}

// ---------------------------------------------------------------------------
// Private helpers
// ---------------------------------------------------------------------------

/// Accepts `3` as well as integral floats like `3.0`, which spreadsheet
/// exports tend to produce.
fn parse_label(cell: &str) -> Option<usize> {
    if let Ok(v) = cell.parse::<usize>() {
        return Some(v);
    }
    let f = cell.parse::<f64>().ok()?;
    (f >= 0.0 && f.fract() == 0.0 && f <= usize::MAX as f64).then_some(f as usize)
}

#[cfg(test)]
mod tests {
    use super::*;

    const CSV: &str = "filename,class,split\nimg/a.jpg,1,train\n img/b.jpg , 0 ,val\nimg/c.jpg,2.0,train\n";

    #[test]
    fn extracts_records_in_row_order() {
        let table = RecordTable::from_reader(CSV.as_bytes()).unwrap();
        assert_eq!(table.len(), 3);

        let records = table.image_records("filename", "class").unwrap();
        let labels: Vec<usize> = records.iter().map(|r| r.label).collect();
        assert_eq!(labels, vec![1, 0, 2]);
        assert_eq!(records[1].path, PathBuf::from("img/b.jpg"));
        assert_eq!(table.headers(), &["filename", "class", "split"]);
        assert_eq!(table.rows().nth(2).map(|r| r[2].as_str()), Some("train"));
    }

    #[test]
    fn missing_column_is_reported_by_name() {
        let table = RecordTable::from_reader(CSV.as_bytes()).unwrap();
        match table.image_records("path", "class") {
            Err(EvalError::MissingColumn(name)) => assert_eq!(name, "path"),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn negative_or_fractional_labels_are_rejected() {
        let table = RecordTable::from_reader("p,l\na.jpg,-1\n".as_bytes()).unwrap();
        assert!(matches!(
            table.image_records("p", "l"),
            Err(EvalError::InvalidLabel { row: 1, .. })
        ));

        let table = RecordTable::from_reader("p,l\na.jpg,0\nb.jpg,1.5\n".as_bytes()).unwrap();
        assert!(matches!(
            table.image_records("p", "l"),
            Err(EvalError::InvalidLabel { row: 2, .. })
        ));
    }

    #[test]
    fn new_rejects_ragged_rows() {
        let headers = vec!["p".to_string(), "l".to_string()];
        let rows = vec![vec!["a.jpg".to_string()]];
        assert!(matches!(RecordTable::new(headers, rows), Err(EvalError::ShapeMismatch(_))));
    }
}
