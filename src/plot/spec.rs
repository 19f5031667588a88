use serde::{Serialize, Deserialize};

/// How a renderer should stroke a series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineStyle {
    Solid,
    Dashed,
    /// Thin black dashed guide line (e.g. the chance diagonal of a ROC plot).
    Reference,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LegendLoc {
    LowerRight,
    LowerLeft,
    UpperRight,
}

/// One line of a plot. `x` and `y` always have the same length.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Series {
    /// Legend text; `None` keeps the series out of the legend.
    pub label: Option<String>,
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub style: LineStyle,
}

impl Series {
    pub fn new(label: impl Into<String>, x: Vec<f64>, y: Vec<f64>, style: LineStyle) -> Self {
        Series { label: Some(label.into()), x, y, style }
    }

    pub fn unlabelled(x: Vec<f64>, y: Vec<f64>, style: LineStyle) -> Self {
        Series { label: None, x, y, style }
    }
}

/// Everything a renderer needs to draw one set of axes.
///
/// Ranges of `None` let the renderer fit the data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurvePlot {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub x_range: Option<(f64, f64)>,
    pub y_range: Option<(f64, f64)>,
    pub series: Vec<Series>,
    pub legend: LegendLoc,
}
