//! Display specs: plain data describing what to draw.
//!
//! Nothing here renders. A front end takes these values and draws them with
//! whatever toolkit it likes.

pub mod spec;
pub mod curves;
pub mod samples;

pub use spec::{CurvePlot, LegendLoc, LineStyle, Series};
pub use curves::{history_plots, pr_plot, roc_plot};
pub use samples::{misclassified, random_predictions, PredictionSample};
