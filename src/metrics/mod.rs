pub mod curve;
pub mod binary;
pub mod binarize;
pub mod roc;
pub mod pr;

pub use curve::{PrCurve, RocCurve, UndefinedMetric, UndefinedReason};
pub use binary::{auc, average_precision, precision_recall_curve, roc_curve};
pub use binarize::binarize;
pub use roc::{roc, RocSummary};
pub use pr::{pr, PrSummary};
