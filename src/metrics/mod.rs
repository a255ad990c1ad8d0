pub mod regression;
pub mod classification;
pub mod confusion;

pub use regression::{eval_preds, mae, mase, mse, RegressionReport};
pub use classification::{accuracy, f1, metrics, precision, recall, Average, ClassificationReport};
pub use confusion::{plot_confusion_matrix, ConfusionMatrix, ConfusionMatrixDisplay};
