pub mod error;
pub mod config;
pub mod data;
pub mod vision;
pub mod plot;
pub mod metrics;
pub mod predict;
pub mod callbacks;

#[cfg(test)]
mod testutil;

// Convenience re-exports
pub use error::{Error, Result};
pub use config::{KitConfig, DEFAULT_IMAGE_SIZE};
pub use data::{extract_data, extract_data_to, list_classes, list_class_dirs, parse_data};
pub use vision::{read_image, view_images, ImageTensor};
pub use plot::{plot_metric_curves, Figure, History};
pub use metrics::{eval_preds, mase, metrics, plot_confusion_matrix, ConfusionMatrix};
pub use predict::{predict_label, Classifier, Prediction};
pub use callbacks::{save_tensorboard_model, EpochStats, TensorBoardCallback, TrainingCallback};
