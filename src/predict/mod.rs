pub mod label;

pub use label::{argmax, predict_label, Classifier, Prediction};
