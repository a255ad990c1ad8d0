use serde::{Serialize, Deserialize};

/// Per-epoch training statistics handed to a `TrainingCallback`.
///
/// The training loop that owns the model emits one value at the end of every
/// completed epoch; callbacks persist or display it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpochStats {
    /// 1-based epoch number.
    pub epoch: usize,
    /// Total epochs requested for this run.
    pub total_epochs: usize,
    /// Mean training loss over all samples in this epoch.
    pub train_loss: f64,
    /// Mean validation loss, if a validation set was provided.
    #[serde(default)]
    pub val_loss: Option<f64>,
    /// Training accuracy as a fraction in [0, 1]; classification runs only.
    #[serde(default)]
    pub train_accuracy: Option<f64>,
    /// Validation accuracy as a fraction in [0, 1].
    #[serde(default)]
    pub val_accuracy: Option<f64>,
    /// Wall-clock duration of this single epoch in milliseconds.
    #[serde(default)]
    pub elapsed_ms: u64,
}

impl EpochStats {
    /// Creates a record carrying only the training loss.
    pub fn new(epoch: usize, total_epochs: usize, train_loss: f64) -> Self {
        EpochStats {
            epoch,
            total_epochs,
            train_loss,
            val_loss: None,
            train_accuracy: None,
            val_accuracy: None,
            elapsed_ms: 0,
        }
    }

    pub fn with_accuracy(mut self, train_accuracy: f64) -> Self {
        self.train_accuracy = Some(train_accuracy);
        self
    }

    pub fn with_validation(mut self, val_loss: f64, val_accuracy: Option<f64>) -> Self {
        self.val_loss = Some(val_loss);
        self.val_accuracy = val_accuracy;
        self
    }

    pub fn with_elapsed_ms(mut self, elapsed_ms: u64) -> Self {
        self.elapsed_ms = elapsed_ms;
        self
    }
}
