pub mod epoch_stats;
pub mod tensorboard;

pub use epoch_stats::EpochStats;
pub use tensorboard::{log_dir_at, save_tensorboard_model, TensorBoardCallback};

use crate::error::Result;

/// Hooks a training loop calls while it runs.
pub trait TrainingCallback {
    /// Called once per completed epoch.
    fn on_epoch_end(&mut self, stats: &EpochStats) -> Result<()>;

    /// Called after the last epoch (or after an early stop).
    fn on_train_end(&mut self) -> Result<()> {
        Ok(())
    }
}
