use std::fs::{self, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDateTime};

use crate::callbacks::{EpochStats, TrainingCallback};
use crate::error::Result;
use crate::plot::History;

/// Name of the per-run scalar log inside the log directory.
pub const SCALARS_FILE: &str = "scalars.jsonl";

/// Timestamp layout of the innermost log directory (date plus hour).
const RUN_STAMP: &str = "%Y%m%d_%H";

/// Builds `{dir_name}/{experiment_name}/{YYYYMMDD_HH}` for the given time.
pub fn log_dir_at(dir_name: &str, experiment_name: &str, at: NaiveDateTime) -> PathBuf {
    Path::new(dir_name)
        .join(experiment_name)
        .join(at.format(RUN_STAMP).to_string())
}

/// Returns a callback logging into `{dir_name}/{experiment_name}/{YYYYMMDD_HH}`
/// stamped with the current local time.
///
/// Nothing is created on disk here; the callback creates the directory the
/// first time it writes.
pub fn save_tensorboard_model(dir_name: &str, experiment_name: &str) -> TensorBoardCallback {
    let log_dir = log_dir_at(dir_name, experiment_name, Local::now().naive_local());
    log::info!("saving experiment logs to {:?}", log_dir);
    TensorBoardCallback::new(log_dir)
}

/// Appends one JSON line per finished epoch to `{log_dir}/scalars.jsonl`.
#[derive(Debug, Clone)]
pub struct TensorBoardCallback {
    log_dir: PathBuf,
    epochs_written: usize,
}

impl TensorBoardCallback {
    pub fn new(log_dir: impl Into<PathBuf>) -> Self {
        TensorBoardCallback { log_dir: log_dir.into(), epochs_written: 0 }
    }

    pub fn log_dir(&self) -> &Path {
        &self.log_dir
    }

    pub fn scalars_path(&self) -> PathBuf {
        self.log_dir.join(SCALARS_FILE)
    }

    pub fn epochs_written(&self) -> usize {
        self.epochs_written
    }

    /// Reads every epoch logged so far in this run's directory.
    pub fn read_epochs(&self) -> Result<Vec<EpochStats>> {
        let file = fs::File::open(self.scalars_path())?;
        let mut out = Vec::new();
        for line in BufReader::new(file).lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            out.push(serde_json::from_str(&line)?);
        }
        Ok(out)
    }

    /// The logged run as a `History`, ready for `plot_metric_curves`.
    pub fn read_history(&self) -> Result<History> {
        Ok(History::from_epochs(&self.read_epochs()?))
    }
}

impl TrainingCallback for TensorBoardCallback {
    fn on_epoch_end(&mut self, stats: &EpochStats) -> Result<()> {
        fs::create_dir_all(&self.log_dir)?;
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(self.scalars_path())?;
        let line = serde_json::to_string(stats)?;
        writeln!(file, "{}", line)?;
        self.epochs_written += 1;
        log::debug!("logged epoch {}/{} to {:?}", stats.epoch, stats.total_epochs, self.log_dir);
        Ok(())
    }

    fn on_train_end(&mut self) -> Result<()> {
        log::info!("run finished: {} epochs logged to {:?}", self.epochs_written, self.log_dir);
        Ok(())
    }
}
