use std::fmt;

use serde::{Serialize, Deserialize};

use crate::error::{ensure_same_len, Error, Result};

fn check_pair(y_true: &[f64], y_pred: &[f64]) -> Result<()> {
    ensure_same_len(y_true, y_pred)?;
    if y_true.is_empty() {
        return Err(Error::EmptyInput("regression metrics need at least one sample"));
    }
    Ok(())
}

/// Mean absolute error: mean(|y_true - y_pred|)
pub fn mae(y_true: &[f64], y_pred: &[f64]) -> Result<f64> {
    check_pair(y_true, y_pred)?;
    let n = y_true.len() as f64;
    Ok(y_true.iter().zip(y_pred.iter())
        .map(|(t, p)| (t - p).abs())
        .sum::<f64>() / n)
}

/// Mean squared error: mean((y_true - y_pred)²)
pub fn mse(y_true: &[f64], y_pred: &[f64]) -> Result<f64> {
    check_pair(y_true, y_pred)?;
    let n = y_true.len() as f64;
    Ok(y_true.iter().zip(y_pred.iter())
        .map(|(t, p)| (t - p).powi(2))
        .sum::<f64>() / n)
}

/// Mean absolute scaled error:
///   mean(|y_true - y_pred|) / mean(|y_true[1:] - y_true[:-1]|)
///
/// The denominator is the error of the naive lag-1 forecast. It is not
/// guarded: when it is zero (constant `y_true`, or a single sample) the
/// result is non-finite, `NaN` for 0/0 and `inf` otherwise.
pub fn mase(y_true: &[f64], y_pred: &[f64]) -> Result<f64> {
    let pred_mae = mae(y_true, y_pred)?;
    let naive_mae = naive_lag1_mae(y_true);
    Ok(pred_mae / naive_mae)
}

/// MAE of predicting each value with the previous one. `NaN` for fewer than
/// two values.
fn naive_lag1_mae(y: &[f64]) -> f64 {
    if y.len() < 2 {
        return f64::NAN;
    }
    let steps = (y.len() - 1) as f64;
    y.windows(2).map(|w| (w[1] - w[0]).abs()).sum::<f64>() / steps
}

/// One-row table of regression scores.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RegressionReport {
    pub mae: f64,
    pub mse: f64,
    pub mase: f64,
}

impl fmt::Display for RegressionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{:<8}{:>12}{:>12}{:>12}", "", "MAE", "MSE", "MASE")?;
        write!(f, "{:<8}{:>12.6}{:>12.6}{:>12.6}", "Score:", self.mae, self.mse, self.mase)
    }
}

/// Scores a regression forecast with MAE, MSE and MASE.
pub fn eval_preds(y_true: &[f64], y_pred: &[f64]) -> Result<RegressionReport> {
    Ok(RegressionReport {
        mae: mae(y_true, y_pred)?,
        mse: mse(y_true, y_pred)?,
        mase: mase(y_true, y_pred)?,
    })
}
