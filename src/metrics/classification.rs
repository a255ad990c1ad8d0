use std::collections::BTreeSet;
use std::fmt;

use serde::{Serialize, Deserialize};

use crate::error::{ensure_same_len, Error, Result};

/// How per-class counts are combined into one precision / recall / F1 score.
///
/// - `Binary` — score only `pos_label`; fails for more than two distinct labels.
/// - `Micro`  — sum true/false positives and negatives over all classes first.
/// - `Macro`  — unweighted mean of the per-class scores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Average {
    Binary { pos_label: i64 },
    Micro,
    Macro,
}

impl Average {
    /// Binary averaging with positive label `1`.
    pub const BINARY: Average = Average::Binary { pos_label: 1 };
}

impl Default for Average {
    fn default() -> Self {
        Average::BINARY
    }
}

// ---------------------------------------------------------------------------
// Counting
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Counts {
    tp: usize,
    fp: usize,
    fn_: usize,
}

impl Counts {
    fn for_label(y_true: &[i64], y_pred: &[i64], label: i64) -> Counts {
        let mut c = Counts::default();
        for (&t, &p) in y_true.iter().zip(y_pred.iter()) {
            match (t == label, p == label) {
                (true, true) => c.tp += 1,
                (false, true) => c.fp += 1,
                (true, false) => c.fn_ += 1,
                (false, false) => {}
            }
        }
        c
    }

    fn precision(&self) -> f64 {
        ratio(self.tp, self.tp + self.fp)
    }

    fn recall(&self) -> f64 {
        ratio(self.tp, self.tp + self.fn_)
    }

    fn f1(&self) -> f64 {
        // 2·tp / (2·tp + fp + fn) equals the harmonic mean of precision and recall.
        ratio(2 * self.tp, 2 * self.tp + self.fp + self.fn_)
    }
}

/// `num / den`, or 0.0 when `den` is zero.
fn ratio(num: usize, den: usize) -> f64 {
    if den == 0 { 0.0 } else { num as f64 / den as f64 }
}

fn check_labels(y_true: &[i64], y_pred: &[i64]) -> Result<()> {
    ensure_same_len(y_true, y_pred)?;
    if y_true.is_empty() {
        return Err(Error::EmptyInput("classification metrics need at least one sample"));
    }
    Ok(())
}

/// Sorted union of the labels present in either sequence.
pub fn unique_labels(y_true: &[i64], y_pred: &[i64]) -> Vec<i64> {
    y_true.iter().chain(y_pred.iter()).copied().collect::<BTreeSet<_>>().into_iter().collect()
}

/// Per-class counts selected by `average`, validated for binary targets.
fn counts_for(y_true: &[i64], y_pred: &[i64], average: Average) -> Result<Vec<Counts>> {
    check_labels(y_true, y_pred)?;
    let labels = unique_labels(y_true, y_pred);
    match average {
        Average::Binary { pos_label } => {
            if labels.len() > 2 {
                return Err(Error::MulticlassTarget { classes: labels.len() });
            }
            if labels.len() == 2 && !labels.contains(&pos_label) {
                return Err(Error::PosLabelMissing { pos_label });
            }
            Ok(vec![Counts::for_label(y_true, y_pred, pos_label)])
        }
        Average::Micro | Average::Macro => Ok(labels
            .iter()
            .map(|&l| Counts::for_label(y_true, y_pred, l))
            .collect()),
    }
}

fn combine(counts: &[Counts], average: Average, score: fn(&Counts) -> f64) -> f64 {
    match average {
        Average::Binary { .. } => counts.first().map(score).unwrap_or(0.0),
        Average::Micro => {
            let total = counts.iter().fold(Counts::default(), |acc, c| Counts {
                tp: acc.tp + c.tp,
                fp: acc.fp + c.fp,
                fn_: acc.fn_ + c.fn_,
            });
            score(&total)
        }
        Average::Macro => {
            if counts.is_empty() {
                return 0.0;
            }
            counts.iter().map(score).sum::<f64>() / counts.len() as f64
        }
    }
}

// ---------------------------------------------------------------------------
// Public scores
// ---------------------------------------------------------------------------

/// Fraction of positions where the prediction equals the true label.
pub fn accuracy(y_true: &[i64], y_pred: &[i64]) -> Result<f64> {
    check_labels(y_true, y_pred)?;
    let correct = y_true.iter().zip(y_pred.iter()).filter(|(t, p)| t == p).count();
    Ok(correct as f64 / y_true.len() as f64)
}

/// tp / (tp + fp), combined according to `average`. 0.0 when undefined.
pub fn precision(y_true: &[i64], y_pred: &[i64], average: Average) -> Result<f64> {
    let counts = counts_for(y_true, y_pred, average)?;
    Ok(combine(&counts, average, Counts::precision))
}

/// tp / (tp + fn), combined according to `average`. 0.0 when undefined.
pub fn recall(y_true: &[i64], y_pred: &[i64], average: Average) -> Result<f64> {
    let counts = counts_for(y_true, y_pred, average)?;
    Ok(combine(&counts, average, Counts::recall))
}

/// Harmonic mean of precision and recall, combined according to `average`.
pub fn f1(y_true: &[i64], y_pred: &[i64], average: Average) -> Result<f64> {
    let counts = counts_for(y_true, y_pred, average)?;
    Ok(combine(&counts, average, Counts::f1))
}

// ---------------------------------------------------------------------------
// Report
// ---------------------------------------------------------------------------

/// One-row table of classification scores.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClassificationReport {
    pub accuracy: f64,
    pub recall: f64,
    pub precision: f64,
    pub f1: f64,
}

impl fmt::Display for ClassificationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{:<8}{:>10}{:>10}{:>10}{:>10}", "", "Accuracy", "Recall", "Precision", "F1 Score")?;
        write!(
            f,
            "{:<8}{:>10.6}{:>10.6}{:>10.6}{:>10.6}",
            "Score:", self.accuracy, self.recall, self.precision, self.f1
        )
    }
}

/// Accuracy, recall, precision and F1 of a set of predictions.
///
/// # Arguments
/// - `y_test`     — true labels
/// - `y_preds`    — predicted labels, same length as `y_test`
/// - `multiclass` — micro-average the scores; otherwise score the positive
///                  label `1` of a binary problem
///
/// Binary scoring of labels with more than two classes fails with
/// `Error::MulticlassTarget`.
pub fn metrics(y_test: &[i64], y_preds: &[i64], multiclass: bool) -> Result<ClassificationReport> {
    let average = if multiclass { Average::Micro } else { Average::BINARY };
    let counts = counts_for(y_test, y_preds, average)?;
    Ok(ClassificationReport {
        accuracy: accuracy(y_test, y_preds)?,
        recall: combine(&counts, average, Counts::recall),
        precision: combine(&counts, average, Counts::precision),
        f1: combine(&counts, average, Counts::f1),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-12;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < EPS
    }

    #[test]
    fn binary_scores_match_direct_formulae() {
        let y_test = [0, 1, 1, 0];
        let y_preds = [0, 1, 0, 0];
        // tp = 1, fp = 0, fn = 1
        let report = metrics(&y_test, &y_preds, false).unwrap();
        assert!(close(report.accuracy, 0.75));
        assert!(close(report.precision, 1.0));
        assert!(close(report.recall, 0.5));
        assert!(close(report.f1, 2.0 * 1.0 * 0.5 / (1.0 + 0.5)));
    }

    #[test]
    fn micro_average_equals_accuracy_for_single_label() {
        let y_test = [0, 1, 2, 2, 1, 0, 2];
        let y_preds = [0, 2, 2, 1, 1, 0, 0];
        let report = metrics(&y_test, &y_preds, true).unwrap();
        assert!(close(report.accuracy, 4.0 / 7.0));
        assert!(close(report.precision, report.accuracy));
        assert!(close(report.recall, report.accuracy));
        assert!(close(report.f1, report.accuracy));
    }

    #[test]
    fn binary_average_rejects_multiclass_labels() {
        let err = metrics(&[0, 1, 2], &[0, 1, 1], false).unwrap_err();
        assert!(matches!(err, Error::MulticlassTarget { classes: 3 }));
    }

    #[test]
    fn binary_average_needs_the_positive_label() {
        let err = precision(&[2, 3], &[2, 2], Average::BINARY).unwrap_err();
        assert!(matches!(err, Error::PosLabelMissing { pos_label: 1 }));
        assert!(close(precision(&[2, 3], &[2, 2], Average::Binary { pos_label: 2 }).unwrap(), 0.5));
    }

    #[test]
    fn undefined_ratios_are_zero() {
        // No positive predictions: precision is 0/0.
        assert_eq!(precision(&[0, 1], &[0, 0], Average::BINARY).unwrap(), 0.0);
        assert_eq!(f1(&[0, 0], &[0, 0], Average::BINARY).unwrap(), 0.0);
    }

    #[test]
    fn macro_average_is_mean_of_classes() {
        let y_true = [0, 0, 1, 2];
        let y_pred = [0, 1, 1, 2];
        // recall per class: 0 -> 1/2, 1 -> 1/1, 2 -> 1/1
        assert!(close(recall(&y_true, &y_pred, Average::Macro).unwrap(), (0.5 + 1.0 + 1.0) / 3.0));
        // precision per class: 0 -> 1/1, 1 -> 1/2, 2 -> 1/1
        assert!(close(precision(&y_true, &y_pred, Average::Macro).unwrap(), (1.0 + 0.5 + 1.0) / 3.0));
    }

    #[test]
    fn mismatched_lengths_fail() {
        assert!(matches!(accuracy(&[1, 0], &[1]), Err(Error::ShapeMismatch { .. })));
        assert!(matches!(metrics(&[], &[], true), Err(Error::EmptyInput(_))));
    }

    #[test]
    fn unique_labels_are_sorted() {
        assert_eq!(unique_labels(&[3, 1, 3], &[2, 1, 5]), vec![1, 2, 3, 5]);
    }

    #[test]
    fn report_table_has_score_row() {
        let report = ClassificationReport { accuracy: 0.75, recall: 0.5, precision: 1.0, f1: 0.666667 };
        let text = report.to_string();
        assert!(text.lines().next().unwrap().contains("F1 Score"));
        assert!(text.lines().nth(1).unwrap().starts_with("Score:"));
    }
}
