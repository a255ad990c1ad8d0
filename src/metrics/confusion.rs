use std::fmt;

use serde::{Serialize, Deserialize};

use crate::error::{ensure_same_len, Error, Result};
use crate::metrics::classification::unique_labels;
use crate::plot::figure::{xml_escape, Figure};

/// Counts of (true label, predicted label) pairs.
///
/// `labels` is the sorted union of labels seen in either sequence;
/// `counts[i][j]` is the number of samples with true label `labels[i]` that
/// were predicted as `labels[j]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfusionMatrix {
    pub labels: Vec<i64>,
    pub counts: Vec<Vec<usize>>,
}

impl ConfusionMatrix {
    pub fn from_predictions(y_true: &[i64], y_pred: &[i64]) -> Result<ConfusionMatrix> {
        ensure_same_len(y_true, y_pred)?;
        if y_true.is_empty() {
            return Err(Error::EmptyInput("confusion matrix needs at least one sample"));
        }

        let labels = unique_labels(y_true, y_pred);
        let n = labels.len();
        let mut counts = vec![vec![0usize; n]; n];

        let index = |l: i64| labels.binary_search(&l).unwrap_or(0);
        for (&t, &p) in y_true.iter().zip(y_pred.iter()) {
            counts[index(t)][index(p)] += 1;
        }
        Ok(ConfusionMatrix { labels, counts })
    }

    pub fn n_classes(&self) -> usize {
        self.labels.len()
    }

    pub fn total(&self) -> usize {
        self.counts.iter().flatten().sum()
    }

    /// Sum of the diagonal: correctly classified samples.
    pub fn correct(&self) -> usize {
        (0..self.n_classes()).map(|i| self.counts[i][i]).sum()
    }

    /// Renders the matrix as a heat map.
    ///
    /// Rows are true labels, columns predicted labels; cell shade scales
    /// with the count relative to the largest cell.
    pub fn to_figure(&self) -> Figure {
        let n = self.n_classes();
        let cell = 56.0f64;
        let pad_l = 90.0f64;
        let pad_t = 60.0f64;
        let w = pad_l + cell * n as f64 + 20.0;
        let h = pad_t + cell * n as f64 + 50.0;

        let max = self.counts.iter().flatten().copied().max().unwrap_or(0).max(1);

        let mut body = String::new();
        for (r, row) in self.counts.iter().enumerate() {
            for (c, &v) in row.iter().enumerate() {
                let x = pad_l + c as f64 * cell;
                let y = pad_t + r as f64 * cell;
                let alpha = v as f64 / max as f64;
                let text_fill = if alpha > 0.5 { "#fff" } else { "#333" };
                body.push_str(&format!(
                    "<rect class=\"cell\" x=\"{:.1}\" y=\"{:.1}\" width=\"{:.1}\" height=\"{:.1}\" \
                     fill=\"rgba(30,64,175,{:.2})\" stroke=\"#ddd\"/>\n\
                     <text x=\"{:.1}\" y=\"{:.1}\" text-anchor=\"middle\" fill=\"{}\" font-size=\"12\">{}</text>\n",
                    x, y, cell, cell, alpha,
                    x + cell / 2.0, y + cell / 2.0 + 4.0, text_fill, v
                ));
            }
        }

        for (i, label) in self.labels.iter().enumerate() {
            let centre = i as f64 * cell + cell / 2.0;
            body.push_str(&format!(
                "<text x=\"{:.1}\" y=\"{:.1}\" text-anchor=\"middle\" fill=\"#333\" font-size=\"11\">{}</text>\n\
                 <text x=\"{:.1}\" y=\"{:.1}\" text-anchor=\"end\" fill=\"#333\" font-size=\"11\">{}</text>\n",
                pad_l + centre, pad_t + cell * n as f64 + 16.0, label,
                pad_l - 8.0, pad_t + centre + 4.0, label
            ));
        }

        body.push_str(&format!(
            "<text x=\"{:.1}\" y=\"{:.1}\" text-anchor=\"middle\" fill=\"#333\" font-size=\"12\">{}</text>\n\
             <text x=\"16\" y=\"{:.1}\" fill=\"#333\" font-size=\"12\">{}</text>\n\
             <text x=\"{:.1}\" y=\"24\" text-anchor=\"middle\" fill=\"#333\" font-size=\"14\">{}</text>",
            pad_l + cell * n as f64 / 2.0, h - 12.0, xml_escape("Predicted label"),
            pad_t - 10.0, xml_escape("True label"),
            w / 2.0, xml_escape("Confusion matrix"),
        ));

        Figure::new(w.ceil() as u32, h.ceil() as u32, &body)
    }
}

const CORNER: &str = "T\\P";

// Text table; rows = true label, columns = predicted label.
impl fmt::Display for ConfusionMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = self.counts.iter().flatten()
            .map(|v| v.to_string().len())
            .chain(self.labels.iter().map(|l| l.to_string().len()))
            .max()
            .unwrap_or(1)
            .max(CORNER.len())
            + 2;

        write!(f, "{:>w$}", CORNER, w = width)?;
        for label in &self.labels {
            write!(f, "{:>w$}", label, w = width)?;
        }
        for (label, row) in self.labels.iter().zip(self.counts.iter()) {
            writeln!(f)?;
            write!(f, "{:>w$}", label, w = width)?;
            for v in row {
                write!(f, "{:>w$}", v, w = width)?;
            }
        }
        Ok(())
    }
}

/// A confusion matrix together with its rendered figure.
#[derive(Debug, Clone)]
pub struct ConfusionMatrixDisplay {
    pub matrix: ConfusionMatrix,
    pub figure: Figure,
}

/// Builds the confusion matrix of `y_test` against `y_preds` and renders it.
pub fn plot_confusion_matrix(y_test: &[i64], y_preds: &[i64]) -> Result<ConfusionMatrixDisplay> {
    let matrix = ConfusionMatrix::from_predictions(y_test, y_preds)?;
    let figure = matrix.to_figure();
    Ok(ConfusionMatrixDisplay { matrix, figure })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn counts_true_against_predicted() {
        let cm = ConfusionMatrix::from_predictions(&[0, 1, 1, 0, 2], &[0, 1, 0, 0, 1]).unwrap();
        assert_eq!(cm.labels, vec![0, 1, 2]);
        assert_eq!(cm.counts, vec![
            vec![2, 0, 0],
            vec![1, 1, 0],
            vec![0, 1, 0],
        ]);
        assert_eq!(cm.total(), 5);
        assert_eq!(cm.correct(), 3);
    }

    #[test]
    fn labels_seen_only_in_predictions_get_a_column() {
        let cm = ConfusionMatrix::from_predictions(&[1, 1], &[1, 7]).unwrap();
        assert_eq!(cm.labels, vec![1, 7]);
        assert_eq!(cm.counts, vec![vec![1, 1], vec![0, 0]]);
    }

    #[test]
    fn text_table() {
        let cm = ConfusionMatrix::from_predictions(&[0, 1, 1], &[0, 1, 0]).unwrap();
        let expected = "  T\\P    0    1\n    0    1    0\n    1    1    1";
        assert_eq!(cm.to_string(), expected);
    }

    #[test]
    fn display_object_carries_figure() {
        let display = plot_confusion_matrix(&[0, 1, 1, 0], &[0, 1, 0, 0]).unwrap();
        let svg = display.figure.as_str();
        assert_eq!(svg.matches("<rect class=\"cell\"").count(), 4);
        assert!(svg.contains("Predicted label"));
        assert!(svg.contains("True label"));
        assert_eq!(display.matrix.counts, vec![vec![2, 0], vec![1, 1]]);
    }

    #[test]
    fn mismatched_inputs_fail() {
        assert!(matches!(plot_confusion_matrix(&[0, 1], &[0]), Err(Error::ShapeMismatch { .. })));
    }
}
