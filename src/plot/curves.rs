use serde::{Deserialize, Serialize};

use crate::callbacks::EpochStats;
use crate::error::{Error, Result};
use crate::plot::figure::{xml_escape, Figure};

/// Per-epoch metric sequences of one training run.
///
/// Deserializes directly from a Keras-style `history.history` JSON object
/// (`{"loss": [...], "val_loss": [...], "accuracy": [...], "val_accuracy": [...]}`).
/// Only `loss` is required; the other series may be empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct History {
    pub loss: Vec<f64>,
    #[serde(default)]
    pub val_loss: Vec<f64>,
    #[serde(default)]
    pub accuracy: Vec<f64>,
    #[serde(default)]
    pub val_accuracy: Vec<f64>,
}

impl History {
    /// Builds a history from epoch records.
    ///
    /// An optional series is kept only when every epoch carries a value for
    /// it; otherwise it is left empty so the series stay aligned.
    pub fn from_epochs(epochs: &[EpochStats]) -> History {
        fn all<F: Fn(&EpochStats) -> Option<f64>>(epochs: &[EpochStats], f: F) -> Vec<f64> {
            epochs.iter().map(f).collect::<Option<Vec<f64>>>().unwrap_or_default()
        }
        History {
            loss: epochs.iter().map(|e| e.train_loss).collect(),
            val_loss: all(epochs, |e| e.val_loss),
            accuracy: all(epochs, |e| e.train_accuracy),
            val_accuracy: all(epochs, |e| e.val_accuracy),
        }
    }

    pub fn epochs(&self) -> usize {
        self.loss.len()
    }

    fn check(&self) -> Result<()> {
        if self.loss.is_empty() {
            return Err(Error::EmptyInput("history has no loss values"));
        }
        for series in [&self.val_loss, &self.accuracy, &self.val_accuracy] {
            if !series.is_empty() && series.len() != self.loss.len() {
                return Err(Error::ShapeMismatch { left: self.loss.len(), right: series.len() });
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Public entry point
// ---------------------------------------------------------------------------

/// Renders accuracy and loss curves side by side.
///
/// Left panel: "Accuracy score:" with `accuracy` and `val_accuracy`.
/// Right panel: "Loss values:" with `loss` and `val_loss`.
/// The x axis is the 0-based epoch index. Empty optional series are omitted.
pub fn plot_metric_curves(history: &History) -> Result<Figure> {
    plot_metric_curves_sized(history, 1200, 600)
}

/// `plot_metric_curves` with an explicit figure size.
pub fn plot_metric_curves_sized(history: &History, width: u32, height: u32) -> Result<Figure> {
    history.check()?;

    let half = width as f64 / 2.0;
    let h = height as f64;

    let acc = line_panel(
        0.0, half, h,
        "Accuracy score:", "Epoch", "Score",
        &[
            Series { label: "accuracy", values: &history.accuracy, colour: RED, dashed: false },
            Series { label: "validation accuracy", values: &history.val_accuracy, colour: BLUE, dashed: true },
        ],
    );
    let loss = line_panel(
        half, half, h,
        "Loss values:", "Epoch", "Value",
        &[
            Series { label: "loss", values: &history.loss, colour: RED, dashed: false },
            Series { label: "val_loss", values: &history.val_loss, colour: BLUE, dashed: true },
        ],
    );

    log::debug!("plotted metric curves for {} epochs", history.epochs());
    Ok(Figure::new(width, height, &format!("{}\n{}", acc, loss)))
}

// ---------------------------------------------------------------------------
// Panel rendering
// ---------------------------------------------------------------------------

const RED: &str = "#dc2626";
const BLUE: &str = "#1e40af";
const GREY_GRID: &str = "#f0f2f5";
const GREY_TEXT: &str = "#999";
const DARK_TEXT: &str = "#333";

struct Series<'a> {
    label: &'a str,
    values: &'a [f64],
    colour: &'a str,
    dashed: bool,
}

#[allow(clippy::too_many_arguments)]
fn line_panel(
    x0: f64,
    w: f64,
    h: f64,
    title: &str,
    x_label: &str,
    y_label: &str,
    series: &[Series],
) -> String {
    let pad_l = 60.0f64;
    let pad_r = 16.0f64;
    let pad_t = 40.0f64;
    let pad_b = 44.0f64;

    let drawn: Vec<&Series> = series.iter().filter(|s| !s.values.is_empty()).collect();
    let n = drawn.iter().map(|s| s.values.len()).max().unwrap_or(0);

    let max_v = drawn.iter()
        .flat_map(|s| s.values.iter().cloned())
        .filter(|v| v.is_finite())
        .fold(0.0f64, f64::max);
    let max_y = if max_v > 0.0 { max_v * 1.05 } else { 1.0 };
    let min_y = 0.0f64;

    let px = |i: usize, v: f64| -> (f64, f64) {
        let frac = if n > 1 { i as f64 / (n - 1) as f64 } else { 0.5 };
        let x = x0 + pad_l + frac * (w - pad_l - pad_r);
        let y = pad_t + (max_y - v) / (max_y - min_y + 1e-12) * (h - pad_t - pad_b);
        (x, y)
    };

    // Y axis grid and labels.
    let y_grid: String = (0..=4).map(|g| {
        let frac = g as f64 / 4.0;
        let val = min_y + (max_y - min_y) * frac;
        let y = pad_t + (1.0 - frac) * (h - pad_t - pad_b);
        format!(
            "<text x=\"{:.1}\" y=\"{:.1}\" text-anchor=\"end\" fill=\"{}\" font-size=\"10\">{:.3}</text>\n\
             <line x1=\"{:.1}\" y1=\"{:.1}\" x2=\"{:.1}\" y2=\"{:.1}\" stroke=\"{}\" stroke-width=\"1\"/>",
            x0 + pad_l - 4.0, y + 4.0, GREY_TEXT, val,
            x0 + pad_l, y, x0 + w - pad_r, y, GREY_GRID
        )
    }).collect::<Vec<_>>().join("\n");

    // X axis labels at first, middle and last epoch.
    let mut ticks = vec![0, n / 2, n.saturating_sub(1)];
    ticks.dedup();
    let x_ticks: String = ticks.iter().map(|&i| {
        let (x, _) = px(i, 0.0);
        format!(
            "<text x=\"{:.1}\" y=\"{:.1}\" text-anchor=\"middle\" fill=\"{}\" font-size=\"10\">{}</text>",
            x, h - pad_b + 14.0, GREY_TEXT, i
        )
    }).collect::<Vec<_>>().join("\n");

    let paths: String = drawn.iter().map(|s| {
        let d: String = s.values.iter().enumerate().map(|(i, &v)| {
            let (x, y) = px(i, v);
            if i == 0 { format!("M{:.1},{:.1}", x, y) } else { format!(" L{:.1},{:.1}", x, y) }
        }).collect();
        let dash = if s.dashed { " stroke-dasharray=\"5,4\"" } else { "" };
        format!(
            "<path d=\"{}\" stroke=\"{}\" stroke-width=\"2\" fill=\"none\"{}/>",
            d, s.colour, dash
        )
    }).collect::<Vec<_>>().join("\n");

    let legend: String = drawn.iter().enumerate().map(|(k, s)| {
        let ly = pad_t + 12.0 + k as f64 * 16.0;
        let lx = x0 + w - pad_r - 150.0;
        let dash = if s.dashed { " stroke-dasharray=\"4,3\"" } else { "" };
        format!(
            "<line x1=\"{:.1}\" y1=\"{:.1}\" x2=\"{:.1}\" y2=\"{:.1}\" stroke=\"{}\" stroke-width=\"2\"{}/>\n\
             <text x=\"{:.1}\" y=\"{:.1}\" fill=\"{}\" font-size=\"11\">{}</text>",
            lx, ly - 4.0, lx + 18.0, ly - 4.0, s.colour, dash,
            lx + 22.0, ly, DARK_TEXT, xml_escape(s.label)
        )
    }).collect::<Vec<_>>().join("\n");

    let mid_x = x0 + pad_l + (w - pad_l - pad_r) / 2.0;
    let mid_y = pad_t + (h - pad_t - pad_b) / 2.0;
    format!(
        "<g class=\"panel\">\n\
         <text x=\"{mid_x:.1}\" y=\"24\" text-anchor=\"middle\" fill=\"{dark}\" font-size=\"14\">{title}</text>\n\
         {y_grid}\n{x_ticks}\n{paths}\n{legend}\n\
         <text x=\"{mid_x:.1}\" y=\"{xl_y:.1}\" text-anchor=\"middle\" fill=\"{dark}\" font-size=\"11\">{x_label}</text>\n\
         <text x=\"{yl_x:.1}\" y=\"{mid_y:.1}\" text-anchor=\"middle\" fill=\"{dark}\" font-size=\"11\" \
         transform=\"rotate(-90 {yl_x:.1} {mid_y:.1})\">{y_label}</text>\n\
         </g>",
        mid_x = mid_x,
        mid_y = mid_y,
        dark = DARK_TEXT,
        title = xml_escape(title),
        y_grid = y_grid,
        x_ticks = x_ticks,
        paths = paths,
        legend = legend,
        xl_y = h - 8.0,
        x_label = xml_escape(x_label),
        yl_x = x0 + 14.0,
        y_label = xml_escape(y_label),
    )
}
