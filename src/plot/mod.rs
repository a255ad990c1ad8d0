pub mod figure;
pub mod curves;

pub use figure::Figure;
pub use curves::{plot_metric_curves, plot_metric_curves_sized, History};
