use ferrite_kit::metrics::{
    accuracy, eval_preds, f1, mae, mase, metrics, mse, plot_confusion_matrix, precision, recall,
    Average,
};
use ferrite_kit::Error;

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

#[test]
fn perfect_forecast() {
    let y = [1.0, 2.0, 3.0, 4.0, 5.0];
    assert_eq!(mase(&y, &y).unwrap(), 0.0);

    let report = eval_preds(&y, &y).unwrap();
    assert_eq!((report.mae, report.mse, report.mase), (0.0, 0.0, 0.0));
}

#[test]
fn constant_series_has_no_finite_mase() {
    // The naive baseline makes no error, so the scale is zero.
    let value = mase(&[2.0, 2.0, 2.0, 2.0], &[1.0, 2.0, 3.0, 2.0]).unwrap();
    assert!(!value.is_finite());
}

#[test]
fn eval_preds_matches_individual_scores() {
    let t = [3.0, 5.0, 4.0, 8.0, 7.0];
    let p = [2.5, 5.5, 4.0, 7.0, 7.5];
    let report = eval_preds(&t, &p).unwrap();
    assert!(close(report.mae, mae(&t, &p).unwrap()));
    assert!(close(report.mse, mse(&t, &p).unwrap()));
    assert!(close(report.mase, mase(&t, &p).unwrap()));
    assert!(close(report.mae, 0.5));
    assert!(close(report.mse, 1.75 / 5.0));
}

#[test]
fn binary_report() {
    let y_test = [0, 1, 1, 0];
    let y_preds = [0, 1, 0, 0];
    let report = metrics(&y_test, &y_preds, false).unwrap();

    assert!(close(report.accuracy, 0.75));
    assert!(close(report.recall, recall(&y_test, &y_preds, Average::BINARY).unwrap()));
    assert!(close(report.precision, precision(&y_test, &y_preds, Average::BINARY).unwrap()));
    assert!(close(report.f1, f1(&y_test, &y_preds, Average::BINARY).unwrap()));
    assert!(close(report.recall, 0.5));
    assert!(close(report.precision, 1.0));
    assert!(close(report.f1, 2.0 / 3.0));
}

#[test]
fn multiclass_report_collapses_to_accuracy() {
    // Same predictions, relabelled onto three classes.
    let y_test = [0, 2, 1, 0];
    let y_preds = [0, 2, 0, 0];
    let report = metrics(&y_test, &y_preds, true).unwrap();

    assert!(close(report.accuracy, accuracy(&y_test, &y_preds).unwrap()));
    for score in [report.recall, report.precision, report.f1] {
        assert!(close(score, report.accuracy));
    }
}

#[test]
fn binary_scoring_of_three_classes_fails() {
    assert!(matches!(
        metrics(&[0, 2, 1, 0], &[0, 2, 0, 0], false),
        Err(Error::MulticlassTarget { classes: 3 })
    ));
}

#[test]
fn confusion_matrix_display() {
    let display = plot_confusion_matrix(&[0, 1, 1, 0], &[0, 1, 0, 0]).unwrap();
    assert_eq!(display.matrix.correct(), 3);
    assert!(display.figure.as_str().starts_with("<svg"));
}
