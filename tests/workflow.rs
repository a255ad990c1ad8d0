//! End-to-end run over a small on-disk dataset: unpack, inspect, sample,
//! classify, log and plot.

use std::fs::File;
use std::path::{Path, PathBuf};

use ferrite_kit::callbacks::{log_dir_at, TensorBoardCallback};
use ferrite_kit::{
    extract_data_to, list_class_dirs, list_classes, parse_data, plot_metric_curves,
    predict_label, read_image, view_images, EpochStats, ImageTensor, TrainingCallback,
};
use flate2::write::GzEncoder;
use flate2::Compression;
use image::{Rgb, RgbImage};
use pretty_assertions::assert_eq;
use rand::rngs::StdRng;
use rand::SeedableRng;

struct Scratch(PathBuf);

impl Scratch {
    fn new(tag: &str) -> Scratch {
        let path = std::env::temp_dir().join(format!("ferrite_kit_it_{}_{}", tag, std::process::id()));
        let _ = std::fs::remove_dir_all(&path);
        std::fs::create_dir_all(&path).unwrap();
        Scratch(path)
    }

    fn path(&self) -> &Path {
        &self.0
    }
}

impl Drop for Scratch {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.0);
    }
}

/// Packs `pets/{red,blue}/{0,1}.png` plus a stray `pets/README` into a .tar.gz.
fn build_archive(dir: &Path) -> PathBuf {
    let src = dir.join("src");
    for (class, colour) in [("red", [220, 10, 10]), ("blue", [10, 10, 220])] {
        std::fs::create_dir_all(src.join("pets").join(class)).unwrap();
        for i in 0..2 {
            RgbImage::from_pixel(16 + i * 8, 12, Rgb(colour))
                .save(src.join(format!("pets/{}/{}.png", class, i)))
                .unwrap();
        }
    }
    std::fs::write(src.join("pets/README"), "two colours").unwrap();

    let archive = dir.join("pets.tar.gz");
    let encoder = GzEncoder::new(File::create(&archive).unwrap(), Compression::default());
    let mut builder = tar::Builder::new(encoder);
    builder.append_dir_all("pets", src.join("pets")).unwrap();
    builder.into_inner().unwrap().finish().unwrap();
    archive
}

fn red_vs_blue(input: &ImageTensor) -> Vec<f32> {
    let px = input.as_slice();
    let red: f32 = px.iter().step_by(3).sum();
    let blue: f32 = px.iter().skip(2).step_by(3).sum();
    vec![blue, red]
}

#[test]
fn dataset_round_trip() {
    let scratch = Scratch::new("dataset");
    let archive = build_archive(scratch.path());

    let out = scratch.path().join("unpacked");
    assert!(extract_data_to(&archive, &out).unwrap() >= 6);
    let root = out.join("pets");

    assert_eq!(list_classes(&root).unwrap(), vec!["README", "blue", "red"]);
    let classes = list_class_dirs(&root).unwrap();
    assert_eq!(classes, vec!["blue", "red"]);

    let summaries = parse_data(&root).unwrap();
    assert_eq!(summaries.len(), 3);
    assert_eq!((summaries[0].files, summaries[0].dirs), (1, 2));
    assert_eq!((summaries[1].files, summaries[1].dirs), (2, 0));

    let grid = view_images(&root, &classes, 3, 2, &mut StdRng::seed_from_u64(3)).unwrap();
    assert_eq!(grid.samples.len(), 6);
    assert!(grid.samples.iter().all(|s| classes.contains(&s.class_name)));

    let titles = vec!["blue".to_string(), "red".to_string()];
    for class in &classes {
        let path = root.join(class).join("1.png");
        assert_eq!(read_image(&path, 224).unwrap().shape(), [1, 224, 224, 3]);
        let pred = predict_label(&path, &red_vs_blue, &titles, 32).unwrap();
        assert_eq!(&pred.title, class);
    }
}

#[test]
fn logged_run_plots() {
    let scratch = Scratch::new("run");
    let at = chrono::NaiveDate::from_ymd_opt(2025, 1, 31).unwrap().and_hms_opt(23, 5, 0).unwrap();
    let log_dir = log_dir_at(&scratch.path().to_string_lossy(), "baseline", at);
    assert!(log_dir.ends_with("baseline/20250131_23"));

    let mut callback = TensorBoardCallback::new(&log_dir);
    let losses = [(0.9, 1.0, 0.55, 0.5), (0.5, 0.7, 0.75, 0.7), (0.3, 0.6, 0.9, 0.8)];
    for (i, &(loss, val_loss, acc, val_acc)) in losses.iter().enumerate() {
        let stats = EpochStats::new(i + 1, losses.len(), loss)
            .with_accuracy(acc)
            .with_validation(val_loss, Some(val_acc))
            .with_elapsed_ms(10);
        callback.on_epoch_end(&stats).unwrap();
    }
    callback.on_train_end().unwrap();

    let history = callback.read_history().unwrap();
    assert_eq!(history.epochs(), 3);
    assert_eq!(history.val_loss, vec![1.0, 0.7, 0.6]);

    let figure = plot_metric_curves(&history).unwrap();
    let out = log_dir.join("curves.svg");
    figure.save(&out).unwrap();
    assert!(std::fs::read_to_string(out).unwrap().contains("Loss values:"));
}
