//! Command line front-end for the ferrite-kit helpers.

use anyhow::{anyhow, Context};
use ferrite_kit::{
    callbacks::TrainingCallback,
    data, metrics, plot, vision, KitConfig,
};
use pico_args::Arguments;
use rand::rngs::StdRng;
use rand::SeedableRng;

const HELP: &str = "\
Usage: ferrite-kit [--config FILE] COMMAND [ARGS]

Commands:
  extract ARCHIVE [-o DEST]           Unpack a .tar / .tar.gz / .tgz / .zip archive
  walk FOLDER                         Count files and directories under FOLDER
  classes FOLDER [--dirs-only]        List the class names inside FOLDER
  sample FOLDER [-c COLS] [-r ROWS] [--seed N] [-o OUT.svg]
                                      Grid of random images, one class folder per panel
  curves HISTORY.json [-o OUT.svg]    Plot accuracy and loss curves of a run
  metrics Y_TRUE Y_PRED [--multiclass] [-o OUT.svg]
                                      Classification scores and confusion matrix;
                                      labels are comma-separated integers
  regress Y_TRUE Y_PRED               MAE / MSE / MASE of a forecast
  tensor IMAGE [-s SIZE]              Shape and channel means of the model input
  logdir EXPERIMENT [-d DIR]          Print the log directory a new run would use

Options:
  -h, --help                          Print help
  --config FILE                       JSON file overriding the defaults
";

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut pargs = Arguments::from_env();
    if pargs.contains(["-h", "--help"]) {
        print!("{}", HELP);
        return Ok(());
    }

    let config = match pargs.opt_value_from_str::<_, String>("--config")? {
        Some(path) => KitConfig::load_json(&path)
            .with_context(|| format!("failed to load config from {}", path))?,
        None => KitConfig::default(),
    };

    let command: String = match pargs.subcommand()? {
        Some(c) => c,
        None => {
            print!("{}", HELP);
            return Ok(());
        }
    };

    match command.as_str() {
        "extract" => {
            let dest: Option<String> = pargs.opt_value_from_str(["-o", "--out"])?;
            let archive: String = required(&mut pargs, "ARCHIVE")?;
            let n = match dest {
                Some(dest) => data::extract_data_to(&archive, &dest)?,
                None => data::extract_data(&archive)?,
            };
            println!("extracted {} entries", n);
        }
        "walk" => {
            let folder: String = required(&mut pargs, "FOLDER")?;
            data::parse_data(&folder)?;
        }
        "classes" => {
            let dirs_only = pargs.contains("--dirs-only");
            let folder: String = required(&mut pargs, "FOLDER")?;
            if dirs_only {
                println!("{:?}", data::list_class_dirs(&folder)?);
            } else {
                data::list_classes(&folder)?;
            }
        }
        "sample" => {
            let cols = pargs.opt_value_from_str(["-c", "--cols"])?.unwrap_or(config.grid_cols);
            let rows = pargs.opt_value_from_str(["-r", "--rows"])?.unwrap_or(config.grid_rows);
            let seed: Option<u64> = pargs.opt_value_from_str("--seed")?;
            let out: String = pargs.opt_value_from_str(["-o", "--out"])?.unwrap_or_else(|| "samples.svg".into());
            let folder: String = required(&mut pargs, "FOLDER")?;

            let classes = data::list_class_dirs(&folder)?;
            let mut rng = match seed {
                Some(seed) => StdRng::seed_from_u64(seed),
                None => StdRng::from_entropy(),
            };
            let grid = vision::view_images_sized(&folder, &classes, cols, rows, config.panel_size, &mut rng)?;
            for s in &grid.samples {
                println!("{}\t{}", s.class_name, s.path.display());
            }
            grid.figure.save(&out)?;
        }
        "curves" => {
            let out: String = pargs.opt_value_from_str(["-o", "--out"])?.unwrap_or_else(|| "curves.svg".into());
            let path: String = required(&mut pargs, "HISTORY.json")?;
            let file = std::fs::File::open(&path).with_context(|| format!("cannot open {}", path))?;
            let history: plot::History = serde_json::from_reader(std::io::BufReader::new(file))?;
            plot::plot_metric_curves_sized(&history, config.figure_width, config.figure_height)?.save(&out)?;
        }
        "metrics" => {
            let multiclass = pargs.contains("--multiclass");
            let out: Option<String> = pargs.opt_value_from_str(["-o", "--out"])?;
            let y_true = parse_labels::<i64>(&required::<String>(&mut pargs, "Y_TRUE")?)?;
            let y_pred = parse_labels::<i64>(&required::<String>(&mut pargs, "Y_PRED")?)?;

            println!("{}", metrics::metrics(&y_true, &y_pred, multiclass)?);
            let display = metrics::plot_confusion_matrix(&y_true, &y_pred)?;
            println!("\n{}", display.matrix);
            if let Some(out) = out {
                display.figure.save(&out)?;
            }
        }
        "regress" => {
            let y_true = parse_labels::<f64>(&required::<String>(&mut pargs, "Y_TRUE")?)?;
            let y_pred = parse_labels::<f64>(&required::<String>(&mut pargs, "Y_PRED")?)?;
            println!("{}", metrics::eval_preds(&y_true, &y_pred)?);
        }
        "tensor" => {
            let size = pargs.opt_value_from_str(["-s", "--size"])?.unwrap_or(config.image_size);
            let path: String = required(&mut pargs, "IMAGE")?;
            let tensor = vision::read_image(&path, size)?;
            let [r, g, b] = tensor.channel_means();
            println!("shape {:?}", tensor.shape());
            println!("mean R {:.2}  G {:.2}  B {:.2}", r, g, b);
        }
        "logdir" => {
            let dir: String = pargs.opt_value_from_str(["-d", "--dir"])?.unwrap_or_else(|| config.log_root.clone());
            let experiment: String = required(&mut pargs, "EXPERIMENT")?;
            let mut callback = ferrite_kit::save_tensorboard_model(&dir, &experiment);
            println!("{}", callback.log_dir().display());
            callback.on_train_end()?;
        }
        other => return Err(anyhow!("unknown command: {}\n\n{}", other, HELP)),
    }

    let rest = pargs.finish();
    if !rest.is_empty() {
        log::warn!("ignored extra arguments: {:?}", rest);
    }
    Ok(())
}

fn required<T>(pargs: &mut Arguments, name: &str) -> anyhow::Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    pargs.free_from_str().map_err(|e| match e {
        pico_args::Error::MissingArgument => anyhow!("Missing required argument: {}", name),
        _ => anyhow!("{}", e),
    })
}

fn parse_labels<T>(raw: &str) -> anyhow::Result<Vec<T>>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| s.parse::<T>().with_context(|| format!("invalid value {:?}", s)))
        .collect()
}
