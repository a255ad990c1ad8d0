use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Default side length (pixels) that `read_image` resizes to.
pub const DEFAULT_IMAGE_SIZE: u32 = 224;

/// Defaults shared by the helpers and the command-line tool.
///
/// Fields:
/// - `image_size`    — square size images are resized to before inference
/// - `grid_cols`     — panels per row in `view_images`
/// - `grid_rows`     — rows of panels in `view_images`
/// - `panel_size`    — pixel size of one `view_images` panel
/// - `figure_width`  — width of the training-curve figure
/// - `figure_height` — height of the training-curve figure
/// - `log_root`      — parent directory for experiment logs
///
/// Missing fields fall back to `Default`, so a partial JSON file is valid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KitConfig {
    pub image_size: u32,
    pub grid_cols: usize,
    pub grid_rows: usize,
    pub panel_size: u32,
    pub figure_width: u32,
    pub figure_height: u32,
    pub log_root: String,
}

impl Default for KitConfig {
    fn default() -> Self {
        KitConfig {
            image_size: DEFAULT_IMAGE_SIZE,
            grid_cols: 4,
            grid_rows: 1,
            panel_size: 200,
            figure_width: 1200,
            figure_height: 600,
            log_root: "logs".into(),
        }
    }
}

impl KitConfig {
    /// Serializes the config to a pretty-printed JSON file.
    pub fn save_json(&self, path: &str) -> Result<()> {
        let file = std::fs::File::create(path)?;
        let writer = std::io::BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    /// Deserializes a config from a JSON file written by `save_json` (or by hand).
    pub fn load_json(path: &str) -> Result<KitConfig> {
        let file = std::fs::File::open(path)?;
        let reader = std::io::BufReader::new(file);
        Ok(serde_json::from_reader(reader)?)
    }
}
