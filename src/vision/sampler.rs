use std::fs;
use std::path::{Path, PathBuf};

use rand::Rng;

use crate::error::{Error, Result};
use crate::plot::figure::{embedded_image, xml_escape, Figure};
use crate::vision::tensor::decode_image;

/// Default pixel size of one panel in `view_images`.
pub const DEFAULT_PANEL_SIZE: u32 = 200;

/// One randomly chosen image shown in the grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SampledImage {
    pub class_name: String,
    pub path: PathBuf,
}

/// The sampled images and the figure showing them.
#[derive(Debug, Clone)]
pub struct ImageGrid {
    pub samples: Vec<SampledImage>,
    pub figure: Figure,
}

/// Shows `rows × cols` random images from `folder`.
///
/// Each panel independently picks a random class from `class_names`, then a
/// random file inside `folder/<class>`. Pass a seeded RNG for a reproducible
/// grid.
pub fn view_images<R: Rng + ?Sized>(
    folder: impl AsRef<Path>,
    class_names: &[String],
    cols: usize,
    rows: usize,
    rng: &mut R,
) -> Result<ImageGrid> {
    view_images_sized(folder, class_names, cols, rows, DEFAULT_PANEL_SIZE, rng)
}

/// `view_images` with an explicit panel size in pixels.
pub fn view_images_sized<R: Rng + ?Sized>(
    folder: impl AsRef<Path>,
    class_names: &[String],
    cols: usize,
    rows: usize,
    panel_size: u32,
    rng: &mut R,
) -> Result<ImageGrid> {
    let folder = folder.as_ref();
    if class_names.is_empty() {
        return Err(Error::EmptyInput("no class names to sample from"));
    }
    if cols == 0 || rows == 0 {
        return Err(Error::EmptyInput("image grid needs at least one row and one column"));
    }

    let panel = panel_size as f64;
    let gap = 8.0f64;
    let caption = 18.0f64;

    let mut samples = Vec::with_capacity(cols * rows);
    let mut body = String::new();

    for r in 0..rows {
        for c in 0..cols {
            let class_name = &class_names[rng.gen_range(0..class_names.len())];
            let class_dir = folder.join(class_name);
            let files = list_files(&class_dir)?;
            if files.is_empty() {
                return Err(Error::EmptyInput("class directory contains no files"));
            }
            let path = files[rng.gen_range(0..files.len())].clone();
            let mut img = decode_image(&path)?;
            if img.width() > panel_size || img.height() > panel_size {
                img = img.thumbnail(panel_size, panel_size);
            }

            let x = gap + c as f64 * (panel + gap);
            let y = gap + r as f64 * (panel + caption + gap);
            body.push_str(&embedded_image(&img, x, y, panel, panel)?);
            body.push('\n');
            body.push_str(&format!(
                "<text x=\"{:.1}\" y=\"{:.1}\" text-anchor=\"middle\" fill=\"#333\" font-size=\"11\">{}</text>\n",
                x + panel / 2.0, y + panel + 13.0, xml_escape(class_name)
            ));

            log::debug!("panel ({}, {}): {:?}", r, c, path);
            samples.push(SampledImage { class_name: class_name.clone(), path });
        }
    }

    let width = gap + cols as f64 * (panel + gap);
    let height = gap + rows as f64 * (panel + caption + gap);
    Ok(ImageGrid {
        samples,
        figure: Figure::new(width.ceil() as u32, height.ceil() as u32, &body),
    })
}

/// Regular files directly inside `dir`, sorted so a seeded RNG picks the same ones.
fn list_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}
