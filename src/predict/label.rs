use std::path::Path;

use crate::error::{Error, Result};
use crate::plot::figure::{embedded_image, xml_escape, Figure};
use crate::vision::tensor::{decode_image, read_image, ImageTensor};

/// Anything that maps a preprocessed image to one score per class.
pub trait Classifier {
    fn predict(&self, input: &ImageTensor) -> Result<Vec<f32>>;
}

impl<F> Classifier for F
where
    F: Fn(&ImageTensor) -> Vec<f32>,
{
    fn predict(&self, input: &ImageTensor) -> Result<Vec<f32>> {
        Ok(self(input))
    }
}

/// Outcome of `predict_label`.
#[derive(Debug, Clone)]
pub struct Prediction {
    /// Index of the highest score.
    pub index: usize,
    /// `titles[index]`.
    pub title: String,
    /// Raw model output.
    pub scores: Vec<f32>,
    /// The original image titled with the predicted class.
    pub figure: Figure,
}

/// Index of the maximum element; the first one wins ties.
///
/// NaN compares greater than everything, so the first NaN is returned when
/// any score is NaN. `None` only for an empty slice.
pub fn argmax(v: &[f32]) -> Option<usize> {
    if let Some(i) = v.iter().position(|x| x.is_nan()) {
        return Some(i);
    }
    v.iter()
        .enumerate()
        .fold(None, |best: Option<(usize, f32)>, (i, &x)| match best {
            Some((_, b)) if x <= b => best,
            _ => Some((i, x)),
        })
        .map(|(i, _)| i)
}

/// Classifies the image at `path` and titles it with the predicted class.
///
/// # Arguments
/// - `path`    — image file to classify
/// - `model`   — classifier producing one score per class
/// - `titles`  — class names, indexed like the model output
/// - `im_size` — square size the image is resized to before inference
///
/// Fails with `Error::LabelOutOfRange` when the winning index has no title.
pub fn predict_label<M: Classifier + ?Sized>(
    path: impl AsRef<Path>,
    model: &M,
    titles: &[String],
    im_size: u32,
) -> Result<Prediction> {
    let path = path.as_ref();
    let input = read_image(path, im_size)?;
    let scores = model.predict(&input)?;

    let index = argmax(&scores).ok_or(Error::EmptyInput("model returned no scores"))?;
    let title = titles
        .get(index)
        .cloned()
        .ok_or(Error::LabelOutOfRange { index, len: titles.len() })?;

    log::info!("{:?} -> {} (class {}, score {:.4})", path, title, index, scores[index]);

    let figure = titled_image(path, &title)?;
    Ok(Prediction { index, title, scores, figure })
}

fn titled_image(path: &Path, title: &str) -> Result<Figure> {
    let img = decode_image(path)?;
    let max_side = 480.0f64;
    let scale = (max_side / img.width().max(img.height()).max(1) as f64).min(1.0);
    let w = (img.width() as f64 * scale).max(1.0);
    let h = (img.height() as f64 * scale).max(1.0);
    let top = 32.0f64;

    let body = format!(
        "<text x=\"{:.1}\" y=\"22\" text-anchor=\"middle\" fill=\"#333\" font-size=\"16\">{}</text>\n{}",
        w / 2.0,
        xml_escape(title),
        embedded_image(&img, 0.0, top, w, h)?
    );
    Ok(Figure::new(w.ceil() as u32, (h + top).ceil() as u32, &body))
}
