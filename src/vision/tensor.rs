//! Image loading and preprocessing for inference.
//!
//! Images are decoded (PNG/JPEG/BMP/GIF), forced to three channels, resized
//! to a square with bilinear filtering, and stored as `f32` pixel values in
//! the [0, 255] range with a leading batch dimension of one (NHWC layout).

use std::path::Path;

use image::imageops::FilterType;
use image::DynamicImage;

use crate::error::Result;

/// A batch of one RGB image, laid out as `[1, height, width, 3]`.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageTensor {
    height: usize,
    width: usize,
    data: Vec<f32>,
}

impl ImageTensor {
    /// Resizes `img` to `size × size` and converts it to a tensor.
    pub fn from_image(img: &DynamicImage, size: u32) -> ImageTensor {
        let rgb = DynamicImage::ImageRgb8(img.to_rgb8())
            .resize_exact(size, size, FilterType::Triangle)
            .to_rgb8();
        let data = rgb.pixels().flat_map(|p| p.0.iter().map(|&c| c as f32)).collect();
        ImageTensor { height: size as usize, width: size as usize, data }
    }

    /// `[batch, height, width, channels]`
    pub fn shape(&self) -> [usize; 4] {
        [1, self.height, self.width, 3]
    }

    /// Flat NHWC values.
    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    /// Value at row `y`, column `x`, channel `c` of the single image.
    pub fn get(&self, y: usize, x: usize, c: usize) -> Option<f32> {
        if y >= self.height || x >= self.width || c >= 3 {
            return None;
        }
        self.data.get((y * self.width + x) * 3 + c).copied()
    }

    /// Mean value of each RGB channel.
    pub fn channel_means(&self) -> [f64; 3] {
        let mut sums = [0.0f64; 3];
        for (i, v) in self.data.iter().enumerate() {
            sums[i % 3] += *v as f64;
        }
        let pixels = (self.data.len() / 3).max(1) as f64;
        sums.map(|s| s / pixels)
    }

    /// Copy with every value divided by 255, for models trained on [0, 1] input.
    pub fn normalized(&self) -> ImageTensor {
        ImageTensor {
            height: self.height,
            width: self.width,
            data: self.data.iter().map(|v| v / 255.0).collect(),
        }
    }
}

/// Decodes the image file at `path` without any preprocessing.
pub fn decode_image(path: impl AsRef<Path>) -> Result<DynamicImage> {
    let bytes = std::fs::read(path.as_ref())?;
    Ok(image::load_from_memory(&bytes)?)
}

/// Reads `path`, decodes it as a 3-channel image, resizes it to
/// `im_size × im_size`, and adds a batch dimension.
///
/// The result always has shape `[1, im_size, im_size, 3]`.
pub fn read_image(path: impl AsRef<Path>, im_size: u32) -> Result<ImageTensor> {
    let path = path.as_ref();
    let img = decode_image(path)?;
    log::debug!("read {:?} ({}x{}) -> {}x{}", path, img.width(), img.height(), im_size, im_size);
    Ok(ImageTensor::from_image(&img, im_size))
}
