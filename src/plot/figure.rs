use std::io::Cursor;
use std::path::Path;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use image::{DynamicImage, ImageOutputFormat};

use crate::error::Result;

/// A rendered SVG document.
///
/// Every helper that "shows" something returns one of these; the caller
/// decides whether to save it, embed it in a report, or drop it.
#[derive(Debug, Clone, PartialEq)]
pub struct Figure {
    pub width: u32,
    pub height: u32,
    svg: String,
}

impl Figure {
    /// Wraps `body` (SVG elements) in an `<svg>` root of the given size.
    pub fn new(width: u32, height: u32, body: &str) -> Figure {
        let svg = format!(
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{w}\" height=\"{h}\" \
             viewBox=\"0 0 {w} {h}\" font-family=\"sans-serif\">\n\
             <rect width=\"{w}\" height=\"{h}\" fill=\"#fff\"/>\n{body}\n</svg>\n",
            w = width,
            h = height,
            body = body,
        );
        Figure { width, height, svg }
    }

    pub fn as_str(&self) -> &str {
        &self.svg
    }

    /// Writes the SVG to `path`, creating parent directories.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(path, &self.svg)?;
        log::info!("saved figure to {:?}", path);
        Ok(())
    }
}

/// Escapes text for use inside SVG element content or attribute values.
pub fn xml_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// `<image>` element showing `img` (PNG-encoded, inlined as a data URI) in the
/// box at (`x`, `y`) with size `w` × `h`, aspect ratio preserved.
pub fn embedded_image(img: &DynamicImage, x: f64, y: f64, w: f64, h: f64) -> Result<String> {
    let mut png: Vec<u8> = Vec::new();
    img.write_to(&mut Cursor::new(&mut png), ImageOutputFormat::Png)?;
    Ok(format!(
        "<image x=\"{:.1}\" y=\"{:.1}\" width=\"{:.1}\" height=\"{:.1}\" \
         preserveAspectRatio=\"xMidYMid meet\" href=\"data:image/png;base64,{}\"/>",
        x, y, w, h, STANDARD.encode(&png)
    ))
}
