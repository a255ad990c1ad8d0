use std::path::PathBuf;

/// Errors returned by every fallible helper in the crate.
///
/// Failures from the underlying libraries (file system, image decoding, JSON,
/// zip) are carried through unchanged; the remaining variants describe inputs
/// the helpers cannot work with.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Image(#[from] image::ImageError),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Zip(#[from] zip::result::ZipError),

    /// The archive's file name does not end in a supported extension.
    #[error("unsupported archive format: {0:?} (expected .tar, .tar.gz, .tgz or .zip)")]
    UnsupportedArchive(PathBuf),

    /// Two sequences that must line up have different lengths.
    #[error("shape mismatch: {left} vs {right} elements")]
    ShapeMismatch { left: usize, right: usize },

    #[error("empty input: {0}")]
    EmptyInput(&'static str),

    /// Binary averaging was requested for labels with more than two classes.
    #[error("target is multiclass ({classes} distinct labels) but binary averaging was requested")]
    MulticlassTarget { classes: usize },

    /// Binary averaging over two labels, neither of which is the positive label.
    #[error("pos_label={pos_label} is not a valid label")]
    PosLabelMissing { pos_label: i64 },

    /// The predicted class index has no matching title.
    #[error("predicted class index {index} is out of range for {len} titles")]
    LabelOutOfRange { index: usize, len: usize },
}

pub type Result<T> = std::result::Result<T, Error>;

/// Fails with `ShapeMismatch` unless both slices have the same length.
pub(crate) fn ensure_same_len<A, B>(left: &[A], right: &[B]) -> Result<()> {
    if left.len() != right.len() {
        return Err(Error::ShapeMismatch { left: left.len(), right: right.len() });
    }
    Ok(())
}
