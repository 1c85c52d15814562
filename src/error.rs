use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AssetError {
    #[error("XML parsing error: {0}")]
    XmlParse(#[from] quick_xml::Error),

    #[error("Invalid SVG: {0}")]
    InvalidSvg(String),

    #[error("Invalid JPEG: {0}")]
    InvalidJpeg(String),

    #[error("EXIF error: {0}")]
    Exif(#[from] exif::Error),

    #[error("EXIF block is {0} bytes, more than fits in one APP1 segment")]
    ExifTooLarge(usize),

    #[error("{}: {source}", path.display())]
    File {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Directory walk error: {0}")]
    Walk(#[from] ignore::Error),

    #[error("{}: output would overwrite the input", .0.display())]
    WouldOverwrite(PathBuf),

    #[error("UTF-8 error: {0}")]
    Utf8(#[from] std::str::Utf8Error),
}

impl AssetError {
    /// Attach a path to an I/O error.
    pub fn file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::File {
            path: path.into(),
            source,
        }
    }
}
