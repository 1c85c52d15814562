//! assetpress - small asset tools
//!
//! A regex-based SVG compressor, an SVG to SVGZ converter, and a JPEG EXIF
//! stamper. The compressor is a pure text-to-text function; the rest of the
//! crate is the file handling around it.

mod batch;
mod compress;
mod error;
mod inputs;
mod jpeg;
mod number;
mod output;
mod stamp;
mod svgz;
mod verify;

pub use batch::*;
pub use compress::*;
pub use error::*;
pub use inputs::*;
pub use jpeg::*;
pub use number::*;
pub use output::*;
pub use stamp::*;
pub use svgz::*;
pub use verify::*;

/// Compress an SVG string with default settings.
pub fn compress(svg: &str) -> String {
    compress_with_options(svg, &Options::default())
}

/// Compress an SVG string with custom options.
pub fn compress_with_options(svg: &str, options: &Options) -> String {
    compress_svg(svg, options)
}

/// Compression options.
#[derive(Debug, Clone)]
pub struct Options {
    /// Number of decimal places numbers are rounded to (default: 1)
    pub precision: u8,
    /// Remove the `<?xml ...?>` declaration
    pub remove_xml_declaration: bool,
    /// Strip width/height/version/id/enable-background and zero x/y from the root `<svg>`
    pub normalize_root: bool,
    /// Round every numeric literal
    pub round_numbers: bool,
    /// Remove `opacity="1"`
    pub remove_default_opacity: bool,
    /// Remove `stroke="none"`
    pub remove_stroke_none: bool,
    /// Trim style attributes, dropping empty and default-stroke ones
    pub clean_styles: bool,
    /// Collapse runs of blank lines
    pub collapse_blank_lines: bool,
}

impl Options {
    /// Options with every pass turned off; only the final trim remains.
    pub fn none() -> Self {
        Self {
            precision: 1,
            remove_xml_declaration: false,
            normalize_root: false,
            round_numbers: false,
            remove_default_opacity: false,
            remove_stroke_none: false,
            clean_styles: false,
            collapse_blank_lines: false,
        }
    }
}

impl Default for Options {
    fn default() -> Self {
        Self {
            precision: 1,
            remove_xml_declaration: true,
            normalize_root: true,
            round_numbers: true,
            remove_default_opacity: true,
            remove_stroke_none: true,
            clean_styles: true,
            collapse_blank_lines: true,
        }
    }
}
