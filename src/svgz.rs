//! SVG to SVGZ conversion.

use std::fs::File;
use std::io::{self, BufReader};
use std::path::{Path, PathBuf};

use flate2::Compression;
use flate2::write::GzEncoder;

use crate::batch::{BatchReport, Outcome};
use crate::error::AssetError;
use crate::output::{ensure_dir, ensure_distinct, parent_dir};

/// Gzip every input into `<output_dir>/<stem>.svgz`.
///
/// The output directory defaults to the directory of the first input.
pub fn convert_to_svgz(
    inputs: &[PathBuf],
    output_dir: Option<&Path>,
) -> Result<BatchReport, AssetError> {
    let mut report = BatchReport::default();
    let Some(first) = inputs.first() else {
        return Ok(report);
    };

    let dir = output_dir.map_or_else(|| parent_dir(first), Path::to_path_buf);
    ensure_dir(&dir)?;

    for input in inputs {
        report.record(input, gzip_file(input, &dir));
    }

    Ok(report)
}

/// `<dir>/<stem>.svgz`
pub fn svgz_path(input: &Path, dir: &Path) -> PathBuf {
    let mut name = input.file_stem().unwrap_or(input.as_os_str()).to_os_string();
    name.push(".svgz");
    dir.join(name)
}

fn gzip_file(input: &Path, dir: &Path) -> Result<Outcome, AssetError> {
    let output = svgz_path(input, dir);
    // creating the output would truncate the input before it is read
    ensure_distinct(input, &output)?;

    let source = File::open(input).map_err(|e| AssetError::file(input, e))?;
    let sink = File::create(&output).map_err(|e| AssetError::file(&output, e))?;

    let mut encoder = GzEncoder::new(sink, Compression::best());
    let input_len = io::copy(&mut BufReader::new(source), &mut encoder)
        .map_err(|e| AssetError::file(input, e))?;
    let sink = encoder.finish().map_err(|e| AssetError::file(&output, e))?;
    let output_len = sink
        .metadata()
        .map_err(|e| AssetError::file(&output, e))?
        .len();

    Ok(Outcome {
        input: input.to_path_buf(),
        output,
        input_len,
        output_len,
    })
}
