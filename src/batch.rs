//! Batch processing with per-file reporting.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::AssetError;
use crate::output::{
    compressed_output_dir, ensure_dir, ensure_dir_with_fallback, fallback_output_dir, write_output,
};
use crate::{Options, compress_with_options};

/// One successfully processed file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub input: PathBuf,
    pub output: PathBuf,
    pub input_len: u64,
    pub output_len: u64,
}

/// Percentage saved relative to the input size.
pub fn savings_percent(input_len: u64, output_len: u64) -> f64 {
    if input_len == 0 {
        return 0.0;
    }
    let saved = input_len.saturating_sub(output_len);
    (saved as f64 / input_len as f64) * 100.0
}

/// Results of processing a list of files. A failure never stops the batch.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub succeeded: Vec<Outcome>,
    pub failed: Vec<(PathBuf, AssetError)>,
}

impl BatchReport {
    pub fn record(&mut self, input: &Path, result: Result<Outcome, AssetError>) {
        match result {
            Ok(outcome) => {
                tracing::info!(
                    "{} -> {} ({} -> {} bytes)",
                    outcome.input.display(),
                    outcome.output.display(),
                    outcome.input_len,
                    outcome.output_len
                );
                self.succeeded.push(outcome);
            }
            Err(e) => {
                tracing::error!("Failed to process {}: {}", input.display(), e);
                self.failed.push((input.to_path_buf(), e));
            }
        }
    }

    /// No file failed.
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }

    pub fn is_empty(&self) -> bool {
        self.succeeded.is_empty() && self.failed.is_empty()
    }

    pub fn total_input_len(&self) -> u64 {
        self.succeeded.iter().map(|o| o.input_len).sum()
    }

    pub fn total_output_len(&self) -> u64 {
        self.succeeded.iter().map(|o| o.output_len).sum()
    }
}

/// Compress each SVG into `output_dir` under its own file name.
///
/// Without an explicit directory, output goes to `CompressedSVG` next to the
/// first input, or to `CompressedSVG` on the Desktop when that folder can't
/// be created for lack of permission.
pub fn compress_files(
    inputs: &[PathBuf],
    output_dir: Option<&Path>,
    options: &Options,
) -> Result<BatchReport, AssetError> {
    let mut report = BatchReport::default();
    let Some(first) = inputs.first() else {
        return Ok(report);
    };

    let dir = match output_dir {
        Some(dir) => {
            ensure_dir(dir)?;
            dir.to_path_buf()
        }
        None => ensure_dir_with_fallback(&compressed_output_dir(first), &fallback_output_dir())?,
    };

    for input in inputs {
        report.record(input, compress_file(input, &dir, options));
    }

    Ok(report)
}

/// Compress one SVG file into `dir`.
pub fn compress_file(input: &Path, dir: &Path, options: &Options) -> Result<Outcome, AssetError> {
    let content = fs::read_to_string(input).map_err(|e| AssetError::file(input, e))?;
    let compressed = compress_with_options(&content, options);

    let file_name = input
        .file_name()
        .ok_or_else(|| AssetError::InvalidSvg(format!("{} has no file name", input.display())))?;
    let output = dir.join(file_name);
    write_output(&output, &compressed)?;

    Ok(Outcome {
        input: input.to_path_buf(),
        output,
        input_len: content.len() as u64,
        output_len: compressed.len() as u64,
    })
}
