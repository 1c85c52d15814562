use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use assetpress::{
    BatchReport, JPEG_EXTENSIONS, Metadata, Options, SVG_EXTENSIONS, check_svg, collect_inputs,
    compress_files, compress_with_options, convert_to_svgz, savings_percent, stamp_files,
};
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "assetpress")]
#[command(about = "SVG compression, SVGZ conversion and JPEG metadata stamping", long_about = None)]
struct Cli {
    /// Log every step, not just per-file results
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Shrink SVG files with textual simplifications
    Compress(CompressArgs),
    /// Gzip SVG files into .svgz
    Svgz(SvgzArgs),
    /// Write Artist and Copyright EXIF tags into JPEG copies
    Stamp(StampArgs),
}

#[derive(Args)]
struct CompressArgs {
    /// Input files or directories (use - for stdin to stdout)
    #[arg(default_value = "-")]
    inputs: Vec<PathBuf>,

    /// Output directory (default: CompressedSVG next to the first input)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Decimal places numbers are rounded to
    #[arg(short, long, default_value = "1")]
    precision: u8,

    /// Keep XML declaration
    #[arg(long)]
    keep_xml_declaration: bool,

    /// Keep width/height/version/id/enable-background/x/y on the root <svg>
    #[arg(long)]
    keep_root_attrs: bool,

    /// Leave numbers as they are
    #[arg(long)]
    no_round_numbers: bool,

    /// Disable all passes (output is only trimmed)
    #[arg(long)]
    no_optimize: bool,

    /// Check that each output still parses as SVG
    #[arg(long)]
    verify: bool,

    /// Print size comparison
    #[arg(short, long)]
    stats: bool,
}

#[derive(Args)]
struct SvgzArgs {
    /// Input files or directories
    inputs: Vec<PathBuf>,

    /// Output directory (default: directory of the first input)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(Args)]
struct StampArgs {
    /// Input files or directories
    inputs: Vec<PathBuf>,

    /// Output directory (default: next to each input)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Artist tag value
    #[arg(long, default_value = assetpress::DEFAULT_ARTIST)]
    artist: String,

    /// Copyright tag value
    #[arg(long, default_value = assetpress::DEFAULT_COPYRIGHT)]
    copyright: String,
}

fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let report = match cli.command {
        Command::Compress(args) => {
            if is_stdin(&args.inputs) {
                return compress_stdio(&args);
            }
            let inputs = collect_inputs(&args.inputs, SVG_EXTENSIONS)?;
            let report = compress_files(&inputs, args.output.as_deref(), &compress_options(&args))?;
            if args.verify {
                verify_outputs(&report);
            }
            if args.stats {
                print_stats(report.total_input_len(), report.total_output_len());
            }
            report
        }
        Command::Svgz(args) => {
            let inputs = collect_inputs(&args.inputs, SVG_EXTENSIONS)?;
            convert_to_svgz(&inputs, args.output.as_deref())?
        }
        Command::Stamp(args) => {
            let inputs = collect_inputs(&args.inputs, JPEG_EXTENSIONS)?;
            let metadata = Metadata {
                artist: args.artist,
                copyright: args.copyright,
            };
            stamp_files(&inputs, args.output.as_deref(), &metadata)?
        }
    };

    Ok(finish(&report))
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .without_time()
        .init();
}

fn is_stdin(inputs: &[PathBuf]) -> bool {
    matches!(inputs, [only] if only.as_os_str() == "-")
}

fn compress_options(args: &CompressArgs) -> Options {
    if args.no_optimize {
        Options {
            precision: args.precision,
            ..Options::none()
        }
    } else {
        Options {
            precision: args.precision,
            remove_xml_declaration: !args.keep_xml_declaration,
            normalize_root: !args.keep_root_attrs,
            round_numbers: !args.no_round_numbers,
            ..Options::default()
        }
    }
}

fn compress_stdio(args: &CompressArgs) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let mut input = String::new();
    io::stdin().read_to_string(&mut input)?;

    let output = compress_with_options(&input, &compress_options(args));
    io::stdout().write_all(output.as_bytes())?;

    if args.verify
        && let Err(e) = check_svg(&output)
    {
        tracing::warn!("Output does not parse as SVG: {}", e);
    }

    if args.stats {
        print_stats(input.len() as u64, output.len() as u64);
    }

    Ok(ExitCode::SUCCESS)
}

fn verify_outputs(report: &BatchReport) {
    for outcome in &report.succeeded {
        match read_and_check(&outcome.output) {
            Ok(()) => tracing::debug!("{} parses as SVG", outcome.output.display()),
            Err(e) => tracing::warn!("{} does not parse as SVG: {}", outcome.output.display(), e),
        }
    }
}

fn read_and_check(path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let text = fs::read_to_string(path)?;
    check_svg(&text)?;
    Ok(())
}

fn print_stats(input_len: u64, output_len: u64) {
    eprintln!(
        "{} -> {} bytes ({:.1}% smaller)",
        input_len,
        output_len,
        savings_percent(input_len, output_len)
    );
}

fn finish(report: &BatchReport) -> ExitCode {
    if report.is_empty() {
        tracing::info!("No files selected");
        return ExitCode::SUCCESS;
    }

    tracing::info!(
        "Done: {} succeeded, {} failed",
        report.succeeded.len(),
        report.failed.len()
    );

    if report.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
