use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{bail, Context, Result};
use clap::Parser;
use rayon::prelude::*;
use tracing::{error, info, warn};

use docoutline::config::ExtractorConfig;
use docoutline::outline::{DocumentOutline, OutlineExtractor};
use docoutline::parse::load_document;

#[derive(Parser, Debug)]
#[clap(
    author,
    version,
    about,
    long_about = "Infer the title and heading outline of decoded documents.",
    arg_required_else_help = true
)]
pub struct Args {
    /// Decoded document JSON file, or a directory of them
    pub input: PathBuf,

    /// Output directory. If omitted, a single document is written to stdout.
    #[clap(short, long)]
    pub output: Option<PathBuf>,

    /// Pretty print output.
    #[clap(short, long)]
    pub pretty: bool,

    /// JSON file overriding the heuristic thresholds
    #[clap(short, long)]
    pub config: Option<PathBuf>,

    /// Log at debug level
    #[clap(short, long)]
    pub verbose: bool,

    /// Directory for a trace-level log of every heuristic decision
    #[clap(long)]
    pub log_dir: Option<PathBuf>,
}

impl Args {
    pub fn parse_args() -> Self {
        Args::parse()
    }
}

fn to_json(outline: &DocumentOutline, pretty: bool) -> Result<String> {
    let json = if pretty {
        serde_json::to_string_pretty(outline)?
    } else {
        serde_json::to_string(outline)?
    };
    Ok(json)
}

fn process_file(
    extractor: &OutlineExtractor,
    input: &Path,
    output_dir: &Path,
    pretty: bool,
) -> Result<PathBuf> {
    let document = load_document(input)?;
    let outline = extractor.extract(&document);

    let stem = input
        .file_stem()
        .with_context(|| format!("no file name in {}", input.display()))?;
    let output_path = output_dir.join(format!("{}.json", stem.to_string_lossy()));
    fs::write(&output_path, to_json(&outline, pretty)?)
        .with_context(|| format!("failed to write {}", output_path.display()))?;

    Ok(output_path)
}

fn json_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir).with_context(|| format!("failed to list {}", dir.display()))? {
        let path = entry?.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "json") {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

fn process_directory(
    extractor: &OutlineExtractor,
    input_dir: &Path,
    output_dir: &Path,
    pretty: bool,
) -> Result<()> {
    let files = json_files(input_dir)?;
    if files.is_empty() {
        warn!(dir = %input_dir.display(), "No JSON documents found");
        return Ok(());
    }
    info!(count = files.len(), "Found documents to process");

    fs::create_dir_all(output_dir)
        .with_context(|| format!("failed to create {}", output_dir.display()))?;

    let start = Instant::now();
    let processed = files
        .par_iter()
        .filter(|path| match process_file(extractor, path, output_dir, pretty) {
            Ok(output) => {
                info!(input = %path.display(), output = %output.display(), "Generated outline");
                true
            }
            Err(e) => {
                error!(input = %path.display(), error = %format!("{:#}", e), "Failed to process document");
                false
            }
        })
        .count();

    let elapsed = start.elapsed().as_secs_f64();
    info!(
        processed,
        total = files.len(),
        seconds = elapsed,
        average_seconds = elapsed / files.len() as f64,
        "Processing complete"
    );
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse_args();

    // Keep the guard alive so the file log is flushed on exit
    let _guard = match &args.log_dir {
        Some(log_dir) => Some(docoutline::logging::init_logging_with_dir(args.verbose, log_dir)?),
        None => {
            docoutline::logging::init_logging(args.verbose)?;
            None
        }
    };

    let config = match &args.config {
        Some(path) => ExtractorConfig::from_file(path)?,
        None => ExtractorConfig::default(),
    };
    let extractor = OutlineExtractor::new(config);

    if args.input.is_dir() {
        let Some(output_dir) = &args.output else {
            bail!("--output is required when the input is a directory");
        };
        return process_directory(&extractor, &args.input, output_dir, args.pretty);
    }

    match &args.output {
        Some(output_dir) => {
            fs::create_dir_all(output_dir)
                .with_context(|| format!("failed to create {}", output_dir.display()))?;
            let output = process_file(&extractor, &args.input, output_dir, args.pretty)?;
            info!(output = %output.display(), "Generated outline");
        }
        None => {
            let document = load_document(&args.input)?;
            println!("{}", to_json(&extractor.extract(&document), args.pretty)?);
        }
    }
    Ok(())
}
