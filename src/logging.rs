use std::path::Path;

use anyhow::{Context, Result};
use tracing_appender::{
    non_blocking::WorkerGuard,
    rolling::{RollingFileAppender, Rotation},
};
use tracing_subscriber::{
    filter::{EnvFilter, LevelFilter},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    Layer,
};

// Log targets
pub const OUTLINE_INPUT: &str = "outline_input";
pub const OUTLINE_FONTS: &str = "outline_fonts";
pub const OUTLINE_PATTERNS: &str = "outline_patterns";
pub const OUTLINE_HIERARCHY: &str = "outline_hierarchy";
pub const OUTLINE_TITLE: &str = "outline_title";

const DEBUG_TARGETS: &[&str] = &[
    OUTLINE_INPUT,
    OUTLINE_FONTS,
    OUTLINE_PATTERNS,
    OUTLINE_HIERARCHY,
    OUTLINE_TITLE,
];

const LOG_FILE_NAME: &str = "docoutline.log";

fn stderr_filter(verbose: bool) -> EnvFilter {
    let default_level = if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::INFO
    };
    EnvFilter::builder()
        .with_default_directive(default_level.into())
        .from_env_lossy()
}

fn file_filter() -> Result<EnvFilter> {
    let directives = DEBUG_TARGETS
        .iter()
        .map(|target| format!("{}=trace", target))
        .chain(std::iter::once("docoutline=debug".to_string()))
        .collect::<Vec<_>>()
        .join(",");
    EnvFilter::try_new(directives).context("invalid log filter")
}

/// Install the global subscriber: human-readable events on stderr, filtered
/// by `RUST_LOG` (default `info`, `debug` when `verbose`).
pub fn init_logging(verbose: bool) -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_filter(stderr_filter(verbose)),
        )
        .try_init()
        .context("failed to install tracing subscriber")
}

/// Like [`init_logging`], plus a non-blocking file layer in `log_dir` that
/// records every heuristic decision at trace level. Keep the returned guard
/// alive until exit so buffered lines are flushed.
pub fn init_logging_with_dir<P: AsRef<Path>>(verbose: bool, log_dir: P) -> Result<WorkerGuard> {
    let log_dir = log_dir.as_ref();
    std::fs::create_dir_all(log_dir)
        .with_context(|| format!("failed to create log directory {}", log_dir.display()))?;

    let file_appender = RollingFileAppender::new(Rotation::NEVER, log_dir, LOG_FILE_NAME);
    let (non_blocking_appender, guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = tracing_subscriber::fmt::layer()
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(true)
        .with_writer(non_blocking_appender)
        .with_filter(file_filter()?);

    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_filter(stderr_filter(verbose));

    tracing_subscriber::registry()
        .with(file_layer)
        .with(stderr_layer)
        .try_init()
        .context("failed to install tracing subscriber")?;

    Ok(guard)
}
