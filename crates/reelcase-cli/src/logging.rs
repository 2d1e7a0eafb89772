use anyhow::Result;
use std::io;
use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::fmt::{self, time::ChronoUtc};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

/// Filter directives for a verbosity level when RUST_LOG is not set
fn default_directives(verbose_level: u8) -> &'static str {
    match verbose_level {
        0 => "info",
        // -v: debug, but keep the HTTP stack quiet
        1 => "debug,hyper=warn,reqwest=warn,rustls=warn",
        _ => "trace",
    }
}

fn build_filter(verbose_level: u8, quiet: bool) -> EnvFilter {
    if quiet {
        return EnvFilter::new("error");
    }
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(verbose_level)))
}

fn json_requested() -> bool {
    std::env::var("RUST_LOG_JSON")
        .map(|v| v == "true")
        .unwrap_or_else(|_| !io::stdout().is_terminal())
}

/// Daily-rotated appender; `reelcase.log` rotates as `reelcase.2026-01-17.log` and so on
fn file_appender(log_path: &Path) -> Result<RollingFileAppender> {
    let log_dir = log_path
        .parent()
        .ok_or_else(|| anyhow::anyhow!("Log file path has no parent directory"))?;
    std::fs::create_dir_all(log_dir)?;

    let prefix = log_path
        .file_stem()
        .and_then(|n| n.to_str())
        .ok_or_else(|| anyhow::anyhow!("Invalid log filename: {}", log_path.display()))?;
    let suffix = log_path.extension().and_then(|e| e.to_str()).unwrap_or("log");

    let appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(prefix)
        .filename_suffix(suffix)
        .build(log_dir)?;
    Ok(appender)
}

/// Initialise tracing. Logs go to stderr, or to `log_file` when given.
///
/// The returned guard flushes the file writer on drop and must be held for
/// the life of the program.
pub fn init_logging_with_file(
    verbose_level: u8,
    quiet: bool,
    log_file: Option<PathBuf>,
) -> Result<Option<WorkerGuard>> {
    let filter = build_filter(verbose_level, quiet);
    let json = json_requested();

    let (writer, guard, ansi) = match log_file {
        Some(path) => {
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender(&path)?);
            (BoxMakeWriter::new(non_blocking), Some(guard), false)
        }
        None => (BoxMakeWriter::new(io::stderr), None, io::stderr().is_terminal()),
    };

    let registry = Registry::default().with(filter);
    if json {
        registry
            .with(
                fmt::layer()
                    .json()
                    .with_timer(ChronoUtc::rfc_3339())
                    .with_writer(writer),
            )
            .try_init()?;
    } else {
        registry
            .with(
                fmt::layer()
                    .with_timer(ChronoUtc::rfc_3339())
                    .with_ansi(ansi)
                    .with_writer(writer),
            )
            .try_init()?;
    }

    Ok(guard)
}
