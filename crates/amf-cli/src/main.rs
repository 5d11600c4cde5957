//! amfc - ACES Metadata File compiler
//!
//! Reads an AMF document attached to a piece of footage, resolves its
//! input/output/look transforms against a reference OCIO-shaped config, and
//! reports the standalone config it built.

// Allow Option<Option<T>> for the CLI log argument:
// - None = no logging
// - Some(None) = log to default path
// - Some(Some(path)) = log to custom path
#![allow(clippy::option_option)]

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Mutex;

use anyhow::{Context as _, Result};
use clap::{Parser, ValueEnum};
use tracing_subscriber::{fmt, EnvFilter};

use amf_compiler::{compile_amf, has_errors, validate_config, CompileOptions};

/// Global logger instance for file logging.
static LOGGER: Mutex<Option<Logger>> = Mutex::new(None);

/// File logger that writes messages to a log file.
struct Logger {
    file: File,
}

impl Logger {
    /// Creates a new logger writing to the specified path (append mode).
    fn new(path: &PathBuf) -> std::io::Result<Self> {
        let file = File::options().append(true).create(true).open(path)?;
        Ok(Self { file })
    }

    /// Writes a message to the log file.
    fn log(&mut self, msg: &str) {
        let _ = writeln!(self.file, "{msg}");
    }
}

/// Logs a message to stderr and optionally to the log file.
fn log(msg: &str) {
    eprintln!("{msg}");
    if let Ok(mut guard) = LOGGER.lock() {
        if let Some(ref mut logger) = *guard {
            logger.log(msg);
        }
    }
}

/// Returns the default log file path (next to the binary).
fn get_default_log_path() -> PathBuf {
    if let Ok(exe_path) = std::env::current_exe() {
        let mut log_path = exe_path;
        log_path.set_extension("log");
        log_path
    } else {
        PathBuf::from("amfc.log")
    }
}

/// Initializes tracing based on verbosity level.
fn init_tracing(verbose: u8, log_path: Option<&PathBuf>) {
    let filter = match verbose {
        0 => "warn",
        1 => "amf_compiler=info,amfc=info",
        2 => "amf_compiler=debug,amfc=debug",
        _ => "amf_compiler=trace,amfc=trace",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    if let Some(path) = log_path {
        let log_dir = path.parent().unwrap_or(Path::new("."));
        let log_filename = path.file_name().unwrap_or(std::ffi::OsStr::new("amfc.log"));
        let file_appender = tracing_appender::rolling::never(log_dir, log_filename);

        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(true)
            .with_timer(fmt::time::uptime())
            .with_ansi(false)
            .with_writer(file_appender)
            .init();
    } else if verbose > 0 {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(true)
            .with_timer(fmt::time::uptime())
            .init();
    }
}

/// Output format for the compiled clip summary.
#[derive(Copy, Clone, Debug, ValueEnum)]
enum OutputFormat {
    /// Human-readable text (default).
    Text,
    /// Machine-readable YAML.
    Yaml,
}

#[derive(Parser)]
#[command(name = "amfc")]
#[command(author, version, about = "ACES Metadata File compiler")]
#[command(long_about = "
Compiles an ACES Metadata File (AMF) against a reference OCIO-shaped config,
resolving its input/output/look transforms and reporting the standalone
config it built for the clip.

Examples:
  amfc shot.amf                                   # compile against the built-in reference config
  amfc shot.amf --reference-config studio.ocio    # compile against a custom reference config
  amfc shot.amf --format yaml                     # machine-readable summary
  amfc -v shot.amf                                # verbose logging
")]
struct Cli {
    /// AMF document to compile
    amf_path: PathBuf,

    /// Reference config to resolve transform ids against (defaults to the
    /// bundled studio config)
    #[arg(long)]
    reference_config: Option<PathBuf>,

    /// Output format for the clip summary
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Validate the built config and report any issues
    #[arg(long)]
    validate: bool,

    /// Verbose output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Write log to file (-l default, -l path.log custom)
    #[arg(short = 'l', long = "log")]
    log: Option<Option<PathBuf>>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let log_path = match &cli.log {
        Some(Some(path)) => Some(path.clone()),
        Some(None) => Some(get_default_log_path()),
        None => None,
    };

    init_tracing(cli.verbose, log_path.as_ref());

    if let Some(ref path) = log_path {
        if let Ok(logger) = Logger::new(path) {
            if let Ok(mut guard) = LOGGER.lock() {
                *guard = Some(logger);
            }
            if cli.verbose > 0 {
                log(&format!("Logging to: {}", path.display()));
            }
        }
    }

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log(&format!("error: {err:#}"));
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    let options = CompileOptions {
        reference_config_path: cli.reference_config.clone(),
    };

    let outcome = compile_amf(&cli.amf_path, options)
        .with_context(|| format!("failed to compile {}", cli.amf_path.display()))?;

    if cli.validate {
        let issues = validate_config(&outcome.config);
        for issue in &issues {
            let ctx = issue
                .context
                .as_ref()
                .map(|c| format!(" ({c})"))
                .unwrap_or_default();
            log(&format!("{}: {}{}", issue.severity, issue.message, ctx));
        }
        if has_errors(&issues) {
            anyhow::bail!("built config failed validation");
        }
    }

    match cli.format {
        OutputFormat::Text => print_text(&outcome.info),
        OutputFormat::Yaml => {
            let yaml = serde_yaml::to_string(&outcome.info)
                .context("failed to serialize clip summary as YAML")?;
            print!("{yaml}");
        }
    }

    Ok(())
}

fn print_text(info: &amf_compiler::AMFInfo) {
    println!("clip:              {}", info.clip_name);
    println!("clip role:         {}", info.clip_identifier);
    println!("input color space: {}", info.input_colorspace_name);
    println!("clip color space:  {}", info.clip_colorspace_name);
    println!("display / view:    {} / {}", info.display_name, info.view_name);
    println!("looks applied:     {}", info.num_looks_applied);
}
