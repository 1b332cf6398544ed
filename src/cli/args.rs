use anyhow::Result;
use clap::Parser;
use log::{debug, info};
use std::path::PathBuf;

/// Toast notification host demo
#[derive(Parser, Debug)]
#[command(name = "toasthost")]
#[command(about = "Replay a script of toast notifications against a toast host and render them on the console")]
#[command(version)]
pub struct Args {
    /// Verbose output (debug level logging)
    #[arg(short, long)]
    pub verbose: bool,

    /// Quiet output (error level logging only)
    #[arg(short, long)]
    pub quiet: bool,

    /// Debug output (trace level logging)
    #[arg(long)]
    pub debug: bool,

    /// Log format: text or json
    #[arg(long, value_name = "FORMAT", default_value = "text")]
    pub log_format: String,

    /// Log file path for file output
    #[arg(long, value_name = "FILE")]
    pub log_file: Option<PathBuf>,

    /// Log level for file output (independent of console level)
    #[arg(long, value_name = "LEVEL")]
    pub log_file_level: Option<String>,

    /// Configuration file path
    #[arg(long, value_name = "FILE")]
    pub config_file: Option<PathBuf>,

    /// Configuration section name
    #[arg(long, value_name = "SECTION")]
    pub config_name: Option<String>,

    // ============ HOST SETTINGS ============
    /// Maximum number of toasts visible at once
    #[arg(short = 'm', long = "max-visible", value_name = "N")]
    pub max_visible: Option<usize>,

    /// Ignore user dismissals (the `user:` step)
    #[arg(long = "no-dismiss")]
    pub no_dismiss: bool,

    /// Use the same timeout in milliseconds for every timed duration level
    #[arg(long = "fixed-ms", value_name = "MS")]
    pub fixed_ms: Option<u64>,

    // ============ OUTPUT ============
    /// Disable coloured output
    #[arg(long = "no-color", alias = "no-colour")]
    pub no_color: bool,

    /// Print host statistics as JSON when the script finishes
    #[arg(long)]
    pub stats: bool,

    // ============ SCRIPT ============
    /// Read steps from a file, one per line
    #[arg(short = 's', long = "script", value_name = "FILE")]
    pub script: Option<PathBuf>,

    /// Steps to run, e.g. show:info:short:Saved wait:500 dismiss:1 clear
    #[arg(value_name = "STEP")]
    pub steps: Vec<String>,
}

/// Parse command line arguments
pub fn parse_args() -> Args {
    let args = Args::parse();
    debug!("Parsed CLI arguments: {:?}", args);
    args
}

/// Validate CLI argument combinations
pub fn validate_args(args: &Args) -> Result<()> {
    debug!("Validating CLI argument combinations");

    let log_flags_count = [args.verbose, args.quiet, args.debug]
        .iter()
        .filter(|&&flag| flag)
        .count();

    if log_flags_count > 1 {
        return Err(anyhow::anyhow!(
            "Conflicting log level flags: only one of --verbose, --quiet, or --debug may be specified"
        ));
    }

    match args.log_format.to_lowercase().as_str() {
        "text" | "json" => {}
        _ => {
            return Err(anyhow::anyhow!(
                "Invalid log format '{}'. Valid options: text, json",
                args.log_format
            ))
        }
    }

    if let Some(ref level) = args.log_file_level {
        match level.to_lowercase().as_str() {
            "error" | "warn" | "info" | "debug" | "trace" => {}
            _ => {
                return Err(anyhow::anyhow!(
                    "Invalid log file level '{}'. Valid levels: error, warn, info, debug, trace",
                    level
                ))
            }
        }
    }

    if args.log_file_level.is_some() && args.log_file.is_none() {
        return Err(anyhow::anyhow!("--log-file-level requires --log-file to be specified"));
    }

    if args.max_visible == Some(0) {
        return Err(anyhow::anyhow!("--max-visible must be at least 1"));
    }

    if args.script.is_some() && !args.steps.is_empty() {
        return Err(anyhow::anyhow!("Steps cannot be given both inline and with --script"));
    }

    info!("CLI arguments validated successfully");
    Ok(())
}
