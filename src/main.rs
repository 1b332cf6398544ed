use std::process;

use anyhow::{Context, Result};
use log::error;

use toasthost::{app, cli, logging};

fn main() {
    // Set up panic handler with better error reporting
    std::panic::set_hook(Box::new(|panic_info| {
        error!("Application panicked: {:?}", panic_info);
        eprintln!("Panic: {:?}", panic_info);
        process::exit(101);
    }));

    if let Err(e) = run() {
        error!("Application error: {:#}", e);
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }
}

fn run() -> Result<()> {
    let args = cli::args::parse_args();

    cli::args::validate_args(&args)?;

    let config_manager = app::load_configuration(&args)?;

    let log_config = app::configure_logging(&args, &config_manager)?;
    logging::init_logger(log_config)?;

    let host_config = app::build_host_config(&args, &config_manager)?;
    let steps = app::load_steps(&args)?;
    let colours = app::create_colour_manager(&args);

    // Timers and the console adapter share one single-threaded runtime
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to create tokio runtime")?;

    let stats = runtime.block_on(app::run_demo(host_config, steps, colours))?;

    if args.stats {
        let json = serde_json::to_string_pretty(&stats).context("Failed to serialize statistics")?;
        println!("{}", json);
    }

    Ok(())
}
