//! Application initialization and configuration

use std::fs;
use std::time::Duration;

use anyhow::{Context, Result};
use log::{debug, error, info};

use crate::cli::script::{self, Step};
use crate::toast::{DurationLevel, DurationTable, HostConfig};
use crate::{cli, config, display, logging};

pub fn load_configuration(args: &cli::Args) -> Result<config::ConfigManager> {
    let mut manager = if let Some(config_file) = &args.config_file {
        debug!("Loading configuration from explicit file: {}", config_file.display());
        config::ConfigManager::load_from_file(config_file.clone())?
    } else {
        config::ConfigManager::load()?
    };

    if let Some(section_name) = &args.config_name {
        manager.select_section(section_name.clone());
    }

    Ok(manager)
}

pub fn configure_logging(args: &cli::Args, config: &config::ConfigManager) -> Result<logging::LogConfig> {
    use log::LevelFilter;

    let console_level = if args.debug {
        LevelFilter::Trace
    } else if args.verbose {
        LevelFilter::Debug
    } else if args.quiet {
        LevelFilter::Error
    } else {
        match config.get_log_level("base", "console-level") {
            Ok(Some(level)) => {
                debug!("Using console log level from config: {:?}", level);
                level
            }
            Ok(None) => LevelFilter::Info,
            Err(e) => {
                debug!("Invalid console-level in config, using default: {}", e);
                LevelFilter::Info
            }
        }
    };

    let format = if args.log_format != "text" {
        args.log_format
            .parse::<logging::LogFormat>()
            .map_err(|e| anyhow::anyhow!(e))?
    } else {
        match config.get_value("base", "log-format") {
            Some(format_str) => {
                debug!("Using log format from config: {}", format_str);
                format_str.parse().unwrap_or(logging::LogFormat::Text)
            }
            None => logging::LogFormat::Text,
        }
    };

    let log_file_path = args.log_file.clone().or_else(|| config.get_path("base", "log-file"));

    let file_log_level = match &args.log_file_level {
        Some(level_str) => Some(logging::parse_log_level(level_str)?),
        None => match config.get_log_level("base", "file-log-level") {
            Ok(level) => level,
            Err(e) => {
                debug!("Invalid file-log-level in config, using console level: {}", e);
                None
            }
        },
    };

    let (destination, file_level) = match (log_file_path, file_log_level) {
        (Some(file_path), level) => {
            let level = level.unwrap_or(console_level);
            debug!("File logging enabled: {} (level: {:?})", file_path.display(), level);
            (logging::LogDestination::Both(file_path), Some(level))
        }
        (None, None) => (logging::LogDestination::Console, None),
        (None, Some(_)) => {
            error!("Log file level specified without log file");
            return Err(anyhow::anyhow!("Log file level specified without log file"));
        }
    };

    Ok(logging::LogConfig {
        console_level,
        file_level,
        format,
        destination,
    })
}

/// Create a ColourManager from CLI arguments and the environment
pub fn create_colour_manager(args: &cli::Args) -> display::ColourManager {
    display::ColourManager::from_args(args.no_color)
}

/// Host settings from the configuration file with CLI overrides applied
pub fn build_host_config(args: &cli::Args, config: &config::ConfigManager) -> Result<HostConfig> {
    let mut host_config = config.get_host_config()?;

    if let Some(max_visible) = args.max_visible {
        debug!("CLI override: max-visible = {}", max_visible);
        host_config = host_config.with_max_visible(max_visible);
    }
    if args.no_dismiss {
        debug!("CLI override: user dismissal disabled");
        host_config = host_config.with_dismissible(false);
    }
    if let Some(ms) = args.fixed_ms {
        debug!("CLI override: every timed level lasts {}ms", ms);
        let table = DurationTable::fixed(Duration::from_millis(ms)).with(DurationLevel::Indefinite, None);
        host_config = host_config.with_resolver(table);
    }

    host_config.validate()?;
    info!("Host configuration: {:?}", host_config);
    Ok(host_config)
}

/// Steps from `--script`, from the command line, or the built-in demo
pub fn load_steps(args: &cli::Args) -> Result<Vec<Step>> {
    if let Some(path) = &args.script {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read script: {}", path.display()))?;
        return script::parse_script(&content)
            .with_context(|| format!("Invalid script: {}", path.display()));
    }

    if args.steps.is_empty() {
        debug!("No steps given, running the built-in demo");
        return Ok(script::parse_script(script::DEMO_SCRIPT)?);
    }

    Ok(script::parse_steps(&args.steps)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ConfigManager, Configuration};
    use clap::Parser;
    use std::collections::HashMap;
    use tempfile::NamedTempFile;

    fn args_from(argv: &[&str]) -> cli::Args {
        cli::Args::try_parse_from(std::iter::once("toasthost").chain(argv.iter().copied())).unwrap()
    }

    fn toasts_config(pairs: &[(&str, &str)]) -> ConfigManager {
        let section: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        let mut config = Configuration::new();
        config.insert("toasts".to_string(), section);
        ConfigManager::from_config(config)
    }

    #[test]
    fn test_cli_overrides_config_file() {
        let config = toasts_config(&[("max-visible", "5"), ("dismissible", "true")]);
        let args = args_from(&["--max-visible", "2", "--no-dismiss"]);

        let host_config = build_host_config(&args, &config).unwrap();
        assert_eq!(host_config.max_visible, 2);
        assert!(!host_config.dismissible);
    }

    #[test]
    fn test_config_file_used_without_overrides() {
        let config = toasts_config(&[("max-visible", "5"), ("short-ms", "100")]);
        let host_config = build_host_config(&args_from(&[]), &config).unwrap();

        assert_eq!(host_config.max_visible, 5);
        assert_eq!(
            host_config.resolver().resolve(DurationLevel::Short),
            Some(Duration::from_millis(100))
        );
    }

    #[test]
    fn test_fixed_ms_keeps_indefinite() {
        let config = ConfigManager::from_config(Configuration::new());
        let host_config = build_host_config(&args_from(&["--fixed-ms", "20"]), &config).unwrap();
        let resolver = host_config.resolver();

        assert_eq!(resolver.resolve(DurationLevel::Long), Some(Duration::from_millis(20)));
        assert_eq!(resolver.resolve(DurationLevel::Indefinite), None);
    }

    #[test]
    fn test_configure_logging_levels() {
        let config = ConfigManager::from_config(Configuration::new());

        let log_config = configure_logging(&args_from(&["--debug"]), &config).unwrap();
        assert_eq!(log_config.console_level, log::LevelFilter::Trace);
        assert_eq!(log_config.destination, logging::LogDestination::Console);

        let log_config = configure_logging(
            &args_from(&["--log-format", "json", "--log-file", "/tmp/toasthost.log"]),
            &config,
        )
        .unwrap();
        assert_eq!(log_config.format, logging::LogFormat::Json);
        assert_eq!(log_config.file_level, Some(log::LevelFilter::Info));
    }

    #[test]
    fn test_load_steps_sources() {
        let inline = load_steps(&args_from(&["wait:10", "clear"])).unwrap();
        assert_eq!(inline, vec![Step::Wait(Duration::from_millis(10)), Step::Clear]);

        let demo = load_steps(&args_from(&[])).unwrap();
        assert!(!demo.is_empty());

        let file = NamedTempFile::new().unwrap();
        fs::write(&file, "# tidy up\nclear\n").unwrap();
        let path = file.path().to_string_lossy().to_string();
        let from_file = load_steps(&args_from(&["--script", path.as_str()])).unwrap();
        assert_eq!(from_file, vec![Step::Clear]);
    }

    #[test]
    fn test_load_steps_reports_bad_step() {
        let error = load_steps(&args_from(&["wait:later"])).unwrap_err();
        assert!(error.to_string().contains("wait:later"));
    }
}
