//! Init and Config commands.

use std::path::PathBuf;
use std::process::ExitCode;

use crate::config::{CONFIG_DIR, Settings};

/// Run init command - create configuration file.
pub fn run_init(force: bool) -> ExitCode {
    let config_path = PathBuf::from(CONFIG_DIR).join("settings.toml");

    if config_path.exists() && !force {
        eprintln!(
            "Configuration file already exists at: {}",
            config_path.display()
        );
        eprintln!("Use --force to overwrite");
        return ExitCode::FAILURE;
    }

    match Settings::init_config_file(force) {
        Ok(path) => {
            println!("Created configuration file at: {}", path.display());
            println!("Edit this file to tune analyzer thresholds and file-type profiles.");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Run config command - display current configuration.
pub fn run_config(config: &Settings) -> ExitCode {
    println!("Current Configuration:");
    println!("{}", "=".repeat(50));
    match toml::to_string_pretty(config) {
        Ok(toml_str) => println!("{toml_str}"),
        Err(e) => {
            eprintln!("Error displaying config: {e}");
            return ExitCode::FAILURE;
        }
    }

    if let Err(e) = config.advisor.validate() {
        eprintln!("Warning: {e}");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
