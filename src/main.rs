use std::process::ExitCode;

use clap::Parser;
use vexel_chunking::cli::commands::{advise, analyze, init, profiles};
use vexel_chunking::cli::{Cli, Commands};
use vexel_chunking::{Settings, logging};

fn main() -> ExitCode {
    let cli = Cli::parse();

    let loaded = match &cli.config {
        Some(path) => Settings::load_from(path),
        None => Settings::load(),
    };
    let settings = loaded.unwrap_or_else(|e| {
        eprintln!("Configuration error: {e}");
        eprintln!("Using default configuration.");
        Settings::default()
    });

    logging::init_with_config(&settings.logging);

    // Without a settings file the built-in defaults apply
    if cli.config.is_none() && !matches!(cli.command, Commands::Init { .. }) {
        if let Err(warning) = Settings::check_init() {
            tracing::debug!(target: "cli", "{warning}");
        }
    }

    match cli.command {
        Commands::Init { force } => init::run_init(force),
        Commands::Config => init::run_config(&settings),
        Commands::Profiles { json } => profiles::run(&settings, json),
        Commands::Analyze {
            file,
            file_type,
            json,
        } => analyze::run(&settings, &file, file_type, json),
        Commands::Advise {
            file,
            tier,
            strategy,
            file_type,
            no_analyze,
            chunk_size,
            overlap,
            json,
        } => advise::run(
            &settings,
            advise::AdviseArgs {
                file,
                tier,
                strategy,
                file_type,
                no_analyze,
                chunk_size,
                overlap,
                json,
            },
        ),
    }
}
