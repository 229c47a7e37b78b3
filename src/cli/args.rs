//! CLI argument parsing using clap.
//!
//! Contains the Cli struct and Commands enum.

use clap::{
    Parser, Subcommand,
    builder::styling::{AnsiColor, Effects, Styles},
};
use std::path::PathBuf;

fn clap_cargo_style() -> Styles {
    Styles::styled()
        .header(AnsiColor::Cyan.on_default() | Effects::BOLD)
        .usage(AnsiColor::Cyan.on_default() | Effects::BOLD)
        .literal(AnsiColor::Green.on_default())
        .placeholder(AnsiColor::Green.on_default())
}

/// Chunking advisor for Vexel knowledge bases
#[derive(Parser)]
#[command(
    name = "vexel-chunk",
    version = env!("CARGO_PKG_VERSION"),
    about = "Chunking advisor for Vexel knowledge bases",
    long_about = "Inspect file-type profiles, analyze documents and preview the chunking \
                  decision the upload pipeline would make.",
    next_line_help = true,
    styles = clap_cargo_style()
)]
pub struct Cli {
    /// Path to custom settings.toml file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Initialize project
    #[command(about = "Set up .vexel directory with default configuration")]
    Init {
        /// Force overwrite existing configuration
        #[arg(short, long)]
        force: bool,
    },

    /// Show current configuration
    #[command(about = "Display active settings")]
    Config,

    /// List file-type profiles
    #[command(about = "Show default chunking parameters per file type")]
    Profiles {
        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },

    /// Analyze a document's structure
    #[command(about = "Score document structure and recommend a strategy")]
    Analyze {
        /// Document to analyze (extracted text)
        file: PathBuf,

        /// Declared file type (defaults to the file extension)
        #[arg(short = 't', long = "type")]
        file_type: Option<String>,

        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },

    /// Resolve the chunking decision for an upload
    #[command(about = "Preview the chunking decision for a document upload")]
    Advise {
        /// Document to upload (extracted text)
        file: PathBuf,

        /// Subscription tier of the uploader (free, premium, enterprise)
        #[arg(long)]
        tier: Option<String>,

        /// Requested strategy name, or "auto"
        #[arg(short, long)]
        strategy: Option<String>,

        /// Declared file type (defaults to the file extension)
        #[arg(short = 't', long = "type")]
        file_type: Option<String>,

        /// Skip content analysis unless --strategy auto is given
        #[arg(long)]
        no_analyze: bool,

        /// Explicit chunk size in characters
        #[arg(long)]
        chunk_size: Option<usize>,

        /// Explicit overlap in characters
        #[arg(long)]
        overlap: Option<usize>,

        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },
}
