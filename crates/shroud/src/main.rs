//! Shroud CLI - custom element glue generator.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

mod commands;
mod config;

#[derive(Parser)]
#[command(name = "shroud")]
#[command(about = "Generate custom element glue for component instances")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to shroud.toml config file
    #[arg(short, long, default_value = "shroud.toml")]
    config: PathBuf,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a starter shroud.toml
    Init {
        /// Overwrite existing files
        #[arg(short, long)]
        yes: bool,
    },

    /// Validate the component manifest
    Check,

    /// Generate the JavaScript module and TypeScript declarations
    Generate {
        /// Output directory (defaults to config or "dist")
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Skip CSS minification
        #[arg(long)]
        no_minify: bool,

        /// Skip the .d.ts file
        #[arg(long)]
        no_typescript: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    fmt().with_env_filter(filter).with_target(false).init();

    match cli.command {
        Commands::Init { yes } => {
            commands::init::run(&cli.config, yes).await?;
        }
        Commands::Check => {
            commands::check::run(&cli.config).await?;
        }
        Commands::Generate {
            output,
            no_minify,
            no_typescript,
        } => {
            let overrides = commands::generate::Overrides {
                output,
                minify: if no_minify { Some(false) } else { None },
                typescript: if no_typescript { Some(false) } else { None },
            };
            commands::generate::run(&cli.config, overrides).await?;
        }
    }

    Ok(())
}
