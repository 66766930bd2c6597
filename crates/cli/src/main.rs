mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Resolve and validate semantic-release and commitlint configuration
#[derive(Parser)]
#[command(name = "releasekit")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Project root to read configuration from
    #[arg(long, global = true, default_value = ".")]
    root: PathBuf,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the fully resolved configuration as JSON
    Resolve {
        /// Write to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Emit single-line JSON
        #[arg(long)]
        compact: bool,
    },
    /// Validate configuration and print a summary
    Check,
    /// List the plugins and options the validator knows about
    Plugins,
    /// Write starter configuration files
    Init {
        /// Overwrite existing files
        #[arg(short, long)]
        force: bool,
        /// Skip the releasekit.toml settings file
        #[arg(long)]
        minimal: bool,
    },
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Resolve { output, compact } => {
            commands::run_resolve(&cli.root, output.as_deref(), compact)?
        }
        Commands::Check => {
            if !commands::run_check(&cli.root) {
                std::process::exit(1);
            }
        }
        Commands::Plugins => commands::run_plugins(),
        Commands::Init { force, minimal } => commands::run_init(&cli.root, force, minimal)?,
    }

    Ok(())
}
