//! Strata CLI
//!
//! Command-line front end for the strata matching core

mod commands;
mod output;

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use strata_core::init_tracing;
use tracing::error;

#[derive(Parser)]
#[command(name = "strata")]
#[command(about = "Strata: find and check long bracket literals")]
#[command(version = strata_core::VERSION)]
#[command(
    long_about = "Strata scans source files for Lua-style long bracket literals\n\
([[...]], [=[...]=], ...) using a PEG matching core.\n\
\n\
Examples:\n  \
strata scan src/                 # List every literal under src/\n  \
strata scan --format json a.lua  # Machine-readable report\n  \
strata check .                   # Fail on unterminated literals\n  \
strata config init               # Write a default strata.toml"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Configuration file path
    #[arg(
        short,
        long,
        global = true,
        help = "Path to configuration file (strata.toml/.stratarc.json)"
    )]
    config: Option<PathBuf>,

    /// Verbose output (can be used multiple times for increased verbosity)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    /// Number of threads to use for parallel processing
    #[arg(
        short = 'j',
        long,
        global = true,
        help = "Number of threads (default: number of CPU cores)"
    )]
    threads: Option<usize>,
}

#[derive(Subcommand)]
enum Commands {
    /// Report every long bracket literal in the given files
    Scan {
        /// Files or directories to scan
        #[arg(help = "Files or directories to process (default: current directory)")]
        paths: Vec<PathBuf>,

        /// Output format
        #[arg(short, long, default_value = "human", help = "Output format")]
        format: OutputFormat,

        /// File extensions picked up when walking directories
        #[arg(
            short,
            long = "ext",
            default_value = "lua",
            help = "File extension to scan in directories (can be used multiple times)"
        )]
        extensions: Vec<String>,
    },

    /// Check that every long bracket literal is terminated
    Check {
        /// Files or directories to check
        #[arg(help = "Files or directories to process (default: current directory)")]
        paths: Vec<PathBuf>,

        /// File extensions picked up when walking directories
        #[arg(
            short,
            long = "ext",
            default_value = "lua",
            help = "File extension to check in directories (can be used multiple times)"
        )]
        extensions: Vec<String>,
    },

    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Show version information
    Version {
        /// Show detailed version information
        #[arg(long)]
        detailed: bool,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Write a configuration file with the default settings
    Init {
        /// Configuration file format
        #[arg(short, long, default_value = "toml")]
        format: ConfigFormat,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Print the configuration in effect
    Show,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output with colors
    Human,
    /// JSON output for tooling
    Json,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum ConfigFormat {
    Toml,
    Json,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize colored output
    if !cli.no_color && std::env::var("NO_COLOR").is_err() {
        colored::control::set_override(true);
    } else {
        colored::control::set_override(false);
    }

    // Initialize tracing based on verbosity
    let log_level = match cli.verbose {
        0 => "strata=error",
        1 => "strata=warn",
        2 => "strata=info",
        3 => "strata=debug",
        _ => "strata=trace",
    };
    unsafe {
        std::env::set_var("RUST_LOG", log_level);
    }
    init_tracing();

    if let Some(threads) = cli.threads
        && let Err(e) = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
    {
        error!("Failed to set thread pool size: {}", e);
        std::process::exit(1);
    }

    match run_command(cli) {
        Ok(()) => Ok(()),
        Err(e) => {
            error!("strata failed: {:#}", e);
            eprintln!("error: {e:#}");
            std::process::exit(1);
        }
    }
}

fn default_paths(paths: Vec<PathBuf>) -> Vec<PathBuf> {
    if paths.is_empty() {
        vec![PathBuf::from(".")]
    } else {
        paths
    }
}

fn run_command(cli: Cli) -> Result<()> {
    match cli.command {
        Some(Commands::Scan {
            paths,
            format,
            extensions,
        }) => commands::scan_command(default_paths(paths), format, extensions, cli.config),

        Some(Commands::Check { paths, extensions }) => {
            commands::check_command(default_paths(paths), extensions, cli.config)
        }

        Some(Commands::Config { action }) => match action {
            ConfigAction::Init { format, force } => commands::config_init_command(format, force),
            ConfigAction::Show => commands::config_show_command(cli.config),
        },

        Some(Commands::Version { detailed }) => {
            if detailed {
                println!("strata {}", strata_core::VERSION);
                println!("Build information:");
                println!("  Target: {}", std::env::consts::ARCH);
                println!("  OS: {}", std::env::consts::OS);
                println!("  Default max depth: {}", strata_core::DEFAULT_MAX_DEPTH);
            } else {
                println!("{}", strata_core::VERSION);
            }
            Ok(())
        }

        None => {
            let mut cmd = Cli::command();
            cmd.print_help()?;
            Ok(())
        }
    }
}
