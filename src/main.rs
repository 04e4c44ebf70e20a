use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use codemap::cli::Output;
use codemap::cli::commands::{self, map::MapArgs};

#[derive(Parser)]
#[command(name = "codemap")]
#[command(version, about = "Budgeted symbol maps for source trees")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(long, short, global = true, help = "Extra config file merged over project config")]
    config: Option<PathBuf>,

    #[arg(long, global = true)]
    verbose: bool,

    #[arg(long, short, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the symbol map of a directory
    Map {
        #[arg(help = "Directory to index (default: current directory)")]
        path: Option<PathBuf>,
        #[arg(short = 'f', long, help = "Only show this file or directory prefix")]
        filter: Option<String>,
        #[arg(long, help = "Path prefix to list as skipped (repeatable)")]
        skip: Vec<String>,
        #[arg(
            long,
            allow_negative_numbers = true,
            help = "Maximum output lines (0 = default, negative = unlimited)"
        )]
        limit: Option<i64>,
        #[arg(long, default_value = "text", help = "Output format: text, json")]
        format: String,
    },

    /// Show the definition of a symbol in a file
    Show {
        #[arg(help = "Source file")]
        file: PathBuf,
        #[arg(help = "Symbol name")]
        symbol: String,
    },

    /// Find references to a symbol
    Refs {
        #[arg(help = "Symbol name")]
        symbol: String,
        #[arg(long, short, help = "Directory to search (default: current directory)")]
        path: Option<PathBuf>,
        #[arg(long, default_value = "text", help = "Output format: text, json")]
        format: String,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Show current configuration (merged from all sources)
    Show {
        #[arg(long, help = "Directory whose project config applies")]
        path: Option<PathBuf>,
        #[arg(long, default_value = "toml", help = "Output format: toml, json")]
        format: String,
    },
    /// Show configuration file paths
    Path {
        #[arg(long, help = "Directory whose project config applies")]
        path: Option<PathBuf>,
    },
    /// Write a default configuration file
    Init {
        #[arg(long, short, help = "Initialize global config")]
        global: bool,
        #[arg(long, help = "Overwrite existing config")]
        force: bool,
        #[arg(long, help = "Project directory (default: current directory)")]
        path: Option<PathBuf>,
    },
}

/// Set up panic handler for graceful error reporting
fn setup_panic_handler() {
    let default_hook = std::panic::take_hook();

    std::panic::set_hook(Box::new(move |panic_info| {
        let message = if let Some(s) = panic_info.payload().downcast_ref::<&str>() {
            s.to_string()
        } else if let Some(s) = panic_info.payload().downcast_ref::<String>() {
            s.clone()
        } else {
            "Unknown panic".to_string()
        };

        eprintln!("\n\x1b[1;31m━━━ PANIC ━━━\x1b[0m");
        eprintln!("\x1b[31mcodemap hit an internal error:\x1b[0m");
        eprintln!("  {}", message);

        if let Some(location) = panic_info.location() {
            eprintln!(
                "\x1b[90mLocation: {}:{}:{}\x1b[0m",
                location.file(),
                location.line(),
                location.column()
            );
        }
        eprintln!();

        // Backtrace when RUST_BACKTRACE=1
        default_hook(panic_info);
    }));
}

fn main() -> ExitCode {
    setup_panic_handler();

    match run_cli() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            Output::new().error(&format!("{:#}", e));
            ExitCode::FAILURE
        }
    }
}

fn run_cli() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "warn"
    };

    // stdout carries the report; logs go to stderr
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let here = || PathBuf::from(".");

    match cli.command {
        Commands::Map {
            path,
            filter,
            skip,
            limit,
            format,
        } => {
            commands::map::run(MapArgs {
                path,
                filter,
                skip,
                limit,
                format,
                config: cli.config,
                quiet: cli.quiet,
            })?;
        }
        Commands::Show { file, symbol } => {
            commands::show::run(&file, &symbol)?;
        }
        Commands::Refs {
            symbol,
            path,
            format,
        } => {
            commands::refs::run(&symbol, path, cli.config.as_deref(), &format)?;
        }
        Commands::Config { action } => match action {
            ConfigAction::Show { path, format } => {
                let root = path.unwrap_or_else(here);
                commands::config::show(&root, cli.config.as_deref(), &format)?;
            }
            ConfigAction::Path { path } => {
                commands::config::path(&path.unwrap_or_else(here))?;
            }
            ConfigAction::Init {
                global,
                force,
                path,
            } => {
                commands::config::init(&path.unwrap_or_else(here), global, force)?;
            }
        },
    }

    Ok(())
}
