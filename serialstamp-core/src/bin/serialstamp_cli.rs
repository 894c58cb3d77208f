//! SerialStamp CLI
//!
//! Commands: init, show, fmt, items, files
//! Structured output is JSON on stdout; diagnostics go to the log on stderr.

use clap::{Parser, Subcommand};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use serialstamp_core::{
    decode, encode,
    stack::{render_texts, StackItems, StackPlan},
    ResourceCategory, Workspace,
};

#[derive(Parser)]
#[command(name = "serialstamp-cli")]
#[command(about = "SerialStamp CLI - stamp specification tools")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log at debug level (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a workspace directory with a seed spec
    Init {
        /// Directory to lay out
        dir: PathBuf,
    },

    /// Print the decoded spec as JSON
    Show {
        /// Spec file
        spec: PathBuf,
    },

    /// Rewrite a spec in canonical form
    Fmt {
        /// Spec file
        spec: PathBuf,

        /// Overwrite the file instead of printing
        #[arg(short, long)]
        write: bool,
    },

    /// List stamp items with their substituted texts
    Items {
        /// Spec file
        spec: PathBuf,

        /// Stop after this many items
        #[arg(short, long, default_value_t = 20)]
        limit: usize,
    },

    /// List resources in a workspace
    Files {
        /// Workspace directory
        workspace: PathBuf,

        /// images | fonts
        category: String,
    },
}

fn read_spec(path: &Path) -> Result<String, ExitCode> {
    fs::read_to_string(path).map_err(|e| {
        log::error!("failed to read {}: {}", path.display(), e);
        ExitCode::FAILURE
    })
}

fn print_json(value: &serde_json::Value) -> ExitCode {
    match serde_json::to_string_pretty(value) {
        Ok(s) => {
            println!("{}", s);
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("failed to serialize output: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(command: Commands) -> Result<ExitCode, ExitCode> {
    match command {
        Commands::Init { dir } => {
            let ws = Workspace::open(&dir).map_err(|e| {
                log::error!("{}", e);
                ExitCode::FAILURE
            })?;
            println!("Initialized workspace at: {}", ws.dir().display());
            Ok(ExitCode::SUCCESS)
        }

        Commands::Show { spec } => {
            let parsed = decode(&read_spec(&spec)?);
            let value = serde_json::to_value(&parsed).map_err(|e| {
                log::error!("failed to serialize spec: {}", e);
                ExitCode::FAILURE
            })?;
            Ok(print_json(&value))
        }

        Commands::Fmt { spec, write } => {
            let canonical = encode(&decode(&read_spec(&spec)?));
            if write {
                fs::write(&spec, canonical).map_err(|e| {
                    log::error!("failed to write {}: {}", spec.display(), e);
                    ExitCode::FAILURE
                })?;
            } else {
                print!("{}", canonical);
            }
            Ok(ExitCode::SUCCESS)
        }

        Commands::Items { spec, limit } => {
            let parsed = decode(&read_spec(&spec)?);
            let items = StackItems::from_spec(&parsed).map_err(|e| {
                log::error!("{}", e);
                ExitCode::from(2)
            })?;
            let plan = StackPlan::for_spec(&parsed, items.total());
            let rendered: Vec<_> = items
                .take(limit)
                .map(|vars| render_texts(&parsed, &vars))
                .collect();

            Ok(print_json(&serde_json::json!({
                "plan": plan,
                "items": rendered,
            })))
        }

        Commands::Files { workspace, category } => {
            let listed = category
                .parse::<ResourceCategory>()
                .and_then(|c| Workspace::open(&workspace)?.list_files(c))
                .map_err(|e| {
                    log::error!("{}", e);
                    ExitCode::FAILURE
                })?;
            Ok(print_json(&serde_json::json!(listed)))
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    match run(cli.command) {
        Ok(code) | Err(code) => code,
    }
}
