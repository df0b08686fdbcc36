use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use health_eval_store_lib::{commands, AppSettings, ClientError, Evaluation, RecordStore};
use serde::Serialize;
use std::io::Read;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "health-eval")]
#[command(about = "Store and inspect health evaluation records")]
#[command(version)]
struct Cli {
    /// Directory holding the evaluation files
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// YAML settings file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List evaluation summaries, most recently updated first
    List,
    /// Print a stored evaluation
    Get {
        /// Filename as returned by `save` or `list`
        filename: String,
    },
    /// Save an evaluation read from a JSON file, or stdin when omitted
    Save {
        file: Option<PathBuf>,
    },
    /// Delete a stored evaluation
    Delete {
        filename: String,
    },
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let mut settings = AppSettings::load(cli.config.as_deref()).context("Failed to load settings")?;
    settings.apply_overrides(cli.data_dir.clone(), None);

    if let Err(error) = health_eval_store_lib::init_tracing(settings.log_dir.as_deref()) {
        eprintln!("failed to initialize logging: {}", error);
    }

    let store = RecordStore::open(&settings.data_dir)
        .with_context(|| format!("Failed to open store at {}", settings.data_dir.display()))?;

    let outcome = match cli.command {
        Command::List => print_result(commands::list_evaluations(&store))?,
        Command::Get { filename } => print_result(commands::get_evaluation(&store, &filename))?,
        Command::Save { file } => {
            let evaluation = read_evaluation(file)?;
            print_result(commands::save_evaluation(&store, evaluation))?
        }
        Command::Delete { filename } => print_result(commands::delete_evaluation(&store, &filename))?,
    };
    Ok(outcome)
}

fn read_evaluation(file: Option<PathBuf>) -> Result<Evaluation> {
    let raw = match file {
        Some(path) => std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?,
        None => {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .context("Failed to read evaluation from stdin")?;
            buffer
        }
    };
    serde_json::from_str(&raw).context("Invalid evaluation JSON")
}

fn print_result<T: Serialize>(result: Result<T, ClientError>) -> Result<ExitCode> {
    match result {
        Ok(value) => {
            println!("{}", serde_json::to_string_pretty(&value)?);
            Ok(ExitCode::SUCCESS)
        }
        Err(error) => {
            eprintln!("{}", serde_json::to_string(&error)?);
            Ok(ExitCode::FAILURE)
        }
    }
}
