use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::io;
use std::path::PathBuf;
use tracing_subscriber::{filter::EnvFilter, fmt, prelude::*};

use eventscout::commands;
use eventscout::config::Config;
use eventscout::engine::Engine;
use eventscout::filters::FilterArgs;
use eventscout::shell::Shell;

#[derive(Parser)]
#[command(name = "eventscout")]
#[command(
  about = "Eventscout - Event Recommendation System\nDescribe an event, narrow the results and open the details"
)]
#[command(version)]
struct Cli {
  /// Configuration file (defaults to EVENTSCOUT_CONFIG, then eventscout.json)
  #[arg(long, global = true, value_name = "PATH")]
  config: Option<PathBuf>,

  /// Event dataset to use instead of the configured one
  #[arg(long, global = true, value_name = "PATH")]
  dataset: Option<PathBuf>,

  /// Log debug output to stderr
  #[arg(short, long, global = true)]
  verbose: bool,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Recommend events matching a description
  Recommend {
    #[command(flatten)]
    filters: FilterArgs,
    /// Print the page as JSON
    #[arg(long)]
    json: bool,
    /// Description of the event you want (space-separated)
    #[arg(required = true)]
    terms: Vec<String>,
  },
  /// Show the details of a single event
  Show {
    /// Event id from the dataset
    event_id: String,
    /// Print the page as JSON
    #[arg(long)]
    json: bool,
  },
  /// List the values each filter accepts
  Options {
    /// Print the options as JSON
    #[arg(long)]
    json: bool,
  },
  /// Fit the recommendation model and save it
  Index {
    /// Rebuild even when a saved model exists
    #[arg(short, long)]
    force: bool,
  },
  /// Start an interactive session
  Shell,
}

fn main() -> Result<()> {
  let cli = Cli::parse();

  let default_filter = if cli.verbose { "eventscout=debug" } else { "eventscout=warn" };
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
  tracing_subscriber::registry().with(fmt::layer().with_writer(io::stderr)).with(filter).init();

  let mut config = Config::load(cli.config.as_deref()).context("Failed to load configuration")?;
  if let Some(dataset) = cli.dataset {
    config.dataset = dataset;
  }

  match cli.command {
    Commands::Recommend { filters, json, terms } => {
      commands::recommend(&load_engine(&config)?, &terms, &filters, json)?;
    }
    Commands::Show { event_id, json } => {
      commands::show(&load_engine(&config)?, &event_id, json)?;
    }
    Commands::Options { json } => {
      commands::options(&load_engine(&config)?, json)?;
    }
    Commands::Index { force } => {
      commands::index(&config, force)?;
    }
    Commands::Shell => {
      let engine = load_engine(&config)?;
      let stdin = io::stdin();
      let mut stdout = io::stdout();
      Shell::new(&engine).run(stdin.lock(), &mut stdout)?;
    }
  }

  Ok(())
}

fn load_engine(config: &Config) -> Result<Engine> {
  Engine::from_config(config)
    .with_context(|| format!("Failed to load events from {}", config.dataset.display()))
}
