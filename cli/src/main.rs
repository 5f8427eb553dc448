mod commands;
mod config;
mod page;
mod server;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process;

use crate::commands::{cmd_objectives, cmd_show, cmd_visits};
use crate::config::Config;
use tisane_core::counter::FileCounterStore;
use tisane_core::service::TisaneService;

#[derive(Parser)]
#[command(
    name = "tisane",
    version,
    about = "Herbal-mixture recommendations by health objective",
    long_about = "Pick a health objective and get matching herbal mixtures: ingredients, \
preparation and precautions.\n\nEducational and preventive information only. It does not \
replace medical advice."
)]
struct Cli {
    /// Directory holding melanges.json and visits.json
    #[arg(long, global = true, env = "TISANE_DATA_DIR", value_name = "PATH")]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the recommendation form over HTTP
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "8080")]
        port: u16,
        /// Address to bind to (default: 127.0.0.1, use 0.0.0.0 to expose to network)
        #[arg(short, long, default_value = "127.0.0.1")]
        bind: String,
    },
    /// List the available health objectives
    Objectives {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show the recommendations for an objective
    Show {
        /// Objective, in any casing or accent style
        objective: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show the total visit count
    Visits {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = Config::load(cli.data_dir)?;
    let mut service = TisaneService::new(
        &config.data_file,
        Box::new(FileCounterStore::new(&config.counter_file)),
    );

    match cli.command {
        Commands::Serve { port, bind } => server::start_server(service, port, &bind).await,
        Commands::Objectives { json } => cmd_objectives(&mut service, json),
        Commands::Show { objective, json } => cmd_show(&mut service, &objective, json),
        Commands::Visits { json } => cmd_visits(&service, json),
    }
}
