use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info};

use cf_standings::client::CodeforcesClient;
use cf_standings::config::Config;
use cf_standings::server::{self, StandingsResponse};
use cf_standings::service::StandingsService;
use cf_standings::{logging, metrics};

#[derive(Parser)]
#[command(name = "cf_standings")]
#[command(about = "Codeforces contest standings filtered to a local roster")]
#[command(version)]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP API
    Serve {
        /// Port to listen on (overrides config)
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Print standings for one contest as JSON
    Standings {
        contest_id: u64,
        /// Ask the upstream for roster handles only, unofficial entries included
        #[arg(long)]
        roster_only: bool,
    },
    /// Print the contest list as JSON
    Contests {
        /// List gym contests instead of regular ones
        #[arg(long)]
        gym: bool,
        /// Only print the first N contests
        #[arg(long)]
        limit: Option<usize>,
    },
}

fn build_service(config: &Config) -> Result<StandingsService> {
    let client = CodeforcesClient::new(&config.upstream)?;
    let roster = config.roster();
    info!(roster_size = roster.len(), "Roster loaded");
    Ok(StandingsService::new(
        Arc::new(client),
        roster,
        Arc::new(config.classifier()),
        config.upstream.count,
    ))
}

async fn run(cli: Cli) -> Result<()> {
    let config = Config::load(cli.config.as_deref())?;
    let service = build_service(&config)?;

    match cli.command {
        Commands::Serve { port } => {
            metrics::init_metrics();
            let port = port.unwrap_or(config.server.port);
            server::start_server(Arc::new(service), port).await?;
        }
        Commands::Standings {
            contest_id,
            roster_only,
        } => {
            let view = if roster_only {
                service.roster_standings(contest_id).await?
            } else {
                service.standings(contest_id).await?
            };
            let response = StandingsResponse::from(view);
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        Commands::Contests { gym, limit } => {
            let mut contests = service.contests(gym).await?;
            if let Some(limit) = limit {
                contests.truncate(limit);
            }
            println!("{}", serde_json::to_string_pretty(&contests)?);
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    let _log_guard = logging::init_logging();

    let cli = Cli::parse();
    if let Err(e) = run(cli).await {
        error!("{:#}", e);
        return Err(e);
    }
    Ok(())
}
