//! CLI entry point for the genres read/write service.
//!
//! Reads genre records as JSON from stdin and writes results as JSON to
//! stdout. Logs go to stderr.

use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

use genres_core::config::Settings;
use genres_graph::{GenreService, GraphClient, GraphConfig};

#[derive(Parser)]
#[command(name = "genres-rw")]
#[command(about = "Read and write genres in the Neo4j concept graph")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Config file prefix (default: genres).
    #[arg(short, long, default_value = "genres", global = true)]
    config: String,
}

#[derive(Subcommand)]
enum Command {
    /// Ensure uniqueness constraints exist.
    Init,
    /// Write a genre (reads one JSON record from stdin).
    Write,
    /// Read a genre by uuid.
    Read {
        #[arg(long)]
        uuid: String,
    },
    /// Delete a genre by uuid.
    Delete {
        #[arg(long)]
        uuid: String,
    },
    /// Count stored genres.
    Count,
    /// Check connectivity to Neo4j.
    Check,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let settings = Settings::load(&cli.config)?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&settings.log_filter));
    fmt().with_env_filter(filter).with_writer(std::io::stderr).init();

    let graph = GraphClient::connect(&GraphConfig::from(&settings.neo4j)).await?;
    let service = GenreService::new(graph);

    match cli.command {
        Command::Init => {
            service.initialise().await?;
        }
        Command::Write => {
            let (genre, uuid) = GenreService::<GraphClient>::decode_json(std::io::stdin().lock())?;
            service.write(&genre).await?;
            println!("{}", serde_json::json!({ "uuid": uuid }));
        }
        Command::Read { ref uuid } => {
            let (genre, found) = service.read(uuid).await?;
            if !found {
                anyhow::bail!("genre {uuid} not found");
            }
            println!("{}", serde_json::to_string(&genre)?);
        }
        Command::Delete { ref uuid } => {
            let outcome = service.delete(uuid).await?;
            println!("{}", serde_json::to_string(&outcome)?);
        }
        Command::Count => {
            let count = service.count().await?;
            println!("{}", serde_json::json!({ "count": count }));
        }
        Command::Check => {
            service.check().await?;
            tracing::info!("Neo4j reachable");
        }
    }

    Ok(())
}
