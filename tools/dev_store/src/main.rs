use clap::Parser;
use dev_store::{router, Seed, Store};
use std::{net::SocketAddr, path::PathBuf, sync::Arc};
use tokio::{net::TcpListener, sync::RwLock};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "dev_store")]
#[command(about = "In-memory scoreboard store for local development")]
struct Args {
    /// Port to listen on
    #[arg(short, long, default_value = "8080")]
    port: u16,

    /// Address to bind
    #[arg(long, default_value = "127.0.0.1")]
    host: std::net::IpAddr,

    /// JSON file with leagues, teams and games to preload
    #[arg(short, long)]
    seed: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let seed = match &args.seed {
        Some(path) => serde_json::from_str::<Seed>(&std::fs::read_to_string(path)?)?,
        None => Seed::default(),
    };
    tracing::info!(
        leagues = seed.leagues.len(),
        teams = seed.teams.len(),
        games = seed.games.len(),
        "seed loaded"
    );

    let store = Arc::new(RwLock::new(Store::from_seed(seed)));
    let app = router(store);

    let addr = SocketAddr::new(args.host, args.port);
    let listener = TcpListener::bind(addr).await?;
    tracing::info!("dev store listening on http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
