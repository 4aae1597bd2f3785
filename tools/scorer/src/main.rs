//! Terminal front-end for recording and following games.
//!
//! `record` reads one play per line from stdin (`ball`, `strike`, `foul`,
//! `out`, `single`, `double`, `triple`, `homerun`, `walk`, `pitcher`,
//! `end`, `undo`, `pull`, `log`, `quit`).

mod board;

use board::TextSink;
use clap::{Args, Parser, Subcommand};
use score_core::{GameSetup, TeamNames, DEFAULT_INNINGS};
use score_host::{Command, GameId};
use score_sync::{
    config::DEFAULT_ENDPOINT, spawn_pull_loop, HttpRemote, MemoryRemote, RemoteStore,
    SyncConfig, SyncError, SyncHandle,
};
use std::{sync::Arc, time::Duration};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "scorer")]
#[command(about = "Wiffleball scoreboard for the terminal")]
struct Cli {
    /// Base URL of the remote store
    #[arg(short, long, global = true, default_value = DEFAULT_ENDPOINT)]
    endpoint: String,

    #[command(subcommand)]
    command: Mode,
}

#[derive(Subcommand, Debug)]
enum Mode {
    /// Record plays for a new or resumed game
    Record(RecordArgs),
    /// Follow a game recorded on another device
    Watch {
        #[arg(short, long)]
        game_id: String,
        /// Seconds between pulls
        #[arg(long, default_value = "10")]
        pull_secs: u64,
    },
    /// List leagues
    Leagues,
    /// List teams and their members
    Teams,
    /// List unfinished games of a league
    Games {
        #[arg(short, long)]
        league: String,
    },
    /// Print a fresh game id
    NewId {
        #[arg(short, long)]
        league: Option<String>,
    },
}

#[derive(Args, Debug)]
struct RecordArgs {
    /// Resume this game instead of starting a new one
    #[arg(short, long)]
    game_id: Option<String>,

    #[arg(short, long, default_value = "")]
    league: String,

    #[arg(long)]
    league_name: Option<String>,

    #[arg(long, default_value = "Visitors")]
    top: String,

    #[arg(long, default_value = "Home")]
    bottom: String,

    #[arg(short, long, default_value_t = DEFAULT_INNINGS)]
    innings: u32,

    /// Seconds between pulls
    #[arg(long, default_value = "10")]
    pull_secs: u64,

    /// Keep the game in memory instead of a remote store
    #[arg(long)]
    offline: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Mode::Record(args) if args.offline => record(MemoryRemote::new(), &cli.endpoint, args).await,
        Mode::Record(args) => record(HttpRemote::new(&cli.endpoint)?, &cli.endpoint, args).await,
        Mode::Watch { game_id, pull_secs } => {
            let config = SyncConfig::viewer(cli.endpoint.as_str())
                .with_pull_interval(Duration::from_secs(pull_secs));
            watch(HttpRemote::new(&cli.endpoint)?, &game_id, config).await
        }
        Mode::Leagues => {
            for league in HttpRemote::new(&cli.endpoint)?.leagues().await? {
                println!("{}\t{}\t{}\t{}", league.id, league.name, league.status, league.start);
            }
            Ok(())
        }
        Mode::Teams => {
            for team in HttpRemote::new(&cli.endpoint)?.team_master().await? {
                println!("{} ({})", team.name, team.id);
                for member in team.members {
                    println!(
                        "  {:>2} #{:<3} {:<3} {}",
                        member.default_order, member.number, member.pos, member.name
                    );
                }
            }
            Ok(())
        }
        Mode::Games { league } => {
            for game in HttpRemote::new(&cli.endpoint)?.games_by_league(&league).await? {
                println!(
                    "{}\t{} {} - {} {}\t{} {}",
                    game.id,
                    game.top_team,
                    game.score.top,
                    game.score.bottom,
                    game.bottom_team,
                    if game.is_bottom { "bot" } else { "top" },
                    game.inning,
                );
            }
            Ok(())
        }
        Mode::NewId { league } => {
            println!("{}", GameId::generate(league.as_deref()));
            Ok(())
        }
    }
}

async fn record<R: RemoteStore>(
    remote: R,
    endpoint: &str,
    args: RecordArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = SyncConfig::recorder(endpoint).with_pull_interval(Duration::from_secs(args.pull_secs));
    let sink = Arc::new(TextSink);

    let (handle, pull_loop) = match args.game_id {
        Some(game_id) => {
            let handle = SyncHandle::attach(remote, &game_id, config, sink).await?;
            let pull_loop = spawn_pull_loop(handle.clone());
            (handle, pull_loop)
        }
        None => {
            let league = (!args.league.is_empty()).then_some(args.league.as_str());
            let setup = GameSetup {
                game_id: GameId::generate(league).into_string(),
                league_id: args.league.clone(),
                league_name: args.league_name,
                teams: TeamNames::new(args.top, args.bottom),
                total_innings: args.innings,
            };
            println!("game {}", setup.game_id);
            SyncHandle::start(remote, setup, config, sink).await
        }
    };

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let word = line.trim().to_ascii_lowercase();
        let result = match word.as_str() {
            "" => continue,
            "quit" | "q" => break,
            "log" => {
                for record in handle.play_log().await {
                    println!(
                        "{} {} {}: {}",
                        record.half.as_str(),
                        record.inning,
                        record.batting_team,
                        record.kind.label()
                    );
                }
                continue;
            }
            "pull" => handle.pull().await.map(|_| ()),
            "undo" => handle.undo().await.map(|dispatch| {
                if !dispatch.change {
                    eprintln!("nothing to undo");
                }
            }),
            other => match other.parse::<Command>() {
                Ok(command) => handle.command(command).await.map(|_| ()),
                Err(error) => {
                    eprintln!("{error}");
                    continue;
                }
            },
        };
        report(result);
    }

    handle.request_shutdown();
    pull_loop.abort();
    Ok(())
}

async fn watch<R: RemoteStore>(
    remote: R,
    game_id: &str,
    config: SyncConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let handle = SyncHandle::attach(remote, game_id, config, Arc::new(TextSink)).await?;
    let mut pull_loop = spawn_pull_loop(handle.clone());

    tokio::select! {
        joined = &mut pull_loop => joined?,
        signal = tokio::signal::ctrl_c() => {
            signal?;
            handle.request_shutdown();
        }
    }
    pull_loop.abort();
    Ok(())
}

fn report(result: Result<(), SyncError>) {
    match result {
        // The sink has already shown the status.
        Ok(()) | Err(SyncError::Busy) => {}
        Err(error) => eprintln!("error: {error}"),
    }
}
