//! Plain-text scoreboard drawn to the terminal.

use score_core::{GameState, Half, Phase, Runners};
use score_sync::{RenderSink, SyncStatus};

/// Prints every rendered state to stdout and sync status to stderr.
#[derive(Clone, Copy, Debug, Default)]
pub struct TextSink;

impl RenderSink for TextSink {
    fn render(&self, state: &GameState) {
        println!("{}", scoreboard(state));
    }

    fn status(&self, status: &SyncStatus) {
        eprintln!("[{status}]");
    }
}

/// Line score for both teams followed by the situation line.
pub fn scoreboard(state: &GameState) -> String {
    let innings = state.total_innings.max(state.current_inning);
    let width = state
        .teams
        .top
        .chars()
        .count()
        .max(state.teams.bottom.chars().count());

    let mut out = format!("{:<width$}", "");
    for inning in 1..=innings {
        out.push_str(&format!("{inning:>3}"));
    }
    out.push_str("   R\n");

    for half in Half::ALL {
        out.push_str(&format!("{:<width$}", state.teams.batting(half)));
        for inning in 1..=innings {
            match state.score.runs(half, inning) {
                Some(runs) => out.push_str(&format!("{runs:>3}")),
                None => out.push_str("  -"),
            }
        }
        out.push_str(&format!("{:>4}\n", state.score.total(half)));
    }

    out.push_str(&situation(state));
    out
}

fn situation(state: &GameState) -> String {
    let inning = match state.phase() {
        Phase::Ended => return "Final".to_string(),
        Phase::TopHalf => format!("Top {}", state.current_inning),
        Phase::BottomHalf => format!("Bot {}", state.current_inning),
    };
    format!(
        "{inning}  B{} S{} O{}  bases {}  pitches {}",
        state.count.balls,
        state.count.strikes,
        state.count.outs,
        bases(&state.runners),
        state.pitching.active(state.half),
    )
}

fn bases(runners: &Runners) -> String {
    [(runners.first, '1'), (runners.second, '2'), (runners.third, '3')]
        .iter()
        .map(|&(on, mark)| if on { mark } else { '-' })
        .collect()
}
