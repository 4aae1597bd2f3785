//! Conversion between the local game model and the replicated schema.
//!
//! Reads are apply-or-nothing: any inconsistency rejects the whole record.

use crate::errors::WireError;
use chrono::{DateTime, Utc};
use score_core::count::{BALLS_FOR_WALK, OUTS_PER_HALF, STRIKES_FOR_OUT};
use score_core::{
    Count, GameState, Half, PitcherUsage, PlayRecord, Runners, ScoreLedger, TeamNames,
};
use score_types::{
    WireCount, WireLogEntry, WirePitching, WireRunners, WireScore, WireState, WireTotals,
    SCHEMA_VERSION,
};

/// Serializes `state` for a push stamped with `revision` and `updated_at`.
pub fn to_wire(state: &GameState, revision: u64, updated_at: DateTime<Utc>) -> WireState {
    WireState {
        schema_version: SCHEMA_VERSION,
        game_id: state.game_id.clone(),
        league_id: state.league_id.clone(),
        league_name: state.league_name.clone(),
        top_team_name: state.teams.top.clone(),
        bottom_team_name: state.teams.bottom.clone(),
        total_innings: state.total_innings,
        current_inning: state.current_inning,
        is_bottom_inning: state.half.is_bottom(),
        is_game_ended: state.ended,
        counts: WireCount {
            ball: state.count.balls,
            strike: state.count.strikes,
            out: state.count.outs,
        },
        runners: WireRunners {
            base1: state.runners.first,
            base2: state.runners.second,
            base3: state.runners.third,
        },
        score: WireScore {
            top: state.score.innings(Half::Top).clone(),
            bottom: state.score.innings(Half::Bottom).clone(),
        },
        total_score: WireTotals {
            top: state.score.total(Half::Top),
            bottom: state.score.total(Half::Bottom),
        },
        pitching: WirePitching {
            top: state.pitching.appearances(Half::Top).to_vec(),
            bottom: state.pitching.appearances(Half::Bottom).to_vec(),
        },
        revision,
        updated_at: Some(updated_at),
    }
}

/// Rebuilds a local game from a pulled record.
pub fn from_wire(wire: WireState) -> Result<GameState, WireError> {
    if wire.schema_version != SCHEMA_VERSION {
        return Err(WireError::UnsupportedSchema {
            found: wire.schema_version,
        });
    }
    if wire.game_id.is_empty() {
        return Err(WireError::MissingGameId);
    }

    let counts = wire.counts;
    if counts.ball >= BALLS_FOR_WALK
        || counts.strike >= STRIKES_FOR_OUT
        || counts.out >= OUTS_PER_HALF
    {
        return Err(WireError::CountOutOfRange {
            balls: counts.ball,
            strikes: counts.strike,
            outs: counts.out,
        });
    }

    // The current inning may run past the scheduled count.
    if wire.total_innings == 0 || wire.current_inning == 0 {
        return Err(WireError::InvalidInnings {
            total: wire.total_innings,
            current: wire.current_inning,
        });
    }

    let totals = [wire.total_score.top, wire.total_score.bottom];
    let score = ScoreLedger::from_parts(wire.score.top, wire.score.bottom, totals)
        .map_err(|half| WireError::InconsistentTotals { half })?;

    Ok(GameState {
        game_id: wire.game_id,
        league_id: wire.league_id,
        league_name: wire.league_name,
        teams: TeamNames::new(wire.top_team_name, wire.bottom_team_name),
        total_innings: wire.total_innings,
        current_inning: wire.current_inning,
        half: Half::from_bottom(wire.is_bottom_inning),
        ended: wire.is_game_ended,
        count: Count {
            balls: counts.ball,
            strikes: counts.strike,
            outs: counts.out,
        },
        runners: Runners {
            first: wire.runners.base1,
            second: wire.runners.base2,
            third: wire.runners.base3,
        },
        score,
        pitching: PitcherUsage::from_parts(wire.pitching.top, wire.pitching.bottom),
        updated_at_ms: wire
            .updated_at
            .map(|at| at.timestamp_millis())
            .unwrap_or(0),
    })
}

/// Audit-trail entry for a play.
pub fn log_entry(record: &PlayRecord, league_name: Option<&str>) -> WireLogEntry {
    WireLogEntry {
        inning: record.inning,
        is_bottom: record.half.is_bottom(),
        team: record.batting_team.clone(),
        play: record.kind.label().to_string(),
        league_name: league_name.map(str::to_string),
    }
}
