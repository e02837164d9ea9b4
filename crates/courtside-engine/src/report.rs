//! Post-game summary: the box score table printed by `summary`.

use std::collections::{BTreeMap, BTreeSet};

use courtside_replay::{
    ClockReading, box_scores, compare_game_time, detect_starters, fouls_by_period, format_minutes,
    plus_minus, scoreboard, seconds_played, team_totals,
};
use courtside_types::{Event, GameId, GameMeta, PlayerBox, PlayerId, TeamTotals};
use serde::Serialize;

/// One player's row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlayerLine {
    /// Player id.
    pub player_id: PlayerId,
    /// Jersey number.
    pub number: u32,
    /// Display name.
    pub name: String,
    /// In the detected starting five.
    pub starter: bool,
    /// Seconds on court.
    pub seconds: u32,
    /// Net points while on court.
    pub plus_minus: i32,
    /// Box score columns.
    pub line: PlayerBox,
}

/// Everything `summary` prints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameSummary {
    /// Game id.
    pub game_id: GameId,
    /// Opponent team name.
    pub opponent_name: String,
    /// League round.
    pub round_number: u32,
    /// Our score replayed from the log.
    pub team_score: u32,
    /// Opponent score replayed from the log.
    pub opponent_score: u32,
    /// Whether the game has been closed with `end`.
    pub is_final: bool,
    /// Starters first, then the bench, each in roster order.
    pub players: Vec<PlayerLine>,
    /// Team line.
    pub totals: TeamTotals,
    /// Team fouls per period.
    pub fouls_by_period: BTreeMap<u32, u32>,
}

/// Replay the log into a summary.
///
/// Closed games are measured to the final buzzer; open ones to the latest
/// logged clock reading.
pub fn build_summary(meta: &GameMeta, events: &[Event]) -> GameSummary {
    let now = if meta.final_team_score.is_some() {
        ClockReading::final_buzzer(meta.quarters_count)
    } else {
        events
            .iter()
            .max_by(|a, b| compare_game_time(a, b))
            .map_or(ClockReading::new(1, meta.quarter_length_sec), |e| {
                ClockReading::new(e.period, e.clock_sec_remaining)
            })
    };

    let boxes = box_scores(events);
    let seconds = seconds_played(events, meta.quarter_length_sec, now);
    let pm = plus_minus(events);
    let starters: BTreeSet<PlayerId> = detect_starters(events);
    let board = scoreboard(events);

    let line_for = |p: &courtside_types::RosterPlayer| PlayerLine {
        player_id: p.id,
        number: p.number,
        name: p.name.clone(),
        starter: starters.contains(&p.id),
        seconds: seconds.get(&p.id).copied().unwrap_or(0),
        plus_minus: pm.get(&p.id).copied().unwrap_or(0),
        line: boxes.get(&p.id).copied().unwrap_or_default(),
    };
    let (first, rest): (Vec<_>, Vec<_>) = meta
        .roster
        .iter()
        .map(line_for)
        .partition(|line| line.starter);
    let mut players = first;
    players.extend(rest);

    GameSummary {
        game_id: meta.id,
        opponent_name: meta.opponent_name.clone(),
        round_number: meta.round_number,
        team_score: board.team,
        opponent_score: board.opponent,
        is_final: meta.final_team_score.is_some(),
        players,
        totals: team_totals(&boxes, &seconds),
        fouls_by_period: fouls_by_period(events, meta.id),
    }
}

const STAT_WIDTHS: [usize; 10] = [4, 7, 7, 7, 4, 4, 4, 4, 4, 4];

/// Plain-text table for the terminal.
pub fn render_table(summary: &GameSummary) -> String {
    let mut out = String::new();
    let status = if summary.is_final { "final" } else { "in progress" };
    out.push_str(&format!(
        "Round {} vs {}: {}-{} ({status})\n",
        summary.round_number, summary.opponent_name, summary.team_score, summary.opponent_score
    ));

    let header = columns(&[
        "PTS", "FG", "3P", "FT", "REB", "AST", "STL", "BLK", "TOV", "PF",
    ]);
    push_row(&mut out, "#", "Player", "MIN", &header, "  +/-");
    for p in &summary.players {
        let tail = format!(" {:>4}{}", p.plus_minus, if p.starter { " *" } else { "" });
        push_row(
            &mut out,
            &p.number.to_string(),
            &p.name,
            &format_minutes(p.seconds),
            &stat_columns(&p.line),
            &tail,
        );
    }
    push_row(
        &mut out,
        "",
        "Team",
        &format_minutes(summary.totals.total_sec),
        &stat_columns(&summary.totals.line),
        "",
    );

    let fouls: Vec<String> = summary
        .fouls_by_period
        .iter()
        .map(|(period, count)| format!("Q{period} {count}"))
        .collect();
    if !fouls.is_empty() {
        out.push_str(&format!("Team fouls: {}\n", fouls.join(", ")));
    }
    out
}

fn push_row(out: &mut String, number: &str, name: &str, minutes: &str, stats: &str, tail: &str) {
    out.push_str(&format!("{number:>3} {name:<20} {minutes:>6} {stats}{tail}\n"));
}

fn columns<S: AsRef<str>>(cells: &[S]) -> String {
    cells
        .iter()
        .zip(STAT_WIDTHS)
        .map(|(cell, width)| format!("{:>width$}", cell.as_ref()))
        .collect::<Vec<_>>()
        .join(" ")
}

fn ratio(made: u32, attempted: u32) -> String {
    format!("{made}/{attempted}")
}

fn stat_columns(b: &PlayerBox) -> String {
    columns(&[
        b.pts.to_string(),
        ratio(b.fgm, b.fga),
        ratio(b.three_pm, b.three_pa),
        ratio(b.ftm, b.fta),
        b.reb_total.to_string(),
        b.ast.to_string(),
        b.stl.to_string(),
        b.blk.to_string(),
        b.tov.to_string(),
        b.pf.to_string(),
    ])
}
