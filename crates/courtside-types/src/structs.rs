//! Core data structs for the Courtside tracker.
//!
//! Only [`Event`] (and its pre-insert form [`NewEvent`]) and [`GameMeta`]
//! are ever persisted. Everything else in this module is a derived view:
//! rebuilt from the event log on every change and never written back.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::EventType;
use crate::ids::{EventId, GameId, PlayerId};

// ---------------------------------------------------------------------------
// Events
// ---------------------------------------------------------------------------

/// A single logged game event.
///
/// Immutable once created. The only way an event leaves the log is undo or
/// a repair that deletes it by id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Event {
    /// Store-assigned identifier.
    pub id: EventId,
    /// The game this event belongs to.
    pub game_id: GameId,
    /// The player credited with the event, if any.
    pub player_id: Option<PlayerId>,
    /// What happened.
    pub event_type: EventType,
    /// Period number, starting at 1.
    pub period: u32,
    /// Seconds left on the game clock when the event happened.
    pub clock_sec_remaining: u32,
    /// Creation timestamp. Strictly increasing within one session.
    pub created_at: DateTime<Utc>,
    /// Our score including this event. Only set on score/opponent events.
    pub team_score_at_event: Option<u32>,
    /// Opponent score including this event. Only set on score/opponent events.
    pub opponent_score_at_event: Option<u32>,
}

/// An event that has not been stored yet (no id).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewEvent {
    /// The game this event belongs to.
    pub game_id: GameId,
    /// The player credited with the event, if any.
    pub player_id: Option<PlayerId>,
    /// What happened.
    pub event_type: EventType,
    /// Period number, starting at 1.
    pub period: u32,
    /// Seconds left on the game clock.
    pub clock_sec_remaining: u32,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Our score snapshot, if any.
    pub team_score_at_event: Option<u32>,
    /// Opponent score snapshot, if any.
    pub opponent_score_at_event: Option<u32>,
}

impl NewEvent {
    /// Attach a store-assigned id, producing the stored [`Event`].
    pub const fn into_event(self, id: EventId) -> Event {
        Event {
            id,
            game_id: self.game_id,
            player_id: self.player_id,
            event_type: self.event_type,
            period: self.period,
            clock_sec_remaining: self.clock_sec_remaining,
            created_at: self.created_at,
            team_score_at_event: self.team_score_at_event,
            opponent_score_at_event: self.opponent_score_at_event,
        }
    }
}

// ---------------------------------------------------------------------------
// Clock
// ---------------------------------------------------------------------------

/// Snapshot of the live game clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct GameClock {
    /// Current period, starting at 1.
    pub period: u32,
    /// Seconds left in the current period.
    pub sec_remaining: u32,
    /// Whether the clock is counting down.
    pub is_running: bool,
}

// ---------------------------------------------------------------------------
// Game metadata
// ---------------------------------------------------------------------------

/// A player on the game's roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct RosterPlayer {
    /// Player identifier.
    pub id: PlayerId,
    /// Display name.
    pub name: String,
    /// Jersey number.
    pub number: u32,
}

/// Game metadata owned by the game-metadata collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct GameMeta {
    /// Game identifier.
    pub id: GameId,
    /// Opponent team name.
    pub opponent_name: String,
    /// League round number.
    pub round_number: u32,
    /// Calendar date of the game, if known.
    pub game_date: Option<NaiveDate>,
    /// Length of one period in seconds.
    pub quarter_length_sec: u32,
    /// Number of regulation periods.
    pub quarters_count: u32,
    /// Players dressed for this game, in display order.
    pub roster: Vec<RosterPlayer>,
    /// Final team score, set by end-of-game.
    pub final_team_score: Option<u32>,
    /// Final opponent score, set by end-of-game.
    pub final_opponent_score: Option<u32>,
    /// When the game record was created.
    pub created_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Derived stats
// ---------------------------------------------------------------------------

/// Box score line for one player.
///
/// Percentages are whole numbers (0-100), 0 when nothing was attempted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct PlayerBox {
    /// Total points.
    pub pts: u32,
    /// Free throws made.
    pub ftm: u32,
    /// Free throws attempted.
    pub fta: u32,
    /// Two-pointers made.
    pub two_pm: u32,
    /// Two-pointers attempted.
    pub two_pa: u32,
    /// Three-pointers made.
    pub three_pm: u32,
    /// Three-pointers attempted.
    pub three_pa: u32,
    /// Field goals made (twos and threes).
    pub fgm: u32,
    /// Field goals attempted (twos and threes).
    pub fga: u32,
    /// Field goal percentage.
    pub fg_pct: u32,
    /// Three-point percentage.
    pub three_pct: u32,
    /// Free throw percentage.
    pub ft_pct: u32,
    /// Offensive rebounds.
    pub reb_off: u32,
    /// Defensive rebounds.
    pub reb_def: u32,
    /// Total rebounds.
    pub reb_total: u32,
    /// Assists.
    pub ast: u32,
    /// Steals.
    pub stl: u32,
    /// Blocks.
    pub blk: u32,
    /// Turnovers.
    pub tov: u32,
    /// Personal fouls.
    pub pf: u32,
}

/// Team-wide totals for the summary footer row.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct TeamTotals {
    /// Sum of every player's seconds on court.
    pub total_sec: u32,
    /// Summed box score columns, percentages recomputed from the sums.
    pub line: PlayerBox,
}

/// Everything the live-game screen renders, recomputed from the log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct LiveView {
    /// The game being tracked.
    pub game_id: GameId,
    /// Current clock reading.
    pub clock: GameClock,
    /// Every event, in canonical game order.
    pub events: Vec<Event>,
    /// Currently selected player, if any.
    pub selected_player: Option<PlayerId>,
    /// Rostered players on court, in roster order.
    pub on_court: Vec<PlayerId>,
    /// Rostered players on the bench, in roster order.
    pub bench: Vec<PlayerId>,
    /// Per-player box scores.
    pub box_scores: BTreeMap<PlayerId, PlayerBox>,
    /// Per-player plus-minus.
    pub plus_minus: BTreeMap<PlayerId, i32>,
    /// Per-player seconds played, including live open intervals.
    pub seconds_played: BTreeMap<PlayerId, u32>,
    /// Our score.
    pub team_score: u32,
    /// Opponent score.
    pub opponent_score: u32,
    /// Our personal fouls in the current period.
    pub team_fouls_this_period: u32,
    /// Whether the game has been ended.
    pub game_over: bool,
}
