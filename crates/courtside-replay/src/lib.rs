//! Event-log replay for a single basketball game.
//!
//! The event log is the only source of truth. Everything the scorer sees
//! (who is on court, the box score, the score, team fouls, minutes, and
//! plus-minus) is a pure function of the log and, for minutes, the current
//! clock reading. Nothing here keeps state between calls.
//!
//! # Modules
//!
//! - [`ordering`] -- The canonical `(period, clock desc, created_at, id)` order
//! - [`roster`] -- On-court set and roster partitioning
//! - [`box_score`] -- Per-player counting stats and shooting percentages
//! - [`score`] -- Team/opponent score and per-period fouls
//! - [`playing_time`] -- Seconds played from substitution intervals
//! - [`plus_minus`] -- Net points while on court
//! - [`reconcile`] -- Planning synthetic boundary substitutions
//! - [`summary`] -- Team totals, starters, minutes formatting
//!
//! # Usage
//!
//! ```
//! use courtside_replay::{ClockReading, box_scores, seconds_played, team_score};
//!
//! let events = Vec::new();
//! assert_eq!(team_score(&events), 0);
//! assert!(box_scores(&events).is_empty());
//! assert!(seconds_played(&events, 600, ClockReading::new(1, 600)).is_empty());
//! ```

pub mod box_score;
pub mod ordering;
pub mod playing_time;
pub mod plus_minus;
pub mod reconcile;
pub mod roster;
pub mod score;
pub mod summary;

pub use box_score::{box_scores, finalize, shooting_pct};
pub use ordering::{canonical_order, compare_game_time, game_time_key, sort_canonical};
pub use playing_time::{ClockReading, elapsed_seconds, seconds_played};
pub use plus_minus::plus_minus;
pub use reconcile::{BoundaryFix, plan_boundary_repairs};
pub use roster::{MAX_ON_COURT, OnCourt, on_court_ids, partition_roster};
pub use score::{
    Scoreboard, fouls_by_period, opponent_score, scoreboard, team_fouls_in_period, team_score,
};
pub use summary::{detect_starters, format_minutes, team_totals};

#[cfg(test)]
pub(crate) mod testutil {
    //! Compact event builders for unit tests.

    use chrono::{DateTime, Utc};
    use courtside_types::{Event, EventId, EventType, GameId, PlayerId};
    use uuid::Uuid;

    /// The one game every test event belongs to.
    pub fn game() -> GameId {
        GameId::from(Uuid::from_u128(0xC0DE))
    }

    /// A stable player id.
    pub fn player(n: u128) -> PlayerId {
        PlayerId::from(Uuid::from_u128(n))
    }

    /// A timestamp `ms` milliseconds after the epoch.
    pub fn at_ms(ms: u64) -> DateTime<Utc> {
        DateTime::from_timestamp_millis(i64::try_from(ms).unwrap_or(i64::MAX)).unwrap_or_default()
    }

    /// An event created at `seq` ms, with id `seq`. Higher `seq` means
    /// recorded later.
    pub fn ev(
        player_id: Option<PlayerId>,
        event_type: EventType,
        period: u32,
        clock_sec_remaining: u32,
        seq: u64,
    ) -> Event {
        Event {
            id: EventId::from(Uuid::from_u128(u128::from(seq))),
            game_id: game(),
            player_id,
            event_type,
            period,
            clock_sec_remaining,
            created_at: at_ms(seq),
            team_score_at_event: None,
            opponent_score_at_event: None,
        }
    }
}
