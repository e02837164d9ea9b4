//! Team/opponent score and per-period team fouls.
//!
//! Always summed over the full log, never kept as a running counter, so the
//! numbers stay right after an undo or a late edit.

use std::collections::BTreeMap;

use courtside_types::{Event, EventType, GameId};

/// Both teams' points.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Scoreboard {
    /// Our points.
    pub team: u32,
    /// Opponent points.
    pub opponent: u32,
}

impl Scoreboard {
    /// The score after one more event of the given type.
    #[must_use]
    pub const fn apply(self, event_type: EventType) -> Self {
        Self {
            team: self.team.saturating_add(event_type.team_points()),
            opponent: self.opponent.saturating_add(event_type.opponent_points()),
        }
    }
}

/// Sum both scores over the log.
pub fn scoreboard(events: &[Event]) -> Scoreboard {
    events
        .iter()
        .fold(Scoreboard::default(), |board, e| board.apply(e.event_type))
}

/// Our points.
pub fn team_score(events: &[Event]) -> u32 {
    scoreboard(events).team
}

/// Opponent points.
pub fn opponent_score(events: &[Event]) -> u32 {
    scoreboard(events).opponent
}

/// Personal fouls for the given game and period.
pub fn team_fouls_in_period(events: &[Event], game_id: GameId, period: u32) -> u32 {
    let count = events
        .iter()
        .filter(|e| e.event_type == EventType::Pf && e.game_id == game_id && e.period == period)
        .count();
    u32::try_from(count).unwrap_or(u32::MAX)
}

/// Personal fouls per period for the given game. Periods without fouls are
/// absent.
pub fn fouls_by_period(events: &[Event], game_id: GameId) -> BTreeMap<u32, u32> {
    let mut fouls: BTreeMap<u32, u32> = BTreeMap::new();
    for e in events {
        if e.event_type == EventType::Pf && e.game_id == game_id {
            let slot = fouls.entry(e.period).or_insert(0);
            *slot = slot.saturating_add(1);
        }
    }
    fouls
}
