//! On-court reconstruction.
//!
//! The on-court set is never stored. It is rebuilt by folding sub-in and
//! sub-out events in canonical order: sub-in adds (idempotent), sub-out
//! removes (no-op if absent), everything else is ignored.

use std::collections::BTreeSet;

use courtside_types::{Event, EventType, PlayerId};

use crate::ordering::canonical_order;

/// Maximum number of players a team may have on court.
pub const MAX_ON_COURT: usize = 5;

/// Fold state for the on-court set.
///
/// Shared by plus-minus and boundary repair so all three agree on who was
/// on court at any point of the replay.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OnCourt {
    players: BTreeSet<PlayerId>,
}

impl OnCourt {
    /// An empty court.
    pub const fn new() -> Self {
        Self {
            players: BTreeSet::new(),
        }
    }

    /// Apply one event. Returns `true` if membership changed.
    pub fn apply(&mut self, event: &Event) -> bool {
        let Some(player_id) = event.player_id else {
            return false;
        };
        match event.event_type {
            EventType::SubIn => self.players.insert(player_id),
            EventType::SubOut => self.players.remove(&player_id),
            _ => false,
        }
    }

    /// Whether the player is currently on court.
    pub fn contains(&self, player_id: PlayerId) -> bool {
        self.players.contains(&player_id)
    }

    /// Number of players on court.
    pub fn len(&self) -> usize {
        self.players.len()
    }

    /// Whether nobody is on court.
    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    /// Iterate the on-court players in id order.
    pub fn iter(&self) -> impl Iterator<Item = PlayerId> + '_ {
        self.players.iter().copied()
    }

    /// Empty the court.
    pub fn clear(&mut self) {
        self.players.clear();
    }

    /// Consume into the underlying set.
    pub fn into_set(self) -> BTreeSet<PlayerId> {
        self.players
    }
}

/// Replay the log and return the players currently on court.
pub fn on_court_ids(events: &[Event]) -> BTreeSet<PlayerId> {
    let mut court = OnCourt::new();
    for event in canonical_order(events) {
        court.apply(event);
    }
    court.into_set()
}

/// Split a roster into (on court, bench), keeping roster order in both.
pub fn partition_roster(
    roster: &[PlayerId],
    on_court: &BTreeSet<PlayerId>,
) -> (Vec<PlayerId>, Vec<PlayerId>) {
    roster.iter().copied().partition(|id| on_court.contains(id))
}
