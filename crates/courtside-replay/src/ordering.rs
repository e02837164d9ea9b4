//! Canonical game-chronological ordering of events.
//!
//! The store may hand events back in any order, and undo/repair means
//! creation order and game order regularly disagree. Every temporal
//! computation in this crate goes through [`canonical_order`] first.
//!
//! The key is `(period asc, clock_sec_remaining desc, created_at asc, id asc)`:
//! earlier periods first, then more time left on the clock first, then
//! whichever was recorded first, then the id as a total tie-break.

use core::cmp::{Ordering, Reverse};

use chrono::{DateTime, Utc};
use courtside_types::{Event, EventId};

/// The sort key for one event.
pub type GameTimeKey = (u32, Reverse<u32>, DateTime<Utc>, EventId);

/// Build the canonical sort key for an event.
pub const fn game_time_key(event: &Event) -> GameTimeKey {
    (
        event.period,
        Reverse(event.clock_sec_remaining),
        event.created_at,
        event.id,
    )
}

/// Compare two events by game time.
pub fn compare_game_time(a: &Event, b: &Event) -> Ordering {
    game_time_key(a).cmp(&game_time_key(b))
}

/// Borrow the events in canonical order without cloning them.
pub fn canonical_order(events: &[Event]) -> Vec<&Event> {
    let mut sorted: Vec<&Event> = events.iter().collect();
    sorted.sort_by(|a, b| compare_game_time(a, b));
    sorted
}

/// Sort an owned event list into canonical order.
pub fn sort_canonical(mut events: Vec<Event>) -> Vec<Event> {
    events.sort_by(compare_game_time);
    events
}
