//! Seconds-played reconstruction from substitution intervals.
//!
//! Each `(period, clock_sec_remaining)` pair maps onto a single game-wide
//! timeline ("elapsed game-seconds"). Sub-ins open an interval, sub-outs
//! close it. Intervals still open after the replay accrue time up to the
//! caller's current clock reading, which is what makes on-court minutes
//! tick up live without any event being written for the tick itself.

use std::collections::BTreeMap;

use courtside_types::{Event, EventType, PlayerId};

use crate::ordering::canonical_order;

/// A point on the game clock: period plus seconds remaining in it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClockReading {
    /// Period number, starting at 1.
    pub period: u32,
    /// Seconds remaining in the period.
    pub sec_remaining: u32,
}

impl ClockReading {
    /// Build a reading.
    pub const fn new(period: u32, sec_remaining: u32) -> Self {
        Self {
            period,
            sec_remaining,
        }
    }

    /// The reading at the final buzzer of a regulation game.
    pub const fn final_buzzer(quarters_count: u32) -> Self {
        Self::new(quarters_count, 0)
    }

    /// Elapsed game-seconds for this reading.
    pub const fn elapsed(self, quarter_length_sec: u32) -> u32 {
        elapsed_seconds(self.period, self.sec_remaining, quarter_length_sec)
    }
}

/// `(period - 1) * quarter_length + (quarter_length - clock_sec_remaining)`.
///
/// Saturates instead of wrapping; a clock reading above the quarter length
/// counts as the start of the period.
pub const fn elapsed_seconds(period: u32, clock_sec_remaining: u32, quarter_length_sec: u32) -> u32 {
    let completed = period.saturating_sub(1).saturating_mul(quarter_length_sec);
    let into_period = quarter_length_sec.saturating_sub(clock_sec_remaining);
    completed.saturating_add(into_period)
}

/// Seconds played per player.
///
/// Every player who ever subbed in has an entry (possibly 0). `now` is the
/// live clock reading used to close intervals that are still open.
pub fn seconds_played(
    events: &[Event],
    quarter_length_sec: u32,
    now: ClockReading,
) -> BTreeMap<PlayerId, u32> {
    let mut totals: BTreeMap<PlayerId, u32> = BTreeMap::new();
    let mut open_since: BTreeMap<PlayerId, u32> = BTreeMap::new();

    for event in canonical_order(events) {
        let Some(player_id) = event.player_id else {
            continue;
        };
        let at = elapsed_seconds(event.period, event.clock_sec_remaining, quarter_length_sec);
        match event.event_type {
            EventType::SubIn => {
                totals.entry(player_id).or_insert(0);
                open_since.entry(player_id).or_insert(at);
            }
            EventType::SubOut => {
                if let Some(start) = open_since.remove(&player_id) {
                    add_interval(&mut totals, player_id, start, at);
                }
            }
            _ => {}
        }
    }

    let now_elapsed = now.elapsed(quarter_length_sec);
    for (player_id, start) in open_since {
        add_interval(&mut totals, player_id, start, now_elapsed);
    }
    totals
}

fn add_interval(totals: &mut BTreeMap<PlayerId, u32>, player_id: PlayerId, start: u32, end: u32) {
    let slot = totals.entry(player_id).or_insert(0);
    *slot = slot.saturating_add(end.saturating_sub(start));
}
