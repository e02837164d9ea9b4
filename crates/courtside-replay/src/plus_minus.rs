//! Plus-minus: net points scored while each player was on court.

use std::collections::BTreeMap;

use courtside_types::{Event, EventType, PlayerId};

use crate::ordering::canonical_order;
use crate::roster::OnCourt;

/// Plus-minus per player.
///
/// A player gets an entry (starting at 0) the first time they sub in; bench
/// time never contributes. Every scoring event adds its signed point value
/// to everyone on court at that moment of the replay.
pub fn plus_minus(events: &[Event]) -> BTreeMap<PlayerId, i32> {
    let mut court = OnCourt::new();
    let mut totals: BTreeMap<PlayerId, i32> = BTreeMap::new();

    for event in canonical_order(events) {
        if event.event_type == EventType::SubIn {
            if let Some(player_id) = event.player_id {
                totals.entry(player_id).or_insert(0);
            }
        }
        if court.apply(event) {
            continue;
        }
        let delta = event.event_type.points();
        if delta == 0 {
            continue;
        }
        for player_id in court.iter() {
            let slot = totals.entry(player_id).or_insert(0);
            *slot = slot.saturating_add(delta);
        }
    }
    totals
}
