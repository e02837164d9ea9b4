//! Post-game summary helpers: team totals, starters, minutes formatting.

use std::collections::{BTreeMap, BTreeSet};

use courtside_types::{Event, EventType, PlayerBox, PlayerId, TeamTotals};

use crate::box_score::finalize;
use crate::roster::{MAX_ON_COURT, OnCourt};

/// Sum every player's line into one team line.
///
/// Raw tallies are summed, then the derived columns (points, field goals,
/// percentages) are recomputed from the sums rather than averaged.
pub fn team_totals(
    boxes: &BTreeMap<PlayerId, PlayerBox>,
    seconds: &BTreeMap<PlayerId, u32>,
) -> TeamTotals {
    let mut line = PlayerBox::default();
    for b in boxes.values() {
        line.ftm = line.ftm.saturating_add(b.ftm);
        line.fta = line.fta.saturating_add(b.fta);
        line.two_pm = line.two_pm.saturating_add(b.two_pm);
        line.two_pa = line.two_pa.saturating_add(b.two_pa);
        line.three_pm = line.three_pm.saturating_add(b.three_pm);
        line.three_pa = line.three_pa.saturating_add(b.three_pa);
        line.reb_off = line.reb_off.saturating_add(b.reb_off);
        line.reb_def = line.reb_def.saturating_add(b.reb_def);
        line.ast = line.ast.saturating_add(b.ast);
        line.stl = line.stl.saturating_add(b.stl);
        line.blk = line.blk.saturating_add(b.blk);
        line.tov = line.tov.saturating_add(b.tov);
        line.pf = line.pf.saturating_add(b.pf);
    }
    finalize(&mut line);

    let total_sec = seconds
        .values()
        .fold(0_u32, |acc, s| acc.saturating_add(*s));
    TeamTotals { total_sec, line }
}

/// The starting five, detected by replaying substitutions in the order they
/// were recorded.
///
/// Scorers usually enter the opening lineup before anything else, so the
/// first time five players are on court at once is the starting lineup.
/// Returns an empty set if the court never fills.
pub fn detect_starters(events: &[Event]) -> BTreeSet<PlayerId> {
    let mut by_creation: Vec<&Event> = events
        .iter()
        .filter(|e| e.event_type.is_substitution())
        .collect();
    by_creation.sort_by_key(|e| (e.created_at, e.id));

    let mut court = OnCourt::new();
    for event in by_creation {
        court.apply(event);
        if court.len() >= MAX_ON_COURT && event.event_type == EventType::SubIn {
            return court.into_set();
        }
    }
    BTreeSet::new()
}

/// `m:ss`, e.g. `125` -> `"2:05"`.
pub fn format_minutes(seconds: u32) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}
