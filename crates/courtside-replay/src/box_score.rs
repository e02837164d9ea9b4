//! Per-player box score aggregation.
//!
//! Pure counting over the log, so the result does not depend on order.
//! Events without a player (opponent scoring, period markers) are skipped.

use std::collections::BTreeMap;

use courtside_types::{Event, EventType, PlayerBox, PlayerId};

/// Whole-number shooting percentage, rounded half up.
///
/// Returns 0 when nothing was attempted.
pub fn shooting_pct(made: u32, attempted: u32) -> u32 {
    // round(made / attempted * 100) == (200 * made + attempted) / (2 * attempted)
    let numerator = made.saturating_mul(200).saturating_add(attempted);
    numerator
        .checked_div(attempted.saturating_mul(2))
        .unwrap_or(0)
}

/// Count one event into a player's raw tallies.
fn tally(line: &mut PlayerBox, event_type: EventType) {
    let slot = match event_type {
        EventType::FtMade => {
            line.ftm = line.ftm.saturating_add(1);
            &mut line.fta
        }
        EventType::FtMiss => &mut line.fta,
        EventType::TwoMade => {
            line.two_pm = line.two_pm.saturating_add(1);
            &mut line.two_pa
        }
        EventType::TwoMiss => &mut line.two_pa,
        EventType::ThreeMade => {
            line.three_pm = line.three_pm.saturating_add(1);
            &mut line.three_pa
        }
        EventType::ThreeMiss => &mut line.three_pa,
        EventType::RebOff => &mut line.reb_off,
        EventType::RebDef => &mut line.reb_def,
        EventType::Ast => &mut line.ast,
        EventType::Stl => &mut line.stl,
        EventType::Tov => &mut line.tov,
        EventType::Blk => &mut line.blk,
        EventType::Pf => &mut line.pf,
        EventType::SubIn
        | EventType::SubOut
        | EventType::OppFtMade
        | EventType::OppTwoMade
        | EventType::OppThreeMade
        | EventType::PeriodStart
        | EventType::PeriodEnd => return,
    };
    *slot = slot.saturating_add(1);
}

/// Fill in every derived column (points, field goals, percentages, total
/// rebounds) from the raw made/attempted tallies.
pub fn finalize(line: &mut PlayerBox) {
    line.fgm = line.two_pm.saturating_add(line.three_pm);
    line.fga = line.two_pa.saturating_add(line.three_pa);
    line.pts = line
        .ftm
        .saturating_add(line.two_pm.saturating_mul(2))
        .saturating_add(line.three_pm.saturating_mul(3));
    line.reb_total = line.reb_off.saturating_add(line.reb_def);
    line.fg_pct = shooting_pct(line.fgm, line.fga);
    line.three_pct = shooting_pct(line.three_pm, line.three_pa);
    line.ft_pct = shooting_pct(line.ftm, line.fta);
}

/// Box score for every player that appears in the log.
///
/// Substitution events alone still produce a (zeroed) line so that anyone
/// who checked in shows up in the table.
pub fn box_scores(events: &[Event]) -> BTreeMap<PlayerId, PlayerBox> {
    let mut lines: BTreeMap<PlayerId, PlayerBox> = BTreeMap::new();
    for event in events {
        let Some(player_id) = event.player_id else {
            continue;
        };
        tally(lines.entry(player_id).or_default(), event.event_type);
    }
    for line in lines.values_mut() {
        finalize(line);
    }
    lines
}
