//! Boundary repair for logs with incomplete substitutions.
//!
//! Older logs (and sessions where the quarter was advanced by hand) can
//! leave players "on court" across a period boundary with no sub-out at the
//! buzzer and no sub-in at the next tip. Playing time then bleeds across
//! periods. [`plan_boundary_repairs`] walks the log period by period and
//! returns the synthetic boundary events that close those gaps.
//!
//! Planning is pure. Appending the planned events is the caller's job and
//! goes through the same append primitive as every other command.
//!
//! # Idempotence
//!
//! Before planning a sub-out `(player, period, 0)` or a sub-in
//! `(player, period, quarter_length)` the planner checks whether an event
//! with exactly that shape already exists. Once a plan has been applied the
//! next run finds every boundary event present and plans nothing.

use core::cmp::Reverse;
use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use courtside_types::{Event, EventType, GameId, NewEvent, PlayerId};

use crate::ordering::canonical_order;
use crate::roster::OnCourt;

/// One synthetic substitution to insert at a period boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct BoundaryFix {
    /// Period the event belongs to.
    pub period: u32,
    /// `0` for a sub-out, the quarter length for a sub-in.
    pub clock_sec_remaining: u32,
    /// [`EventType::SubOut`] or [`EventType::SubIn`].
    pub event_type: EventType,
    /// The player being subbed.
    pub player_id: PlayerId,
}

impl BoundaryFix {
    /// Turn the fix into an insertable event. Substitutions carry no score
    /// snapshot.
    pub const fn into_new_event(self, game_id: GameId, created_at: DateTime<Utc>) -> NewEvent {
        NewEvent {
            game_id,
            player_id: Some(self.player_id),
            event_type: self.event_type,
            period: self.period,
            clock_sec_remaining: self.clock_sec_remaining,
            created_at,
            team_score_at_event: None,
            opponent_score_at_event: None,
        }
    }
}

type SubKey = (PlayerId, EventType, u32, u32);

/// Planner state: the existing substitution shapes plus everything planned
/// so far in this run.
struct Planner {
    existing: BTreeSet<SubKey>,
    fixes: Vec<BoundaryFix>,
    quarter_length_sec: u32,
}

impl Planner {
    fn new(events: &[Event], quarter_length_sec: u32) -> Self {
        let existing = events
            .iter()
            .filter(|e| e.event_type.is_substitution())
            .filter_map(|e| {
                e.player_id
                    .map(|p| (p, e.event_type, e.period, e.clock_sec_remaining))
            })
            .collect();
        Self {
            existing,
            fixes: Vec::new(),
            quarter_length_sec,
        }
    }

    fn ensure(&mut self, player_id: PlayerId, event_type: EventType, period: u32, clock: u32) {
        if self.existing.insert((player_id, event_type, period, clock)) {
            self.fixes.push(BoundaryFix {
                period,
                clock_sec_remaining: clock,
                event_type,
                player_id,
            });
        }
    }

    fn close_period(&mut self, court: &OnCourt, period: u32) {
        for player_id in court.iter() {
            self.ensure(player_id, EventType::SubOut, period, 0);
        }
    }

    fn open_period(&mut self, court: &OnCourt, period: u32) {
        let start = self.quarter_length_sec;
        for player_id in court.iter() {
            self.ensure(player_id, EventType::SubIn, period, start);
        }
    }

    /// Close `period`; carry the lineup into the next period if the game
    /// continues, otherwise clear the court.
    fn cross_boundary(&mut self, court: &mut OnCourt, period: u32, quarters_count: u32) {
        self.close_period(court, period);
        if period < quarters_count {
            self.open_period(court, period.saturating_add(1));
        } else {
            court.clear();
        }
    }
}

/// Plan the boundary events missing from `events`.
///
/// Players still on court when a period ends get a sub-out at `0` for that
/// period; if another regulation period follows, the same lineup gets a
/// sub-in at the quarter length of the next period. After the last period
/// that appears in the log, everyone still on court is closed out.
///
/// Fixes come back in game order: by period, then sub-ins at the tip before
/// sub-outs at the buzzer.
pub fn plan_boundary_repairs(
    events: &[Event],
    quarter_length_sec: u32,
    quarters_count: u32,
) -> Vec<BoundaryFix> {
    let mut planner = Planner::new(events, quarter_length_sec);
    let mut court = OnCourt::new();
    let mut current_period: u32 = 1;

    for event in canonical_order(events) {
        while current_period < event.period {
            planner.cross_boundary(&mut court, current_period, quarters_count);
            current_period = current_period.saturating_add(1);
        }
        court.apply(event);
    }
    planner.close_period(&court, current_period);

    let mut fixes = planner.fixes;
    fixes.sort_by_key(|f| (f.period, Reverse(f.clock_sec_remaining), f.player_id));
    tracing::debug!(count = fixes.len(), "Planned boundary repairs");
    fixes
}
