//! The live projection: one pure function from the log to the screen.

use courtside_replay::{
    box_scores, on_court_ids, partition_roster, plus_minus, scoreboard, seconds_played,
    sort_canonical, team_fouls_in_period,
};
use courtside_types::{Event, GameMeta, LiveView, PlayerId};

use crate::clock::LiveClock;

/// Recompute every derived value for the live screen.
///
/// `events` may arrive in any order; the view lists them canonically.
/// Seconds played include open intervals up to the clock's current reading.
pub fn build_view(
    meta: &GameMeta,
    clock: &LiveClock,
    selected_player: Option<PlayerId>,
    events: Vec<Event>,
) -> LiveView {
    let events = sort_canonical(events);
    let roster: Vec<PlayerId> = meta.roster.iter().map(|p| p.id).collect();
    let (on_court, bench) = partition_roster(&roster, &on_court_ids(&events));
    let board = scoreboard(&events);

    LiveView {
        game_id: meta.id,
        clock: clock.snapshot(),
        selected_player,
        on_court,
        bench,
        box_scores: box_scores(&events),
        plus_minus: plus_minus(&events),
        seconds_played: seconds_played(&events, meta.quarter_length_sec, clock.reading()),
        team_score: board.team,
        opponent_score: board.opponent,
        team_fouls_this_period: team_fouls_in_period(&events, meta.id, clock.period()),
        game_over: meta.final_team_score.is_some(),
        events,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::{TimeDelta, Utc};
    use courtside_types::{EventId, EventType, RosterPlayer};

    use super::*;
    use crate::config::GameRulesConfig;
    use crate::store::new_game_meta;

    fn roster(n: u32) -> Vec<RosterPlayer> {
        (1..=n)
            .map(|number| RosterPlayer {
                id: PlayerId::new(),
                name: format!("Player {number}"),
                number,
            })
            .collect()
    }

    fn event(meta: &GameMeta, player: Option<PlayerId>, t: EventType, clock: u32, ms: i64) -> Event {
        Event {
            id: EventId::new(),
            game_id: meta.id,
            player_id: player,
            event_type: t,
            period: 1,
            clock_sec_remaining: clock,
            created_at: Utc::now() + TimeDelta::milliseconds(ms),
            team_score_at_event: None,
            opponent_score_at_event: None,
        }
    }

    #[test]
    fn view_of_a_short_stint() {
        let meta = new_game_meta("Rivals", 1, None, roster(7), &GameRulesConfig::default());
        let a = meta.roster.get(2).map(|p| p.id).unwrap();
        let mut clock = LiveClock::from_parts(600, 4).unwrap();
        clock.resume_at(courtside_replay::ClockReading::new(1, 540));

        let events = vec![
            event(&meta, Some(a), EventType::Pf, 570, 2),
            event(&meta, Some(a), EventType::SubIn, 600, 0),
            event(&meta, Some(a), EventType::TwoMade, 580, 1),
            event(&meta, None, EventType::OppThreeMade, 560, 3),
        ];
        let view = build_view(&meta, &clock, Some(a), events);

        assert_eq!(view.on_court, vec![a]);
        assert_eq!(view.bench.len(), 6);
        assert_eq!((view.team_score, view.opponent_score), (2, 3));
        assert_eq!(view.team_fouls_this_period, 1);
        assert_eq!(view.seconds_played.get(&a), Some(&60));
        assert_eq!(view.plus_minus.get(&a), Some(&-1));
        assert_eq!(view.box_scores.get(&a).map(|b| b.pts), Some(2));
        assert_eq!(view.events.first().map(|e| e.event_type), Some(EventType::SubIn));
        assert!(!view.game_over);
    }

    #[test]
    fn bench_keeps_roster_order() {
        let meta = new_game_meta("Rivals", 1, None, roster(4), &GameRulesConfig::default());
        let clock = LiveClock::from_parts(600, 4).unwrap();
        let view = build_view(&meta, &clock, None, Vec::new());
        let expected: Vec<PlayerId> = meta.roster.iter().map(|p| p.id).collect();
        assert_eq!(view.bench, expected);
        assert!(view.on_court.is_empty());
    }
}
