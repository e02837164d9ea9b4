//! Enumeration types for the Courtside tracker.
//!
//! [`EventType`] is the closed tag carried by every logged event. Its
//! classification predicates (`is_opponent_event`, `is_score_event`,
//! `requires_player`) and its point value are derived from the tag and are
//! never stored alongside the event.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

// ---------------------------------------------------------------------------
// Event types
// ---------------------------------------------------------------------------

/// The kind of a logged game event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[ts(export, export_to = "bindings/")]
pub enum EventType {
    // --- Shooting ---
    /// Made free throw (1 point).
    FtMade,
    /// Missed free throw.
    FtMiss,
    /// Made two-point field goal.
    TwoMade,
    /// Missed two-point field goal.
    TwoMiss,
    /// Made three-point field goal.
    ThreeMade,
    /// Missed three-point field goal.
    ThreeMiss,

    // --- Other individual stats ---
    /// Offensive rebound.
    RebOff,
    /// Defensive rebound.
    RebDef,
    /// Assist.
    Ast,
    /// Steal.
    Stl,
    /// Turnover.
    Tov,
    /// Blocked shot.
    Blk,
    /// Personal foul (also counts toward the period's team fouls).
    Pf,

    // --- Substitutions ---
    /// Player enters the court.
    SubIn,
    /// Player leaves the court.
    SubOut,

    // --- Opponent scoring ---
    /// Opponent made free throw.
    OppFtMade,
    /// Opponent made two-point field goal.
    OppTwoMade,
    /// Opponent made three-point field goal.
    OppThreeMade,

    // --- Period boundaries ---
    /// Start-of-period marker.
    PeriodStart,
    /// End-of-period marker.
    PeriodEnd,
}

impl EventType {
    /// Every variant, in declaration order.
    pub const ALL: [Self; 20] = [
        Self::FtMade,
        Self::FtMiss,
        Self::TwoMade,
        Self::TwoMiss,
        Self::ThreeMade,
        Self::ThreeMiss,
        Self::RebOff,
        Self::RebDef,
        Self::Ast,
        Self::Stl,
        Self::Tov,
        Self::Blk,
        Self::Pf,
        Self::SubIn,
        Self::SubOut,
        Self::OppFtMade,
        Self::OppTwoMade,
        Self::OppThreeMade,
        Self::PeriodStart,
        Self::PeriodEnd,
    ];

    /// True only for the opponent scoring variants.
    pub const fn is_opponent_event(self) -> bool {
        matches!(self, Self::OppFtMade | Self::OppTwoMade | Self::OppThreeMade)
    }

    /// True for made shots (either team) and for period markers.
    ///
    /// Score events get a score snapshot attached when they are recorded.
    pub const fn is_score_event(self) -> bool {
        matches!(
            self,
            Self::FtMade
                | Self::TwoMade
                | Self::ThreeMade
                | Self::OppFtMade
                | Self::OppTwoMade
                | Self::OppThreeMade
                | Self::PeriodStart
                | Self::PeriodEnd
        )
    }

    /// True for every event that must name one of our players.
    pub const fn requires_player(self) -> bool {
        !self.is_opponent_event() && !self.is_period_marker()
    }

    /// True for the period start/end markers.
    pub const fn is_period_marker(self) -> bool {
        matches!(self, Self::PeriodStart | Self::PeriodEnd)
    }

    /// True for substitution events.
    pub const fn is_substitution(self) -> bool {
        matches!(self, Self::SubIn | Self::SubOut)
    }

    /// Signed point value from our team's perspective.
    ///
    /// Team makes are +1/+2/+3, opponent makes are -1/-2/-3, everything
    /// else (misses, markers, substitutions) is 0.
    pub const fn points(self) -> i32 {
        match self {
            Self::FtMade => 1,
            Self::TwoMade => 2,
            Self::ThreeMade => 3,
            Self::OppFtMade => -1,
            Self::OppTwoMade => -2,
            Self::OppThreeMade => -3,
            _ => 0,
        }
    }

    /// Points this event adds to our team's score.
    pub const fn team_points(self) -> u32 {
        match self {
            Self::FtMade => 1,
            Self::TwoMade => 2,
            Self::ThreeMade => 3,
            _ => 0,
        }
    }

    /// Points this event adds to the opponent's score.
    pub const fn opponent_points(self) -> u32 {
        match self {
            Self::OppFtMade => 1,
            Self::OppTwoMade => 2,
            Self::OppThreeMade => 3,
            _ => 0,
        }
    }

    /// Stable storage name, identical to the serde representation.
    pub const fn as_db_str(self) -> &'static str {
        match self {
            Self::FtMade => "FT_MADE",
            Self::FtMiss => "FT_MISS",
            Self::TwoMade => "TWO_MADE",
            Self::TwoMiss => "TWO_MISS",
            Self::ThreeMade => "THREE_MADE",
            Self::ThreeMiss => "THREE_MISS",
            Self::RebOff => "REB_OFF",
            Self::RebDef => "REB_DEF",
            Self::Ast => "AST",
            Self::Stl => "STL",
            Self::Tov => "TOV",
            Self::Blk => "BLK",
            Self::Pf => "PF",
            Self::SubIn => "SUB_IN",
            Self::SubOut => "SUB_OUT",
            Self::OppFtMade => "OPP_FT_MADE",
            Self::OppTwoMade => "OPP_TWO_MADE",
            Self::OppThreeMade => "OPP_THREE_MADE",
            Self::PeriodStart => "PERIOD_START",
            Self::PeriodEnd => "PERIOD_END",
        }
    }

    /// Parse a storage name produced by [`as_db_str`](Self::as_db_str).
    pub fn from_db_str(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_db_str() == name)
    }

    /// Short label used in logs and printed summaries.
    pub const fn label(self) -> &'static str {
        match self {
            Self::FtMade => "FT ✓",
            Self::FtMiss => "FT ✗",
            Self::TwoMade => "2PT ✓",
            Self::TwoMiss => "2PT ✗",
            Self::ThreeMade => "3PT ✓",
            Self::ThreeMiss => "3PT ✗",
            Self::RebOff => "REB O",
            Self::RebDef => "REB D",
            Self::Ast => "AST",
            Self::Stl => "STL",
            Self::Tov => "TOV",
            Self::Blk => "BLK",
            Self::Pf => "PF",
            Self::SubIn => "IN",
            Self::SubOut => "OUT",
            Self::OppFtMade => "OPP FT",
            Self::OppTwoMade => "OPP 2PT",
            Self::OppThreeMade => "OPP 3PT",
            Self::PeriodStart => "START",
            Self::PeriodEnd => "END",
        }
    }
}

impl core::fmt::Display for EventType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_db_str())
    }
}

// ---------------------------------------------------------------------------
// Quarter carry-over policy
// ---------------------------------------------------------------------------

/// What happens to the players on court when a quarter's clock expires.
///
/// Every on-court player always receives a sub-out at `0` for the expiring
/// period. The policy only decides whether they are automatically subbed
/// back in at the start of the next period.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum CarryOverPolicy {
    /// The scorer subs the next lineup in by hand.
    #[default]
    Manual,
    /// The expiring lineup is re-opened when the next period starts.
    Reopen,
}
