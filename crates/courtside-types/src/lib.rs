//! Shared type definitions for the Courtside live game tracker.
//!
//! This crate is the single source of truth for the types used across the
//! workspace. Types flow downstream to `TypeScript` via `ts-rs` for the
//! scorer's tablet UI.
//!
//! # Modules
//!
//! - [`ids`] -- Type-safe UUID wrappers for games, players, and events
//! - [`enums`] -- [`EventType`] with its classification predicates
//! - [`structs`] -- Events, clock, game metadata, and derived views

pub mod enums;
pub mod ids;
pub mod structs;

// Re-export all public types at crate root for convenience.
pub use enums::{CarryOverPolicy, EventType};
pub use ids::{EventId, GameId, PlayerId};
pub use structs::{
    Event, GameClock, GameMeta, LiveView, NewEvent, PlayerBox, RosterPlayer, TeamTotals,
};
