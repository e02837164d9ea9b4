//! `PostgreSQL` persistence for the Courtside tracker.
//!
//! The event log is the only source of truth for a game; everything shown
//! on the live screen is replayed from it. This crate stores that log and
//! the game records it hangs off.
//!
//! ```text
//! games ──< game_roster >── players
//!   │
//!   └──< game_events   (append-only, undo deletes newest-created)
//! ```
//!
//! # Modules
//!
//! - [`postgres`] -- Connection pool, configuration, and migrations
//! - [`event_store`] -- Per-game event log
//! - [`game_store`] -- Game records, rosters, and final scores
//! - [`error`] -- Shared error type

pub mod error;
pub mod event_store;
pub mod game_store;
pub mod postgres;

mod columns;

pub use error::DbError;
pub use event_store::{EventRow, PgEventStore};
pub use game_store::{GameRow, PgGameStore};
pub use postgres::{PostgresConfig, PostgresPool};
