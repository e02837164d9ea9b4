//! Live clock, command layer, and session orchestration for Courtside.
//!
//! This crate turns scorer commands into events and keeps the live view
//! current. The replay itself lives in `courtside-replay`; everything here
//! is the stateful shell around it.
//!
//! # Modules
//!
//! - [`clock`] -- Countdown state machine for one game.
//! - [`config`] -- Configuration loading from `courtside-config.yaml` into
//!   strongly-typed structs.
//! - [`store`] -- [`EventStore`] and [`GameMetaStore`] traits and
//!   [`InMemoryStore`].
//! - [`projection`] -- The pure log-to-view projection.
//! - [`session`] -- [`LiveSession`], the single writer for a game's log.
//! - [`ticker`] -- [`SharedSession`] and the 1 Hz [`ClockTicker`].
//!
//! [`EventStore`]: store::EventStore
//! [`GameMetaStore`]: store::GameMetaStore
//! [`InMemoryStore`]: store::InMemoryStore
//! [`LiveSession`]: session::LiveSession
//! [`SharedSession`]: ticker::SharedSession
//! [`ClockTicker`]: ticker::ClockTicker

pub mod clock;
pub mod config;
pub mod projection;
pub mod session;
pub mod store;
pub mod ticker;

#[cfg(test)]
mod testing;
