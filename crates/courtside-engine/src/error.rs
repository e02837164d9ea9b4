//! Error types for the operator binary.
//!
//! [`EngineError`] wraps every subsystem failure so `main` can propagate
//! with `?`.

use courtside_types::GameId;

/// Top-level error for the operator binary.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Configuration loading failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: courtside_core::config::ConfigError,
    },

    /// A live-session command failed.
    #[error("session error: {source}")]
    Session {
        /// The underlying session error.
        #[from]
        source: courtside_core::session::SessionError,
    },

    /// A database operation failed.
    #[error("database error: {source}")]
    Db {
        /// The underlying database error.
        #[from]
        source: courtside_db::DbError,
    },

    /// The game id on the command line has no record.
    #[error("game not found: {0}")]
    GameNotFound(GameId),

    /// The summary could not be serialized.
    #[error("output error: {source}")]
    Output {
        /// The underlying serialization error.
        #[from]
        source: serde_json::Error,
    },

    /// The sync store bridge needs a multi-threaded tokio runtime.
    #[error("runtime error: {message}")]
    Runtime {
        /// Description of the runtime failure.
        message: String,
    },
}
