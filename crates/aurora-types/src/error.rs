// ─────────────────────────────────────────────────────────────────────
// Aurora Intelligence Engine — Error Hierarchy
// Mirrors: Infrastructure/IE/core.py exception paths
// ─────────────────────────────────────────────────────────────────────

use thiserror::Error;

/// Root error type for all Aurora engine failures.
#[derive(Error, Debug)]
pub enum AuroraError {
    /// An FFE component fell outside the octal range [0, 7].
    #[error("component out of range: {name}={value}, expected 0..=7")]
    OutOfRange { name: &'static str, value: i64 },

    /// Abstraction level outside the 8-step continuum.
    #[error("abstraction level {0} outside continuum [0, 7]")]
    AbstractionLevel(i64),

    /// Lookup of an archetype id that was never registered.
    #[error("unknown archetype: {0}")]
    UnknownArchetype(String),

    /// Serialization / persistence failure.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Configuration error.
    #[error("config error: {0}")]
    Config(String),
}

pub type AuroraResult<T> = Result<T, AuroraError>;
