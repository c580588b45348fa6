//! Common types for the engine: attack results and the crate-wide error.

use core::fmt;

use thiserror::Error;

/// Result of resolving one attack against a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttackResult {
    /// The cell held no ship.
    Miss,
    /// A ship segment took damage but the ship is still afloat.
    Hit,
    /// The attack finished off a ship that was afloat before it.
    ShipDestroyed,
}

impl fmt::Display for AttackResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            AttackResult::Miss => "Miss!",
            AttackResult::Hit => "Hit!",
            AttackResult::ShipDestroyed => "Ship destroyed!",
        })
    }
}

/// Errors returned by engine operations.
#[derive(Debug, Error)]
pub enum GameError {
    /// Operation on a ship, fleet, or field that was constructed invalid.
    #[error("invalid state: {0}")]
    InvalidState(&'static str),
    /// A ship or segment index is outside its collection.
    #[error("index {index} is out of range (length {len})")]
    IndexOutOfRange { index: usize, len: usize },
    /// An argument outside its domain, e.g. negative damage.
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),
    /// Coordinates outside the field, or the field itself is invalid.
    #[error("cell ({x}, {y}) is outside the field")]
    OutOfField { x: usize, y: usize },
    /// Ship placement rejected by the adjacency/bounds rules.
    #[error("ship cannot be placed there")]
    ShipPlacement,
    /// The ability queue is empty.
    #[error("no ability available")]
    NoAbility,
    /// Corrupt or unreadable save data.
    #[error("invalid save data: {0}")]
    Format(String),
    /// Stream or file failure while saving, loading, or reading input.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// Unusable board configuration, including an exhausted placement budget.
    #[error("configuration error: {0}")]
    Configuration(String),
}

pub type Result<T> = core::result::Result<T, GameError>;
