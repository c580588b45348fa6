//! Commonly used types for ease of import.

pub use crate::{
    AbilityManager, AiPlayer, AttackResult, CliPlayer, Game, GameConfig, GameError, GameStatus,
    Player, SaveStore, Session, Settings, Start,
};
