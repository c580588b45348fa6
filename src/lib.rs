mod ability;
mod board;
pub mod cli;
mod common;
mod config;
mod game;
mod logging;
mod persistence;
pub mod placement;
mod player;
pub mod prelude;
mod ship;
mod ship_manager;

pub use ability::*;
pub use board::*;
pub use cli::{Session, Start};
pub use common::*;
pub use config::*;
pub use game::*;
pub use logging::{init_logging, level_from};
pub use persistence::*;
pub use player::*;
pub use ship::*;
pub use ship_manager::*;
