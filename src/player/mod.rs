//! Player trait and implementations
//!
//! A Player is the engine's source of outside decisions:
//! - AiPlayer: random placement, scan origins, and attack coordinates
//! - CliPlayer: interactive console player reading from any `BufRead`

use rand::Rng;

use crate::board::GameField;
use crate::common::Result;
use crate::ship_manager::ShipManager;

/// Interface implemented by different player types.
pub trait Player {
    /// Place every ship of `ships` onto the empty `field`.
    fn place_ships<R: Rng>(
        &mut self,
        rng: &mut R,
        field: &mut GameField,
        ships: &mut ShipManager,
    ) -> Result<()>;

    /// Top-left corner of the 2×2 block swept by a scanner.
    fn scan_origin<R: Rng>(&mut self, rng: &mut R, field: &GameField) -> Result<(usize, usize)>;
}

mod ai;
pub use ai::AiPlayer;

mod cli;
pub use cli::CliPlayer;
