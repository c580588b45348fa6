use rand::Rng;

use crate::board::GameField;
use crate::common::Result;
use crate::placement;
use crate::ship_manager::ShipManager;

use super::Player;

/// Computer player: every decision is a uniform random draw with no memory
/// of earlier turns.
#[derive(Debug, Default, Clone, Copy)]
pub struct AiPlayer;

impl AiPlayer {
    pub fn new() -> Self {
        Self
    }

    /// Uniform cell of `field`; repeats of earlier shots are possible.
    pub fn select_target<R: Rng>(&mut self, rng: &mut R, field: &GameField) -> (usize, usize) {
        random_cell(rng, field)
    }
}

fn random_cell<R: Rng>(rng: &mut R, field: &GameField) -> (usize, usize) {
    let x = rng.random_range(0..field.width().max(1));
    let y = rng.random_range(0..field.height().max(1));
    (x, y)
}

impl Player for AiPlayer {
    fn place_ships<R: Rng>(
        &mut self,
        rng: &mut R,
        field: &mut GameField,
        ships: &mut ShipManager,
    ) -> Result<()> {
        placement::place_all_ships_randomly(field, ships, rng)
    }

    fn scan_origin<R: Rng>(&mut self, rng: &mut R, field: &GameField) -> Result<(usize, usize)> {
        Ok(random_cell(rng, field))
    }
}
