//! Randomized fleet placement with bounded retries.

use log::debug;
use rand::Rng;

use crate::board::GameField;
use crate::common::{GameError, Result};
use crate::ship::Orientation;
use crate::ship_manager::ShipManager;

/// Random draws tried for one ship before the board is abandoned.
pub const SHIP_PLACEMENT_ATTEMPTS: usize = 100;
/// Fresh boards tried before placement is declared impossible.
pub const BOARD_PLACEMENT_ATTEMPTS: usize = 100;

/// Random orientation plus a bow position that keeps a ship of `length`
/// inside the field, or `None` if it cannot fit that way.
fn random_origin<R: Rng>(
    rng: &mut R,
    width: usize,
    height: usize,
    length: usize,
) -> Option<(usize, usize, Orientation)> {
    let orientation = if rng.random() {
        Orientation::Horizontal
    } else {
        Orientation::Vertical
    };
    let (span_x, span_y) = match orientation {
        Orientation::Horizontal => (length, 1),
        Orientation::Vertical => (1, length),
    };
    if span_x > width || span_y > height {
        return None;
    }
    let x = rng.random_range(0..=width - span_x);
    let y = rng.random_range(0..=height - span_y);
    Some((x, y, orientation))
}

/// Try to place fleet ship `index` at random. `Ok(false)` when the attempt
/// budget runs out.
pub fn place_ship_randomly<R: Rng>(
    field: &mut GameField,
    ships: &mut ShipManager,
    index: usize,
    rng: &mut R,
) -> Result<bool> {
    let length = ships.ship(index)?.length();
    for _ in 0..SHIP_PLACEMENT_ATTEMPTS {
        let Some((x, y, orientation)) =
            random_origin(rng, field.width(), field.height(), length)
        else {
            continue;
        };
        if field.can_place_ship(ships.ship(index)?, x, y, orientation) {
            field.place_ship(ships, index, x, y, orientation)?;
            return Ok(true);
        }
    }
    Ok(false)
}

/// Place the whole fleet on a clean copy of `field`'s grid, restarting from
/// an empty board whenever a ship runs out of attempts.
///
/// Exhausting every board attempt means the dimensions cannot hold the
/// fleet, which is a configuration error.
pub fn place_all_ships_randomly<R: Rng>(
    field: &mut GameField,
    ships: &mut ShipManager,
    rng: &mut R,
) -> Result<()> {
    if !ships.is_valid() {
        return Err(GameError::Configuration("fleet contains an invalid ship".into()));
    }
    let (width, height) = (field.width(), field.height());
    for attempt in 0..BOARD_PLACEMENT_ATTEMPTS {
        *field = GameField::new(width, height);
        let mut placed = true;
        for index in 0..ships.len() {
            if !place_ship_randomly(field, ships, index, rng)? {
                placed = false;
                break;
            }
        }
        if placed {
            debug!("fleet placed after {} board attempt(s)", attempt + 1);
            return Ok(());
        }
    }
    Err(GameError::Configuration(format!(
        "could not place {} ships on a {}x{} field after {} attempts",
        ships.len(),
        width,
        height,
        BOARD_PLACEMENT_ATTEMPTS
    )))
}
