//! Ordered fleet of one side's ships.

use core::fmt;

use crate::common::{GameError, Result};
use crate::ship::{Orientation, Ship};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShipManager {
    ships: Vec<Ship>,
    valid: bool,
}

impl ShipManager {
    /// Build one horizontal ship per size, in order.
    ///
    /// Building stops at the first size outside `1..=4`: that ship and every
    /// size after it are dropped and the manager is marked invalid.
    pub fn new(sizes: &[usize]) -> Self {
        let mut ships = Vec::with_capacity(sizes.len());
        let mut valid = true;
        for &size in sizes {
            let ship = Ship::new(size, Orientation::Horizontal);
            if !ship.is_valid() {
                valid = false;
                break;
            }
            ships.push(ship);
        }
        ShipManager { ships, valid }
    }

    /// Adopt already-built ships, e.g. when restoring a save. Valid iff
    /// every ship is valid.
    pub fn from_ships(ships: Vec<Ship>) -> Self {
        let valid = ships.iter().all(Ship::is_valid);
        ShipManager { ships, valid }
    }

    pub fn is_valid(&self) -> bool {
        self.valid
    }

    pub fn ships(&self) -> &[Ship] {
        &self.ships
    }

    pub fn len(&self) -> usize {
        self.ships.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ships.is_empty()
    }

    fn check_index(&self, index: usize) -> Result<()> {
        if !self.valid {
            return Err(GameError::InvalidState("invalid ship manager"));
        }
        if index >= self.ships.len() {
            return Err(GameError::IndexOutOfRange {
                index,
                len: self.ships.len(),
            });
        }
        Ok(())
    }

    pub fn ship(&self, index: usize) -> Result<&Ship> {
        self.check_index(index)?;
        Ok(&self.ships[index])
    }

    pub fn ship_mut(&mut self, index: usize) -> Result<&mut Ship> {
        self.check_index(index)?;
        Ok(&mut self.ships[index])
    }

    pub fn apply_damage_to_ship(&mut self, ship: usize, segment: usize, amount: i32) -> Result<()> {
        let target = self.ship_mut(ship)?;
        if !target.is_valid() {
            return Err(GameError::InvalidState("invalid ship"));
        }
        target.apply_damage(segment, amount)
    }

    /// Indices of ships still afloat.
    pub fn surviving(&self) -> impl Iterator<Item = usize> + '_ {
        self.ships
            .iter()
            .enumerate()
            .filter(|(_, s)| !s.is_destroyed())
            .map(|(i, _)| i)
    }

    pub fn all_ships_destroyed(&self) -> bool {
        self.valid && self.ships.iter().all(Ship::is_destroyed)
    }
}

impl fmt::Display for ShipManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.valid {
            return f.write_str("Invalid ShipManager");
        }
        writeln!(f, "Ships status:")?;
        for (i, ship) in self.ships.iter().enumerate() {
            writeln!(f, "Ship {}: {}", i + 1, ship)?;
        }
        Ok(())
    }
}
