//! Game field: cell occupancy, placement rules, and attack resolution.

use log::debug;
use rand::Rng;

use crate::ability::AbilityManager;
use crate::common::{AttackResult, GameError, Result};
use crate::ship::{Orientation, Ship};
use crate::ship_manager::ShipManager;

/// What is known about a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellStatus {
    Unknown,
    Empty,
    Ship,
}

impl CellStatus {
    pub fn code(self) -> u8 {
        match self {
            CellStatus::Unknown => 0,
            CellStatus::Empty => 1,
            CellStatus::Ship => 2,
        }
    }

    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(CellStatus::Unknown),
            1 => Some(CellStatus::Empty),
            2 => Some(CellStatus::Ship),
            _ => None,
        }
    }
}

/// Position of a ship segment: index into the owning side's fleet plus the
/// segment index within that ship.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShipRef {
    pub ship: usize,
    pub segment: usize,
}

/// One grid cell. `ship` is `Some` exactly when `status` is `Ship`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellInfo {
    status: CellStatus,
    ship: Option<ShipRef>,
}

impl CellInfo {
    pub const fn unknown() -> Self {
        CellInfo {
            status: CellStatus::Unknown,
            ship: None,
        }
    }

    pub const fn empty() -> Self {
        CellInfo {
            status: CellStatus::Empty,
            ship: None,
        }
    }

    pub const fn ship(ship: usize, segment: usize) -> Self {
        CellInfo {
            status: CellStatus::Ship,
            ship: Some(ShipRef { ship, segment }),
        }
    }

    pub fn status(&self) -> CellStatus {
        self.status
    }

    pub fn ship_ref(&self) -> Option<ShipRef> {
        self.ship
    }
}

impl Default for CellInfo {
    fn default() -> Self {
        CellInfo::unknown()
    }
}

/// A `width`×`height` grid stored row-major. A field with a zero dimension
/// is invalid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameField {
    width: usize,
    height: usize,
    cells: Vec<CellInfo>,
    double_damage: bool,
    valid: bool,
}

impl GameField {
    pub fn new(width: usize, height: usize) -> Self {
        let valid = width > 0 && height > 0;
        let cells = if valid {
            vec![CellInfo::unknown(); width * height]
        } else {
            Vec::new()
        };
        GameField {
            width,
            height,
            cells,
            double_damage: false,
            valid,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.valid
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    fn in_bounds(&self, x: usize, y: usize) -> bool {
        x < self.width && y < self.height
    }

    fn index(&self, x: usize, y: usize) -> Result<usize> {
        if !self.valid || !self.in_bounds(x, y) {
            return Err(GameError::OutOfField { x, y });
        }
        Ok(y * self.width + x)
    }

    pub fn cell(&self, x: usize, y: usize) -> Result<&CellInfo> {
        let idx = self.index(x, y)?;
        Ok(&self.cells[idx])
    }

    pub fn cell_status(&self, x: usize, y: usize) -> Result<CellStatus> {
        self.cell(x, y).map(CellInfo::status)
    }

    /// Overwrite a cell wholesale; used when restoring a saved field.
    pub fn set_cell(&mut self, x: usize, y: usize, cell: CellInfo) -> Result<()> {
        let idx = self.index(x, y)?;
        self.cells[idx] = cell;
        Ok(())
    }

    /// Ship segment at a cell, if any. Never fails.
    pub fn ship_at(&self, x: usize, y: usize) -> Option<ShipRef> {
        self.cell(x, y).ok().and_then(CellInfo::ship_ref)
    }

    /// All cells in row-major order with their coordinates.
    pub fn cells(&self) -> impl Iterator<Item = ((usize, usize), &CellInfo)> + '_ {
        let width = self.width;
        self.cells
            .iter()
            .enumerate()
            .map(move |(i, c)| ((i % width, i / width), c))
    }

    pub fn set_next_attack_double_damage(&mut self, value: bool) {
        self.double_damage = value;
    }

    pub fn is_next_attack_double_damage(&self) -> bool {
        self.double_damage
    }

    fn holds_ship(&self, x: usize, y: usize) -> bool {
        self.in_bounds(x, y) && self.cells[y * self.width + x].status == CellStatus::Ship
    }

    /// Whether a cell or any of its eight neighbours holds a ship.
    fn ship_nearby(&self, x: usize, y: usize) -> bool {
        (x.saturating_sub(1)..=x + 1)
            .flat_map(|nx| (y.saturating_sub(1)..=y + 1).map(move |ny| (nx, ny)))
            .any(|(nx, ny)| self.holds_ship(nx, ny))
    }

    /// True iff the ship fits in bounds starting at `(x, y)` with at least
    /// one free cell, diagonals included, between it and every placed ship.
    pub fn can_place_ship(&self, ship: &Ship, x: usize, y: usize, orientation: Orientation) -> bool {
        if !self.valid || !ship.is_valid() {
            return false;
        }
        (0..ship.length()).all(|i| match orientation.step(x, y, i) {
            Some((xi, yi)) => self.in_bounds(xi, yi) && !self.ship_nearby(xi, yi),
            None => false,
        })
    }

    /// Place fleet ship `index` with its bow at `(x, y)`, numbering segments
    /// from the bow.
    pub fn place_ship(
        &mut self,
        ships: &mut ShipManager,
        index: usize,
        x: usize,
        y: usize,
        orientation: Orientation,
    ) -> Result<()> {
        let ship = ships.ship_mut(index).map_err(|_| GameError::ShipPlacement)?;
        if !self.can_place_ship(ship, x, y, orientation) {
            return Err(GameError::ShipPlacement);
        }
        ship.set_orientation(orientation);
        for segment in 0..ship.length() {
            if let Some((xi, yi)) = orientation.step(x, y, segment) {
                let idx = yi * self.width + xi;
                self.cells[idx] = CellInfo::ship(index, segment);
            }
        }
        Ok(())
    }

    /// Resolve an attack on `(x, y)` against the fleet on this field.
    ///
    /// The pending double-damage flag is consumed by every attack that
    /// reaches a cell, hit or miss. When the attack finishes a ship, one
    /// random ability is granted to `rewards`.
    pub fn attack_cell<R: Rng>(
        &mut self,
        x: usize,
        y: usize,
        ships: &mut ShipManager,
        rewards: Option<&mut AbilityManager>,
        rng: &mut R,
    ) -> Result<AttackResult> {
        if !ships.is_valid() {
            return Err(GameError::OutOfField { x, y });
        }
        let idx = self.index(x, y)?;
        let double_damage = std::mem::take(&mut self.double_damage);

        let target = match self.cells[idx].ship {
            Some(target) => target,
            None => {
                self.cells[idx] = CellInfo::empty();
                debug!("attack ({}, {}) missed", x, y);
                return Ok(AttackResult::Miss);
            }
        };

        let damage = if double_damage { 2 } else { 1 };
        let was_destroyed = ships.ship(target.ship)?.is_destroyed();
        ships.apply_damage_to_ship(target.ship, target.segment, damage)?;

        if !was_destroyed && ships.ship(target.ship)?.is_destroyed() {
            debug!("attack ({}, {}) destroyed ship {}", x, y, target.ship);
            if let Some(abilities) = rewards {
                abilities.grant_random_ability(rng);
            }
            Ok(AttackResult::ShipDestroyed)
        } else {
            debug!(
                "attack ({}, {}) hit ship {} segment {} for {}",
                x, y, target.ship, target.segment, damage
            );
            Ok(AttackResult::Hit)
        }
    }
}
