//! One-shot special abilities and the FIFO queue that holds them.

use std::collections::VecDeque;
use std::fmt;
use std::str::FromStr;

use log::debug;
use rand::Rng;

use crate::board::{CellStatus, GameField};
use crate::common::{GameError, Result};
use crate::player::Player;
use crate::ship_manager::ShipManager;

/// The closed set of abilities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Ability {
    DoubleDamage,
    Scanner,
    Bombard,
}

impl Ability {
    pub const ALL: [Ability; 3] = [Ability::DoubleDamage, Ability::Scanner, Ability::Bombard];

    /// Name used in save files and on the console.
    pub fn name(self) -> &'static str {
        match self {
            Ability::DoubleDamage => "Double Damage",
            Ability::Scanner => "Scanner",
            Ability::Bombard => "Bombard",
        }
    }

    pub fn random<R: Rng>(rng: &mut R) -> Self {
        Self::ALL[rng.random_range(0..Self::ALL.len())]
    }

    /// Carry out this ability against the enemy field and fleet.
    pub fn apply<P: Player, R: Rng>(
        self,
        field: &mut GameField,
        ships: &mut ShipManager,
        input: &mut P,
        rng: &mut R,
    ) -> Result<AbilityOutcome> {
        match self {
            Ability::DoubleDamage => {
                field.set_next_attack_double_damage(true);
                Ok(AbilityOutcome::DoubleDamageArmed)
            }
            Ability::Scanner => {
                let origin = input.scan_origin(rng, field)?;
                Ok(AbilityOutcome::Scanned(ScanReport::scan(field, origin)))
            }
            Ability::Bombard => {
                let afloat: Vec<usize> = ships.surviving().collect();
                if afloat.is_empty() {
                    return Ok(AbilityOutcome::NoTarget);
                }
                let ship = afloat[rng.random_range(0..afloat.len())];
                let segment = rng.random_range(0..ships.ship(ship)?.length());
                ships.apply_damage_to_ship(ship, segment, 1)?;
                Ok(AbilityOutcome::Bombarded { ship, segment })
            }
        }
    }
}

impl fmt::Display for Ability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Ability {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|a| a.name() == s)
            .ok_or_else(|| GameError::Format(format!("unknown ability name {:?}", s)))
    }
}

/// Findings of a scanner sweep over the 2×2 block at `origin`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanReport {
    pub origin: (usize, usize),
    /// In-bounds cells of the block and whether each holds a ship.
    pub cells: Vec<((usize, usize), bool)>,
}

impl ScanReport {
    pub fn scan(field: &GameField, origin: (usize, usize)) -> Self {
        let (x, y) = origin;
        let cells = [(0, 0), (0, 1), (1, 0), (1, 1)]
            .into_iter()
            .filter_map(|(dx, dy)| {
                let (cx, cy) = (x.checked_add(dx)?, y.checked_add(dy)?);
                let status = field.cell_status(cx, cy).ok()?;
                Some(((cx, cy), status == CellStatus::Ship))
            })
            .collect();
        ScanReport { origin, cells }
    }

    pub fn ships_found(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.cells.iter().filter(|(_, ship)| *ship).map(|(c, _)| *c)
    }

    pub fn found_ship(&self) -> bool {
        self.ships_found().next().is_some()
    }
}

/// What happened when an ability was used.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AbilityOutcome {
    /// The next attack on the enemy field deals double damage.
    DoubleDamageArmed,
    Scanned(ScanReport),
    /// One point of damage landed on this ship segment.
    Bombarded { ship: usize, segment: usize },
    /// Bombard found no ship afloat. The ability is still spent.
    NoTarget,
}

impl AbilityOutcome {
    pub fn succeeded(&self) -> bool {
        !matches!(self, AbilityOutcome::NoTarget)
    }
}

/// FIFO queue of abilities: granted at the back, used from the front.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AbilityManager {
    queue: VecDeque<Ability>,
}

impl AbilityManager {
    /// A fresh manager starts with one random ability.
    pub fn new<R: Rng>(rng: &mut R) -> Self {
        let mut manager = Self::default();
        manager.grant_random_ability(rng);
        manager
    }

    pub fn grant_random_ability<R: Rng>(&mut self, rng: &mut R) -> Ability {
        let ability = Ability::random(rng);
        debug!("granted ability {}", ability);
        self.queue.push_back(ability);
        ability
    }

    pub fn push(&mut self, ability: Ability) {
        self.queue.push_back(ability);
    }

    pub fn clear(&mut self) {
        self.queue.clear();
    }

    pub fn has_abilities(&self) -> bool {
        !self.queue.is_empty()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = Ability> + '_ {
        self.queue.iter().copied()
    }

    pub fn peek_first_name(&self) -> Result<&'static str> {
        self.queue
            .front()
            .map(|a| a.name())
            .ok_or(GameError::NoAbility)
    }

    /// Remove the head of the queue and apply it.
    ///
    /// If the scanner cannot obtain an origin because input failed, the
    /// ability goes back to the head of the queue.
    pub fn use_ability<P: Player, R: Rng>(
        &mut self,
        field: &mut GameField,
        ships: &mut ShipManager,
        input: &mut P,
        rng: &mut R,
    ) -> Result<AbilityOutcome> {
        let ability = self.queue.pop_front().ok_or(GameError::NoAbility)?;
        let outcome = ability.apply(field, ships, input, rng);
        match &outcome {
            Err(GameError::Io(_)) => self.queue.push_front(ability),
            Ok(o) => debug!("used {}: {:?}", ability, o),
            Err(_) => {}
        }
        outcome
    }
}

impl FromIterator<Ability> for AbilityManager {
    fn from_iter<I: IntoIterator<Item = Ability>>(iter: I) -> Self {
        AbilityManager {
            queue: iter.into_iter().collect(),
        }
    }
}
