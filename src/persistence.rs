//! Whitespace-delimited text encoding of a whole game, and the directory of
//! save files that holds them.
//!
//! Layout, in order:
//! 1. `status round width height`
//! 2. `count size1 .. sizeN`
//! 3. player fleet, then opponent fleet: `count`, then per ship
//!    `length orientation seg0 .. segL-1`
//! 4. player field, then opponent field: per cell, row-major,
//!    `status shipIndex segmentIndex` (`-1 -1` without a ship), then the
//!    pending double-damage flag
//! 5. player abilities: `count`, then one name per line

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use log::info;

use crate::ability::{Ability, AbilityManager};
use crate::board::{CellInfo, CellStatus, GameField};
use crate::common::{GameError, Result};
use crate::config::{GameConfig, MAX_FIELD_SIZE, MAX_SHIP_LEN, MIN_SHIP_LEN};
use crate::game::GameStatus;
use crate::ship::{Orientation, SegmentState, Ship};
use crate::ship_manager::ShipManager;

/// Serializable overall game state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameState {
    pub status: GameStatus,
    pub round: u32,
    pub width: usize,
    pub height: usize,
    pub ship_sizes: Vec<usize>,
    pub player_ships: ShipManager,
    pub opponent_ships: ShipManager,
    pub player_field: GameField,
    pub opponent_field: GameField,
    pub player_abilities: AbilityManager,
}

fn write_ships(f: &mut fmt::Formatter<'_>, ships: &ShipManager) -> fmt::Result {
    writeln!(f, "{}", ships.len())?;
    for ship in ships.ships() {
        write!(f, "{} {} ", ship.length(), ship.orientation().code())?;
        for state in ship.segment_states() {
            write!(f, "{} ", state.code())?;
        }
        writeln!(f)?;
    }
    Ok(())
}

fn write_field(f: &mut fmt::Formatter<'_>, field: &GameField) -> fmt::Result {
    for ((x, _), cell) in field.cells() {
        let (ship, segment) = match cell.ship_ref() {
            Some(r) => (r.ship as i64, r.segment as i64),
            None => (-1, -1),
        };
        write!(f, "{} {} {} ", cell.status().code(), ship, segment)?;
        if x + 1 == field.width() {
            writeln!(f)?;
        }
    }
    writeln!(f, "{}", u8::from(field.is_next_attack_double_damage()))
}

impl fmt::Display for GameState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{} {} {} {}",
            self.status.code(),
            self.round,
            self.width,
            self.height
        )?;
        write!(f, "{}", self.ship_sizes.len())?;
        for size in &self.ship_sizes {
            write!(f, " {}", size)?;
        }
        writeln!(f)?;
        write_ships(f, &self.player_ships)?;
        write_ships(f, &self.opponent_ships)?;
        write_field(f, &self.player_field)?;
        write_field(f, &self.opponent_field)?;
        writeln!(f, "{}", self.player_abilities.len())?;
        for ability in self.player_abilities.iter() {
            writeln!(f, "{}", ability.name())?;
        }
        Ok(())
    }
}

fn corrupt(msg: impl Into<String>) -> GameError {
    GameError::Format(msg.into())
}

/// Cursor over save text: whitespace tokens, plus whole lines for the
/// ability names.
struct Reader<'a> {
    rest: &'a str,
}

impl<'a> Reader<'a> {
    fn new(text: &'a str) -> Self {
        Reader { rest: text }
    }

    fn token(&mut self, what: &str) -> Result<&'a str> {
        let trimmed = self.rest.trim_start();
        if trimmed.is_empty() {
            return Err(corrupt(format!("missing {}", what)));
        }
        let end = trimmed
            .find(char::is_whitespace)
            .unwrap_or(trimmed.len());
        let (token, rest) = trimmed.split_at(end);
        self.rest = rest;
        Ok(token)
    }

    fn number<T: FromStr>(&mut self, what: &str) -> Result<T> {
        let token = self.token(what)?;
        token
            .parse()
            .map_err(|_| corrupt(format!("bad {}: {:?}", what, token)))
    }

    /// Rest of the current line, without its terminator.
    fn line(&mut self) -> Option<&'a str> {
        if self.rest.is_empty() {
            return None;
        }
        let (line, rest) = match self.rest.find('\n') {
            Some(i) => (&self.rest[..i], &self.rest[i + 1..]),
            None => (self.rest, ""),
        };
        self.rest = rest;
        Some(line.trim_end_matches('\r'))
    }
}

fn read_ships(r: &mut Reader<'_>) -> Result<ShipManager> {
    let count: usize = r.number("ship count")?;
    let mut ships = Vec::new();
    for i in 0..count {
        let length: usize = r.number("ship length")?;
        if !(MIN_SHIP_LEN..=MAX_SHIP_LEN).contains(&length) {
            return Err(corrupt(format!("ship {} has invalid length {}", i, length)));
        }
        let orientation = Orientation::from_code(r.number("orientation")?)
            .ok_or_else(|| corrupt(format!("ship {} has an unknown orientation", i)))?;
        let mut ship = Ship::new(length, orientation);
        for segment in 0..length {
            let state = SegmentState::from_code(r.number("segment state")?)
                .ok_or_else(|| corrupt(format!("ship {} has an unknown segment state", i)))?;
            if state != SegmentState::Intact {
                ship.apply_damage(segment, state.damage())?;
            }
        }
        ships.push(ship);
    }
    Ok(ShipManager::from_ships(ships))
}

fn read_field(
    r: &mut Reader<'_>,
    width: usize,
    height: usize,
    ships: &ShipManager,
) -> Result<GameField> {
    let mut field = GameField::new(width, height);
    for y in 0..height {
        for x in 0..width {
            let status = CellStatus::from_code(r.number("cell status")?)
                .ok_or_else(|| corrupt(format!("cell ({}, {}) has an unknown status", x, y)))?;
            let ship: i64 = r.number("ship index")?;
            let segment: i64 = r.number("segment index")?;
            let cell = match status {
                CellStatus::Ship => {
                    let ship_len = usize::try_from(ship)
                        .ok()
                        .and_then(|i| ships.ships().get(i))
                        .map(Ship::length)
                        .ok_or_else(|| {
                            corrupt(format!("cell ({}, {}) refers to missing ship {}", x, y, ship))
                        })?;
                    let segment = usize::try_from(segment)
                        .ok()
                        .filter(|&s| s < ship_len)
                        .ok_or_else(|| {
                            corrupt(format!("cell ({}, {}) has bad segment {}", x, y, segment))
                        })?;
                    CellInfo::ship(ship as usize, segment)
                }
                _ if ship != -1 => {
                    return Err(corrupt(format!(
                        "cell ({}, {}) carries a ship but is not a ship cell",
                        x, y
                    )))
                }
                CellStatus::Empty => CellInfo::empty(),
                CellStatus::Unknown => CellInfo::unknown(),
            };
            field.set_cell(x, y, cell)?;
        }
    }
    let flag: i64 = r.number("double damage flag")?;
    field.set_next_attack_double_damage(flag != 0);
    Ok(field)
}

fn read_abilities(r: &mut Reader<'_>) -> Result<AbilityManager> {
    let count: usize = r.number("ability count")?;
    // names may contain spaces, so the rest of the block is line based
    r.line();
    (0..count)
        .map(|_| {
            r.line()
                .ok_or_else(|| corrupt("missing ability name"))?
                .trim_end()
                .parse::<Ability>()
        })
        .collect()
}

impl FromStr for GameState {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self> {
        let mut r = Reader::new(s);
        let status = GameStatus::from_code(r.number("game status")?)
            .ok_or_else(|| corrupt("unknown game status"))?;
        let round: u32 = r.number("round")?;
        let width: usize = r.number("field width")?;
        let height: usize = r.number("field height")?;
        let dims = 1..=MAX_FIELD_SIZE;
        if !dims.contains(&width) || !dims.contains(&height) {
            return Err(corrupt(format!(
                "field size {}x{} is outside 1..={}",
                width, height, MAX_FIELD_SIZE
            )));
        }

        let size_count: usize = r.number("ship size count")?;
        let ship_sizes = (0..size_count)
            .map(|_| r.number("ship size"))
            .collect::<Result<Vec<usize>>>()?;
        GameConfig::new(width, height, ship_sizes.clone())
            .validate()
            .map_err(|e| match e {
                GameError::Configuration(msg) => corrupt(msg),
                other => other,
            })?;

        let player_ships = read_ships(&mut r)?;
        let opponent_ships = read_ships(&mut r)?;
        let player_field = read_field(&mut r, width, height, &player_ships)?;
        let opponent_field = read_field(&mut r, width, height, &opponent_ships)?;
        let player_abilities = read_abilities(&mut r)?;

        Ok(GameState {
            status,
            round,
            width,
            height,
            ship_sizes,
            player_ships,
            opponent_ships,
            player_field,
            opponent_field,
            player_abilities,
        })
    }
}

/// Characters a save name may not contain.
const FORBIDDEN_NAME_CHARS: &[char] = &['\\', '/', ':', '*', '?', '"', '<', '>', '|'];

/// Directory of `<name>.txt` save files.
#[derive(Debug, Clone)]
pub struct SaveStore {
    dir: PathBuf,
}

impl SaveStore {
    pub const EXTENSION: &'static str = "txt";

    pub fn new(dir: impl Into<PathBuf>) -> Self {
        SaveStore { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, name: &str) -> Result<PathBuf> {
        if name.is_empty() || name.contains(FORBIDDEN_NAME_CHARS) {
            return Err(GameError::Io(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("invalid save name {:?}", name),
            )));
        }
        Ok(self.dir.join(format!("{}.{}", name, Self::EXTENSION)))
    }

    pub fn save(&self, name: &str, state: &GameState) -> Result<PathBuf> {
        let path = self.path_for(name)?;
        fs::create_dir_all(&self.dir)?;
        fs::write(&path, state.to_string())?;
        info!("saved game to {}", path.display());
        Ok(path)
    }

    pub fn load(&self, name: &str) -> Result<GameState> {
        let path = self.path_for(name)?;
        let text = fs::read_to_string(&path)?;
        let state = text.parse()?;
        info!("loaded game from {}", path.display());
        Ok(state)
    }

    /// Names of the saves in the directory, sorted.
    pub fn list(&self) -> Result<Vec<String>> {
        if !self.dir.is_dir() {
            return Ok(Vec::new());
        }
        let mut names = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some(Self::EXTENSION) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                names.push(stem.to_string());
            }
        }
        names.sort();
        Ok(names)
    }
}
