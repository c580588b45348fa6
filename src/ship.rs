//! Ship definitions and per-segment damage tracking.

use core::fmt;

use crate::common::{GameError, Result};
use crate::config::{MAX_SHIP_LEN, MIN_SHIP_LEN};

/// Damage at which a segment counts as destroyed. Damage never exceeds it.
pub const DESTROYED_DAMAGE: u8 = 2;

/// Orientation of a ship on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Horizontal,
    Vertical,
}

impl Orientation {
    pub fn code(self) -> u8 {
        match self {
            Orientation::Horizontal => 0,
            Orientation::Vertical => 1,
        }
    }

    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Orientation::Horizontal),
            1 => Some(Orientation::Vertical),
            _ => None,
        }
    }

    /// Cell reached after `step` steps from `(x, y)`; `None` on overflow.
    pub fn step(self, x: usize, y: usize, step: usize) -> Option<(usize, usize)> {
        match self {
            Orientation::Horizontal => x.checked_add(step).map(|x| (x, y)),
            Orientation::Vertical => y.checked_add(step).map(|y| (x, y)),
        }
    }
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Orientation::Horizontal => f.write_str("Horizontal"),
            Orientation::Vertical => f.write_str("Vertical"),
        }
    }
}

/// Observable state of one ship segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentState {
    Intact,
    Damaged,
    Destroyed,
}

impl SegmentState {
    fn from_damage(damage: u8) -> Self {
        match damage {
            0 => SegmentState::Intact,
            1 => SegmentState::Damaged,
            _ => SegmentState::Destroyed,
        }
    }

    pub fn code(self) -> u8 {
        match self {
            SegmentState::Intact => 0,
            SegmentState::Damaged => 1,
            SegmentState::Destroyed => 2,
        }
    }

    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(SegmentState::Intact),
            1 => Some(SegmentState::Damaged),
            2 => Some(SegmentState::Destroyed),
            _ => None,
        }
    }

    /// Damage that turns an intact segment into this state.
    pub fn damage(self) -> i32 {
        i32::from(self.code())
    }

    fn symbol(self) -> char {
        match self {
            SegmentState::Intact => 'O',
            SegmentState::Damaged => 'X',
            SegmentState::Destroyed => '#',
        }
    }
}

/// A vessel of 1..=4 segments. A ship built with any other length is
/// invalid and refuses every further operation.
#[derive(Clone, PartialEq, Eq)]
pub struct Ship {
    length: usize,
    orientation: Orientation,
    segment_damage: Vec<u8>,
    valid: bool,
}

impl Ship {
    pub fn new(length: usize, orientation: Orientation) -> Self {
        let valid = (MIN_SHIP_LEN..=MAX_SHIP_LEN).contains(&length);
        let segment_damage = if valid { vec![0; length] } else { Vec::new() };
        Ship {
            length,
            orientation,
            segment_damage,
            valid,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.valid
    }

    pub fn length(&self) -> usize {
        self.length
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    pub fn set_orientation(&mut self, orientation: Orientation) {
        self.orientation = orientation;
    }

    fn check_segment(&self, index: usize) -> Result<()> {
        if !self.valid {
            return Err(GameError::InvalidState("invalid ship"));
        }
        if index >= self.length {
            return Err(GameError::IndexOutOfRange {
                index,
                len: self.length,
            });
        }
        Ok(())
    }

    pub fn segment_state(&self, index: usize) -> Result<SegmentState> {
        self.check_segment(index)?;
        Ok(SegmentState::from_damage(self.segment_damage[index]))
    }

    /// States of all segments in order; empty for an invalid ship.
    pub fn segment_states(&self) -> impl Iterator<Item = SegmentState> + '_ {
        self.segment_damage
            .iter()
            .map(|&d| SegmentState::from_damage(d))
    }

    /// Add `amount` damage to a segment, saturating at destroyed.
    pub fn apply_damage(&mut self, index: usize, amount: i32) -> Result<()> {
        self.check_segment(index)?;
        if amount < 0 {
            return Err(GameError::InvalidArgument("damage cannot be negative"));
        }
        let current = i32::from(self.segment_damage[index]);
        let capped = current
            .saturating_add(amount)
            .min(i32::from(DESTROYED_DAMAGE));
        self.segment_damage[index] = capped as u8;
        Ok(())
    }

    pub fn is_destroyed(&self) -> bool {
        self.valid
            && self
                .segment_damage
                .iter()
                .all(|&d| d >= DESTROYED_DAMAGE)
    }
}

impl fmt::Display for Ship {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.valid {
            return f.write_str("Invalid Ship");
        }
        write!(
            f,
            "Ship (Length: {}, Orientation: {}): ",
            self.length, self.orientation
        )?;
        for state in self.segment_states() {
            write!(f, "{}", state.symbol())?;
        }
        Ok(())
    }
}

impl fmt::Debug for Ship {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Ship {{ length: {}, orientation: {:?}, damage: {:?}, valid: {} }}",
            self.length, self.orientation, self.segment_damage, self.valid
        )
    }
}
