//! Text rendering of fields and the command help.

use std::fmt::Write;

use crate::board::{CellStatus, GameField};
use crate::ship::SegmentState;
use crate::ship_manager::ShipManager;

pub const HELP: &str = "\nAvailable commands:
  attack x y   - Attack position (x,y)
  ability      - Use current ability
  save         - Save current game
  load         - Load saved game
  saves        - List saved games
  display      - Show game fields
  help         - Show this help
  quit         - Exit game";

pub fn legend() -> &'static str {
    "\nLegend:
  .  - Unknown cell
  O  - Miss
  S  - Your ship (only on your field)
  X  - Hit
  #  - Destroyed segment"
}

fn cell_symbol(field: &GameField, ships: &ShipManager, x: usize, y: usize, reveal: bool) -> char {
    let segment = field
        .ship_at(x, y)
        .and_then(|r| ships.ship(r.ship).ok()?.segment_state(r.segment).ok());
    match segment {
        Some(SegmentState::Intact) if reveal => 'S',
        Some(SegmentState::Intact) => '.',
        Some(SegmentState::Damaged) => 'X',
        Some(SegmentState::Destroyed) => '#',
        None => match field.cell_status(x, y) {
            Ok(CellStatus::Empty) => 'O',
            _ => '.',
        },
    }
}

/// Draw a field with x across the top and y down the side. Intact ship
/// segments are only shown when `reveal` is set.
pub fn render_field(field: &GameField, ships: &ShipManager, reveal: bool) -> String {
    let mut out = String::from("  ");
    for x in 0..field.width() {
        let _ = write!(out, "{:>2}", x);
    }
    out.push('\n');
    for y in 0..field.height() {
        let _ = write!(out, "{:>2}", y);
        for x in 0..field.width() {
            let _ = write!(out, "{:>2}", cell_symbol(field, ships, x, y, reveal));
        }
        out.push('\n');
    }
    out
}
