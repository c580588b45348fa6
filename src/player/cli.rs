use std::io::{self, BufRead, Stdin, Stdout, Write};

use rand::Rng;

use crate::board::GameField;
use crate::cli::interface::render_field;
use crate::common::{GameError, Result};
use crate::placement;
use crate::ship::Orientation;
use crate::ship_manager::ShipManager;

use super::Player;

/// Console player. Reads answers line by line from `input` and writes
/// prompts and boards to `output`.
pub struct CliPlayer<R, W> {
    input: R,
    output: W,
}

impl CliPlayer<io::BufReader<Stdin>, Stdout> {
    pub fn stdio() -> Self {
        Self::new(io::BufReader::new(io::stdin()), io::stdout())
    }
}

impl<R: BufRead, W: Write> CliPlayer<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn into_output(self) -> W {
        self.output
    }

    /// Write `text` followed by a newline.
    pub fn say(&mut self, text: &str) -> Result<()> {
        writeln!(self.output, "{}", text)?;
        Ok(())
    }

    /// Write `text` without a newline, then read one trimmed line.
    /// `None` once input is exhausted.
    pub fn prompt(&mut self, text: &str) -> Result<Option<String>> {
        write!(self.output, "{}", text)?;
        self.output.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    fn prompt_required(&mut self, text: &str) -> Result<String> {
        self.prompt(text)?.ok_or_else(|| {
            GameError::Io(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "input closed while waiting for an answer",
            ))
        })
    }

    fn prompt_coordinate(&mut self, text: &str) -> Result<usize> {
        loop {
            let line = self.prompt_required(text)?;
            match line.parse() {
                Ok(v) => return Ok(v),
                Err(_) => self.say("Please enter a non-negative number.")?,
            }
        }
    }
}

/// Parse `x y h|v`.
fn parse_placement(input: &str) -> Option<(usize, usize, Orientation)> {
    let mut parts = input.split_whitespace();
    let x = parts.next()?.parse().ok()?;
    let y = parts.next()?.parse().ok()?;
    let orientation = match parts.next()? {
        "h" | "H" => Orientation::Horizontal,
        "v" | "V" => Orientation::Vertical,
        _ => return None,
    };
    if parts.next().is_some() {
        return None;
    }
    Some((x, y, orientation))
}

impl<In: BufRead, Out: Write> Player for CliPlayer<In, Out> {
    fn place_ships<R: Rng>(
        &mut self,
        rng: &mut R,
        field: &mut GameField,
        ships: &mut ShipManager,
    ) -> Result<()> {
        self.say("\nPlace your ships! Enter x y and orientation (h/v), or press enter for random placement.")?;
        for index in 0..ships.len() {
            let length = ships.ship(index)?.length();
            loop {
                let board = render_field(field, ships, true);
                write!(self.output, "\n{}", board)?;
                let line = self.prompt_required(&format!("Ship of length {}: ", length))?;
                if line.is_empty() {
                    if placement::place_ship_randomly(field, ships, index, rng)? {
                        break;
                    }
                    self.say("No free spot found for that ship. Place it manually.")?;
                    continue;
                }
                let Some((x, y, orientation)) = parse_placement(&line) else {
                    self.say("Invalid input. Use: x y h|v")?;
                    continue;
                };
                match field.place_ship(ships, index, x, y, orientation) {
                    Ok(()) => break,
                    Err(GameError::ShipPlacement) => {
                        self.say("Cannot place ship there. Try again.")?
                    }
                    Err(e) => return Err(e),
                }
            }
        }
        self.say("\nAll ships placed successfully!")
    }

    fn scan_origin<R: Rng>(&mut self, _rng: &mut R, _field: &GameField) -> Result<(usize, usize)> {
        let x = self.prompt_coordinate("Enter the X coordinate: ")?;
        let y = self.prompt_coordinate("Enter the Y coordinate: ")?;
        Ok((x, y))
    }
}
