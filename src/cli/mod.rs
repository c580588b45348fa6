//! Interactive command loop and console display.

use std::io::{BufRead, ErrorKind, Write};

use log::warn;

use crate::ability::AbilityOutcome;
use crate::common::{GameError, Result};
use crate::game::{Game, GameStatus};
use crate::persistence::SaveStore;
use crate::player::CliPlayer;

pub mod interface;

pub use interface::{legend, render_field, HELP};

/// How a session begins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Start {
    New,
    /// Load this save, falling back to a new game if it cannot be read.
    Load(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    GameOver,
    Quit,
}

fn is_yes(answer: Option<&str>) -> bool {
    matches!(answer, Some("yes") | Some("y"))
}

fn is_eof(e: &GameError) -> bool {
    matches!(e, GameError::Io(io) if io.kind() == ErrorKind::UnexpectedEof)
}

/// One console session: a game, the console that drives it, and the save
/// directory. Rounds continue until `max_rounds` are won or one is lost.
pub struct Session<R, W> {
    game: Game,
    console: CliPlayer<R, W>,
    store: SaveStore,
    max_rounds: u32,
}

impl<R: BufRead, W: Write> Session<R, W> {
    pub fn new(game: Game, console: CliPlayer<R, W>, store: SaveStore, max_rounds: u32) -> Self {
        Self {
            game,
            console,
            store,
            max_rounds,
        }
    }

    pub fn game(&self) -> &Game {
        &self.game
    }

    pub fn into_console(self) -> CliPlayer<R, W> {
        self.console
    }

    /// Run until the player quits, declines another game, or input ends.
    pub fn run(&mut self, start: Start) -> Result<()> {
        self.console.say("Welcome to Battleship!")?;
        match self.begin(start) {
            Err(e) if is_eof(&e) => return Ok(()),
            other => other?,
        }
        self.console.say(HELP)?;
        loop {
            if self.play_rounds()? == Flow::Quit {
                return Ok(());
            }
            let answer = self
                .console
                .prompt("Would you like to start a new game? (yes/no): ")?;
            if !is_yes(answer.as_deref()) {
                break;
            }
            match self.game.start_new_game(&mut self.console) {
                Err(e) if is_eof(&e) => return Ok(()),
                other => other?,
            }
        }
        self.console.say("Thanks for playing!")
    }

    fn begin(&mut self, start: Start) -> Result<()> {
        if let Start::Load(name) = start {
            match self.store.load(&name) {
                Ok(state) => {
                    self.game.restore(state);
                    return self.console.say("Game loaded successfully.");
                }
                Err(e) => {
                    warn!("could not load save {:?}: {}", name, e);
                    self.console.say(&format!(
                        "Failed to load game: {}\nStarting a new game instead.",
                        e
                    ))?;
                }
            }
        }
        self.game.start_new_game(&mut self.console)
    }

    /// Play turns and rounds until the campaign ends or the player quits.
    fn play_rounds(&mut self) -> Result<Flow> {
        loop {
            while !self.game.is_game_over() {
                if self.turn()? == Flow::Quit {
                    return Ok(Flow::Quit);
                }
            }
            let round = self.game.round();
            match self.game.status() {
                GameStatus::PlayerWon if round < self.max_rounds => {
                    self.console
                        .say(&format!("\nCongratulations! You won round {}!", round))?;
                    self.console
                        .say(&format!("\nPreparing for round {}...", round + 1))?;
                    self.game.start_next_round()?;
                }
                GameStatus::PlayerWon => {
                    self.console.say(&format!(
                        "\nCongratulations! You've completed all {} rounds!",
                        self.max_rounds
                    ))?;
                    return Ok(Flow::GameOver);
                }
                _ => {
                    self.console
                        .say(&format!("\nGame Over! You lost in round {}.", round))?;
                    return Ok(Flow::GameOver);
                }
            }
        }
    }

    fn turn(&mut self) -> Result<Flow> {
        self.console
            .say(&format!("\nCurrent Round: {}", self.game.round()))?;
        if let Some(name) = self.game.current_player_ability_name() {
            self.console.say(&format!("Available ability: {}", name))?;
        }
        let Some(input) = self.console.prompt("Enter command: ")? else {
            return Ok(Flow::Quit);
        };
        let mut words = input.split_whitespace();
        match words.next() {
            None => Ok(Flow::Continue),
            Some("help") => self.console.say(HELP).map(|_| Flow::Continue),
            Some("quit") => {
                let answer = self
                    .console
                    .prompt("Do you want to save the game before quitting? (yes/no): ")?;
                if is_yes(answer.as_deref()) {
                    self.save()?;
                }
                Ok(Flow::Quit)
            }
            Some("display") => self.display().map(|_| Flow::Continue),
            Some("saves") => self.list_saves().map(|_| Flow::Continue),
            Some("save") => self.save().map(|_| Flow::Continue),
            Some("load") => self.load().map(|_| Flow::Continue),
            Some("ability") => self.ability(),
            Some("attack") => {
                let coords: Vec<Option<usize>> = words.map(|w| w.parse().ok()).collect();
                match coords[..] {
                    [Some(x), Some(y)] => self.attack(x, y).map(|_| Flow::Continue),
                    _ => self
                        .console
                        .say("Invalid attack format. Use: attack x y")
                        .map(|_| Flow::Continue),
                }
            }
            Some(_) => self
                .console
                .say("Unknown command. Type 'help' for available commands.")
                .map(|_| Flow::Continue),
        }
    }

    fn attack(&mut self, x: usize, y: usize) -> Result<()> {
        let Some(result) = self.game.make_player_attack(x, y)? else {
            return self.console.say("Invalid attack coordinates.");
        };
        self.console.say(&result.to_string())?;
        if self.game.is_game_over() {
            return Ok(());
        }
        self.console.say("\nComputer's turn:")?;
        if let Some(shot) = self.game.make_computer_move()? {
            self.console.say(&format!(
                "Computer attacks ({}, {}): {}",
                shot.x, shot.y, shot.result
            ))?;
        }
        Ok(())
    }

    fn ability(&mut self) -> Result<Flow> {
        if !self.game.has_player_ability() {
            self.console.say("No ability available.")?;
            return Ok(Flow::Continue);
        }
        let outcome = match self.game.use_player_ability(&mut self.console) {
            Ok(Some(outcome)) => outcome,
            Ok(None) => return self.console.say("No ability available.").map(|_| Flow::Continue),
            Err(e) if is_eof(&e) => return Ok(Flow::Quit),
            Err(e) => return Err(e),
        };
        match outcome {
            AbilityOutcome::DoubleDamageArmed => self
                .console
                .say("Double damage armed: your next attack deals 2 damage.")?,
            AbilityOutcome::Scanned(report) => {
                if !report.found_ship() {
                    self.console.say("No ships found in the scanned area.")?;
                }
                for (x, y) in report.ships_found() {
                    self.console.say(&format!("Ship found at ({},{})", x, y))?;
                }
            }
            AbilityOutcome::Bombarded { .. } => {
                self.console.say("Bombard struck an enemy ship.")?
            }
            AbilityOutcome::NoTarget => self.console.say("Bombard found no target.")?,
        }
        Ok(Flow::Continue)
    }

    fn display(&mut self) -> Result<()> {
        let player = self.game.player();
        let opponent = self.game.opponent();
        let text = format!(
            "Your Field:\n{}\nEnemy Field:\n{}{}",
            render_field(&player.field, &player.ships, true),
            render_field(&opponent.field, &opponent.ships, false),
            legend()
        );
        self.console.say(&text)
    }

    fn list_saves(&mut self) -> Result<Vec<String>> {
        let saves = self.store.list()?;
        if saves.is_empty() {
            self.console.say("No saved games found.")?;
        } else {
            self.console.say("Available saves:")?;
            for (i, name) in saves.iter().enumerate() {
                self.console.say(&format!("{:>3}. {}", i + 1, name))?;
            }
        }
        Ok(saves)
    }

    fn save(&mut self) -> Result<()> {
        self.list_saves()?;
        let name = match self
            .console
            .prompt("\nEnter name for the save file or 'back' to return: ")?
        {
            Some(name) if name != "back" => name,
            _ => return Ok(()),
        };
        match self.store.save(&name, &self.game.state()) {
            Ok(_) => self.console.say("Game saved successfully."),
            Err(e) => self.console.say(&format!("Failed to save game: {}", e)),
        }
    }

    fn load(&mut self) -> Result<()> {
        let saves = self.list_saves()?;
        if saves.is_empty() {
            return Ok(());
        }
        let answer = match self
            .console
            .prompt("\nEnter the number of the save to load or 'back' to return: ")?
        {
            Some(answer) if answer != "back" => answer,
            _ => return Ok(()),
        };
        let Some(name) = answer
            .parse::<usize>()
            .ok()
            .and_then(|n| n.checked_sub(1))
            .and_then(|i| saves.get(i))
        else {
            return self.console.say("Failed to load game: invalid save number.");
        };
        match self.store.load(name) {
            Ok(state) => {
                self.game.restore(state);
                self.console.say("Game loaded successfully.")
            }
            Err(e) => self.console.say(&format!("Failed to load game: {}", e)),
        }
    }
}
