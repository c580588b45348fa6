//! Round orchestrator: owns both sides, sequences turns, and carries the
//! player's side across rounds.

use log::{debug, info};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::ability::{AbilityManager, AbilityOutcome};
use crate::board::{CellStatus, GameField};
use crate::common::{AttackResult, GameError, Result};
use crate::config::GameConfig;
use crate::persistence::GameState;
use crate::placement;
use crate::player::{AiPlayer, Player};
use crate::ship_manager::ShipManager;

/// Current status of a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameStatus {
    NotStarted,
    InProgress,
    PlayerWon,
    PlayerLost,
}

impl GameStatus {
    pub fn code(self) -> u8 {
        match self {
            GameStatus::NotStarted => 0,
            GameStatus::InProgress => 1,
            GameStatus::PlayerWon => 2,
            GameStatus::PlayerLost => 3,
        }
    }

    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(GameStatus::NotStarted),
            1 => Some(GameStatus::InProgress),
            2 => Some(GameStatus::PlayerWon),
            3 => Some(GameStatus::PlayerLost),
            _ => None,
        }
    }
}

/// One side's board and the fleet placed on it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Side {
    pub field: GameField,
    pub ships: ShipManager,
}

impl Side {
    /// Empty board and an unplaced fleet.
    pub fn new(config: &GameConfig) -> Self {
        Side {
            field: GameField::new(config.width, config.height),
            ships: ShipManager::new(&config.ship_sizes),
        }
    }

    /// Fresh side with the whole fleet placed at random.
    pub fn auto_placed<R: Rng>(config: &GameConfig, rng: &mut R) -> Result<Self> {
        let mut side = Side::new(config);
        placement::place_all_ships_randomly(&mut side.field, &mut side.ships, rng)?;
        Ok(side)
    }
}

/// A computer shot and how it resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ComputerMove {
    pub x: usize,
    pub y: usize,
    pub result: AttackResult,
}

pub struct Game {
    config: GameConfig,
    status: GameStatus,
    round: u32,
    player: Side,
    abilities: AbilityManager,
    opponent: Side,
    computer: AiPlayer,
    rng: SmallRng,
}

impl Game {
    /// New game seeded from the thread RNG.
    pub fn new(config: GameConfig) -> Result<Self> {
        let mut seed_rng = rand::rng();
        Self::with_rng(config, SmallRng::from_rng(&mut seed_rng))
    }

    /// Reproducible game: the same seed replays the same computer choices.
    pub fn with_seed(config: GameConfig, seed: u64) -> Result<Self> {
        Self::with_rng(config, SmallRng::seed_from_u64(seed))
    }

    pub fn with_rng(config: GameConfig, mut rng: SmallRng) -> Result<Self> {
        config.validate()?;
        let abilities = AbilityManager::new(&mut rng);
        Ok(Game {
            player: Side::new(&config),
            opponent: Side::new(&config),
            abilities,
            config,
            status: GameStatus::NotStarted,
            round: 0,
            computer: AiPlayer::new(),
            rng,
        })
    }

    /// Rebuild a game from a snapshot, adopting its dimensions and fleet.
    pub fn from_state(state: GameState, rng: SmallRng) -> Result<Self> {
        let mut game = Self::with_rng(GameConfig::default(), rng)?;
        game.restore(state);
        Ok(game)
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn is_game_over(&self) -> bool {
        matches!(self.status, GameStatus::PlayerWon | GameStatus::PlayerLost)
    }

    pub fn player(&self) -> &Side {
        &self.player
    }

    pub fn opponent(&self) -> &Side {
        &self.opponent
    }

    pub fn player_abilities(&self) -> &AbilityManager {
        &self.abilities
    }

    pub fn has_player_ability(&self) -> bool {
        self.abilities.has_abilities()
    }

    pub fn current_player_ability_name(&self) -> Option<&'static str> {
        self.abilities.peek_first_name().ok()
    }

    pub fn player_cell_status(&self, x: usize, y: usize) -> Result<CellStatus> {
        self.player.field.cell_status(x, y)
    }

    pub fn opponent_cell_status(&self, x: usize, y: usize) -> Result<CellStatus> {
        self.opponent.field.cell_status(x, y)
    }

    /// Start round 1: the player places a fresh fleet through `placer` and
    /// gets a fresh ability queue; the opponent is placed at random.
    pub fn start_new_game<P: Player>(&mut self, placer: &mut P) -> Result<()> {
        let mut player = Side::new(&self.config);
        placer.place_ships(&mut self.rng, &mut player.field, &mut player.ships)?;
        let opponent = Side::auto_placed(&self.config, &mut self.rng)?;

        self.player = player;
        self.abilities = AbilityManager::new(&mut self.rng);
        self.opponent = opponent;
        self.round = 1;
        self.status = GameStatus::InProgress;
        info!("new game started");
        Ok(())
    }

    /// After a won round, face a freshly placed opponent. The player's board,
    /// damage, and unused abilities carry over untouched.
    pub fn start_next_round(&mut self) -> Result<()> {
        if self.status != GameStatus::PlayerWon {
            return Err(GameError::InvalidState(
                "next round can only start after a won round",
            ));
        }
        self.opponent = Side::auto_placed(&self.config, &mut self.rng)?;
        self.round += 1;
        self.status = GameStatus::InProgress;
        info!("round {} started", self.round);
        Ok(())
    }

    /// Attack the opponent's field. `Ok(None)` when no game is in progress or
    /// the coordinates are off the field.
    pub fn make_player_attack(&mut self, x: usize, y: usize) -> Result<Option<AttackResult>> {
        if self.status != GameStatus::InProgress {
            return Ok(None);
        }
        let outcome = self.opponent.field.attack_cell(
            x,
            y,
            &mut self.opponent.ships,
            Some(&mut self.abilities),
            &mut self.rng,
        );
        let result = match turn_outcome(outcome)? {
            Some(result) => result,
            None => return Ok(None),
        };
        self.check_player_won();
        Ok(Some(result))
    }

    /// Computer fires at a uniform random cell of the player's field.
    pub fn make_computer_move(&mut self) -> Result<Option<ComputerMove>> {
        if self.status != GameStatus::InProgress {
            return Ok(None);
        }
        let (x, y) = self.computer.select_target(&mut self.rng, &self.player.field);
        let outcome =
            self.player
                .field
                .attack_cell(x, y, &mut self.player.ships, None, &mut self.rng);
        let result = match turn_outcome(outcome)? {
            Some(result) => result,
            None => return Ok(None),
        };
        if self.player.ships.all_ships_destroyed() {
            self.status = GameStatus::PlayerLost;
            info!("player lost in round {}", self.round);
        }
        Ok(Some(ComputerMove { x, y, result }))
    }

    /// Use the player's oldest ability against the opponent. `Ok(None)` when
    /// no game is in progress or the queue is empty.
    pub fn use_player_ability<P: Player>(&mut self, input: &mut P) -> Result<Option<AbilityOutcome>> {
        if self.status != GameStatus::InProgress || !self.abilities.has_abilities() {
            return Ok(None);
        }
        let outcome = self.abilities.use_ability(
            &mut self.opponent.field,
            &mut self.opponent.ships,
            input,
            &mut self.rng,
        );
        let outcome = match outcome {
            Ok(outcome) => outcome,
            Err(GameError::NoAbility) => return Ok(None),
            Err(e) => return Err(e),
        };
        self.check_player_won();
        Ok(Some(outcome))
    }

    fn check_player_won(&mut self) {
        if self.opponent.ships.all_ships_destroyed() {
            self.status = GameStatus::PlayerWon;
            info!("player won round {}", self.round);
        }
    }

    /// Snapshot of everything that is persisted.
    pub fn state(&self) -> GameState {
        GameState {
            status: self.status,
            round: self.round,
            width: self.config.width,
            height: self.config.height,
            ship_sizes: self.config.ship_sizes.clone(),
            player_ships: self.player.ships.clone(),
            opponent_ships: self.opponent.ships.clone(),
            player_field: self.player.field.clone(),
            opponent_field: self.opponent.field.clone(),
            player_abilities: self.abilities.clone(),
        }
    }

    /// Replace every component with the snapshot's. The random source is kept.
    pub fn restore(&mut self, state: GameState) {
        self.config = GameConfig::new(state.width, state.height, state.ship_sizes);
        self.status = state.status;
        self.round = state.round;
        self.player = Side {
            field: state.player_field,
            ships: state.player_ships,
        };
        self.opponent = Side {
            field: state.opponent_field,
            ships: state.opponent_ships,
        };
        self.abilities = state.player_abilities;
        info!("restored game at round {}", self.round);
    }
}

/// Turn-boundary policy: an off-field attack is a failed turn, anything
/// else unexpected is reported.
fn turn_outcome(outcome: Result<AttackResult>) -> Result<Option<AttackResult>> {
    match outcome {
        Ok(result) => Ok(Some(result)),
        Err(GameError::OutOfField { x, y }) => {
            debug!("attack at ({}, {}) is off the field", x, y);
            Ok(None)
        }
        Err(e) => Err(e),
    }
}
