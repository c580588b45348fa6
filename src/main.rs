use std::path::PathBuf;

use broadside::{init_logging, CliPlayer, Game, SaveStore, Session, Settings, Start};
use clap::{Parser, Subcommand};
use log::info;

#[derive(Parser)]
#[command(author, version, about = "Battleship against the computer, over several rounds", long_about = None)]
struct Cli {
    /// TOML file with board, round, and save directory settings.
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long, help = "Fix RNG seed for reproducible games (e.g., --seed 12345)")]
    seed: Option<u64>,
    /// Directory holding save files.
    #[arg(long)]
    save_dir: Option<PathBuf>,
    /// Rounds to win before the campaign is complete.
    #[arg(long)]
    rounds: Option<u32>,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start a new game (the default).
    New,
    /// Resume a saved game by name.
    Load { name: String },
    /// List saved games and exit.
    Saves,
}

fn main() -> anyhow::Result<()> {
    init_logging();
    let cli = Cli::parse();

    let mut settings = match &cli.config {
        Some(path) => Settings::load(path)?,
        None => Settings::default(),
    };
    if let Some(dir) = cli.save_dir {
        settings.save_dir = dir;
    }
    if let Some(rounds) = cli.rounds {
        anyhow::ensure!(rounds > 0, "--rounds must be at least 1");
        settings.max_rounds = rounds;
    }
    let store = SaveStore::new(settings.save_dir.clone());

    let start = match cli.command.unwrap_or(Commands::New) {
        Commands::New => Start::New,
        Commands::Load { name } => Start::Load(name),
        Commands::Saves => {
            let saves = store.list()?;
            if saves.is_empty() {
                println!("No saved games found in {}.", store.dir().display());
            }
            for name in saves {
                println!("{}", name);
            }
            return Ok(());
        }
    };

    let game = match cli.seed {
        Some(seed) => {
            info!("using fixed seed {}", seed);
            Game::with_seed(settings.board, seed)?
        }
        None => Game::new(settings.board)?,
    };
    let mut session = Session::new(game, CliPlayer::stdio(), store, settings.max_rounds);
    session.run(start)?;
    Ok(())
}
