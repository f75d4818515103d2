mod config;
mod entities;
mod game;
mod input;
mod particle;
mod snake;
mod store;
mod term;
mod world;

use std::fs::File;

use anyhow::{anyhow, Context, Result};
use log::info;
use simplelog::{Config, WriteLogger};

pub type TermInt = u16;
pub type Coords = (u16, u16);
/// Board cell as (column, row). A shielded wall hit can leave the head outside the board.
pub type Position = (i32, i32);

fn main() -> Result<()> {
    // The terminal belongs to the game, so logs go to a file
    let log_file = File::create(config::LOG_FILE).context("Error creating log file")?;
    WriteLogger::init(config::log_level(), Config::default(), log_file)
        .map_err(|e| anyhow!("Error setting up logging: {}", e))?;

    config::validate().context("Invalid game configuration")?;

    let store = store::FileStore::new(config::score_file());
    info!("using score file {}", store.path().display());

    let mut game = game::SnakeGame::new(Box::new(store))?;
    game.check_terminal()?;
    game.setup()?;

    // Always hand the terminal back, even when the game loop failed
    let result = game.run();
    let restored = game.restore();
    result.and(restored)
}
