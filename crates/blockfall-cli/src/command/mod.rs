use std::path::PathBuf;

use anyhow::Context as _;
use blockfall_engine::GameConfig;
use clap::{Parser, Subcommand};
use log::LevelFilter;

use self::{play::PlayArg, simulate::SimulateArg};
use crate::{logger, util};

mod play;
mod simulate;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// What mode to run the program in
    #[command(subcommand)]
    mode: Option<Mode>,
    /// Write engine logs to this file (logging is off if omitted)
    #[clap(long, global = true)]
    log_file: Option<PathBuf>,
    /// Most verbose level written to the log file
    #[clap(long, global = true, default_value_t = LevelFilter::Debug)]
    log_level: LevelFilter,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Play in the terminal
    Play(#[clap(flatten)] PlayArg),
    /// Run a headless game with a random agent and print a JSON report
    Simulate(#[clap(flatten)] SimulateArg),
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    if let Some(path) = &args.log_file {
        logger::init_file_logger(path, args.log_level)?;
    }
    match args.mode.unwrap_or(Mode::Play(PlayArg::default())) {
        Mode::Play(arg) => play::run(&arg)?,
        Mode::Simulate(arg) => simulate::run(&arg)?,
    }
    Ok(())
}

/// Game rule options shared by every mode.
#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct ConfigArg {
    /// Path to a game configuration file (JSON format)
    #[clap(long)]
    config: Option<PathBuf>,
    /// Board width in cells, overriding the configuration file
    #[clap(long)]
    width: Option<usize>,
    /// Board height in cells, overriding the configuration file
    #[clap(long)]
    height: Option<usize>,
}

impl ConfigArg {
    pub(crate) fn load(&self) -> anyhow::Result<GameConfig> {
        let mut config = match &self.config {
            Some(path) => util::read_json_file("game config", path)?,
            None => GameConfig::default(),
        };
        if let Some(width) = self.width {
            config.board_width = width;
        }
        if let Some(height) = self.height {
            config.board_height = height;
        }
        config.validate().context("Invalid game configuration")?;
        Ok(config)
    }
}
