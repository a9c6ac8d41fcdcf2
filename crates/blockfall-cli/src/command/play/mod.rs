use blockfall_engine::{Game, PieceGenerator, PieceSeed};

use crate::{
    command::{ConfigArg, play::app::PlayApp},
    tui::Tui,
};

mod app;
mod screen;

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct PlayArg {
    #[clap(flatten)]
    pub(crate) config: ConfigArg,
    /// Seed for the piece sequence (32 hex characters); random if omitted
    #[clap(long)]
    pub(crate) seed: Option<PieceSeed>,
}

pub(crate) fn run(arg: &PlayArg) -> anyhow::Result<()> {
    let PlayArg { config, seed } = arg;

    let config = config.load()?;
    let generator = seed.map_or_else(PieceGenerator::new, PieceGenerator::with_seed);
    let game = Game::with_config(config, generator)?;

    let mut app = PlayApp::new(game);
    Tui::new().run(&mut app)
}
