use std::env;
use std::process::ExitCode;

use minelogic::logging::init_logging;
use minelogic::play::{Game, Outcome};
use minelogic::{GameConfig, MineField};

fn main() -> ExitCode {
    init_logging();
    let config = match env::args().nth(1) {
        Some(name) => {
            match GameConfig::preset(&name) {
                Some(config) => config,
                None => {
                    log::error!("unknown preset {:?}", name);
                    return ExitCode::FAILURE;
                },
            }
        },
        None => GameConfig::default(),
    };
    let field = match MineField::from_config(&config) {
        Ok(field) => field,
        Err(err) => {
            log::error!("{}", err);
            return ExitCode::FAILURE;
        },
    };
    println!("{}", field);

    let mut game = Game::new(field);
    match game.play(&mut rand::rng()) {
        Ok(Outcome::Won) => {
            println!(
                "Won after {} moves",
                game.knowledge().moves_made().len()
            );
            ExitCode::SUCCESS
        },
        Ok(Outcome::Lost(cell)) => {
            println!(
                "Lost at {:?} after {} moves ({} mines found)",
                cell,
                game.knowledge().moves_made().len(),
                game.knowledge().mines().len()
            );
            ExitCode::SUCCESS
        },
        Err(err) => {
            log::error!("{}", err);
            ExitCode::FAILURE
        },
    }
}
