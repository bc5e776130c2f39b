//! Headless driver for the Primordia world: builds a game from command-line
//! parameters, runs it for a fixed number of ticks, and optionally writes a
//! final snapshot. All simulation logic lives in `primordia-world`; this
//! binary only wires configuration, logging and the tick loop.

use anyhow::{bail, Context, Result};
use primordia_core::{GameConfig, LoopMode};
use primordia_world::{CellKind, Game, GameEvent};
use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;
use tracing::info;
use tracing_subscriber::EnvFilter;

const USAGE: &str = "\
primordia - artificial-life world simulator

USAGE:
    primordia [OPTIONS]

OPTIONS:
    --width <N>             grid width (default 100)
    --height <N>            grid height (default 50)
    --torus                 wrap the world edges (default: finite)
    --population <N>        initial organism count (default 1)
    --plant-spawn-rate <F>  plant seeding rate (default 10)
    --seed <N>              random seed (default 0)
    --ticks <N>             ticks to run (default 1000)
    --snapshot <PATH>       write the final grid snapshot to this file;
                            .json gets descriptors, anything else bincode
    --help                  print this help
";

struct Options {
    config: GameConfig,
    ticks: u64,
    snapshot: Option<PathBuf>,
}

fn parse_options() -> Result<Options> {
    let mut config = GameConfig::default();
    let mut ticks = 1000u64;
    let mut snapshot = None;

    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        let mut value = |name: &str| {
            args.next()
                .with_context(|| format!("missing value for {name}"))
        };

        match arg.as_str() {
            "--width" => config.width = value("--width")?.parse()?,
            "--height" => config.height = value("--height")?.parse()?,
            "--torus" => config.loop_mode = LoopMode::Torus,
            "--population" => config.population = value("--population")?.parse()?,
            "--plant-spawn-rate" => {
                config.plant_spawn_rate = value("--plant-spawn-rate")?.parse()?
            }
            "--seed" => config.seed = value("--seed")?.parse()?,
            "--ticks" => ticks = value("--ticks")?.parse()?,
            "--snapshot" => snapshot = Some(PathBuf::from(value("--snapshot")?)),
            "--help" | "-h" => {
                print!("{USAGE}");
                std::process::exit(0);
            }
            other => bail!("unknown argument: {other}"),
        }
    }

    Ok(Options {
        config,
        ticks,
        snapshot,
    })
}

fn count_organisms(game: &Game) -> usize {
    game.grid()
        .iter()
        .filter(|(_, cell)| cell.kind() == CellKind::Organism)
        .count()
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let options = parse_options()?;
    let mut game = Game::new(options.config.clone())?;

    // Track the population from lifecycle events, the way a UI store would.
    let organisms = Rc::new(RefCell::new(count_organisms(&game) as i64));
    let sink = organisms.clone();
    game.subscribe(move |event| {
        let mut count = sink.borrow_mut();
        match event {
            GameEvent::CellInserted {
                kind: CellKind::Organism,
                ..
            } => *count += 1,
            GameEvent::CellDeleted {
                kind: CellKind::Organism,
                ..
            } => *count -= 1,
            _ => {}
        }
    });

    info!(ticks = options.ticks, "running simulation");

    for _ in 0..options.ticks {
        game.update();
        if game.step() % 100 == 0 {
            info!(
                step = game.step(),
                organisms = *organisms.borrow(),
                empty = game.grid().count_empty(),
                "progress"
            );
        }
    }

    info!(
        step = game.step(),
        organisms = *organisms.borrow(),
        "simulation finished"
    );

    if let Some(path) = options.snapshot {
        let snapshot = game.grid().serialize();
        let bytes = if path.extension().is_some_and(|ext| ext == "json") {
            serde_json::to_vec_pretty(&snapshot)?
        } else {
            snapshot.to_bytes()?
        };
        std::fs::write(&path, bytes)
            .with_context(|| format!("writing snapshot to {}", path.display()))?;
        info!(path = %path.display(), "snapshot written");
    }

    Ok(())
}
