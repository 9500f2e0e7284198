//! Computer-vs-computer driver: loads a level, lets the engine play both
//! sides through the background search, and prints the board after each move.

use notchess_core::engine::config::EngineConfig;
use notchess_core::engine::SearchLimit;
use notchess_core::logic::game::GameState;
use notchess_core::logic::layout::Layout;
use notchess_core::logic::levels;
use notchess_core::worker::spawn_search;
use std::sync::mpsc;
use tracing_subscriber::EnvFilter;

const DEFAULT_MAX_MOVES: u32 = 200;

struct Options {
    level: String,
    config_path: Option<String>,
    time_ms: Option<u64>,
    max_moves: u32,
}

fn usage() -> String {
    let titles: Vec<&str> = levels::builtin().iter().map(|level| level.title).collect();
    format!(
        "Usage: notchess <level title | layout.json> [--config <path>] [--time <ms>] [--moves <n>]\nBuilt-in levels: {}",
        titles.join(", ")
    )
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Result<Options, String> {
    let mut level = None;
    let mut config_path = None;
    let mut time_ms = None;
    let mut max_moves = DEFAULT_MAX_MOVES;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" => {
                config_path = Some(args.next().ok_or("--config requires a path")?);
            }
            "--time" => {
                let value = args.next().ok_or("--time requires milliseconds")?;
                time_ms = Some(
                    value
                        .parse()
                        .map_err(|e| format!("invalid --time {value}: {e}"))?,
                );
            }
            "--moves" => {
                let value = args.next().ok_or("--moves requires a count")?;
                max_moves = value
                    .parse()
                    .map_err(|e| format!("invalid --moves {value}: {e}"))?;
            }
            x if x.starts_with("--") => return Err(format!("Unknown option: {x}")),
            _ => level = Some(arg),
        }
    }

    Ok(Options {
        level: level.ok_or_else(usage)?,
        config_path,
        time_ms,
        max_moves,
    })
}

fn read_config(path: &str) -> Result<EngineConfig, String> {
    let json = std::fs::read_to_string(path).map_err(|e| format!("{path}: {e}"))?;
    EngineConfig::load_from_json(&json).map_err(|e| format!("{path}: {e}"))
}

fn load_config(options: &Options) -> Result<EngineConfig, String> {
    let mut config = options
        .config_path
        .as_deref()
        .map_or_else(|| Ok(EngineConfig::default()), read_config)?;
    if let Some(ms) = options.time_ms {
        config.time_limit_ms = ms;
    }
    Ok(config)
}

/// A built-in level title, or else a path to a layout JSON file.
fn load_game(level: &str) -> Result<GameState, String> {
    if let Some(builtin) = levels::by_title(level) {
        return GameState::from_level(builtin).map_err(|e| format!("{}: {e}", builtin.title));
    }
    let json = std::fs::read_to_string(level).map_err(|e| format!("{level}: {e}"))?;
    let layout = Layout::from_json(&json).map_err(|e| format!("{level}: {e}"))?;
    GameState::new(&layout, &[]).map_err(|e| format!("{level}: {e}"))
}

fn play(mut game: GameState, config: &EngineConfig, max_moves: u32) -> Result<(), String> {
    let limit = SearchLimit::Time(config.time_limit_ms);
    println!("{}", game.board().to_diagram());

    while game.move_count() < max_moves {
        if let Some(winner) = game.is_game_over() {
            println!("{winner:?} wins after {} moves", game.move_count());
            return Ok(());
        }

        let (tx, rx) = mpsc::channel();
        let handle = spawn_search(game.clone(), limit, config.clone(), move |result| {
            // The receiver outlives the search.
            let _ = tx.send(result);
        });
        let result = rx.recv().map_err(|e| format!("search thread failed: {e}"))?;
        handle
            .join()
            .map_err(|_| "search thread panicked".to_string())?;

        let Some((mv, stats)) = result else {
            println!("{:?} has no legal moves", game.turn());
            return Ok(());
        };
        tracing::info!(
            player = ?game.turn(),
            depth = stats.depth,
            nodes = stats.nodes,
            time_ms = stats.time_ms,
            score = stats.score,
            "{mv}"
        );
        game.apply_move(mv).map_err(|e| e.to_string())?;
        println!("{}. {mv}\n{}", game.move_count(), game.board().to_diagram());
    }

    println!("Stopped after {max_moves} moves");
    Ok(())
}

fn run() -> Result<(), String> {
    let options = parse_args(std::env::args().skip(1))?;
    let config = load_config(&options)?;
    let game = load_game(&options.level)?;
    play(game, &config, options.max_moves)
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    if let Err(e) = run() {
        eprintln!("{e}");
        std::process::exit(2);
    }
}
