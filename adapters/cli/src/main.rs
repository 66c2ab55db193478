#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs Quest Arcade games headlessly.

mod layout_transfer;

use std::{
    fs,
    io::{self, BufRead, Write},
    path::PathBuf,
    time::Duration,
};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use layout_transfer::{map_id, parse_map, TowerLayoutSnapshot, TowerLayoutTower};
use quest_arcade_chess::{legal_moves, ChessMatch, ChessMove, ChessStatus, Color};
use quest_arcade_core::{Event, TowerKind};
use quest_arcade_system_chess_ai::ChessAi;
use quest_arcade_system_progression::{
    format_xp, level_info, progress_to_next_level, xp_for_next_level, ChessSummary, Difficulty,
    GameResult, RunTally, TowerDefenseSummary,
};
use quest_arcade_tower_defense::{EngineConfig, TowerDefenseEngine};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

/// Command-line arguments accepted by the Quest Arcade binary.
#[derive(Debug, Parser)]
#[command(name = "quest-arcade", version, about = "Headless Quest Arcade games")]
struct CliArgs {
    #[command(subcommand)]
    command: Mode,
}

#[derive(Debug, Subcommand)]
enum Mode {
    /// Plays chess against the computer, reading moves such as `e2e4` from stdin.
    Chess(ChessArgs),
    /// Simulates a tower-defense run from a layout until it is won or lost.
    TowerDefense(TowerDefenseArgs),
    /// Prints the level reached with the given experience.
    Level {
        /// Total experience points.
        #[arg(long)]
        xp: u64,
    },
}

#[derive(Debug, clap::Args)]
struct ChessArgs {
    /// Seed for the opponent's tie-breaking.
    #[arg(long, default_value_t = 0)]
    seed: u64,
    /// Difficulty the match is recorded at.
    #[arg(long, default_value_t = Difficulty::Beginner)]
    difficulty: Difficulty,
    /// Lets the computer play white as well.
    #[arg(long)]
    autoplay: bool,
    /// Stops the match after this many moves.
    #[arg(long, default_value_t = 200)]
    max_moves: u32,
}

#[derive(Debug, clap::Args)]
struct TowerDefenseArgs {
    /// TOML file with engine settings and towers to place.
    #[arg(long)]
    layout: Option<PathBuf>,
    /// Layout string previously exported by this command.
    #[arg(long = "import")]
    import: Option<String>,
    /// Map to play, overriding the layout.
    #[arg(long, value_parser = parse_map)]
    map: Option<quest_arcade_core::MapKind>,
    /// Seed for the enemy roster, overriding the layout.
    #[arg(long)]
    seed: Option<u64>,
    /// Simulated milliseconds per tick.
    #[arg(long, default_value_t = 16)]
    tick_ms: u64,
    /// Gives up after this many ticks.
    #[arg(long, default_value_t = 200_000)]
    max_ticks: u32,
}

/// Layout file read by `tower-defense --layout`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct LayoutFile {
    config: EngineConfig,
    unlock: Vec<TowerKind>,
    towers: Vec<TowerLayoutTower>,
}

#[derive(Debug, Serialize)]
struct ChessReport {
    status: ChessStatus,
    winner: Option<Color>,
    moves: u32,
    last_move: Option<String>,
    board: Vec<String>,
    summary: Option<ChessSummary>,
}

#[derive(Debug, Serialize)]
struct TowerDefenseReport {
    summary: TowerDefenseSummary,
    tally: RunTally,
    ticks: u32,
    rejected_towers: u32,
    layout: String,
}

#[derive(Debug, Serialize)]
struct LevelReport {
    xp: u64,
    label: String,
    level: u32,
    title: &'static str,
    progress: u32,
    xp_to_next_level: u64,
}

/// Entry point for the Quest Arcade command-line interface.
fn main() -> Result<()> {
    init_tracing();
    let args = CliArgs::parse();
    match args.command {
        Mode::Chess(chess) => run_chess(&chess),
        Mode::TowerDefense(tower_defense) => run_tower_defense(&tower_defense),
        Mode::Level { xp } => print_report(&level_report(xp)),
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn print_report<T: Serialize>(report: &T) -> Result<()> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    serde_json::to_writer_pretty(&mut handle, report).context("failed to write report")?;
    writeln!(handle).context("failed to write report")?;
    Ok(())
}

fn level_report(xp: u64) -> LevelReport {
    let info = level_info(xp);
    LevelReport {
        xp,
        label: format_xp(xp),
        level: info.level,
        title: info.title,
        progress: progress_to_next_level(xp),
        xp_to_next_level: xp_for_next_level(xp),
    }
}

fn run_chess(args: &ChessArgs) -> Result<()> {
    let mut rng = ChaCha8Rng::seed_from_u64(args.seed);
    let mut game = ChessMatch::new();
    let mut ai = ChessAi::new();
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    while game.move_count() < args.max_moves {
        let Some(color) = game.side_to_move() else {
            break;
        };
        if legal_moves(game.board(), color).is_empty() {
            info!(?color, "no legal move left");
            let _ = game.declare_no_legal_move();
            break;
        }

        if color == ChessMatch::PLAYER && !args.autoplay {
            eprint!("{}", game.board());
            let Some(choice) = read_player_move(&mut lines)? else {
                info!("input closed before the match ended");
                break;
            };
            if let Err(error) = game.play(choice.from, choice.to) {
                warn!(%choice, %error, "move rejected");
            }
            continue;
        }

        let Some(choice) = ai.select_move(game.board(), color, &mut rng) else {
            let _ = game.declare_no_legal_move();
            break;
        };
        let outcome = game
            .play_as(color, choice.from, choice.to)
            .with_context(|| format!("computer produced an invalid move {choice}"))?;
        debug!(%choice, captured = ?outcome.captured, check = outcome.gives_check, "move played");
        if color == ChessMatch::AI && !args.autoplay {
            eprintln!("{choice}");
        }
    }

    let summary = match game.status() {
        ChessStatus::PlayerWins => Some(GameResult::Win),
        ChessStatus::AiWins => Some(GameResult::Loss),
        ChessStatus::PlayerTurn | ChessStatus::AiTurn => None,
    }
    .map(|result| ChessSummary::new(result, args.difficulty, game.move_count()));

    print_report(&ChessReport {
        status: game.status(),
        winner: game.winner(),
        moves: game.move_count(),
        last_move: game.last_move().map(|last| last.to_string()),
        board: game.board().to_string().lines().map(str::to_owned).collect(),
        summary,
    })
}

/// Reads lines until one parses as a move. `None` once input is exhausted or the player quits.
fn read_player_move<B: BufRead>(lines: &mut io::Lines<B>) -> Result<Option<ChessMove>> {
    for line in lines {
        let line = line.context("failed to read move from stdin")?;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        if trimmed.eq_ignore_ascii_case("quit") {
            return Ok(None);
        }
        match trimmed.parse::<ChessMove>() {
            Ok(choice) => return Ok(Some(choice)),
            Err(error) => warn!(%error, "expected a move such as e2e4"),
        }
    }
    Ok(None)
}

fn run_tower_defense(args: &TowerDefenseArgs) -> Result<()> {
    if args.tick_ms == 0 {
        bail!("--tick-ms must be positive");
    }

    let mut layout = match &args.layout {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("failed to read layout {}", path.display()))?;
            toml::from_str::<LayoutFile>(&text)
                .with_context(|| format!("failed to parse layout {}", path.display()))?
        }
        None => LayoutFile::default(),
    };

    if let Some(encoded) = &args.import {
        let snapshot = TowerLayoutSnapshot::decode(encoded).context("failed to import layout")?;
        info!(map = map_id(snapshot.map), towers = snapshot.towers.len(), "layout imported");
        layout.config.map = snapshot.map;
        layout.towers.extend(snapshot.towers);
    }
    if let Some(map) = args.map {
        layout.config.map = map;
    }
    if let Some(seed) = args.seed {
        layout.config.seed = seed;
    }

    let mut engine = TowerDefenseEngine::new(layout.config);
    let mut tally = RunTally::new();
    for kind in &layout.unlock {
        engine.unlock_tower(*kind);
    }

    let mut placed = Vec::with_capacity(layout.towers.len());
    let mut rejected_towers = 0;
    for tower in &layout.towers {
        match engine.place_tower(tower.kind, tower.position) {
            Ok(id) => {
                debug!(?id, kind = ?tower.kind, "tower placed");
                placed.push(*tower);
            }
            Err(reason) => {
                rejected_towers += 1;
                warn!(kind = ?tower.kind, x = tower.position.x, y = tower.position.y, %reason, "tower rejected");
            }
        }
        tally.handle(engine.events());
    }

    tally.handle(engine.start());
    let step = Duration::from_millis(args.tick_ms);
    let mut now = Duration::ZERO;
    let mut ticks = 0;
    while !engine.phase().is_over() && ticks < args.max_ticks {
        now += step;
        ticks += 1;
        let events = engine.tick(now);
        for event in events {
            match event {
                Event::WaveStarted { wave, .. } => info!(wave, "wave started"),
                Event::WaveCleared { wave, .. } => info!(wave, "wave cleared"),
                _ => {}
            }
        }
        tally.handle(events);
    }
    if !engine.phase().is_over() {
        warn!(ticks, "tick limit reached before the run ended");
    }

    let layout = TowerLayoutSnapshot {
        map: engine.map(),
        towers: placed,
    }
    .encode()
    .context("failed to export layout")?;

    print_report(&TowerDefenseReport {
        summary: TowerDefenseSummary::from_hud(engine.map(), engine.hud()),
        tally,
        ticks,
        rejected_towers,
        layout,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use quest_arcade_core::{MapKind, Point};

    #[test]
    fn layout_file_parses_config_unlocks_and_towers() {
        let layout: LayoutFile = toml::from_str(
            r#"
            unlock = ["frost"]

            [config]
            map = "crystal_caverns"
            seed = 9

            [[towers]]
            kind = "archer"
            position = { x = 175.0, y = 200.0 }
            "#,
        )
        .expect("layout parses");

        assert_eq!(layout.config.map, MapKind::CrystalCaverns);
        assert_eq!(layout.config.seed, 9);
        assert_eq!(layout.config.starting_gold, EngineConfig::default().starting_gold);
        assert_eq!(layout.unlock, vec![TowerKind::Frost]);
        assert_eq!(
            layout.towers,
            vec![TowerLayoutTower {
                kind: TowerKind::Archer,
                position: Point::new(175.0, 200.0),
            }]
        );
    }

    #[test]
    fn player_input_skips_noise_and_stops_on_quit() {
        let input = io::Cursor::new("\nhello\ne2e4\nquit\ne7e5\n");
        let mut lines = input.lines();

        let first = read_player_move(&mut lines).expect("reads");
        assert_eq!(first.map(|choice| choice.to_string()), Some("e2e4".to_owned()));
        assert!(read_player_move(&mut lines).expect("reads").is_none());
    }

    #[test]
    fn level_report_describes_the_ladder() {
        let report = level_report(0);
        assert_eq!(report.level, 1);
        assert_eq!(report.progress, 0);
        assert_eq!(report.label, format_xp(0));
    }

    #[test]
    fn arguments_parse_for_every_mode() {
        let chess = CliArgs::try_parse_from([
            "quest-arcade",
            "chess",
            "--autoplay",
            "--difficulty",
            "master",
            "--seed",
            "4",
        ])
        .expect("chess args parse");
        match chess.command {
            Mode::Chess(args) => {
                assert!(args.autoplay);
                assert_eq!(args.difficulty, Difficulty::Master);
                assert_eq!(args.seed, 4);
            }
            other => panic!("unexpected mode {other:?}"),
        }

        let tower_defense =
            CliArgs::try_parse_from(["quest-arcade", "tower-defense", "--map", "dark_castle"])
                .expect("tower-defense args parse");
        match tower_defense.command {
            Mode::TowerDefense(args) => assert_eq!(args.map, Some(MapKind::DarkCastle)),
            other => panic!("unexpected mode {other:?}"),
        }

        assert!(CliArgs::try_parse_from(["quest-arcade", "tower-defense", "--map", "moon"]).is_err());
        assert!(CliArgs::try_parse_from(["quest-arcade", "chess", "--difficulty", "easy"]).is_err());
    }
}
