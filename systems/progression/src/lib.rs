#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Experience, levels and end-of-game summaries shared by both mini-games.

use std::{fmt, str::FromStr};

use quest_arcade_core::{Event, Hud, MapKind, RunPhase, KILL_XP};
use serde::{Deserialize, Serialize};

/// Base experience for winning a chess match.
pub const CHESS_WIN_XP: u32 = 100;
/// Base experience for losing a chess match.
pub const CHESS_LOSS_XP: u32 = 25;

/// Chess difficulty. It scales the experience reward and nothing else.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    /// x1 experience.
    #[default]
    Beginner,
    /// x1.5 experience.
    Intermediate,
    /// x2 experience.
    Advanced,
    /// x3 experience.
    Master,
}

impl Difficulty {
    /// Every difficulty from easiest to hardest.
    pub const ALL: [Difficulty; 4] = [
        Difficulty::Beginner,
        Difficulty::Intermediate,
        Difficulty::Advanced,
        Difficulty::Master,
    ];

    /// Experience multiplier.
    #[must_use]
    pub const fn multiplier(self) -> f64 {
        match self {
            Self::Beginner => 1.0,
            Self::Intermediate => 1.5,
            Self::Advanced => 2.0,
            Self::Master => 3.0,
        }
    }

    /// Lower-case identifier.
    #[must_use]
    pub const fn id(self) -> &'static str {
        match self {
            Self::Beginner => "beginner",
            Self::Intermediate => "intermediate",
            Self::Advanced => "advanced",
            Self::Master => "master",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Raised when a difficulty identifier is not recognised.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("unknown difficulty `{0}`, expected beginner, intermediate, advanced or master")]
pub struct UnknownDifficulty(pub String);

impl FromStr for Difficulty {
    type Err = UnknownDifficulty;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let wanted = value.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|difficulty| difficulty.id() == wanted)
            .ok_or_else(|| UnknownDifficulty(value.to_owned()))
    }
}

/// Outcome of a finished game from the player's point of view.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameResult {
    /// The player won.
    Win,
    /// The player lost.
    Loss,
}

/// Experience earned by a finished chess match.
#[must_use]
pub fn chess_xp(result: GameResult, difficulty: Difficulty) -> u32 {
    let base = match result {
        GameResult::Win => CHESS_WIN_XP,
        GameResult::Loss => CHESS_LOSS_XP,
    };
    (f64::from(base) * difficulty.multiplier()).floor() as u32
}

/// A rung on the level ladder.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct LevelInfo {
    /// One-based level number.
    pub level: u32,
    /// Display title.
    pub title: &'static str,
    /// Experience at which the level starts.
    pub min_xp: u64,
    /// Last experience value inside the level, `None` for the top level.
    pub max_xp: Option<u64>,
}

/// Level ladder in ascending order.
pub const LEVELS: [LevelInfo; 5] = [
    LevelInfo {
        level: 1,
        title: "Initiate",
        min_xp: 0,
        max_xp: Some(999),
    },
    LevelInfo {
        level: 2,
        title: "Adventurer",
        min_xp: 1_000,
        max_xp: Some(4_999),
    },
    LevelInfo {
        level: 3,
        title: "Warrior",
        min_xp: 5_000,
        max_xp: Some(14_999),
    },
    LevelInfo {
        level: 4,
        title: "Champion",
        min_xp: 15_000,
        max_xp: Some(29_999),
    },
    LevelInfo {
        level: 5,
        title: "Legend",
        min_xp: 30_000,
        max_xp: None,
    },
];

/// Level reached with `xp` total experience.
#[must_use]
pub fn level_info(xp: u64) -> &'static LevelInfo {
    LEVELS
        .iter()
        .rev()
        .find(|info| xp >= info.min_xp)
        .unwrap_or(&LEVELS[0])
}

/// Level number reached with `xp` total experience.
#[must_use]
pub fn level_for_xp(xp: u64) -> u32 {
    level_info(xp).level
}

fn next_level(xp: u64) -> Option<&'static LevelInfo> {
    let current = level_info(xp);
    LEVELS.iter().find(|info| info.level == current.level + 1)
}

/// Percentage of the way from the current level to the next, floored; 100 at the top.
#[must_use]
pub fn progress_to_next_level(xp: u64) -> u32 {
    let current = level_info(xp);
    let Some(next) = next_level(xp) else {
        return 100;
    };
    let gained = xp - current.min_xp;
    let needed = next.min_xp - current.min_xp;
    (gained.saturating_mul(100) / needed).min(100) as u32
}

/// Experience still required to reach the next level; 0 at the top.
#[must_use]
pub fn xp_for_next_level(xp: u64) -> u64 {
    next_level(xp).map_or(0, |next| next.min_xp - xp)
}

/// Compact experience label such as `950`, `1.5K` or `2.0M`.
#[must_use]
pub fn format_xp(xp: u64) -> String {
    if xp >= 1_000_000 {
        format!("{:.1}M", xp as f64 / 1_000_000.0)
    } else if xp >= 1_000 {
        format!("{:.1}K", xp as f64 / 1_000.0)
    } else {
        xp.to_string()
    }
}

/// Record of a finished chess match.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChessSummary {
    /// Outcome for the player.
    pub result: GameResult,
    /// Difficulty the match was played at.
    pub difficulty: Difficulty,
    /// Moves applied by both sides.
    pub moves: u32,
    /// Experience earned.
    pub xp: u32,
}

impl ChessSummary {
    /// Builds the summary, computing the experience reward.
    #[must_use]
    pub fn new(result: GameResult, difficulty: Difficulty, moves: u32) -> Self {
        Self {
            result,
            difficulty,
            moves,
            xp: chess_xp(result, difficulty),
        }
    }
}

/// Record of a tower-defense run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TowerDefenseSummary {
    /// Outcome for the player, `None` if the run was abandoned.
    pub result: Option<GameResult>,
    /// Map played.
    pub map: MapKind,
    /// Last wave reached.
    pub wave: u32,
    /// Gold left.
    pub gold: u32,
    /// Lives left.
    pub lives: u32,
    /// Enemies destroyed.
    pub kills: u32,
    /// Experience earned.
    pub xp: u32,
}

impl TowerDefenseSummary {
    /// Summarises the run from the final counters.
    #[must_use]
    pub fn from_hud(map: MapKind, hud: Hud) -> Self {
        let result = match hud.phase {
            RunPhase::Victory => Some(GameResult::Win),
            RunPhase::Defeat => Some(GameResult::Loss),
            RunPhase::Idle | RunPhase::Running | RunPhase::Paused => None,
        };
        Self {
            result,
            map,
            wave: hud.wave,
            gold: hud.gold,
            lives: hud.lives,
            kills: hud.kills,
            xp: hud.xp,
        }
    }
}

/// Running totals folded from tower-defense events.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunTally {
    /// Towers built.
    pub towers_built: u32,
    /// Gold spent on towers.
    pub gold_spent: u32,
    /// Gold collected from kills.
    pub gold_earned: u32,
    /// Enemies destroyed.
    pub kills: u32,
    /// Enemies that reached the end of the path.
    pub leaks: u32,
    /// Waves cleared, including the final one.
    pub waves_cleared: u32,
    /// Experience earned from kills and victory.
    pub xp: u32,
}

impl RunTally {
    /// Creates an empty tally.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Folds a batch of world events into the tally.
    pub fn handle(&mut self, events: &[Event]) {
        for event in events {
            match event {
                Event::GameReset => *self = Self::default(),
                Event::TowerPlaced { cost, .. } => {
                    self.towers_built += 1;
                    self.gold_spent = self.gold_spent.saturating_add(*cost);
                }
                Event::EnemyKilled { reward, .. } => {
                    self.kills += 1;
                    self.gold_earned = self.gold_earned.saturating_add(*reward);
                    self.xp = self.xp.saturating_add(KILL_XP);
                }
                Event::EnemyLeaked { .. } => self.leaks += 1,
                Event::WaveCleared { .. } => self.waves_cleared += 1,
                Event::Victory { bonus_xp, .. } => {
                    self.waves_cleared += 1;
                    self.xp = self.xp.saturating_add(*bonus_xp);
                }
                _ => {}
            }
        }
    }
}
