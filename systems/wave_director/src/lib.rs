#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Wave director responsible for rolling enemy rosters and scheduling waves.

use std::time::Duration;

use quest_arcade_core::{
    Command, EnemyKind, EnemySpawn, Event, MapKind, Point, RunPhase, SPAWN_SPACING, WAVE_DELAY,
};
use rand::Rng;
use tracing::debug;

/// Wave-scaled statistics for a single enemy kind.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EnemyStats {
    /// Starting health.
    pub health: u32,
    /// World units travelled per tick.
    pub speed: f32,
    /// Flat damage reduction.
    pub armor: u32,
    /// Gold awarded on kill.
    pub reward: u32,
}

impl EnemyStats {
    /// Scales the base statistics of `kind` for the provided wave.
    ///
    /// Health grows 12% per wave after the first, rewards 10% per wave, speed
    /// by 0.03 per wave and armor by one point every third wave.
    #[must_use]
    pub fn scaled(kind: EnemyKind, wave: u32) -> Self {
        let base = kind.base();
        let health_scale = 1.0 + f64::from(wave.saturating_sub(1)) * 0.12;
        let reward_scale = 1.0 + f64::from(wave) * 0.1;

        Self {
            health: (f64::from(base.health) * health_scale).floor() as u32,
            speed: base.speed + wave as f32 * 0.03,
            armor: base.armor + wave / 3,
            reward: (f64::from(base.reward) * reward_scale).floor() as u32,
        }
    }
}

/// Number of enemies spawned by `wave`.
#[must_use]
pub const fn roster_size(wave: u32) -> u32 {
    wave.saturating_mul(3).saturating_add(6)
}

/// Enemy kinds that may appear in `wave`, in unlock order.
#[must_use]
pub fn eligible_kinds(wave: u32) -> Vec<EnemyKind> {
    EnemyKind::UNLOCK_ORDER
        .into_iter()
        .filter(|kind| kind.first_wave() <= wave)
        .collect()
}

/// Rolls the enemies of `wave` on `map`.
///
/// Kinds are drawn uniformly from the eligible pool. Enemies queue up to the
/// left of the first waypoint, spaced evenly so they enter one after another.
pub fn roster<R: Rng + ?Sized>(wave: u32, map: MapKind, rng: &mut R) -> Vec<EnemySpawn> {
    let pool = eligible_kinds(wave);
    let Some(entry) = map.path().first().copied() else {
        return Vec::new();
    };
    if pool.is_empty() {
        return Vec::new();
    }

    (0..roster_size(wave))
        .map(|index| {
            let kind = pool[rng.gen_range(0..pool.len())];
            let stats = EnemyStats::scaled(kind, wave);
            EnemySpawn {
                kind,
                position: Point::new(entry.x - SPAWN_SPACING * index as f32, entry.y),
                health: stats.health,
                speed: stats.speed,
                armor: stats.armor,
                reward: stats.reward,
            }
        })
        .collect()
}

/// Builds the command that starts `wave` on `map`.
pub fn spawn_command<R: Rng + ?Sized>(wave: u32, map: MapKind, rng: &mut R) -> Command {
    Command::SpawnWave {
        wave,
        spawns: roster(wave, map, rng),
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct PendingWave {
    wave: u32,
    due: Duration,
}

/// Stateful system that starts the next wave once the inter-wave delay elapses.
#[derive(Debug)]
pub struct WaveDirector {
    delay: Duration,
    pending: Option<PendingWave>,
}

impl WaveDirector {
    /// Creates a director that waits `delay` between a cleared wave and the next one.
    #[must_use]
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    /// Wave scheduled to start next along with its due time, if any.
    #[must_use]
    pub fn pending(&self) -> Option<(u32, Duration)> {
        self.pending.map(|pending| (pending.wave, pending.due))
    }

    /// Consumes world events and emits a `Command::SpawnWave` once a scheduled wave is due.
    ///
    /// A paused run keeps its schedule; the wave starts on the first running
    /// tick at or after the due time. A wave started by other means cancels
    /// the schedule for it.
    pub fn handle<R: Rng + ?Sized>(
        &mut self,
        events: &[Event],
        phase: RunPhase,
        map: MapKind,
        rng: &mut R,
        out: &mut Vec<Command>,
    ) {
        for event in events {
            match event {
                Event::WaveCleared { wave, at } => {
                    let due = at.saturating_add(self.delay);
                    debug!(next_wave = wave + 1, due_ms = due.as_millis() as u64, "wave scheduled");
                    self.pending = Some(PendingWave {
                        wave: wave + 1,
                        due,
                    });
                }
                Event::TimeAdvanced { now } => {
                    let Some(pending) = self.pending else {
                        continue;
                    };
                    if phase != RunPhase::Running || *now < pending.due {
                        continue;
                    }
                    self.pending = None;
                    out.push(spawn_command(pending.wave, map, rng));
                }
                Event::WaveStarted { wave, .. } => {
                    if self.pending.is_some_and(|pending| pending.wave <= *wave) {
                        debug!(wave, "scheduled wave started early");
                        self.pending = None;
                    }
                }
                Event::GameReset
                | Event::MapSelected { .. }
                | Event::Victory { .. }
                | Event::Defeat { .. } => {
                    self.pending = None;
                }
                _ => {}
            }
        }
    }
}

impl Default for WaveDirector {
    fn default() -> Self {
        Self::new(WAVE_DELAY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn roster_size_grows_three_per_wave() {
        assert_eq!(roster_size(1), 9);
        assert_eq!(roster_size(5), 21);
        assert_eq!(roster_size(25), 81);
    }

    #[test]
    fn eligible_pool_follows_first_waves() {
        assert_eq!(eligible_kinds(1), vec![EnemyKind::Goblin]);
        assert_eq!(eligible_kinds(3), vec![EnemyKind::Goblin, EnemyKind::Orc]);
        assert_eq!(eligible_kinds(12).len(), 7);
        assert!(eligible_kinds(0).is_empty());
    }

    #[test]
    fn scaling_matches_formulae() {
        let first = EnemyStats::scaled(EnemyKind::Goblin, 1);
        assert_eq!(first.health, 40);
        assert_eq!(first.reward, 13);
        assert_eq!(first.armor, 0);
        assert!((first.speed - 1.83).abs() < 1e-5);

        let sixth = EnemyStats::scaled(EnemyKind::Troll, 6);
        assert_eq!(sixth.health, 240);
        assert_eq!(sixth.armor, 17);
        assert_eq!(sixth.reward, 48);
    }

    #[test]
    fn wave_one_is_nine_goblins_queued_before_the_entry() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let spawns = roster(1, MapKind::Greenlands, &mut rng);

        assert_eq!(spawns.len(), 9);
        for (index, spawn) in spawns.iter().enumerate() {
            assert_eq!(spawn.kind, EnemyKind::Goblin);
            assert_eq!(spawn.health, 40);
            assert_eq!(spawn.position, Point::new(-60.0 * index as f32, 200.0));
        }
    }

    #[test]
    fn cleared_wave_spawns_after_the_delay() {
        let mut director = WaveDirector::default();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut out = Vec::new();
        let cleared_at = Duration::from_millis(10_000);

        director.handle(
            &[Event::WaveCleared {
                wave: 2,
                at: cleared_at,
            }],
            RunPhase::Running,
            MapKind::Greenlands,
            &mut rng,
            &mut out,
        );
        assert_eq!(director.pending(), Some((3, Duration::from_millis(12_500))));

        director.handle(
            &[Event::TimeAdvanced {
                now: Duration::from_millis(12_499),
            }],
            RunPhase::Running,
            MapKind::Greenlands,
            &mut rng,
            &mut out,
        );
        assert!(out.is_empty());

        director.handle(
            &[Event::TimeAdvanced {
                now: Duration::from_millis(12_516),
            }],
            RunPhase::Running,
            MapKind::Greenlands,
            &mut rng,
            &mut out,
        );
        assert!(matches!(
            out.as_slice(),
            [Command::SpawnWave { wave: 3, spawns }] if spawns.len() == 15
        ));
        assert_eq!(director.pending(), None);
    }

    #[test]
    fn paused_run_defers_and_reset_cancels() {
        let mut director = WaveDirector::new(Duration::from_millis(100));
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut out = Vec::new();
        let events = [
            Event::WaveCleared {
                wave: 1,
                at: Duration::ZERO,
            },
            Event::TimeAdvanced {
                now: Duration::from_millis(500),
            },
        ];

        director.handle(&events, RunPhase::Paused, MapKind::Greenlands, &mut rng, &mut out);
        assert!(out.is_empty());
        assert!(director.pending().is_some());

        director.handle(
            &[Event::GameReset],
            RunPhase::Idle,
            MapKind::Greenlands,
            &mut rng,
            &mut out,
        );
        assert_eq!(director.pending(), None);
    }

    #[test]
    fn host_started_wave_cancels_the_schedule() {
        let mut director = WaveDirector::default();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut out = Vec::new();
        let events = [
            Event::WaveCleared {
                wave: 1,
                at: Duration::ZERO,
            },
            Event::WaveStarted {
                wave: 2,
                enemies: 12,
            },
            Event::TimeAdvanced {
                now: Duration::from_secs(10),
            },
        ];

        director.handle(&events, RunPhase::Running, MapKind::Greenlands, &mut rng, &mut out);
        assert!(out.is_empty());
        assert_eq!(director.pending(), None);

        director.handle(&events[..1], RunPhase::Running, MapKind::Greenlands, &mut rng, &mut out);
        director.handle(
            &[Event::WaveStarted {
                wave: 1,
                enemies: 9,
            }],
            RunPhase::Running,
            MapKind::Greenlands,
            &mut rng,
            &mut out,
        );
        assert_eq!(director.pending(), Some((2, WAVE_DELAY)));
    }

    #[test]
    fn every_spawn_carries_its_wave_scaling() {
        let mut rng = ChaCha8Rng::seed_from_u64(21);
        for wave in [1, 2, 4, 7, 10, 12, 18, 25] {
            let spawns = roster(wave, MapKind::DarkCastle, &mut rng);
            assert_eq!(spawns.len(), (3 * wave + 6) as usize, "wave {wave}");

            let pool = eligible_kinds(wave);
            for spawn in &spawns {
                assert!(pool.contains(&spawn.kind), "wave {wave} rolled {:?}", spawn.kind);
                let stats = EnemyStats::scaled(spawn.kind, wave);
                assert_eq!(spawn.health, stats.health, "wave {wave}");
                assert_eq!(spawn.armor, stats.armor, "wave {wave}");
                assert_eq!(spawn.reward, stats.reward, "wave {wave}");
                assert_eq!(spawn.speed, stats.speed, "wave {wave}");
            }
        }

        assert_eq!(EnemyStats::scaled(EnemyKind::Troll, 10).armor, 18);
    }
}
