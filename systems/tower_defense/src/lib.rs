#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Tower-defense engine that wires the world to the targeting, combat and wave systems.
//!
//! The engine owns no clock. Hosts call [`TowerDefenseEngine::tick`] with
//! monotonically increasing timestamps; pausing is simply a matter of not
//! advancing the run.

use std::time::Duration;

use quest_arcade_core::{
    Command, EnemyView, Event, Hud, MapKind, PlacementError, Point, RunPhase, TowerId, TowerKind,
    TowerView, TowerVolley, STARTING_GOLD, STARTING_LIVES, WAVE_DELAY,
};
use quest_arcade_system_tower_combat::TowerCombat;
use quest_arcade_system_tower_targeting::TowerTargeting;
use quest_arcade_system_wave_director::{spawn_command, WaveDirector};
use quest_arcade_world::{self as world, query, World};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Host supplied parameters for a tower-defense run.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Map the run starts on. It is unlocked if it is not already.
    pub map: MapKind,
    /// Gold granted at the start of every run.
    pub starting_gold: u32,
    /// Lives granted at the start of every run.
    pub starting_lives: u32,
    /// Delay between clearing a wave and the start of the next one.
    pub wave_delay_ms: u64,
    /// Seed for the enemy roster RNG.
    pub seed: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            map: MapKind::Greenlands,
            starting_gold: STARTING_GOLD,
            starting_lives: STARTING_LIVES,
            wave_delay_ms: WAVE_DELAY.as_millis() as u64,
            seed: 0,
        }
    }
}

/// Errors raised by session level operations.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    /// The requested map has not been unlocked.
    #[error("map {} is locked", .0.name())]
    MapLocked(MapKind),
}

/// Tower-defense engine driving a single world.
#[derive(Debug)]
pub struct TowerDefenseEngine<R = ChaCha8Rng> {
    world: World,
    targeting: TowerTargeting,
    combat: TowerCombat,
    director: WaveDirector,
    rng: R,
    events: Vec<Event>,
    volleys: Vec<TowerVolley>,
    commands: Vec<Command>,
}

impl TowerDefenseEngine<ChaCha8Rng> {
    /// Creates an engine whose enemy rosters are drawn from a seeded ChaCha RNG.
    #[must_use]
    pub fn new(config: EngineConfig) -> Self {
        Self::with_rng(config, ChaCha8Rng::seed_from_u64(config.seed))
    }
}

impl<R: Rng> TowerDefenseEngine<R> {
    /// Creates an engine that draws enemy kinds from the provided RNG.
    pub fn with_rng(config: EngineConfig, rng: R) -> Self {
        let mut engine = Self {
            world: World::new(),
            targeting: TowerTargeting::new(),
            combat: TowerCombat::new(),
            director: WaveDirector::new(Duration::from_millis(config.wave_delay_ms)),
            rng,
            events: Vec::new(),
            volleys: Vec::new(),
            commands: Vec::new(),
        };

        engine.submit(Command::ConfigureEconomy {
            starting_gold: config.starting_gold,
            starting_lives: config.starting_lives,
        });
        engine.submit(Command::UnlockMap { map: config.map });
        engine.submit(Command::SelectMap { map: config.map });
        engine.events.clear();
        engine
    }

    /// Places a tower, deducting its cost on success.
    pub fn place_tower(
        &mut self,
        kind: TowerKind,
        position: Point,
    ) -> Result<TowerId, PlacementError> {
        self.events.clear();
        self.submit(Command::PlaceTower { kind, position });

        let outcome = self.events.iter().find_map(|event| match event {
            Event::TowerPlaced { tower, .. } => Some(Ok(*tower)),
            Event::TowerPlacementRejected { reason, .. } => Some(Err(*reason)),
            _ => None,
        });
        outcome.unwrap_or(Err(PlacementError::GameOver))
    }

    /// Starts the run at wave one, or resumes a paused run.
    pub fn start(&mut self) -> &[Event] {
        self.events.clear();
        match query::phase(&self.world) {
            RunPhase::Idle => {
                info!(map = query::map(&self.world).name(), "run started");
                self.submit(Command::SetRunning { running: true });
                if query::wave(&self.world) == 0 {
                    let command = spawn_command(1, query::map(&self.world), &mut self.rng);
                    self.submit(command);
                }
            }
            RunPhase::Paused => self.submit(Command::SetRunning { running: true }),
            RunPhase::Running | RunPhase::Victory | RunPhase::Defeat => {}
        }
        self.direct_waves();
        &self.events
    }

    /// Suspends the simulation; towers and enemies keep their state.
    pub fn pause(&mut self) -> &[Event] {
        self.events.clear();
        self.submit(Command::SetRunning { running: false });
        &self.events
    }

    /// Resumes a paused run.
    pub fn resume(&mut self) -> &[Event] {
        self.events.clear();
        if query::phase(&self.world) == RunPhase::Paused {
            self.submit(Command::SetRunning { running: true });
        }
        &self.events
    }

    /// Spawns the roster for `wave` immediately.
    pub fn start_wave(&mut self, wave: u32) -> &[Event] {
        self.events.clear();
        let command = spawn_command(wave, query::map(&self.world), &mut self.rng);
        self.submit(command);
        self.direct_waves();
        &self.events
    }

    /// Advances the run to `now` and returns the events produced by the step.
    ///
    /// Enemies move first, then ready towers fire, then the wave director
    /// starts any wave whose delay has elapsed.
    pub fn tick(&mut self, now: Duration) -> &[Event] {
        self.events.clear();
        self.submit(Command::Tick { now });
        self.fire_towers();
        self.direct_waves();
        &self.events
    }

    /// Restores the starting economy and clears the map. Unlocks persist.
    pub fn reset(&mut self) -> &[Event] {
        self.events.clear();
        self.submit(Command::Reset);
        self.direct_waves();
        &self.events
    }

    /// Switches to another unlocked map, resetting the run.
    pub fn select_map(&mut self, map: MapKind) -> Result<(), SessionError> {
        self.events.clear();
        self.submit(Command::SelectMap { map });
        self.direct_waves();

        if self
            .events
            .iter()
            .any(|event| matches!(event, Event::MapSelectionRejected { .. }))
        {
            return Err(SessionError::MapLocked(map));
        }
        Ok(())
    }

    /// Makes a tower kind available for placement.
    pub fn unlock_tower(&mut self, kind: TowerKind) {
        self.events.clear();
        self.submit(Command::UnlockTower { kind });
    }

    /// Makes a map available for selection.
    pub fn unlock_map(&mut self, map: MapKind) {
        self.events.clear();
        self.submit(Command::UnlockMap { map });
    }

    /// Events produced by the most recent operation.
    #[must_use]
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Lifecycle phase of the run.
    #[must_use]
    pub fn phase(&self) -> RunPhase {
        query::phase(&self.world)
    }

    /// Map currently being played.
    #[must_use]
    pub fn map(&self) -> MapKind {
        query::map(&self.world)
    }

    /// Counters displayed by the host.
    #[must_use]
    pub fn hud(&self) -> Hud {
        query::hud(&self.world)
    }

    /// Snapshot of every placed tower.
    #[must_use]
    pub fn towers(&self) -> TowerView {
        query::tower_view(&self.world)
    }

    /// Snapshot of every live enemy.
    #[must_use]
    pub fn enemies(&self) -> EnemyView {
        query::enemy_view(&self.world)
    }

    /// Tower kinds the player may place.
    #[must_use]
    pub fn unlocked_towers(&self) -> Vec<TowerKind> {
        query::unlocked_towers(&self.world)
    }

    /// Maps the player may select.
    #[must_use]
    pub fn unlocked_maps(&self) -> Vec<MapKind> {
        query::unlocked_maps(&self.world)
    }

    /// Wave scheduled to start next along with its due time, if any.
    #[must_use]
    pub fn pending_wave(&self) -> Option<(u32, Duration)> {
        self.director.pending()
    }

    /// Read-only access to the underlying world.
    #[must_use]
    pub fn world(&self) -> &World {
        &self.world
    }

    fn submit(&mut self, command: Command) {
        world::apply(&mut self.world, command, &mut self.events);
    }

    fn fire_towers(&mut self) {
        let phase = query::phase(&self.world);
        if phase != RunPhase::Running {
            return;
        }

        let now = query::clock(&self.world);
        let towers = query::tower_view(&self.world);
        let enemies = query::enemy_view(&self.world);

        self.targeting
            .handle(phase, now, &towers, &enemies, &mut self.volleys);
        if self.volleys.is_empty() {
            return;
        }

        let towers = towers.into_vec();
        self.combat.handle(
            phase,
            now,
            &towers,
            &enemies,
            &self.volleys,
            &mut self.commands,
        );
        debug!(volleys = self.commands.len(), "towers fired");

        for command in std::mem::take(&mut self.commands) {
            self.submit(command);
        }
    }

    fn direct_waves(&mut self) {
        self.director.handle(
            &self.events,
            query::phase(&self.world),
            query::map(&self.world),
            &mut self.rng,
            &mut self.commands,
        );

        for command in std::mem::take(&mut self.commands) {
            self.submit(command);
        }
    }
}
