#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for the Quest Arcade tower-defense game.

use std::{collections::BTreeSet, time::Duration};

use quest_arcade_core::{
    Command, EnemyId, Event, Hit, MapKind, RunPhase, TowerId, TowerKind, KILL_XP, STARTING_GOLD,
    STARTING_LIVES, TOWER_UNLOCK_WAVE, VICTORY_BASE_XP, VICTORY_XP_PER_WAVE,
};
use tracing::{debug, info};

mod enemies;
mod towers;

use enemies::{Enemy, Stride};
use towers::TowerRegistry;

/// Represents the authoritative tower-defense world state.
#[derive(Debug)]
pub struct World {
    map: MapKind,
    towers: TowerRegistry,
    enemies: Vec<Enemy>,
    next_enemy_id: u32,
    starting_gold: u32,
    starting_lives: u32,
    gold: u32,
    lives: u32,
    wave: u32,
    wave_settled: bool,
    kills: u32,
    xp: u32,
    phase: RunPhase,
    clock: Duration,
    unlocked_towers: BTreeSet<TowerKind>,
    unlocked_maps: BTreeSet<MapKind>,
}

impl World {
    /// Creates a new world on the starter map with the default economy.
    #[must_use]
    pub fn new() -> Self {
        Self {
            map: MapKind::Greenlands,
            towers: TowerRegistry::new(),
            enemies: Vec::new(),
            next_enemy_id: 0,
            starting_gold: STARTING_GOLD,
            starting_lives: STARTING_LIVES,
            gold: STARTING_GOLD,
            lives: STARTING_LIVES,
            wave: 0,
            wave_settled: true,
            kills: 0,
            xp: 0,
            phase: RunPhase::Idle,
            clock: Duration::ZERO,
            unlocked_towers: TowerKind::STARTER.into_iter().collect(),
            unlocked_maps: [MapKind::Greenlands].into_iter().collect(),
        }
    }

    fn reset(&mut self) {
        self.towers.clear();
        self.enemies.clear();
        self.next_enemy_id = 0;
        self.gold = self.starting_gold;
        self.lives = self.starting_lives;
        self.wave = 0;
        self.wave_settled = true;
        self.kills = 0;
        self.xp = 0;
        self.phase = RunPhase::Idle;
    }

    fn enemy_index(&self, enemy: EnemyId) -> Option<usize> {
        self.enemies.iter().position(|candidate| candidate.id == enemy)
    }

    fn advance_enemies(&mut self, out_events: &mut Vec<Event>) {
        let path = self.map.path();
        let mut leaked: Vec<EnemyId> = Vec::new();

        for enemy in &mut self.enemies {
            match enemy.stride(path) {
                Stride::Moved | Stride::Stalled => {}
                Stride::ReachedWaypoint(path_index) => {
                    out_events.push(Event::EnemyReachedWaypoint {
                        enemy: enemy.id,
                        path_index,
                    });
                }
                Stride::Leaked => leaked.push(enemy.id),
            }
        }

        for enemy in leaked {
            if let Some(index) = self.enemy_index(enemy) {
                let _ = self.enemies.remove(index);
            }
            self.lives = self.lives.saturating_sub(1);
            debug!(enemy = enemy.get(), lives = self.lives, "enemy leaked");
            out_events.push(Event::EnemyLeaked {
                enemy,
                lives: self.lives,
            });

            if self.lives == 0 && !self.phase.is_over() {
                self.phase = RunPhase::Defeat;
                info!(wave = self.wave, "run lost");
                out_events.push(Event::Defeat { wave: self.wave });
            }
        }
    }

    fn resolve_volley(
        &mut self,
        tower: TowerId,
        fired_at: Duration,
        hits: &[Hit],
        slowed: &[EnemyId],
        out_events: &mut Vec<Event>,
    ) {
        let Some(state) = self.towers.get_mut(tower) else {
            return;
        };
        state.record_volley(fired_at);

        for enemy in slowed {
            if let Some(index) = self.enemy_index(*enemy) {
                self.enemies[index].slowed = true;
            }
        }

        let mut landed = 0;
        for hit in hits {
            let Some(index) = self.enemy_index(hit.enemy) else {
                continue;
            };
            landed += 1;

            if !self.enemies[index].take_damage(hit.damage) {
                out_events.push(Event::EnemyDamaged {
                    enemy: hit.enemy,
                    damage: hit.damage,
                    health: self.enemies[index].health,
                });
                continue;
            }

            let destroyed = self.enemies.remove(index);
            self.gold = self.gold.saturating_add(destroyed.reward);
            self.xp = self.xp.saturating_add(KILL_XP);
            self.kills = self.kills.saturating_add(1);
            if let Some(state) = self.towers.get_mut(tower) {
                state.kills = state.kills.saturating_add(1);
            }
            debug!(
                enemy = destroyed.id.get(),
                tower = tower.get(),
                reward = destroyed.reward,
                "enemy destroyed"
            );
            out_events.push(Event::EnemyKilled {
                enemy: destroyed.id,
                tower,
                reward: destroyed.reward,
            });
        }

        if hits.is_empty() {
            return;
        }
        out_events.push(Event::TowerFired {
            tower,
            targets: landed,
        });
    }

    /// Settles the current wave once every enemy is gone.
    fn settle_wave(&mut self, out_events: &mut Vec<Event>) {
        if self.phase != RunPhase::Running
            || self.wave == 0
            || self.wave_settled
            || !self.enemies.is_empty()
        {
            return;
        }
        self.wave_settled = true;

        if self.wave < self.map.total_waves() {
            debug!(wave = self.wave, "wave cleared");
            out_events.push(Event::WaveCleared {
                wave: self.wave,
                at: self.clock,
            });
            return;
        }

        let bonus_xp = VICTORY_BASE_XP.saturating_add(VICTORY_XP_PER_WAVE.saturating_mul(self.wave));
        self.xp = self.xp.saturating_add(bonus_xp);
        self.phase = RunPhase::Victory;
        info!(map = self.map.name(), wave = self.wave, "run won");
        out_events.push(Event::Victory {
            wave: self.wave,
            bonus_xp,
        });

        if let Some(next_map) = self.map.next() {
            if self.unlocked_maps.insert(next_map) {
                out_events.push(Event::MapUnlocked { map: next_map });
            }
        }

        if self.wave >= TOWER_UNLOCK_WAVE {
            let locked = TowerKind::ALL
                .into_iter()
                .find(|kind| !self.unlocked_towers.contains(kind));
            if let Some(kind) = locked {
                let _ = self.unlocked_towers.insert(kind);
                out_events.push(Event::TowerUnlocked { kind });
            }
        }
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::ConfigureEconomy {
            starting_gold,
            starting_lives,
        } => {
            world.starting_gold = starting_gold;
            world.starting_lives = starting_lives;
        }
        Command::SelectMap { map } => {
            if !world.unlocked_maps.contains(&map) {
                out_events.push(Event::MapSelectionRejected { map });
                return;
            }
            world.map = map;
            world.reset();
            out_events.push(Event::MapSelected { map });
            out_events.push(Event::GameReset);
        }
        Command::Reset => {
            world.reset();
            out_events.push(Event::GameReset);
        }
        Command::SetRunning { running } => {
            if world.phase.is_over() {
                return;
            }
            let next = if running {
                RunPhase::Running
            } else if world.phase == RunPhase::Idle {
                RunPhase::Idle
            } else {
                RunPhase::Paused
            };
            if next != world.phase {
                world.phase = next;
                out_events.push(Event::RunningChanged { running });
            }
        }
        Command::PlaceTower { kind, position } => {
            match query::placement_check(world, kind, position) {
                Ok(cost) => {
                    world.gold -= cost;
                    let tower = world.towers.insert(kind, position);
                    debug!(tower = tower.get(), ?kind, gold = world.gold, "tower placed");
                    out_events.push(Event::TowerPlaced {
                        tower,
                        kind,
                        position,
                        cost,
                    });
                }
                Err(reason) => {
                    debug!(?kind, ?reason, "tower placement rejected");
                    out_events.push(Event::TowerPlacementRejected {
                        kind,
                        position,
                        reason,
                    });
                }
            }
        }
        Command::SpawnWave { wave, spawns } => {
            if world.phase.is_over() {
                return;
            }
            world.wave = wave;
            world.wave_settled = false;
            let count = u32::try_from(spawns.len()).unwrap_or(u32::MAX);
            for spawn in &spawns {
                let id = EnemyId::new(world.next_enemy_id);
                world.next_enemy_id = world.next_enemy_id.saturating_add(1);
                world.enemies.push(Enemy::from_spawn(id, spawn));
            }
            debug!(wave, enemies = count, "wave started");
            out_events.push(Event::WaveStarted {
                wave,
                enemies: count,
            });
        }
        Command::Tick { now } => {
            world.clock = world.clock.max(now);
            out_events.push(Event::TimeAdvanced { now: world.clock });

            if world.phase != RunPhase::Running {
                return;
            }
            world.advance_enemies(out_events);
            world.settle_wave(out_events);
        }
        Command::ResolveVolley {
            tower,
            fired_at,
            hits,
            slowed,
        } => {
            if world.phase != RunPhase::Running {
                return;
            }
            world.resolve_volley(tower, fired_at, &hits, &slowed, out_events);
            world.settle_wave(out_events);
        }
        Command::UnlockTower { kind } => {
            if world.unlocked_towers.insert(kind) {
                out_events.push(Event::TowerUnlocked { kind });
            }
        }
        Command::UnlockMap { map } => {
            if world.unlocked_maps.insert(map) {
                out_events.push(Event::MapUnlocked { map });
            }
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use std::time::Duration;

    use super::World;
    use quest_arcade_core::{
        EnemyView, Hud, MapKind, PlacementError, Point, RunPhase, TowerKind, TowerView,
        PATH_CLEARANCE, TOWER_SPACING,
    };

    /// Map currently being played.
    #[must_use]
    pub fn map(world: &World) -> MapKind {
        world.map
    }

    /// Waypoints of the active map.
    #[must_use]
    pub fn path(world: &World) -> &'static [Point] {
        world.map.path()
    }

    /// Gold available for placement.
    #[must_use]
    pub fn gold(world: &World) -> u32 {
        world.gold
    }

    /// Lives remaining.
    #[must_use]
    pub fn lives(world: &World) -> u32 {
        world.lives
    }

    /// Current wave number, zero before the first wave.
    #[must_use]
    pub fn wave(world: &World) -> u32 {
        world.wave
    }

    /// Lifecycle phase of the run.
    #[must_use]
    pub fn phase(world: &World) -> RunPhase {
        world.phase
    }

    /// Latest timestamp observed by the world.
    #[must_use]
    pub fn clock(world: &World) -> Duration {
        world.clock
    }

    /// Counters displayed by the host.
    #[must_use]
    pub fn hud(world: &World) -> Hud {
        Hud {
            gold: world.gold,
            lives: world.lives,
            wave: world.wave,
            kills: world.kills,
            xp: world.xp,
            phase: world.phase,
        }
    }

    /// Captures a read-only view of the towers on the map.
    #[must_use]
    pub fn tower_view(world: &World) -> TowerView {
        TowerView::from_snapshots(world.towers.iter().map(|tower| tower.snapshot()).collect())
    }

    /// Captures a read-only view of the enemies on the map.
    #[must_use]
    pub fn enemy_view(world: &World) -> EnemyView {
        EnemyView::from_snapshots(world.enemies.iter().map(|enemy| enemy.snapshot()).collect())
    }

    /// Tower kinds the player may place.
    #[must_use]
    pub fn unlocked_towers(world: &World) -> Vec<TowerKind> {
        world.unlocked_towers.iter().copied().collect()
    }

    /// Maps the player may select.
    #[must_use]
    pub fn unlocked_maps(world: &World) -> Vec<MapKind> {
        world.unlocked_maps.iter().copied().collect()
    }

    /// Validates a placement request, returning the cost on success.
    ///
    /// Path clearance is measured against individual waypoints, not against
    /// the segments joining them.
    pub fn placement_check(
        world: &World,
        kind: TowerKind,
        position: Point,
    ) -> Result<u32, PlacementError> {
        if world.phase.is_over() {
            return Err(PlacementError::GameOver);
        }
        if !world.unlocked_towers.contains(&kind) {
            return Err(PlacementError::Locked);
        }

        let cost = kind.stats().cost;
        if world.gold < cost {
            return Err(PlacementError::InsufficientGold);
        }

        if world
            .map
            .path()
            .iter()
            .any(|waypoint| waypoint.distance(position) < PATH_CLEARANCE)
        {
            return Err(PlacementError::TooCloseToPath);
        }

        if world.towers.any_within(position, TOWER_SPACING) {
            return Err(PlacementError::TooCloseToTower);
        }

        Ok(cost)
    }
}
