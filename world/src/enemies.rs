//! Enemy state and waypoint locomotion.

use glam::Vec2;
use quest_arcade_core::{
    EnemyId, EnemyKind, EnemySnapshot, EnemySpawn, Point, SLOW_FACTOR, WAYPOINT_EPSILON,
};

#[derive(Clone, Debug)]
pub(crate) struct Enemy {
    pub(crate) id: EnemyId,
    pub(crate) kind: EnemyKind,
    pub(crate) position: Vec2,
    pub(crate) health: u32,
    pub(crate) max_health: u32,
    pub(crate) speed: f32,
    pub(crate) path_index: usize,
    pub(crate) reward: u32,
    pub(crate) armor: u32,
    pub(crate) slowed: bool,
}

/// Outcome of advancing an enemy by one tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Stride {
    /// The enemy moved toward its current waypoint.
    Moved,
    /// The enemy reached a waypoint and now targets the next one.
    ReachedWaypoint(usize),
    /// The enemy reached the final waypoint.
    Leaked,
    /// The enemy has no waypoint to walk toward.
    Stalled,
}

impl Enemy {
    pub(crate) fn from_spawn(id: EnemyId, spawn: &EnemySpawn) -> Self {
        Self {
            id,
            kind: spawn.kind,
            position: Vec2::from(spawn.position),
            health: spawn.health,
            max_health: spawn.health,
            speed: spawn.speed,
            path_index: 0,
            reward: spawn.reward,
            armor: spawn.armor,
            slowed: false,
        }
    }

    /// Advances the enemy one tick along `path`.
    ///
    /// Reaching a waypoint consumes the tick without moving. The slow flag is
    /// consumed by every movement step and must be reapplied by a tower.
    pub(crate) fn stride(&mut self, path: &[Point]) -> Stride {
        let Some(target) = path.get(self.path_index) else {
            return Stride::Stalled;
        };

        let delta = Vec2::from(*target) - self.position;
        let distance = delta.length();

        if distance < WAYPOINT_EPSILON {
            if self.path_index + 1 < path.len() {
                self.path_index += 1;
                return Stride::ReachedWaypoint(self.path_index);
            }
            return Stride::Leaked;
        }

        let speed = if self.slowed {
            self.speed * SLOW_FACTOR
        } else {
            self.speed
        };
        self.position += delta / distance * speed;
        self.slowed = false;
        Stride::Moved
    }

    /// Applies damage and reports whether the enemy was destroyed.
    pub(crate) fn take_damage(&mut self, damage: u32) -> bool {
        self.health = self.health.saturating_sub(damage);
        self.health == 0
    }

    pub(crate) fn snapshot(&self) -> EnemySnapshot {
        EnemySnapshot {
            id: self.id,
            kind: self.kind,
            position: Point::from(self.position),
            health: self.health,
            max_health: self.max_health,
            speed: self.speed,
            path_index: self.path_index,
            reward: self.reward,
            armor: self.armor,
            slowed: self.slowed,
        }
    }
}
