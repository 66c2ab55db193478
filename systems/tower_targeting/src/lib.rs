#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that computes deterministic tower volleys from world snapshots.

use std::time::Duration;

use quest_arcade_core::{
    EnemyId, EnemyView, Point, RunPhase, TowerId, TowerKind, TowerView, TowerVolley,
};

/// Tower targeting system that reuses scratch buffers to avoid repeated allocations.
#[derive(Debug, Default)]
pub struct TowerTargeting {
    enemy_workspace: Vec<EnemyCandidate>,
    in_range: Vec<RangedCandidate>,
}

impl TowerTargeting {
    /// Creates a new tower targeting system with empty scratch buffers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Computes the volleys fired at `now` for the provided world snapshot.
    ///
    /// Ready towers are processed in ascending identifier order. Damage dealt
    /// by earlier volleys is tracked against scratch health so later towers
    /// never aim at an enemy that is already destroyed this tick. A ready
    /// tower with nothing in range still yields an empty volley, which restarts
    /// its cooldown. The output buffer is cleared before populating it.
    pub fn handle(
        &mut self,
        phase: RunPhase,
        now: Duration,
        towers: &TowerView,
        enemies: &EnemyView,
        out: &mut Vec<TowerVolley>,
    ) {
        out.clear();

        if phase != RunPhase::Running || towers.is_empty() {
            return;
        }

        self.prepare_enemy_workspace(enemies);

        for tower in towers.iter().filter(|tower| tower.ready_at(now)) {
            self.collect_in_range(tower.position, tower.range);
            let volley = self.resolve(tower.id, tower.kind, tower.damage);
            out.push(volley);
        }
    }

    fn prepare_enemy_workspace(&mut self, enemies: &EnemyView) {
        self.enemy_workspace.clear();
        self.enemy_workspace.reserve(enemies.len());

        for snapshot in enemies.iter() {
            self.enemy_workspace.push(EnemyCandidate {
                id: snapshot.id,
                position: snapshot.position,
                health: snapshot.health,
                armor: snapshot.armor,
            });
        }
    }

    fn collect_in_range(&mut self, origin: Point, range: f32) {
        self.in_range.clear();

        for (index, candidate) in self.enemy_workspace.iter().enumerate() {
            if candidate.health == 0 {
                continue;
            }
            let distance = origin.distance(candidate.position);
            if distance <= range {
                self.in_range.push(RangedCandidate {
                    index,
                    distance,
                    id: candidate.id,
                });
            }
        }

        self.in_range.sort_by(|left, right| {
            left.distance
                .total_cmp(&right.distance)
                .then(left.id.cmp(&right.id))
        });
    }

    fn resolve(&mut self, tower: TowerId, kind: TowerKind, damage: u32) -> TowerVolley {
        let slowed = if kind.slows_in_range() {
            self.in_range.iter().map(|candidate| candidate.id).collect()
        } else {
            Vec::new()
        };

        let mut targets = Vec::with_capacity(kind.targets_per_volley());
        for ranged in self.in_range.iter().take(kind.targets_per_volley()) {
            let candidate = &mut self.enemy_workspace[ranged.index];
            let dealt = kind.damage_against(damage, candidate.armor);
            candidate.health = candidate.health.saturating_sub(dealt);
            targets.push(candidate.id);
        }

        TowerVolley {
            tower,
            targets,
            slowed,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct EnemyCandidate {
    id: EnemyId,
    position: Point,
    health: u32,
    armor: u32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct RangedCandidate {
    index: usize,
    distance: f32,
    id: EnemyId,
}

#[cfg(test)]
mod tests {
    use super::TowerTargeting;
    use quest_arcade_core::{
        EnemyId, EnemyKind, EnemySnapshot, EnemyView, Point, RunPhase, TowerId, TowerKind,
        TowerSnapshot, TowerView, TowerVolley,
    };
    use std::time::Duration;

    fn tower(id: u32, kind: TowerKind, x: f32, y: f32) -> TowerSnapshot {
        let stats = kind.stats();
        TowerSnapshot {
            id: TowerId::new(id),
            kind,
            position: Point::new(x, y),
            level: 1,
            damage: stats.damage,
            range: stats.range,
            fire_rate: stats.fire_rate,
            last_fired: None,
            kills: 0,
        }
    }

    fn enemy(id: u32, x: f32, y: f32, health: u32, armor: u32) -> EnemySnapshot {
        EnemySnapshot {
            id: EnemyId::new(id),
            kind: EnemyKind::Goblin,
            position: Point::new(x, y),
            health,
            max_health: health,
            speed: 1.8,
            path_index: 0,
            reward: 12,
            armor,
            slowed: false,
        }
    }

    fn run(towers: Vec<TowerSnapshot>, enemies: Vec<EnemySnapshot>) -> Vec<TowerVolley> {
        let mut system = TowerTargeting::new();
        let mut out = Vec::new();
        system.handle(
            RunPhase::Running,
            Duration::from_secs(10),
            &TowerView::from_snapshots(towers),
            &EnemyView::from_snapshots(enemies),
            &mut out,
        );
        out
    }

    #[test]
    fn targets_nearest_enemy_in_range() {
        let volleys = run(
            vec![tower(0, TowerKind::Archer, 0.0, 0.0)],
            vec![enemy(0, 100.0, 0.0, 40, 0), enemy(1, 50.0, 0.0, 40, 0)],
        );
        assert_eq!(volleys.len(), 1);
        assert_eq!(volleys[0].targets, vec![EnemyId::new(1)]);
        assert!(volleys[0].slowed.is_empty());
    }

    #[test]
    fn range_boundary_is_inclusive() {
        let volleys = run(
            vec![tower(0, TowerKind::Archer, 0.0, 0.0)],
            vec![enemy(0, 140.0, 0.0, 40, 0)],
        );
        assert_eq!(volleys.len(), 1);

        let volleys = run(
            vec![tower(0, TowerKind::Archer, 0.0, 0.0)],
            vec![enemy(0, 140.5, 0.0, 40, 0)],
        );
        assert_eq!(volleys.len(), 1);
        assert!(volleys[0].targets.is_empty());
    }

    #[test]
    fn ready_towers_without_targets_still_cycle() {
        let volleys = run(
            vec![
                tower(0, TowerKind::Archer, 0.0, 0.0),
                tower(1, TowerKind::Frost, 500.0, 0.0),
            ],
            Vec::new(),
        );
        assert_eq!(
            volleys,
            vec![
                TowerVolley {
                    tower: TowerId::new(0),
                    targets: Vec::new(),
                    slowed: Vec::new(),
                },
                TowerVolley {
                    tower: TowerId::new(1),
                    targets: Vec::new(),
                    slowed: Vec::new(),
                },
            ]
        );
    }

    #[test]
    fn equidistant_enemies_prefer_earlier_spawn() {
        let volleys = run(
            vec![tower(0, TowerKind::Archer, 0.0, 0.0)],
            vec![enemy(7, -30.0, 0.0, 40, 0), enemy(3, 30.0, 0.0, 40, 0)],
        );
        assert_eq!(volleys[0].targets, vec![EnemyId::new(3)]);
    }

    #[test]
    fn tesla_hits_three_nearest() {
        let volleys = run(
            vec![tower(0, TowerKind::Tesla, 0.0, 0.0)],
            vec![
                enemy(0, 10.0, 0.0, 500, 0),
                enemy(1, 40.0, 0.0, 500, 0),
                enemy(2, 20.0, 0.0, 500, 0),
                enemy(3, 30.0, 0.0, 500, 0),
            ],
        );
        assert_eq!(
            volleys[0].targets,
            vec![EnemyId::new(0), EnemyId::new(2), EnemyId::new(3)]
        );
    }

    #[test]
    fn frost_slows_everything_in_range() {
        let volleys = run(
            vec![tower(0, TowerKind::Frost, 0.0, 0.0)],
            vec![
                enemy(0, 10.0, 0.0, 500, 0),
                enemy(1, 100.0, 0.0, 500, 0),
                enemy(2, 300.0, 0.0, 500, 0),
            ],
        );
        assert_eq!(volleys[0].targets, vec![EnemyId::new(0)]);
        assert_eq!(volleys[0].slowed, vec![EnemyId::new(0), EnemyId::new(1)]);
    }

    #[test]
    fn later_towers_skip_enemies_destroyed_this_tick() {
        let volleys = run(
            vec![
                tower(0, TowerKind::Cannon, 0.0, 0.0),
                tower(1, TowerKind::Archer, 0.0, 0.0),
            ],
            vec![enemy(0, 10.0, 0.0, 40, 0), enemy(1, 60.0, 0.0, 40, 0)],
        );
        assert_eq!(volleys.len(), 2);
        assert_eq!(volleys[0].targets, vec![EnemyId::new(0)]);
        assert_eq!(volleys[1].targets, vec![EnemyId::new(1)]);
    }

    #[test]
    fn cooling_down_towers_hold_fire() {
        let mut cooling = tower(0, TowerKind::Cannon, 0.0, 0.0);
        cooling.last_fired = Some(Duration::from_millis(9_000));
        let volleys = run(vec![cooling], vec![enemy(0, 10.0, 0.0, 40, 0)]);
        assert!(volleys.is_empty());
    }

    #[test]
    fn paused_run_clears_output() {
        let mut system = TowerTargeting::new();
        let mut out = vec![TowerVolley {
            tower: TowerId::new(9),
            targets: Vec::new(),
            slowed: Vec::new(),
        }];
        system.handle(
            RunPhase::Paused,
            Duration::ZERO,
            &TowerView::from_snapshots(vec![tower(0, TowerKind::Archer, 0.0, 0.0)]),
            &EnemyView::from_snapshots(vec![enemy(0, 10.0, 0.0, 40, 0)]),
            &mut out,
        );
        assert!(out.is_empty());
    }
}
