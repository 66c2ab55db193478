#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that turns tower volleys into damage resolution commands.

use std::time::Duration;

use quest_arcade_core::{Command, EnemyView, Hit, RunPhase, TowerSnapshot, TowerVolley};

/// Tower combat system that queues volley resolutions for the world.
#[derive(Debug, Default)]
pub struct TowerCombat {
    scratch: Vec<Command>,
}

impl TowerCombat {
    /// Creates a new tower combat system with empty scratch buffers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Emits `Command::ResolveVolley` entries for the provided volleys.
    ///
    /// Damage is computed per target as `max(damage - armor, 5)`, with armor
    /// treated as zero for towers that pierce it.
    pub fn handle(
        &mut self,
        phase: RunPhase,
        now: Duration,
        towers: &[TowerSnapshot],
        enemies: &EnemyView,
        volleys: &[TowerVolley],
        out: &mut Vec<Command>,
    ) {
        if phase != RunPhase::Running || volleys.is_empty() {
            return;
        }

        self.scratch.clear();

        for volley in volleys {
            let Some(tower) = find_tower(towers, volley) else {
                continue;
            };

            let hits = volley
                .targets
                .iter()
                .filter_map(|enemy| enemies.get(*enemy))
                .map(|enemy| Hit {
                    enemy: enemy.id,
                    damage: tower.kind.damage_against(tower.damage, enemy.armor),
                })
                .collect();

            self.scratch.push(Command::ResolveVolley {
                tower: tower.id,
                fired_at: now,
                hits,
                slowed: volley.slowed.clone(),
            });
        }

        if self.scratch.is_empty() {
            return;
        }

        out.reserve(self.scratch.len());
        out.append(&mut self.scratch);
    }
}

fn find_tower<'a>(towers: &'a [TowerSnapshot], volley: &TowerVolley) -> Option<&'a TowerSnapshot> {
    towers
        .binary_search_by_key(&volley.tower, |snapshot| snapshot.id)
        .ok()
        .map(|index| &towers[index])
}
