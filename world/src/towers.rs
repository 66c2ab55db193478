//! Authoritative tower state management utilities.

use std::{collections::BTreeMap, time::Duration};

use quest_arcade_core::{Point, TowerId, TowerKind, TowerSnapshot};

/// State of a tower stored inside the world.
#[derive(Clone, Debug)]
pub(crate) struct TowerState {
    pub(crate) id: TowerId,
    pub(crate) kind: TowerKind,
    pub(crate) position: Point,
    pub(crate) level: u32,
    pub(crate) damage: u32,
    pub(crate) range: f32,
    pub(crate) fire_rate: Duration,
    pub(crate) last_fired: Option<Duration>,
    pub(crate) kills: u32,
}

impl TowerState {
    /// Builds a level-one tower with the base statistics of its kind.
    pub(crate) fn from_kind(id: TowerId, kind: TowerKind, position: Point) -> Self {
        let stats = kind.stats();
        Self {
            id,
            kind,
            position,
            level: 1,
            damage: stats.damage,
            range: stats.range,
            fire_rate: stats.fire_rate,
            last_fired: None,
            kills: 0,
        }
    }

    /// Records a volley; firing timestamps never move backwards.
    pub(crate) fn record_volley(&mut self, fired_at: Duration) {
        let advanced = match self.last_fired {
            Some(previous) => previous.max(fired_at),
            None => fired_at,
        };
        self.last_fired = Some(advanced);
    }

    pub(crate) fn snapshot(&self) -> TowerSnapshot {
        TowerSnapshot {
            id: self.id,
            kind: self.kind,
            position: self.position,
            level: self.level,
            damage: self.damage,
            range: self.range,
            fire_rate: self.fire_rate,
            last_fired: self.last_fired,
            kills: self.kills,
        }
    }
}

/// Registry that stores towers and manages identifier allocation.
#[derive(Debug)]
pub(crate) struct TowerRegistry {
    entries: BTreeMap<TowerId, TowerState>,
    next_tower_id: TowerId,
}

impl TowerRegistry {
    /// Creates an empty tower registry with a reset identifier counter.
    pub(crate) fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
            next_tower_id: TowerId::new(0),
        }
    }

    /// Inserts a new tower of the provided kind and returns its identifier.
    pub(crate) fn insert(&mut self, kind: TowerKind, position: Point) -> TowerId {
        let id = self.next_tower_id;
        self.next_tower_id = TowerId::new(id.get().saturating_add(1));
        let _ = self
            .entries
            .insert(id, TowerState::from_kind(id, kind, position));
        id
    }

    pub(crate) fn get_mut(&mut self, id: TowerId) -> Option<&mut TowerState> {
        self.entries.get_mut(&id)
    }

    /// Iterates towers in ascending identifier order.
    pub(crate) fn iter(&self) -> impl Iterator<Item = &TowerState> {
        self.entries.values()
    }

    /// Reports whether any tower center lies closer than `radius` to `position`.
    pub(crate) fn any_within(&self, position: Point, radius: f32) -> bool {
        self.entries
            .values()
            .any(|tower| tower.position.distance(position) < radius)
    }

    pub(crate) fn clear(&mut self) {
        self.entries.clear();
        self.next_tower_id = TowerId::new(0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_starts_empty_with_zero_identifier() {
        let registry = TowerRegistry::new();
        assert!(registry.entries.is_empty());
        assert_eq!(registry.next_tower_id.get(), 0);
    }

    #[test]
    fn inserted_towers_copy_base_stats() {
        let mut registry = TowerRegistry::new();
        let id = registry.insert(TowerKind::Frost, Point::new(10.0, 20.0));
        let tower = registry.get_mut(id).expect("tower exists");
        assert_eq!(tower.damage, 12);
        assert_eq!(tower.range, 120.0);
        assert_eq!(tower.level, 1);
        assert_eq!(tower.last_fired, None);
        assert_eq!(tower.kills, 0);
    }

    #[test]
    fn volley_timestamps_only_advance() {
        let mut tower = TowerState::from_kind(TowerId::new(0), TowerKind::Archer, Point::default());
        tower.record_volley(Duration::from_millis(900));
        tower.record_volley(Duration::from_millis(300));
        assert_eq!(tower.last_fired, Some(Duration::from_millis(900)));
    }

    #[test]
    fn clearing_resets_identifier_allocation() {
        let mut registry = TowerRegistry::new();
        let _ = registry.insert(TowerKind::Archer, Point::default());
        registry.clear();
        assert_eq!(registry.insert(TowerKind::Archer, Point::default()), TowerId::new(0));
    }
}
