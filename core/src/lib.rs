#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Quest Arcade tower-defense engine.
//!
//! This crate defines the message surface that connects hosts, the
//! authoritative world, and pure systems. Hosts submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values for systems to
//! react to deterministically. Systems consume event streams, query immutable
//! snapshots, and respond exclusively with new command batches.

use std::time::Duration;

use serde::{Deserialize, Serialize};

mod maps;

pub use maps::{Decoration, MapKind};

/// Gold available when a fresh run begins.
pub const STARTING_GOLD: u32 = 300;

/// Lives available when a fresh run begins.
pub const STARTING_LIVES: u32 = 25;

/// Minimum distance between a tower and any path waypoint, in world units.
pub const PATH_CLEARANCE: f32 = 35.0;

/// Minimum distance between two tower centers, in world units.
pub const TOWER_SPACING: f32 = 50.0;

/// Distance at which an enemy counts as having reached its waypoint.
pub const WAYPOINT_EPSILON: f32 = 5.0;

/// Speed multiplier applied to slowed enemies.
pub const SLOW_FACTOR: f32 = 0.5;

/// Damage every hit deals at minimum, regardless of armor.
pub const MINIMUM_DAMAGE: u32 = 5;

/// Horizontal gap between consecutive enemies of a freshly spawned wave.
pub const SPAWN_SPACING: f32 = 60.0;

/// Experience awarded for every enemy destroyed.
pub const KILL_XP: u32 = 8;

/// Flat experience bonus awarded on victory.
pub const VICTORY_BASE_XP: u32 = 200;

/// Additional victory experience awarded per wave reached.
pub const VICTORY_XP_PER_WAVE: u32 = 20;

/// Wave number from which a victory also unlocks the next tower kind.
pub const TOWER_UNLOCK_WAVE: u32 = 5;

/// Delay between clearing a wave and the automatic start of the next one.
pub const WAVE_DELAY: Duration = Duration::from_millis(2_500);

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Updates the economy used by subsequent resets.
    ConfigureEconomy {
        /// Gold granted at the start of a run.
        starting_gold: u32,
        /// Lives granted at the start of a run.
        starting_lives: u32,
    },
    /// Switches to the provided map and resets the run.
    SelectMap {
        /// Map that should become active.
        map: MapKind,
    },
    /// Clears towers, enemies and counters, restoring the starting economy.
    Reset,
    /// Starts or pauses the simulation.
    SetRunning {
        /// Whether the simulation should advance on ticks.
        running: bool,
    },
    /// Requests placement of a tower centered at the provided point.
    PlaceTower {
        /// Type of tower to construct.
        kind: TowerKind,
        /// Center of the tower in world units.
        position: Point,
    },
    /// Inserts a freshly generated wave of enemies.
    SpawnWave {
        /// Wave number the enemies belong to.
        wave: u32,
        /// Enemies to insert, in spawn order.
        spawns: Vec<EnemySpawn>,
    },
    /// Advances the simulation clock to the provided absolute timestamp.
    Tick {
        /// Time elapsed since the host started its clock.
        now: Duration,
    },
    /// Applies the damage and side effects of a single tower volley.
    ResolveVolley {
        /// Tower that fired.
        tower: TowerId,
        /// Timestamp recorded as the tower's last firing time.
        fired_at: Duration,
        /// Damage dealt to each targeted enemy, in target order.
        hits: Vec<Hit>,
        /// Enemies slowed by the volley.
        slowed: Vec<EnemyId>,
    },
    /// Makes a tower kind available for placement.
    UnlockTower {
        /// Tower kind to unlock.
        kind: TowerKind,
    },
    /// Makes a map available for selection.
    UnlockMap {
        /// Map to unlock.
        map: MapKind,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Absolute timestamp of the tick.
        now: Duration,
    },
    /// Confirms that a new map is active.
    MapSelected {
        /// Map that became active.
        map: MapKind,
    },
    /// Reports that a map selection was refused because the map is locked.
    MapSelectionRejected {
        /// Map that was requested.
        map: MapKind,
    },
    /// Confirms that the run was reset to its starting state.
    GameReset,
    /// Announces that the simulation started or paused.
    RunningChanged {
        /// Whether the simulation now advances on ticks.
        running: bool,
    },
    /// Confirms that a tower was placed into the world.
    TowerPlaced {
        /// Identifier assigned to the tower by the world.
        tower: TowerId,
        /// Type of tower that was placed.
        kind: TowerKind,
        /// Center of the tower.
        position: Point,
        /// Gold deducted for the tower.
        cost: u32,
    },
    /// Reports that a tower placement request was rejected.
    TowerPlacementRejected {
        /// Type of tower requested for placement.
        kind: TowerKind,
        /// Position provided in the placement request.
        position: Point,
        /// Specific reason the placement failed.
        reason: PlacementError,
    },
    /// Announces that a wave of enemies entered the map.
    WaveStarted {
        /// Wave number.
        wave: u32,
        /// Number of enemies spawned.
        enemies: u32,
    },
    /// Confirms that an enemy reached a waypoint and now heads to the next one.
    EnemyReachedWaypoint {
        /// Identifier of the enemy.
        enemy: EnemyId,
        /// Index of the next waypoint the enemy walks toward.
        path_index: usize,
    },
    /// Reports that an enemy walked off the end of the path.
    EnemyLeaked {
        /// Identifier of the enemy.
        enemy: EnemyId,
        /// Lives remaining after the leak.
        lives: u32,
    },
    /// Confirms that a tower fired a volley.
    TowerFired {
        /// Tower that fired.
        tower: TowerId,
        /// Number of enemies hit.
        targets: u32,
    },
    /// Reports damage dealt to an enemy that survived the hit.
    EnemyDamaged {
        /// Identifier of the enemy.
        enemy: EnemyId,
        /// Damage dealt.
        damage: u32,
        /// Health remaining after the hit.
        health: u32,
    },
    /// Reports that an enemy was destroyed by a tower.
    EnemyKilled {
        /// Identifier of the enemy.
        enemy: EnemyId,
        /// Tower credited with the kill.
        tower: TowerId,
        /// Gold awarded for the kill.
        reward: u32,
    },
    /// Announces that every enemy of a wave is gone while more waves remain.
    WaveCleared {
        /// Wave number that was cleared.
        wave: u32,
        /// Timestamp at which the wave was cleared.
        at: Duration,
    },
    /// Announces that the final wave was cleared.
    Victory {
        /// Wave reached.
        wave: u32,
        /// Experience granted for the victory, excluding kill experience.
        bonus_xp: u32,
    },
    /// Announces that the last life was lost.
    Defeat {
        /// Wave reached.
        wave: u32,
    },
    /// Confirms that a tower kind became available.
    TowerUnlocked {
        /// Unlocked tower kind.
        kind: TowerKind,
    },
    /// Confirms that a map became available.
    MapUnlocked {
        /// Unlocked map.
        map: MapKind,
    },
}

/// Position on the map measured in world units.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// Horizontal coordinate.
    pub x: f32,
    /// Vertical coordinate.
    pub y: f32,
}

impl Point {
    /// Creates a new point.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Euclidean distance between two points.
    #[must_use]
    pub fn distance(self, other: Point) -> f32 {
        glam::Vec2::from(self).distance(glam::Vec2::from(other))
    }
}

impl From<Point> for glam::Vec2 {
    fn from(point: Point) -> Self {
        glam::Vec2::new(point.x, point.y)
    }
}

impl From<glam::Vec2> for Point {
    fn from(vector: glam::Vec2) -> Self {
        Point::new(vector.x, vector.y)
    }
}

/// Unique identifier assigned to a tower.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TowerId(u32);

impl TowerId {
    /// Creates a new tower identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the tower identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to an enemy.
///
/// Identifiers grow with spawn order, so sorting by id yields spawn order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EnemyId(u32);

impl EnemyId {
    /// Creates a new enemy identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Types of towers that can be constructed.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum TowerKind {
    /// Fast attacks with excellent range.
    Archer,
    /// Heavy single-target damage.
    Cannon,
    /// Magic damage that ignores armor.
    Wizard,
    /// Slows every enemy in range.
    Frost,
    /// Short-range melee garrison.
    Barracks,
    /// Chain lightning hitting several enemies per volley.
    Tesla,
}

impl TowerKind {
    /// Every tower kind in unlock order.
    pub const ALL: [TowerKind; 6] = [
        TowerKind::Archer,
        TowerKind::Cannon,
        TowerKind::Wizard,
        TowerKind::Frost,
        TowerKind::Barracks,
        TowerKind::Tesla,
    ];

    /// Tower kinds available before anything is unlocked.
    pub const STARTER: [TowerKind; 2] = [TowerKind::Archer, TowerKind::Cannon];

    /// Base statistics copied onto every tower of this kind.
    #[must_use]
    pub const fn stats(self) -> TowerStats {
        match self {
            Self::Archer => TowerStats::new(50, 18, 140.0, 600),
            Self::Cannon => TowerStats::new(100, 55, 110.0, 1_400),
            Self::Wizard => TowerStats::new(175, 40, 100.0, 1_000),
            Self::Frost => TowerStats::new(125, 12, 120.0, 500),
            Self::Barracks => TowerStats::new(90, 25, 70.0, 800),
            Self::Tesla => TowerStats::new(250, 80, 90.0, 2_000),
        }
    }

    /// Human readable name of the tower kind.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Archer => "Archer Tower",
            Self::Cannon => "Cannon Tower",
            Self::Wizard => "Wizard Tower",
            Self::Frost => "Frost Tower",
            Self::Barracks => "Barracks",
            Self::Tesla => "Tesla Tower",
        }
    }

    /// Maximum number of enemies struck by a single volley.
    #[must_use]
    pub const fn targets_per_volley(self) -> usize {
        match self {
            Self::Tesla => 3,
            _ => 1,
        }
    }

    /// Reports whether hits from this tower ignore enemy armor.
    #[must_use]
    pub const fn pierces_armor(self) -> bool {
        matches!(self, Self::Wizard)
    }

    /// Reports whether a volley slows every enemy inside the tower's range.
    #[must_use]
    pub const fn slows_in_range(self) -> bool {
        matches!(self, Self::Frost)
    }

    /// Damage a hit deals to an enemy carrying `armor`.
    ///
    /// Every hit deals at least [`MINIMUM_DAMAGE`].
    #[must_use]
    pub fn damage_against(self, damage: u32, armor: u32) -> u32 {
        let reduction = if self.pierces_armor() { 0 } else { armor };
        damage.saturating_sub(reduction).max(MINIMUM_DAMAGE)
    }
}

/// Static statistics describing a tower kind.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TowerStats {
    /// Gold required to place the tower.
    pub cost: u32,
    /// Damage dealt per hit before armor.
    pub damage: u32,
    /// Targeting radius in world units.
    pub range: f32,
    /// Minimum time between volleys.
    pub fire_rate: Duration,
}

impl TowerStats {
    const fn new(cost: u32, damage: u32, range: f32, fire_rate_ms: u64) -> Self {
        Self {
            cost,
            damage,
            range,
            fire_rate: Duration::from_millis(fire_rate_ms),
        }
    }
}

/// Types of enemies that can appear in a wave.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum EnemyKind {
    /// Fast and fragile.
    Goblin,
    /// Lightly armored infantry.
    Orc,
    /// Slow and sturdy.
    Troll,
    /// Armored flyer with a large bounty.
    Dragon,
    /// Mid-tier caster.
    Necromancer,
    /// Very slow, very heavily armored.
    Golem,
    /// Fastest enemy, unarmored.
    Wraith,
}

impl EnemyKind {
    /// Enemy kinds in the order they join the spawn pool.
    pub const UNLOCK_ORDER: [EnemyKind; 7] = [
        EnemyKind::Goblin,
        EnemyKind::Orc,
        EnemyKind::Troll,
        EnemyKind::Necromancer,
        EnemyKind::Dragon,
        EnemyKind::Wraith,
        EnemyKind::Golem,
    ];

    /// Base statistics before wave scaling.
    #[must_use]
    pub const fn base(self) -> EnemyBase {
        match self {
            Self::Goblin => EnemyBase::new(40, 1.8, 0, 12),
            Self::Orc => EnemyBase::new(80, 1.2, 8, 18),
            Self::Troll => EnemyBase::new(150, 0.8, 15, 30),
            Self::Dragon => EnemyBase::new(200, 1.4, 12, 50),
            Self::Necromancer => EnemyBase::new(100, 1.0, 5, 35),
            Self::Golem => EnemyBase::new(300, 0.5, 25, 60),
            Self::Wraith => EnemyBase::new(60, 2.0, 0, 25),
        }
    }

    /// First wave in which this kind may spawn.
    #[must_use]
    pub const fn first_wave(self) -> u32 {
        match self {
            Self::Goblin => 1,
            Self::Orc => 2,
            Self::Troll => 4,
            Self::Necromancer => 6,
            Self::Dragon => 8,
            Self::Wraith => 10,
            Self::Golem => 12,
        }
    }
}

/// Unscaled statistics of an enemy kind.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EnemyBase {
    /// Hit points.
    pub health: u32,
    /// World units travelled per tick.
    pub speed: f32,
    /// Flat damage reduction.
    pub armor: u32,
    /// Gold awarded on kill.
    pub reward: u32,
}

impl EnemyBase {
    const fn new(health: u32, speed: f32, armor: u32, reward: u32) -> Self {
        Self {
            health,
            speed,
            armor,
            reward,
        }
    }
}

/// Fully scaled enemy ready to be inserted into the world.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EnemySpawn {
    /// Kind of enemy.
    pub kind: EnemyKind,
    /// Initial position.
    pub position: Point,
    /// Starting and maximum health.
    pub health: u32,
    /// World units travelled per tick.
    pub speed: f32,
    /// Flat damage reduction.
    pub armor: u32,
    /// Gold awarded on kill.
    pub reward: u32,
}

/// Damage dealt to one enemy by a volley.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Hit {
    /// Enemy struck by the volley.
    pub enemy: EnemyId,
    /// Damage after armor.
    pub damage: u32,
}

/// Targets selected for a tower that is ready to fire.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TowerVolley {
    /// Tower that fires.
    pub tower: TowerId,
    /// Enemies struck, nearest first.
    pub targets: Vec<EnemyId>,
    /// Enemies slowed by the volley.
    pub slowed: Vec<EnemyId>,
}

/// Lifecycle of a tower-defense run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunPhase {
    /// Waiting for the host to start the first wave.
    Idle,
    /// Simulation advances on every tick.
    Running,
    /// Simulation is suspended.
    Paused,
    /// The final wave was cleared.
    Victory,
    /// Every life was lost.
    Defeat,
}

impl RunPhase {
    /// Reports whether the run has ended.
    #[must_use]
    pub const fn is_over(self) -> bool {
        matches!(self, Self::Victory | Self::Defeat)
    }
}

/// Reasons a tower placement request may be rejected by the world.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, thiserror::Error,
)]
pub enum PlacementError {
    /// The requested tower kind has not been unlocked yet.
    #[error("tower is locked")]
    Locked,
    /// The player cannot afford the tower.
    #[error("not enough gold")]
    InsufficientGold,
    /// The position lies within the clearance radius of a path waypoint.
    #[error("too close to the path")]
    TooCloseToPath,
    /// The position lies within the spacing radius of another tower.
    #[error("too close to another tower")]
    TooCloseToTower,
    /// The run has already ended.
    #[error("the game is over")]
    GameOver,
}

/// Immutable representation of a single tower's state used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TowerSnapshot {
    /// Identifier allocated to the tower by the world.
    pub id: TowerId,
    /// Kind of tower that was constructed.
    pub kind: TowerKind,
    /// Center of the tower.
    pub position: Point,
    /// Upgrade level.
    pub level: u32,
    /// Damage dealt per hit before armor.
    pub damage: u32,
    /// Targeting radius.
    pub range: f32,
    /// Minimum time between volleys.
    pub fire_rate: Duration,
    /// Timestamp of the last volley, `None` if the tower never fired.
    pub last_fired: Option<Duration>,
    /// Enemies destroyed by this tower.
    pub kills: u32,
}

impl TowerSnapshot {
    /// Reports whether the tower may fire at `now`.
    #[must_use]
    pub fn ready_at(&self, now: Duration) -> bool {
        match self.last_fired {
            Some(last) => now.saturating_sub(last) >= self.fire_rate,
            None => true,
        }
    }
}

/// Read-only snapshot describing all towers placed on the map.
#[derive(Clone, Debug, Default)]
pub struct TowerView {
    snapshots: Vec<TowerSnapshot>,
}

impl TowerView {
    /// Creates a new tower view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<TowerSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured tower snapshots in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = &TowerSnapshot> {
        self.snapshots.iter()
    }

    /// Number of towers captured by the view.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether the view holds no towers.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<TowerSnapshot> {
        self.snapshots
    }
}

/// Immutable representation of a single enemy's state used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EnemySnapshot {
    /// Unique identifier assigned to the enemy.
    pub id: EnemyId,
    /// Kind of enemy.
    pub kind: EnemyKind,
    /// Current position.
    pub position: Point,
    /// Remaining health.
    pub health: u32,
    /// Health at spawn.
    pub max_health: u32,
    /// World units travelled per tick while not slowed.
    pub speed: f32,
    /// Index of the waypoint the enemy walks toward.
    pub path_index: usize,
    /// Gold awarded on kill.
    pub reward: u32,
    /// Flat damage reduction.
    pub armor: u32,
    /// Whether the enemy moves at reduced speed on the next tick.
    pub slowed: bool,
}

/// Read-only snapshot describing all enemies on the map.
#[derive(Clone, Debug, Default)]
pub struct EnemyView {
    snapshots: Vec<EnemySnapshot>,
}

impl EnemyView {
    /// Creates a new enemy view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<EnemySnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured enemy snapshots in spawn order.
    pub fn iter(&self) -> impl Iterator<Item = &EnemySnapshot> {
        self.snapshots.iter()
    }

    /// Looks up the snapshot of a specific enemy.
    #[must_use]
    pub fn get(&self, enemy: EnemyId) -> Option<&EnemySnapshot> {
        self.snapshots
            .binary_search_by_key(&enemy, |snapshot| snapshot.id)
            .ok()
            .map(|index| &self.snapshots[index])
    }

    /// Number of enemies captured by the view.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether the view holds no enemies.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<EnemySnapshot> {
        self.snapshots
    }
}

/// Counters displayed by the host while a run is in progress.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hud {
    /// Gold available for placement.
    pub gold: u32,
    /// Lives remaining.
    pub lives: u32,
    /// Current wave number, zero before the first wave.
    pub wave: u32,
    /// Enemies destroyed during the run.
    pub kills: u32,
    /// Experience earned during the run.
    pub xp: u32,
    /// Lifecycle phase of the run.
    pub phase: RunPhase,
}

#[cfg(test)]
mod tests {
    use super::{EnemyId, EnemyKind, MapKind, PlacementError, Point, TowerId, TowerKind};
    use serde::{de::DeserializeOwned, Serialize};
    use std::time::Duration;

    fn assert_round_trip<T>(value: &T)
    where
        T: Serialize + DeserializeOwned + PartialEq + std::fmt::Debug,
    {
        let bytes = bincode::serialize(value).expect("serialize");
        let restored: T = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(&restored, value);
    }

    #[test]
    fn identifiers_round_trip_through_bincode() {
        assert_round_trip(&TowerId::new(42));
        assert_round_trip(&EnemyId::new(7));
    }

    #[test]
    fn placement_error_round_trips_through_bincode() {
        assert_round_trip(&PlacementError::TooCloseToTower);
    }

    #[test]
    fn point_distance_is_euclidean() {
        let origin = Point::new(0.0, 0.0);
        assert!((origin.distance(Point::new(3.0, 4.0)) - 5.0).abs() < f32::EPSILON);
    }

    #[test]
    fn armor_is_subtracted_down_to_the_minimum() {
        assert_eq!(TowerKind::Archer.damage_against(18, 8), 10);
        assert_eq!(TowerKind::Archer.damage_against(18, 15), 5);
        assert_eq!(TowerKind::Cannon.damage_against(55, 200), 5);
    }

    #[test]
    fn wizard_ignores_armor() {
        assert_eq!(TowerKind::Wizard.damage_against(40, 25), 40);
    }

    #[test]
    fn only_tesla_hits_several_targets() {
        for kind in TowerKind::ALL {
            let expected = if kind == TowerKind::Tesla { 3 } else { 1 };
            assert_eq!(kind.targets_per_volley(), expected, "{kind:?}");
        }
    }

    #[test]
    fn tower_stats_match_the_shop_table() {
        let archer = TowerKind::Archer.stats();
        assert_eq!(archer.cost, 50);
        assert_eq!(archer.damage, 18);
        assert_eq!(archer.fire_rate, Duration::from_millis(600));
        assert_eq!(TowerKind::Tesla.stats().cost, 250);
    }

    #[test]
    fn enemy_pool_unlocks_every_two_waves() {
        let thresholds: Vec<u32> = EnemyKind::UNLOCK_ORDER
            .iter()
            .map(|kind| kind.first_wave())
            .collect();
        assert_eq!(thresholds, vec![1, 2, 4, 6, 8, 10, 12]);
    }

    #[test]
    fn maps_unlock_in_declared_order() {
        assert_eq!(MapKind::Greenlands.next(), Some(MapKind::VolcanicForge));
        assert_eq!(MapKind::DarkCastle.next(), None);
        assert_eq!(MapKind::Greenlands.total_waves(), 12);
        assert_eq!(MapKind::DarkCastle.path().len(), 14);
    }

    #[test]
    fn kinds_use_snake_case_names_in_serde() {
        let encoded = serde_json::to_string(&MapKind::VolcanicForge).expect("serialize");
        assert_eq!(encoded, "\"volcanic_forge\"");
        let tower: TowerKind = serde_json::from_str("\"tesla\"").expect("deserialize");
        assert_eq!(tower, TowerKind::Tesla);
    }
}
