//! Static map catalogue: waypoint paths, wave counts and scenery.

use serde::{Deserialize, Serialize};

use crate::Point;

/// Maps available to a run, declared in unlock order.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum MapKind {
    /// Rolling hills; the starter map.
    Greenlands,
    /// Fiery mountain forge.
    VolcanicForge,
    /// Arcane crystal caves.
    CrystalCaverns,
    /// The final stronghold.
    DarkCastle,
}

/// Purely cosmetic map feature reported to the host for rendering.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Decoration {
    /// Location of the feature.
    pub position: Point,
    /// Short label describing the feature.
    pub label: &'static str,
}

const fn deco(x: f32, y: f32, label: &'static str) -> Decoration {
    Decoration {
        position: Point::new(x, y),
        label,
    }
}

const GREENLANDS_PATH: [Point; 10] = [
    Point::new(0.0, 200.0),
    Point::new(100.0, 200.0),
    Point::new(100.0, 80.0),
    Point::new(250.0, 80.0),
    Point::new(250.0, 320.0),
    Point::new(400.0, 320.0),
    Point::new(400.0, 150.0),
    Point::new(550.0, 150.0),
    Point::new(550.0, 250.0),
    Point::new(700.0, 250.0),
];

const VOLCANIC_FORGE_PATH: [Point; 10] = [
    Point::new(0.0, 120.0),
    Point::new(120.0, 120.0),
    Point::new(120.0, 280.0),
    Point::new(280.0, 280.0),
    Point::new(280.0, 80.0),
    Point::new(450.0, 80.0),
    Point::new(450.0, 200.0),
    Point::new(550.0, 200.0),
    Point::new(550.0, 350.0),
    Point::new(700.0, 350.0),
];

const CRYSTAL_CAVERNS_PATH: [Point; 12] = [
    Point::new(0.0, 180.0),
    Point::new(80.0, 180.0),
    Point::new(80.0, 50.0),
    Point::new(200.0, 50.0),
    Point::new(200.0, 320.0),
    Point::new(350.0, 320.0),
    Point::new(350.0, 150.0),
    Point::new(500.0, 150.0),
    Point::new(500.0, 280.0),
    Point::new(620.0, 280.0),
    Point::new(620.0, 180.0),
    Point::new(700.0, 180.0),
];

const DARK_CASTLE_PATH: [Point; 14] = [
    Point::new(0.0, 200.0),
    Point::new(60.0, 200.0),
    Point::new(60.0, 60.0),
    Point::new(180.0, 60.0),
    Point::new(180.0, 320.0),
    Point::new(300.0, 320.0),
    Point::new(300.0, 140.0),
    Point::new(420.0, 140.0),
    Point::new(420.0, 280.0),
    Point::new(540.0, 280.0),
    Point::new(540.0, 100.0),
    Point::new(650.0, 100.0),
    Point::new(650.0, 200.0),
    Point::new(700.0, 200.0),
];

const GREENLANDS_DECORATIONS: [Decoration; 5] = [
    deco(50.0, 120.0, "pine"),
    deco(180.0, 180.0, "oak"),
    deco(320.0, 80.0, "pine"),
    deco(480.0, 280.0, "oak"),
    deco(150.0, 300.0, "rock"),
];

const VOLCANIC_FORGE_DECORATIONS: [Decoration; 4] = [
    deco(60.0, 200.0, "volcano"),
    deco(200.0, 150.0, "fire"),
    deco(380.0, 180.0, "volcano"),
    deco(520.0, 100.0, "fire"),
];

const CRYSTAL_CAVERNS_DECORATIONS: [Decoration; 4] = [
    deco(130.0, 120.0, "crystal"),
    deco(280.0, 200.0, "crystal"),
    deco(420.0, 80.0, "sparkle"),
    deco(560.0, 350.0, "crystal"),
];

const DARK_CASTLE_DECORATIONS: [Decoration; 5] = [
    deco(120.0, 150.0, "castle"),
    deco(240.0, 200.0, "coffin"),
    deco(370.0, 60.0, "bat"),
    deco(480.0, 350.0, "skull"),
    deco(600.0, 180.0, "castle"),
];

impl MapKind {
    /// Every map in unlock order.
    pub const ALL: [MapKind; 4] = [
        MapKind::Greenlands,
        MapKind::VolcanicForge,
        MapKind::CrystalCaverns,
        MapKind::DarkCastle,
    ];

    /// Human readable map name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Greenlands => "Greenlands",
            Self::VolcanicForge => "Volcanic Forge",
            Self::CrystalCaverns => "Crystal Caverns",
            Self::DarkCastle => "Dark Castle",
        }
    }

    /// Number of waves that must be cleared for victory.
    #[must_use]
    pub const fn total_waves(self) -> u32 {
        match self {
            Self::Greenlands => 12,
            Self::VolcanicForge => 15,
            Self::CrystalCaverns => 18,
            Self::DarkCastle => 25,
        }
    }

    /// Ordered waypoints enemies walk along. Never empty.
    #[must_use]
    pub fn path(self) -> &'static [Point] {
        match self {
            Self::Greenlands => &GREENLANDS_PATH,
            Self::VolcanicForge => &VOLCANIC_FORGE_PATH,
            Self::CrystalCaverns => &CRYSTAL_CAVERNS_PATH,
            Self::DarkCastle => &DARK_CASTLE_PATH,
        }
    }

    /// Cosmetic features drawn alongside the path.
    #[must_use]
    pub fn decorations(self) -> &'static [Decoration] {
        match self {
            Self::Greenlands => &GREENLANDS_DECORATIONS,
            Self::VolcanicForge => &VOLCANIC_FORGE_DECORATIONS,
            Self::CrystalCaverns => &CRYSTAL_CAVERNS_DECORATIONS,
            Self::DarkCastle => &DARK_CASTLE_DECORATIONS,
        }
    }

    /// Map unlocked by a victory on this one.
    #[must_use]
    pub const fn next(self) -> Option<MapKind> {
        match self {
            Self::Greenlands => Some(Self::VolcanicForge),
            Self::VolcanicForge => Some(Self::CrystalCaverns),
            Self::CrystalCaverns => Some(Self::DarkCastle),
            Self::DarkCastle => None,
        }
    }
}
