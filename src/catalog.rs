//! Static building catalog and experience level table.
//!
//! The catalog is closed: every kind is a variant of [`BuildingKind`] and
//! every lookup is total. Nothing here is mutated at runtime.

use serde::{Deserialize, Serialize};

use crate::dependency::Requirement;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BuildingKind {
    Road,
    Residential,
    WaterPlant,
    Factory,
    SolarPlant,
    Park,
    Hospital,
    School,
    WindTurbine,
    Recycling,
    Transit,
    GreenTower,
    EcoDome,
}

impl BuildingKind {
    pub const ALL: [BuildingKind; 13] = [
        BuildingKind::Road,
        BuildingKind::Residential,
        BuildingKind::WaterPlant,
        BuildingKind::Factory,
        BuildingKind::SolarPlant,
        BuildingKind::Park,
        BuildingKind::Hospital,
        BuildingKind::School,
        BuildingKind::WindTurbine,
        BuildingKind::Recycling,
        BuildingKind::Transit,
        BuildingKind::GreenTower,
        BuildingKind::EcoDome,
    ];

    /// Residential-class tiles are the ones that accumulate happiness.
    pub fn is_residential(self) -> bool {
        matches!(self, BuildingKind::Residential | BuildingKind::GreenTower)
    }

    pub fn label(self) -> &'static str {
        def(self).name
    }
}

/// Immutable catalog entry for one building kind.
///
/// `needs` is the displayed prerequisite list; the authoritative dependency
/// check is hardcoded per kind in [`crate::dependency`].
#[derive(Debug, Clone, Copy, Serialize)]
pub struct BuildingDef {
    pub kind: BuildingKind,
    pub name: &'static str,
    pub cost: i64,
    pub income: i64,
    pub pollution: i64,
    pub radius: f64,
    pub unlock_level: u32,
    pub needs: &'static [Requirement],
}

static DEFS: [BuildingDef; 13] = [
    BuildingDef {
        kind: BuildingKind::Road,
        name: "Road",
        cost: 10,
        income: 0,
        pollution: 0,
        radius: 0.0,
        unlock_level: 1,
        needs: &[],
    },
    BuildingDef {
        kind: BuildingKind::Residential,
        name: "House",
        cost: 50,
        income: 8,
        pollution: 0,
        radius: 0.0,
        unlock_level: 1,
        needs: &[Requirement::RoadAccess, Requirement::Water, Requirement::Power],
    },
    BuildingDef {
        kind: BuildingKind::WaterPlant,
        name: "Water Plant",
        cost: 100,
        income: 0,
        pollution: 5,
        radius: 3.0,
        unlock_level: 1,
        needs: &[Requirement::RoadAccess],
    },
    BuildingDef {
        kind: BuildingKind::Factory,
        name: "Factory",
        cost: 150,
        income: 30,
        pollution: 40,
        radius: 2.0,
        unlock_level: 2,
        needs: &[Requirement::RoadAccess, Requirement::Water],
    },
    BuildingDef {
        kind: BuildingKind::SolarPlant,
        name: "Solar Plant",
        cost: 200,
        income: 0,
        pollution: 0,
        radius: 3.0,
        unlock_level: 1,
        needs: &[Requirement::RoadAccess],
    },
    BuildingDef {
        kind: BuildingKind::Park,
        name: "Park",
        cost: 80,
        income: 0,
        pollution: -15,
        radius: 2.0,
        unlock_level: 4,
        needs: &[Requirement::RoadAccess],
    },
    BuildingDef {
        kind: BuildingKind::Hospital,
        name: "Hospital",
        cost: 250,
        income: 0,
        pollution: 0,
        radius: 3.0,
        unlock_level: 5,
        needs: &[Requirement::RoadAccess, Requirement::Power],
    },
    BuildingDef {
        kind: BuildingKind::School,
        name: "School",
        cost: 200,
        income: 0,
        pollution: 0,
        radius: 3.0,
        unlock_level: 6,
        needs: &[Requirement::RoadAccess, Requirement::Power],
    },
    BuildingDef {
        kind: BuildingKind::WindTurbine,
        name: "Wind Turbine",
        cost: 180,
        income: 5,
        pollution: -5,
        radius: 3.0,
        unlock_level: 7,
        needs: &[Requirement::RoadAccess],
    },
    BuildingDef {
        kind: BuildingKind::Recycling,
        name: "Recycling",
        cost: 160,
        income: 0,
        pollution: -20,
        radius: 2.0,
        unlock_level: 8,
        needs: &[Requirement::RoadAccess],
    },
    BuildingDef {
        kind: BuildingKind::Transit,
        name: "Transit Hub",
        cost: 220,
        income: 10,
        pollution: -10,
        radius: 4.0,
        unlock_level: 9,
        needs: &[Requirement::RoadAccess],
    },
    BuildingDef {
        kind: BuildingKind::GreenTower,
        name: "Green Tower",
        cost: 300,
        income: 15,
        pollution: 0,
        radius: 0.0,
        unlock_level: 9,
        needs: &[Requirement::RoadAccess, Requirement::Water, Requirement::Power],
    },
    BuildingDef {
        kind: BuildingKind::EcoDome,
        name: "Eco Dome",
        cost: 500,
        income: 0,
        pollution: -30,
        radius: 4.0,
        unlock_level: 10,
        needs: &[Requirement::RoadAccess, Requirement::Power],
    },
];

/// Catalog lookup. Total over the closed kind set.
pub fn def(kind: BuildingKind) -> &'static BuildingDef {
    &DEFS[kind as usize]
}

/// Experience required to reach each level, indexed by level - 1.
pub const LEVEL_XP: [i64; 10] = [0, 100, 250, 450, 700, 1050, 1480, 2000, 2660, 3500];

pub const MAX_LEVEL: u32 = 10;

/// Highest level whose threshold the experience total meets or exceeds.
pub fn level_for_xp(xp: i64) -> u32 {
    for level in (1..=MAX_LEVEL).rev() {
        if xp >= LEVEL_XP[(level - 1) as usize] {
            return level;
        }
    }
    1
}

/// Threshold for the next level, if any.
pub fn next_level_xp(level: u32) -> Option<i64> {
    if level >= MAX_LEVEL {
        None
    } else {
        Some(LEVEL_XP[level as usize])
    }
}
