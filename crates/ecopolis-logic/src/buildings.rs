//! Building types and per-building formulas.
//!
//! Buildings are the only thing the mayor constructs. Every type contributes
//! to capacities (housing, jobs, energy) and to daily environmental effects,
//! scaled by its level through [`level_multiplier`].

use serde::{Deserialize, Serialize};

/// Kind of building that can be placed on the city grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BuildingType {
    /// Residential block: adds housing, draws a little energy.
    House,
    /// Industry: adds jobs, pollutes, draws the most energy.
    Factory,
    /// Solar plant: the only energy producer.
    Solar,
    /// Park: lowers pollution, raises happiness.
    Park,
    /// Recycling centre: lowers pollution, raises recycling.
    Recycle,
}

impl BuildingType {
    /// Every building type, in menu order.
    pub const ALL: [BuildingType; 5] = [
        BuildingType::House,
        BuildingType::Factory,
        BuildingType::Solar,
        BuildingType::Park,
        BuildingType::Recycle,
    ];

    /// Display name.
    pub fn name(&self) -> &'static str {
        match self {
            BuildingType::House => "Residential",
            BuildingType::Factory => "Industry",
            BuildingType::Solar => "Solar Plant",
            BuildingType::Park => "Park",
            BuildingType::Recycle => "Recycling Centre",
        }
    }

    /// Icon shown by the presentation layer.
    pub fn icon(&self) -> &'static str {
        match self {
            BuildingType::House => "🏠",
            BuildingType::Factory => "🏭",
            BuildingType::Solar => "☀️",
            BuildingType::Park => "🌳",
            BuildingType::Recycle => "♻️",
        }
    }

    /// Stable lowercase identifier (matches the serde name).
    pub fn key(&self) -> &'static str {
        match self {
            BuildingType::House => "house",
            BuildingType::Factory => "factory",
            BuildingType::Solar => "solar",
            BuildingType::Park => "park",
            BuildingType::Recycle => "recycle",
        }
    }

    /// Parse a lowercase identifier such as `"solar"`.
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.key() == key)
    }

    /// Position of this type in [`BuildingType::ALL`].
    pub fn index(&self) -> usize {
        *self as usize
    }
}

/// Capacity and effect scale for a building at `level` (level 1 = 1.0).
///
/// Each level above the first adds half of the base contribution.
pub fn level_multiplier(level: u32) -> f64 {
    1.0 + (level.max(1) - 1) as f64 * 0.5
}

/// Cost of upgrading a building from `level` to `level + 1`.
///
/// `base_cost * factor^(level - 1)`, rounded down. There is no level cap.
pub fn upgrade_cost(base_cost: u64, factor: f64, level: u32) -> u64 {
    let exponent = level.max(1) - 1;
    (base_cost as f64 * factor.powi(exponent as i32)).floor() as u64
}

/// Per-type counters indexed by [`BuildingType::index`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeCounts(pub [u32; 5]);

impl TypeCounts {
    /// Count for one type.
    pub fn get(&self, building_type: BuildingType) -> u32 {
        self.0[building_type.index()]
    }

    /// Increment the count for one type.
    pub fn bump(&mut self, building_type: BuildingType) {
        self.0[building_type.index()] += 1;
    }

    /// Count buildings by type.
    pub fn tally(types: impl IntoIterator<Item = BuildingType>) -> Self {
        let mut counts = Self::default();
        for t in types {
            counts.bump(t);
        }
        counts
    }

    /// Sum over all types.
    pub fn total(&self) -> u32 {
        self.0.iter().sum()
    }
}
