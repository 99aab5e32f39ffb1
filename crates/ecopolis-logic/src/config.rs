//! Session configuration - every tunable of a game in one place.
//!
//! A [`GameConfig`] is fixed for the lifetime of a session. The defaults
//! reproduce the reference balance: a 100-day term on a 12×9 grid,
//! starting with $10,000, a single house and a solar plant.
//!
//! ```
//! use ecopolis_logic::config::{validate_config, GameConfig};
//!
//! let config = GameConfig::default();
//! assert!(validate_config(&config).is_empty());
//! assert_eq!(config.cost(ecopolis_logic::buildings::BuildingType::House), 1500);
//! ```

use serde::{Deserialize, Serialize};

use crate::buildings::BuildingType;

/// Per-building capacity and daily-effect contributions at level 1.
///
/// Housing, jobs and energy production are floored after scaling by the
/// level multiplier; energy draw and environmental effects are not.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CapacitySpec {
    /// Residents housed.
    pub housing: f64,
    /// Jobs offered.
    pub jobs: f64,
    /// Energy units produced.
    pub energy_production: f64,
    /// Energy units consumed.
    pub energy_draw: f64,
    /// Daily pollution delta (negative cleans).
    pub pollution: f64,
    /// Daily happiness delta.
    pub happiness: f64,
    /// Recycling contribution (applied at a tenth per day).
    pub recycling: f64,
}

/// Capacity table for all building types.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CapacityTable {
    pub house: CapacitySpec,
    pub factory: CapacitySpec,
    pub solar: CapacitySpec,
    pub park: CapacitySpec,
    pub recycle: CapacitySpec,
}

impl CapacityTable {
    pub fn get(&self, building_type: BuildingType) -> &CapacitySpec {
        match building_type {
            BuildingType::House => &self.house,
            BuildingType::Factory => &self.factory,
            BuildingType::Solar => &self.solar,
            BuildingType::Park => &self.park,
            BuildingType::Recycle => &self.recycle,
        }
    }
}

impl Default for CapacityTable {
    fn default() -> Self {
        Self {
            house: CapacitySpec {
                housing: 100.0,
                energy_draw: 2.0,
                ..Default::default()
            },
            factory: CapacitySpec {
                jobs: 50.0,
                energy_draw: 10.0,
                pollution: 5.0,
                happiness: -0.5,
                ..Default::default()
            },
            solar: CapacitySpec {
                energy_production: 30.0,
                ..Default::default()
            },
            park: CapacitySpec {
                energy_draw: 0.5,
                pollution: -3.0,
                happiness: 5.0,
                ..Default::default()
            },
            recycle: CapacitySpec {
                energy_draw: 3.0,
                pollution: -2.0,
                recycling: 10.0,
                ..Default::default()
            },
        }
    }
}

/// Construction cost per building type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildingCosts {
    pub house: u64,
    pub factory: u64,
    pub solar: u64,
    pub park: u64,
    pub recycle: u64,
}

impl Default for BuildingCosts {
    fn default() -> Self {
        Self {
            house: 1500,
            factory: 3000,
            solar: 4000,
            park: 2500,
            recycle: 3500,
        }
    }
}

/// Resource changes applied by an awareness campaign.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CampaignEffect {
    pub happiness: f64,
    pub pollution: f64,
    pub recycling: f64,
}

impl Default for CampaignEffect {
    fn default() -> Self {
        Self {
            happiness: 10.0,
            pollution: -3.0,
            recycling: 3.0,
        }
    }
}

/// A building present on day one, placed free of charge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StartingBuilding {
    pub building_type: BuildingType,
    pub col: u32,
    pub row: u32,
}

/// City resources at the start of a term.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StartingConditions {
    pub money: f64,
    pub population: f64,
    pub energy: f64,
    pub happiness: f64,
    pub pollution: f64,
    pub recycling: f64,
    pub buildings: Vec<StartingBuilding>,
}

impl Default for StartingConditions {
    fn default() -> Self {
        Self {
            money: 10_000.0,
            population: 100.0,
            energy: 100.0,
            happiness: 60.0,
            pollution: 10.0,
            recycling: 0.0,
            buildings: vec![
                StartingBuilding {
                    building_type: BuildingType::House,
                    col: 2,
                    row: 3,
                },
                StartingBuilding {
                    building_type: BuildingType::Solar,
                    col: 5,
                    row: 2,
                },
            ],
        }
    }
}

/// All tunables for one game session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Real-time milliseconds between simulated days.
    pub tick_interval_ms: u64,
    /// Length of the mayor's term in days.
    pub max_days: u32,
    pub grid_cols: u32,
    pub grid_rows: u32,
    pub costs: BuildingCosts,
    /// Geometric growth of upgrade cost per level.
    pub upgrade_factor: f64,
    pub capacities: CapacityTable,
    /// Cap on events spawned per seven-day window.
    pub max_events_per_week: u32,
    /// Daily spawn probability once an event is eligible.
    pub event_spawn_chance: f64,
    /// Events never spawn on or before this day.
    pub event_min_day: u32,
    /// Required gap (exclusive) between two spawns, in days.
    pub event_min_gap_days: u32,
    /// Penalty multiplier when an event runs out of time.
    pub expiry_penalty_factor: f64,
    pub campaign_cost: u64,
    pub campaign_cooldown_days: u32,
    pub campaign_effect: CampaignEffect,
    /// Taxes are collected on days divisible by this.
    pub tax_interval_days: u32,
    pub tax_rate: f64,
    /// Random cells tried before a build gives up.
    pub max_placement_attempts: u32,
    pub start: StartingConditions,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: 3000,
            max_days: 100,
            grid_cols: 12,
            grid_rows: 9,
            costs: BuildingCosts::default(),
            upgrade_factor: 1.8,
            capacities: CapacityTable::default(),
            max_events_per_week: 2,
            event_spawn_chance: 0.15,
            event_min_day: 3,
            event_min_gap_days: 2,
            expiry_penalty_factor: 1.5,
            campaign_cost: 1000,
            campaign_cooldown_days: 5,
            campaign_effect: CampaignEffect::default(),
            tax_interval_days: 7,
            tax_rate: 0.12,
            max_placement_attempts: 50,
            start: StartingConditions::default(),
        }
    }
}

impl GameConfig {
    /// Construction cost of a building type.
    pub fn cost(&self, building_type: BuildingType) -> u64 {
        match building_type {
            BuildingType::House => self.costs.house,
            BuildingType::Factory => self.costs.factory,
            BuildingType::Solar => self.costs.solar,
            BuildingType::Park => self.costs.park,
            BuildingType::Recycle => self.costs.recycle,
        }
    }

    /// Capacity contributions of a building type at level 1.
    pub fn capacity(&self, building_type: BuildingType) -> &CapacitySpec {
        self.capacities.get(building_type)
    }

    /// Total number of grid cells.
    pub fn cell_count(&self) -> u32 {
        self.grid_cols * self.grid_rows
    }
}

/// Configuration validation error.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Grid has no cells.
    EmptyGrid,
    /// Tick interval of zero would spin the driver.
    ZeroTickInterval,
    /// A term must last at least one day.
    ZeroMaxDays,
    /// Upgrades would get cheaper with level.
    UpgradeFactorBelowOne(f64),
    /// Probability outside [0, 1].
    InvalidSpawnChance(f64),
    /// Tax interval of zero.
    ZeroTaxInterval,
    /// Starting building outside the grid.
    StartingBuildingOutOfGrid { col: u32, row: u32 },
    /// Two starting buildings share a cell.
    StartingBuildingsOverlap { col: u32, row: u32 },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::EmptyGrid => write!(f, "grid must have at least one cell"),
            ConfigError::ZeroTickInterval => write!(f, "tick interval must be positive"),
            ConfigError::ZeroMaxDays => write!(f, "max days must be positive"),
            ConfigError::UpgradeFactorBelowOne(x) => {
                write!(f, "upgrade factor {} is below 1.0", x)
            }
            ConfigError::InvalidSpawnChance(p) => {
                write!(f, "event spawn chance {} is outside [0, 1]", p)
            }
            ConfigError::ZeroTaxInterval => write!(f, "tax interval must be positive"),
            ConfigError::StartingBuildingOutOfGrid { col, row } => {
                write!(f, "starting building at ({}, {}) is outside the grid", col, row)
            }
            ConfigError::StartingBuildingsOverlap { col, row } => {
                write!(f, "two starting buildings share cell ({}, {})", col, row)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Validate a game configuration, returning all errors found.
pub fn validate_config(config: &GameConfig) -> Vec<ConfigError> {
    let mut errors = Vec::new();

    if config.cell_count() == 0 {
        errors.push(ConfigError::EmptyGrid);
    }
    if config.tick_interval_ms == 0 {
        errors.push(ConfigError::ZeroTickInterval);
    }
    if config.max_days == 0 {
        errors.push(ConfigError::ZeroMaxDays);
    }
    if config.upgrade_factor < 1.0 {
        errors.push(ConfigError::UpgradeFactorBelowOne(config.upgrade_factor));
    }
    if !(0.0..=1.0).contains(&config.event_spawn_chance) {
        errors.push(ConfigError::InvalidSpawnChance(config.event_spawn_chance));
    }
    if config.tax_interval_days == 0 {
        errors.push(ConfigError::ZeroTaxInterval);
    }

    let mut seen: Vec<(u32, u32)> = Vec::new();
    for b in &config.start.buildings {
        if b.col >= config.grid_cols || b.row >= config.grid_rows {
            errors.push(ConfigError::StartingBuildingOutOfGrid {
                col: b.col,
                row: b.row,
            });
        }
        if seen.contains(&(b.col, b.row)) {
            errors.push(ConfigError::StartingBuildingsOverlap {
                col: b.col,
                row: b.row,
            });
        }
        seen.push((b.col, b.row));
    }

    errors
}
