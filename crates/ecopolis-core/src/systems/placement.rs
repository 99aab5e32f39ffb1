//! Placement system - constructing and upgrading buildings on the grid.

use ecopolis_logic::buildings::{upgrade_cost, BuildingType};
use ecopolis_logic::config::GameConfig;
use serde::Serialize;

use crate::error::CommandError;
use crate::notify::Outbox;
use crate::rng::RandomSource;
use crate::state::{BuildingId, CityState, ResourceKind};
use crate::systems::economy::process_migrants;

/// Price of taking one building to its next level. Obtained first, then
/// handed back to confirm the upgrade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct UpgradeQuote {
    pub building_id: BuildingId,
    pub building_type: BuildingType,
    pub from_level: u32,
    pub cost: u64,
}

impl UpgradeQuote {
    pub fn to_level(&self) -> u32 {
        self.from_level + 1
    }
}

fn ensure_funds(state: &CityState, cost: u64) -> Result<(), CommandError> {
    if state.money < cost as f64 {
        return Err(CommandError::InsufficientFunds {
            needed: cost,
            available: state.money,
        });
    }
    Ok(())
}

/// Pick a random free cell, trying at most `max_attempts` times.
/// Draws two numbers (column, then row) per attempt. An empty grid has no
/// cell to offer and draws nothing.
pub fn find_free_cell(
    state: &CityState,
    config: &GameConfig,
    rng: &mut dyn RandomSource,
) -> Option<(u32, u32)> {
    if config.cell_count() == 0 {
        return None;
    }
    for _ in 0..config.max_placement_attempts {
        let col = rng.below(config.grid_cols);
        let row = rng.below(config.grid_rows);
        if !state.is_occupied(col, row) {
            return Some((col, row));
        }
    }
    None
}

/// Construct a building of `building_type` on a random free cell.
///
/// Charges the construction cost, bumps the construction counter and, for
/// houses, immediately moves waiting migrants in.
pub fn build(
    state: &mut CityState,
    config: &GameConfig,
    building_type: BuildingType,
    rng: &mut dyn RandomSource,
    outbox: &mut Outbox,
) -> Result<BuildingId, CommandError> {
    let cost = config.cost(building_type);
    ensure_funds(state, cost)?;

    let (col, row) =
        find_free_cell(state, config, rng).ok_or(CommandError::NoFreeCell { building_type })?;

    let id = state.add_building(building_type, col, row);
    state.update_resource(ResourceKind::Money, -(cost as f64));
    state.construction_counters.bump(building_type);
    outbox.info(format!("{} built!", building_type.name()));
    log::info!(
        "Day {}: built {} {} at ({}, {}) for ${}",
        state.day,
        building_type.key(),
        id,
        col,
        row,
        cost
    );

    // Housing capacity is only recomputed at the next tick, so this
    // only helps when the current capacity still has room
    if building_type == BuildingType::House && state.migrants > 0.0 {
        process_migrants(state, outbox);
    }

    Ok(id)
}

/// Place the configured starting buildings free of charge.
pub fn place_starting_buildings(state: &mut CityState, config: &GameConfig) {
    for b in &config.start.buildings {
        if !state.is_occupied(b.col, b.row) {
            state.add_building(b.building_type, b.col, b.row);
        }
    }
}

/// Quote the next upgrade of building `id`.
pub fn quote_upgrade(
    state: &CityState,
    config: &GameConfig,
    id: BuildingId,
) -> Result<UpgradeQuote, CommandError> {
    let building = state.building(id).ok_or(CommandError::UnknownBuilding(id))?;
    let cost = upgrade_cost(
        config.cost(building.building_type),
        config.upgrade_factor,
        building.level,
    );
    Ok(UpgradeQuote {
        building_id: id,
        building_type: building.building_type,
        from_level: building.level,
        cost,
    })
}

/// Apply a previously quoted upgrade. Returns the new level.
pub fn confirm_upgrade(
    state: &mut CityState,
    quote: &UpgradeQuote,
    outbox: &mut Outbox,
) -> Result<u32, CommandError> {
    let building = state
        .building(quote.building_id)
        .ok_or(CommandError::UnknownBuilding(quote.building_id))?;
    if building.level != quote.from_level {
        return Err(CommandError::StaleQuote(quote.building_id));
    }
    ensure_funds(state, quote.cost)?;

    state.update_resource(ResourceKind::Money, -(quote.cost as f64));
    let day = state.day;
    let building = state
        .building_mut(quote.building_id)
        .ok_or(CommandError::UnknownBuilding(quote.building_id))?;
    building.level += 1;
    let level = building.level;

    outbox.info(format!(
        "{} upgraded to level {}!",
        quote.building_type.name(),
        level
    ));
    log::info!(
        "Day {}: upgraded {} to level {} for ${}",
        day,
        quote.building_id,
        level,
        quote.cost
    );
    Ok(level)
}
