//! Economy system - the daily resource recalculation.
//!
//! Six stages run in a fixed order, each reading what the previous one
//! wrote: capacities → tax → migrant arrivals → migrant housing →
//! building effects → natural growth.

use ecopolis_logic::config::GameConfig;
use ecopolis_logic::economy::{
    compute_capacities, compute_effects, employment, energy_level, growth_rate, is_tax_day,
    migrant_chance, migrant_group_size, migrants_to_house, next_population, tax_amount,
    EffectInputs,
};
use serde::Serialize;

use crate::notify::Outbox;
use crate::rng::RandomSource;
use crate::state::{CityState, ResourceKind};

/// What the economy stages did on one day.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct EconomyReport {
    pub tax_collected: u64,
    pub migrants_arrived: u32,
    pub migrants_housed: f64,
    pub income: f64,
    pub population_change: f64,
}

/// Run all six stages for the current day.
pub fn economy_system(
    state: &mut CityState,
    config: &GameConfig,
    rng: &mut dyn RandomSource,
    outbox: &mut Outbox,
) -> EconomyReport {
    let population_before = state.population;

    calculate_capacities(state, config);
    let tax_collected = auto_collect_tax(state, config, outbox);
    let migrants_arrived = generate_migrants(state, rng, outbox);
    let migrants_housed = process_migrants(state, outbox);
    let income = calculate_building_effects(state, config);
    update_population(state);

    EconomyReport {
        tax_collected,
        migrants_arrived,
        migrants_housed,
        income,
        population_change: state.population - population_before,
    }
}

/// Recompute housing, jobs and energy from the building stock, then clamp
/// population to housing and split the workforce.
pub fn calculate_capacities(state: &mut CityState, config: &GameConfig) {
    let caps = compute_capacities(state.building_levels(), config);
    state.housing_capacity = caps.housing;
    state.jobs_available = caps.jobs;
    state.energy_production = caps.energy_production;
    state.energy_consumption = caps.energy_consumption;

    if state.population > state.housing_capacity {
        state.population = state.housing_capacity;
    }

    let (filled, unemployed) = employment(state.population, state.jobs_available);
    state.jobs_filled = filled;
    state.unemployed = unemployed;

    state.energy = energy_level(state.energy_production, state.energy_consumption);
}

/// Collect the weekly tax on tax days. Returns the amount collected.
pub fn auto_collect_tax(state: &mut CityState, config: &GameConfig, outbox: &mut Outbox) -> u64 {
    if !is_tax_day(state.day, config.tax_interval_days) {
        return 0;
    }
    let tax = tax_amount(state.population, config.tax_rate);
    if tax > 0 {
        state.update_resource(ResourceKind::Money, tax as f64);
        outbox.info(format!("💰 Taxes collected automatically: ${}", tax));
        log::info!("Day {}: collected ${} in taxes", state.day, tax);
    }
    tax
}

/// Roll for a group of newcomers. Always draws once; draws a second time
/// for the group size when a group arrives.
pub fn generate_migrants(
    state: &mut CityState,
    rng: &mut dyn RandomSource,
    outbox: &mut Outbox,
) -> u32 {
    let chance = migrant_chance(state.happiness, state.jobs_available, state.jobs_filled);
    if rng.next_f64() >= chance {
        return 0;
    }

    let count = migrant_group_size(state.happiness, rng.next_f64());
    state.migrants += count as f64;
    if count > 15 {
        outbox.info(format!(
            "👥 {} new migrants arrived in the city! Build houses to shelter them.",
            count
        ));
    }
    count
}

/// Move waiting migrants into free housing. Returns how many moved in.
pub fn process_migrants(state: &mut CityState, outbox: &mut Outbox) -> f64 {
    let moved = migrants_to_house(state.migrants, state.population, state.housing_capacity);
    if moved > 0.0 {
        state.population += moved;
        state.migrants -= moved;
        if moved > 10.0 {
            outbox.info(format!("🏠 {} migrants moved into new homes!", moved));
        }
    }
    moved
}

/// Apply a day of pollution, happiness and recycling changes plus factory
/// income. Returns the income.
pub fn calculate_building_effects(state: &mut CityState, config: &GameConfig) -> f64 {
    let inputs = EffectInputs {
        migrants: state.migrants,
        population: state.population,
        unemployed: state.unemployed,
        recycling: state.recycling,
        jobs_filled: state.jobs_filled,
    };
    let fx = compute_effects(state.building_levels(), &inputs, config);

    state.update_resource(ResourceKind::Pollution, fx.pollution);
    state.update_resource(ResourceKind::Happiness, fx.happiness);
    state.update_resource(ResourceKind::Recycling, fx.recycling);
    state.update_resource(ResourceKind::Money, fx.income);
    fx.income
}

/// Natural growth or decline, bounded by housing.
pub fn update_population(state: &mut CityState) {
    let growth = growth_rate(state.happiness, state.pollution, state.energy);
    state.population = next_population(state.population, growth, state.housing_capacity);
}
