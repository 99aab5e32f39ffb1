//! Pure economy logic - capacities, energy balance, tax, migration,
//! building effects and population growth.
//!
//! Each function here is one stage of the daily recalculation with the
//! state passed in explicitly. The engine applies the results; nothing in
//! this module mutates anything or draws random numbers.

use crate::buildings::{level_multiplier, BuildingType};
use crate::config::GameConfig;

/// Share of residents that look for work.
pub const WORKFORCE_SHARE: f64 = 0.5;

/// Income per filled job per day.
pub const INCOME_PER_JOB: f64 = 0.5;

/// Happiness lost per waiting migrant per day.
pub const MIGRANT_CROWDING_PENALTY: f64 = 0.02;

/// Residents per point of daily pollution.
pub const RESIDENTS_PER_POLLUTION_POINT: f64 = 2000.0;

/// Unemployment above this starts hurting happiness.
pub const UNEMPLOYMENT_TOLERANCE: f64 = 10.0;

/// Happiness lost per unemployed resident once over tolerance.
pub const UNEMPLOYMENT_PENALTY: f64 = 0.02;

/// Recycling contributions are applied at this rate per day.
pub const RECYCLING_DAILY_RATE: f64 = 0.1;

/// Population never falls below this floor.
pub const MIN_POPULATION: f64 = 10.0;

/// Aggregate capacities of the current building stock.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Capacities {
    pub housing: f64,
    pub jobs: f64,
    pub energy_production: f64,
    pub energy_consumption: f64,
}

/// Sum capacity contributions over `(type, level)` pairs.
pub fn compute_capacities(
    buildings: impl IntoIterator<Item = (BuildingType, u32)>,
    config: &GameConfig,
) -> Capacities {
    let mut caps = Capacities::default();
    for (building_type, level) in buildings {
        let mult = level_multiplier(level);
        let spec = config.capacity(building_type);
        caps.housing += (spec.housing * mult).floor();
        caps.jobs += (spec.jobs * mult).floor();
        caps.energy_production += (spec.energy_production * mult).floor();
        caps.energy_consumption += spec.energy_draw * mult;
    }
    caps
}

/// Employment split for a population: `(jobs_filled, unemployed)`.
pub fn employment(population: f64, jobs_available: f64) -> (f64, f64) {
    let workforce = population * WORKFORCE_SHARE;
    let filled = workforce.min(jobs_available);
    let unemployed = (workforce - filled).max(0.0);
    (filled, unemployed)
}

/// Energy level (0–100) from the production/consumption balance.
///
/// Surplus is expressed relative to consumption, so a city that produces
/// twice what it uses sits at 100.
pub fn energy_level(production: f64, consumption: f64) -> f64 {
    let net = production - consumption;
    (net / consumption.max(1.0) * 100.0).clamp(0.0, 100.0)
}

/// Whether `day` is a tax day.
pub fn is_tax_day(day: u32, interval: u32) -> bool {
    interval > 0 && day > 0 && day % interval == 0
}

/// Weekly tax on the current population, rounded down.
pub fn tax_amount(population: f64, rate: f64) -> u64 {
    (population * rate).floor().max(0.0) as u64
}

/// Daily probability that a group of migrants shows up.
pub fn migrant_chance(happiness: f64, jobs_available: f64, jobs_filled: f64) -> f64 {
    let base = if happiness > 70.0 {
        0.3
    } else if happiness > 50.0 {
        0.15
    } else if happiness > 30.0 {
        0.05
    } else {
        0.0
    };
    let job_pull = if jobs_available > jobs_filled { 0.2 } else { 0.0 };
    base + job_pull
}

/// Group size range `(min, span)` for arriving migrants: the group size is
/// `min + floor(roll * span)`.
pub fn migrant_group_range(happiness: f64) -> (u32, u32) {
    if happiness > 80.0 {
        (20, 30)
    } else if happiness > 60.0 {
        (10, 20)
    } else {
        (5, 10)
    }
}

/// Migrant group size for a uniform roll in [0, 1).
pub fn migrant_group_size(happiness: f64, roll: f64) -> u32 {
    let (min, span) = migrant_group_range(happiness);
    min + (roll * span as f64).floor() as u32
}

/// How many waiting migrants fit into free housing.
pub fn migrants_to_house(migrants: f64, population: f64, housing: f64) -> f64 {
    if migrants <= 0.0 || population >= housing {
        return 0.0;
    }
    migrants.min(housing - population)
}

/// Inputs to the daily environmental effects stage.
#[derive(Debug, Clone, Copy, Default)]
pub struct EffectInputs {
    pub migrants: f64,
    pub population: f64,
    pub unemployed: f64,
    pub recycling: f64,
    pub jobs_filled: f64,
}

/// Resource deltas produced by one day of building effects.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct EffectDeltas {
    pub pollution: f64,
    pub happiness: f64,
    pub recycling: f64,
    pub income: f64,
}

/// Daily pollution, happiness, recycling and income deltas.
pub fn compute_effects(
    buildings: impl IntoIterator<Item = (BuildingType, u32)>,
    inputs: &EffectInputs,
    config: &GameConfig,
) -> EffectDeltas {
    let mut pollution = 0.0;
    let mut happiness = 0.0;
    let mut recycling = 0.0;

    for (building_type, level) in buildings {
        let mult = level_multiplier(level);
        let spec = config.capacity(building_type);
        pollution += spec.pollution * mult;
        happiness += spec.happiness * mult;
        recycling += spec.recycling * mult;
    }

    happiness -= inputs.migrants * MIGRANT_CROWDING_PENALTY;
    pollution += inputs.population / RESIDENTS_PER_POLLUTION_POINT;
    if inputs.unemployed > UNEMPLOYMENT_TOLERANCE {
        happiness -= inputs.unemployed * UNEMPLOYMENT_PENALTY;
    }

    // Recycling dampens every source of pollution, cleaning included
    pollution *= 1.0 - inputs.recycling / 200.0;

    EffectDeltas {
        pollution,
        happiness,
        recycling: recycling * RECYCLING_DAILY_RATE,
        income: inputs.jobs_filled * INCOME_PER_JOB,
    }
}

/// Daily natural growth in percent.
pub fn growth_rate(happiness: f64, pollution: f64, energy: f64) -> f64 {
    let mut growth = if happiness > 70.0 {
        0.1
    } else if happiness > 50.0 {
        0.05
    } else if happiness > 30.0 {
        0.01
    } else if happiness <= 10.0 {
        -0.05
    } else {
        0.0
    };

    if pollution > 60.0 {
        growth -= 0.03;
    } else if pollution > 40.0 {
        growth -= 0.01;
    }

    if energy < 30.0 {
        growth -= 0.02;
    }

    growth
}

/// Population after one day of natural growth, bounded by housing and
/// [`MIN_POPULATION`]. The floor wins when housing is below it.
pub fn next_population(population: f64, growth_percent: f64, housing: f64) -> f64 {
    let grown = (population * (1.0 + growth_percent / 100.0)).floor();
    grown.min(housing).max(MIN_POPULATION)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_default_layout_capacities() {
        let config = GameConfig::default();
        let caps = compute_capacities(
            [(BuildingType::House, 1), (BuildingType::Solar, 1)],
            &config,
        );
        assert_eq!(caps.housing, 100.0);
        assert_eq!(caps.jobs, 0.0);
        assert_eq!(caps.energy_production, 30.0);
        assert_eq!(caps.energy_consumption, 2.0);
    }

    #[test]
    fn test_levels_scale_capacities() {
        let config = GameConfig::default();
        let caps = compute_capacities(
            [(BuildingType::House, 2), (BuildingType::Factory, 3)],
            &config,
        );
        assert_eq!(caps.housing, 150.0);
        assert_eq!(caps.jobs, 100.0);
        assert!(approx(caps.energy_consumption, 2.0 * 1.5 + 10.0 * 2.0));
    }

    #[test]
    fn test_employment_split() {
        assert_eq!(employment(200.0, 50.0), (50.0, 50.0));
        assert_eq!(employment(200.0, 500.0), (100.0, 0.0));
        assert_eq!(employment(0.0, 50.0), (0.0, 0.0));
    }

    #[test]
    fn test_energy_level() {
        assert_eq!(energy_level(30.0, 2.0), 100.0);
        assert_eq!(energy_level(0.0, 10.0), 0.0);
        assert!(approx(energy_level(15.0, 10.0), 50.0));
        // No consumers: divide by one, not zero
        assert_eq!(energy_level(0.0, 0.0), 0.0);
    }

    #[test]
    fn test_tax_schedule() {
        assert!(is_tax_day(7, 7));
        assert!(is_tax_day(14, 7));
        assert!(!is_tax_day(0, 7));
        assert!(!is_tax_day(8, 7));
        assert_eq!(tax_amount(100.0, 0.12), 12);
        assert_eq!(tax_amount(8.0, 0.12), 0);
    }

    #[test]
    fn test_migrant_chance_tiers() {
        assert!(approx(migrant_chance(75.0, 0.0, 0.0), 0.3));
        assert!(approx(migrant_chance(60.0, 0.0, 0.0), 0.15));
        assert!(approx(migrant_chance(40.0, 0.0, 0.0), 0.05));
        assert!(approx(migrant_chance(20.0, 0.0, 0.0), 0.0));
        // Open jobs pull people in regardless of mood
        assert!(approx(migrant_chance(20.0, 50.0, 10.0), 0.2));
        assert!(approx(migrant_chance(75.0, 50.0, 10.0), 0.5));
    }

    #[test]
    fn test_migrant_group_size_bounds() {
        assert_eq!(migrant_group_size(90.0, 0.0), 20);
        assert_eq!(migrant_group_size(90.0, 0.9999), 49);
        assert_eq!(migrant_group_size(70.0, 0.0), 10);
        assert_eq!(migrant_group_size(70.0, 0.9999), 29);
        assert_eq!(migrant_group_size(40.0, 0.0), 5);
        assert_eq!(migrant_group_size(40.0, 0.9999), 14);
    }

    #[test]
    fn test_migrants_to_house() {
        assert_eq!(migrants_to_house(30.0, 90.0, 100.0), 10.0);
        assert_eq!(migrants_to_house(5.0, 90.0, 100.0), 5.0);
        assert_eq!(migrants_to_house(30.0, 100.0, 100.0), 0.0);
        assert_eq!(migrants_to_house(0.0, 50.0, 100.0), 0.0);
    }

    #[test]
    fn test_effects_factory_and_park() {
        let config = GameConfig::default();
        let inputs = EffectInputs::default();
        let fx = compute_effects(
            [(BuildingType::Factory, 1), (BuildingType::Park, 1)],
            &inputs,
            &config,
        );
        assert!(approx(fx.pollution, 2.0));
        assert!(approx(fx.happiness, 4.5));
        assert_eq!(fx.recycling, 0.0);
        assert_eq!(fx.income, 0.0);
    }

    #[test]
    fn test_effects_penalties_and_recycling_damping() {
        let config = GameConfig::default();
        let inputs = EffectInputs {
            migrants: 50.0,
            population: 1000.0,
            unemployed: 20.0,
            recycling: 50.0,
            jobs_filled: 40.0,
        };
        let fx = compute_effects([(BuildingType::Recycle, 1)], &inputs, &config);
        // (-2 + 0.5) * (1 - 0.25)
        assert!(approx(fx.pollution, -1.125));
        // -(50 * 0.02) - (20 * 0.02)
        assert!(approx(fx.happiness, -1.4));
        assert!(approx(fx.recycling, 1.0));
        assert!(approx(fx.income, 20.0));
    }

    #[test]
    fn test_unemployment_tolerance() {
        let config = GameConfig::default();
        let inputs = EffectInputs {
            unemployed: 10.0,
            ..Default::default()
        };
        let fx = compute_effects(std::iter::empty(), &inputs, &config);
        assert_eq!(fx.happiness, 0.0);
    }

    #[test]
    fn test_growth_rate_tiers() {
        assert!(approx(growth_rate(80.0, 10.0, 100.0), 0.1));
        assert!(approx(growth_rate(60.0, 10.0, 100.0), 0.05));
        assert!(approx(growth_rate(40.0, 10.0, 100.0), 0.01));
        assert!(approx(growth_rate(20.0, 10.0, 100.0), 0.0));
        assert!(approx(growth_rate(5.0, 10.0, 100.0), -0.05));
        assert!(approx(growth_rate(80.0, 70.0, 20.0), 0.05));
        assert!(approx(growth_rate(80.0, 50.0, 100.0), 0.09));
    }

    #[test]
    fn test_next_population_bounds() {
        assert_eq!(next_population(1234.0, 0.1, 5000.0), 1235.0);
        assert_eq!(next_population(1000.0, 0.1, 900.0), 900.0);
        assert_eq!(next_population(100.0, 0.05, 1000.0), 100.0);
        assert_eq!(next_population(5.0, 0.0, 0.0), MIN_POPULATION);
    }
}
