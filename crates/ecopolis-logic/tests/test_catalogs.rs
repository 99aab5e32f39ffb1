//! Integration tests for the static catalogs and how they fit the
//! default configuration.
//!
//! Exercises: GameConfig → building costs/capacities → event templates
//! → mission goals → scoring
//!
//! All tests are pure logic: no engine, no randomness.

use ecopolis_logic::buildings::{upgrade_cost, BuildingType, TypeCounts};
use ecopolis_logic::config::{validate_config, GameConfig};
use ecopolis_logic::economy::{compute_capacities, compute_effects, energy_level, EffectInputs};
use ecopolis_logic::events::{
    requirement_progress, DeltaKey, RequirementKind, EVENT_TEMPLATES,
};
use ecopolis_logic::missions::{CityMetrics, MissionGoal};
use ecopolis_logic::scoring::{compute_score, ScoreInputs, ScoreRating};

// ── Event catalog ──────────────────────────────────────────────────────

#[test]
fn every_template_has_money_on_both_sides() {
    for t in &EVENT_TEMPLATES {
        assert!(t.reward_money() > 0.0, "{} has no money reward", t.id);
        assert!(t.penalty_money() > 0.0, "{} has no money penalty", t.id);
    }
}

#[test]
fn penalties_never_reward() {
    for t in &EVENT_TEMPLATES {
        for d in t.penalty {
            let hurts = match d.key {
                DeltaKey::Pollution => d.amount > 0.0,
                _ => d.amount < 0.0,
            };
            assert!(hurts, "{} penalty {:?} is a bonus", t.id, d);
        }
    }
}

#[test]
fn every_template_is_completable_on_an_empty_grid() {
    let config = GameConfig::default();
    let cells = config.cell_count();
    for t in &EVENT_TEMPLATES {
        assert!(t.requirement_count > 0);
        assert!(t.requirement_count <= cells);
        assert!(t.days_to_complete > 0);
    }
}

#[test]
fn only_population_boom_brings_migrants() {
    let with_migrants: Vec<&str> = EVENT_TEMPLATES
        .iter()
        .filter(|t| t.reward.iter().any(|d| d.key == DeltaKey::Migrants))
        .map(|t| t.id)
        .collect();
    assert_eq!(with_migrants, vec!["population_boom"]);
}

#[test]
fn pollution_complaint_accepts_parks_and_recycling() {
    let t = EVENT_TEMPLATES
        .iter()
        .find(|t| t.requirement == RequirementKind::RecycleOrPark)
        .expect("recycle/park template");
    let before = TypeCounts::tally([BuildingType::Park]);
    let after = TypeCounts::tally([BuildingType::Park, BuildingType::Recycle]);
    let progress = requirement_progress(
        t.requirement.count(&after),
        t.requirement.count(&before),
        t.requirement_count,
    );
    assert!(progress.met);
}

// ── Config coherence ───────────────────────────────────────────────────

#[test]
fn default_start_is_valid_and_powered() {
    let config = GameConfig::default();
    assert!(validate_config(&config).is_empty());

    let caps = compute_capacities(
        config
            .start
            .buildings
            .iter()
            .map(|b| (b.building_type, 1)),
        &config,
    );
    assert!(caps.housing >= config.start.population);
    assert_eq!(
        energy_level(caps.energy_production, caps.energy_consumption),
        100.0
    );
}

#[test]
fn first_upgrade_costs_the_same_as_building() {
    let config = GameConfig::default();
    for t in BuildingType::ALL {
        assert_eq!(upgrade_cost(config.cost(t), config.upgrade_factor, 1), config.cost(t));
        assert!(upgrade_cost(config.cost(t), config.upgrade_factor, 2) > config.cost(t));
    }
}

#[test]
fn green_buildings_clean_and_industry_pollutes() {
    let config = GameConfig::default();
    let inputs = EffectInputs::default();
    let dirty = compute_effects([(BuildingType::Factory, 1)], &inputs, &config);
    let clean = compute_effects(
        [(BuildingType::Park, 1), (BuildingType::Recycle, 1)],
        &inputs,
        &config,
    );
    assert!(dirty.pollution > 0.0);
    assert!(clean.pollution < 0.0);
    assert!(clean.recycling > 0.0);
}

// ── Missions and score ────────────────────────────────────────────────

#[test]
fn starting_city_meets_only_clean_air() {
    let config = GameConfig::default();
    let metrics = CityMetrics {
        population: config.start.population,
        happiness: config.start.happiness,
        pollution: config.start.pollution,
        recycling: config.start.recycling,
        jobs_filled: 0.0,
        counts: TypeCounts::tally(config.start.buildings.iter().map(|b| b.building_type)),
    };
    let met: Vec<MissionGoal> = MissionGoal::ALL
        .into_iter()
        .filter(|g| g.is_met(&metrics))
        .collect();
    assert_eq!(met, vec![MissionGoal::CleanAir]);
}

#[test]
fn perfect_city_rates_excellent_without_event_bonus() {
    let inputs = ScoreInputs {
        pollution: 0.0,
        happiness: 100.0,
        population: 1000.0,
        recycling: 100.0,
        jobs_filled: 1000.0,
        active_events: 0,
    };
    // Weights sum to 0.9 before the event bonus
    let score = compute_score(&inputs);
    assert!((89..=90).contains(&score), "score={score}");
    assert_eq!(ScoreRating::from_score(score), ScoreRating::Excellent);
}
