//! Read model handed to the presentation layer after every tick or command.
//!
//! A [`CityView`] is a plain, serializable copy of everything a UI draws:
//! resource bars, the grid, event cards with progress, the mission list and
//! which buttons are enabled. Building one never mutates the engine.

use ecopolis_logic::buildings::{upgrade_cost, BuildingType};
use ecopolis_logic::calendar::{day_of_week_label, days_until_tax, EnvironmentStatus};
use ecopolis_logic::config::GameConfig;
use ecopolis_logic::events::RequirementProgress;
use ecopolis_logic::scoring::employment_rate;
use serde::Serialize;

use crate::state::{BuildingId, CityState, EventId, Phase};
use crate::systems::{campaign_available, event_progress, Ending};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BuildingView {
    pub id: BuildingId,
    pub building_type: BuildingType,
    pub name: &'static str,
    pub icon: &'static str,
    pub col: u32,
    pub row: u32,
    pub level: u32,
    /// Cost of the next level.
    pub upgrade_cost: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventView {
    pub id: EventId,
    pub template_id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub days_left: i32,
    pub progress: RequirementProgress,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MissionView {
    pub id: u32,
    pub text: &'static str,
    pub reward: u64,
    pub done: bool,
    pub progress: Option<String>,
}

/// Whether the player can pay for a building type right now.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BuildOption {
    pub building_type: BuildingType,
    pub cost: u64,
    pub can_afford: bool,
}

/// Serializable snapshot of a city.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CityView {
    pub day: u32,
    pub week: u32,
    pub day_label: &'static str,
    pub days_until_tax: u32,

    pub money: f64,
    pub population: f64,
    pub energy: f64,
    pub happiness: f64,
    pub pollution: f64,
    pub recycling: f64,
    pub environment: EnvironmentStatus,

    pub energy_production: f64,
    pub energy_consumption: f64,
    pub housing_capacity: f64,
    /// Percent of housing in use.
    pub housing_rate: f64,
    pub jobs_available: f64,
    pub jobs_filled: f64,
    pub unemployed: f64,
    /// Percent of residents employed.
    pub employment_rate: f64,
    pub migrants: f64,

    pub phase: Phase,
    pub running: bool,
    pub paused: bool,
    pub game_over: bool,
    pub ending: Option<Ending>,
    pub score: u32,

    pub campaign_cooldown: u32,
    pub campaign_available: bool,
    pub events_this_week: u32,
    pub max_events_per_week: u32,

    pub buildings: Vec<BuildingView>,
    pub events: Vec<EventView>,
    pub missions: Vec<MissionView>,
    pub build_options: Vec<BuildOption>,
    pub selected_building: Option<BuildingId>,
}

impl CityView {
    pub fn capture(state: &CityState, config: &GameConfig) -> Self {
        let metrics = state.metrics();

        let buildings = state
            .buildings
            .iter()
            .map(|b| BuildingView {
                id: b.id,
                building_type: b.building_type,
                name: b.building_type.name(),
                icon: b.building_type.icon(),
                col: b.col,
                row: b.row,
                level: b.level,
                upgrade_cost: upgrade_cost(
                    config.cost(b.building_type),
                    config.upgrade_factor,
                    b.level,
                ),
            })
            .collect();

        let events = state
            .active_events
            .iter()
            .map(|e| EventView {
                id: e.id,
                template_id: e.template_id,
                title: e.title,
                description: e.description,
                days_left: e.days_left,
                progress: event_progress(state, e),
            })
            .collect();

        let missions = state
            .missions
            .iter()
            .map(|m| MissionView {
                id: m.goal.id(),
                text: m.goal.text(),
                reward: m.goal.reward(),
                done: m.done,
                progress: m.goal.progress_text(&metrics),
            })
            .collect();

        let build_options = BuildingType::ALL
            .iter()
            .map(|&t| BuildOption {
                building_type: t,
                cost: config.cost(t),
                can_afford: state.money >= config.cost(t) as f64,
            })
            .collect();

        let housing_rate = if state.housing_capacity > 0.0 {
            state.population / state.housing_capacity * 100.0
        } else {
            0.0
        };

        Self {
            day: state.day,
            week: state.week,
            day_label: day_of_week_label(state.day),
            days_until_tax: days_until_tax(state.day, config.tax_interval_days),
            money: state.money,
            population: state.population,
            energy: state.energy,
            happiness: state.happiness,
            pollution: state.pollution,
            recycling: state.recycling,
            environment: EnvironmentStatus::from_pollution(state.pollution),
            energy_production: state.energy_production,
            energy_consumption: state.energy_consumption,
            housing_capacity: state.housing_capacity,
            housing_rate,
            jobs_available: state.jobs_available,
            jobs_filled: state.jobs_filled,
            unemployed: state.unemployed,
            employment_rate: employment_rate(state.jobs_filled, state.population) * 100.0,
            migrants: state.migrants,
            phase: state.phase,
            running: state.is_running(),
            paused: state.is_paused(),
            game_over: state.is_over(),
            ending: state.ending,
            score: state.score,
            campaign_cooldown: state.campaign_cooldown,
            campaign_available: campaign_available(state, config),
            events_this_week: state.events_this_week,
            max_events_per_week: config.max_events_per_week,
            buildings,
            events,
            missions,
            build_options,
            selected_building: state.selected_building,
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::Mission;
    use crate::systems::place_starting_buildings;

    fn city() -> (CityState, GameConfig) {
        let config = GameConfig::default();
        let mut state = CityState::new(&config);
        place_starting_buildings(&mut state, &config);
        state.missions = Mission::all();
        (state, config)
    }

    #[test]
    fn test_capture_lists_buildings_and_missions() {
        let (state, config) = city();
        let view = CityView::capture(&state, &config);
        assert_eq!(view.buildings.len(), 2);
        assert_eq!(view.buildings[0].name, BuildingType::House.name());
        assert_eq!(view.buildings[0].upgrade_cost, 1500);
        assert_eq!(view.missions.len(), 7);
        assert_eq!(view.missions[2].progress.as_deref(), Some("(0/3)"));
        assert_eq!(view.environment, EnvironmentStatus::Sustainable);
        assert_eq!(view.days_until_tax, 6);
    }

    #[test]
    fn test_affordability_flags() {
        let (mut state, config) = city();
        state.money = 2000.0;
        let view = CityView::capture(&state, &config);
        let affordable: Vec<BuildingType> = view
            .build_options
            .iter()
            .filter(|o| o.can_afford)
            .map(|o| o.building_type)
            .collect();
        assert_eq!(affordable, vec![BuildingType::House]);
        assert!(view.campaign_available);
    }

    #[test]
    fn test_json_has_expected_keys() {
        let (state, config) = city();
        let json = CityView::capture(&state, &config).to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["day"], 1);
        assert_eq!(value["phase"], "NotStarted");
        assert_eq!(value["buildings"][1]["building_type"], "solar");
        assert!(value["ending"].is_null());
    }
}
