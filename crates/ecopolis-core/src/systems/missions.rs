//! Mission system - one-shot goals checked every day.

use ecopolis_logic::missions::MissionGoal;

use crate::notify::Outbox;
use crate::state::{CityState, ResourceKind};

/// Check every open mission; complete and pay those whose goal now holds.
/// Returns the goals completed today.
pub fn check_missions(state: &mut CityState, outbox: &mut Outbox) -> Vec<MissionGoal> {
    let metrics = state.metrics();
    let day = state.day;

    let mut completed = Vec::new();
    for mission in state.missions.iter_mut().filter(|m| !m.done) {
        if mission.goal.is_met(&metrics) {
            mission.done = true;
            mission.completed_on = Some(day);
            completed.push(mission.goal);
        }
    }

    for goal in &completed {
        state.update_resource(ResourceKind::Money, goal.reward() as f64);
        outbox.info(format!(
            "🎉 Mission completed: {}! Reward: ${}",
            goal.text(),
            goal.reward()
        ));
        log::info!("Day {}: mission {} completed (+${})", day, goal.id(), goal.reward());
    }
    completed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::Mission;
    use ecopolis_logic::buildings::BuildingType;
    use ecopolis_logic::config::GameConfig;

    fn state() -> CityState {
        let mut state = CityState::new(&GameConfig::default());
        state.missions = Mission::all();
        state
    }

    #[test]
    fn test_clean_air_pays_once() {
        let mut s = state();
        let mut outbox = Outbox::new();
        // Starting pollution 10 is already clean
        let done = check_missions(&mut s, &mut outbox);
        assert_eq!(done, vec![MissionGoal::CleanAir]);
        assert_eq!(s.money, 13_000.0);
        assert_eq!(s.missions[0].completed_on, Some(1));

        s.pollution = 50.0;
        s.day = 2;
        assert!(check_missions(&mut s, &mut outbox).is_empty());
        s.pollution = 5.0;
        assert!(check_missions(&mut s, &mut outbox).is_empty());
        assert_eq!(s.money, 13_000.0);
        assert!(s.missions[0].done);
    }

    #[test]
    fn test_several_missions_same_day() {
        let mut s = state();
        let mut outbox = Outbox::new();
        s.pollution = 50.0;
        s.happiness = 80.0;
        s.add_building(BuildingType::Factory, 0, 0);
        let done = check_missions(&mut s, &mut outbox);
        assert_eq!(done, vec![MissionGoal::HappyCity, MissionGoal::FirstIndustry]);
        assert_eq!(s.money, 10_000.0 + 2500.0 + 4000.0);
        assert_eq!(s.missions_done(), 2);
        assert_eq!(outbox.len(), 2);
    }

    #[test]
    fn test_empty_city_is_not_employed() {
        let mut s = state();
        let mut outbox = Outbox::new();
        s.pollution = 50.0;
        s.population = 0.0;
        s.jobs_filled = 0.0;
        assert!(check_missions(&mut s, &mut outbox).is_empty());
    }
}
