//! Events system - city events that ask the mayor to build something.
//!
//! An event is pending from the day it spawns until it is completed (the
//! requirement is met and the player claims the reward), ignored (the
//! player takes the penalty) or expired (time ran out; the penalty is
//! applied at a higher rate).

use ecopolis_logic::config::GameConfig;
use ecopolis_logic::events::{
    requirement_progress, template_for_roll, DeltaKey, RequirementProgress, ResourceDelta,
};
use serde::Serialize;

use crate::error::CommandError;
use crate::notify::{Outbox, EVENT_DURATION_MS};
use crate::rng::RandomSource;
use crate::state::{ActiveEvent, CityState, EventId, ResourceKind};

/// How the player resolved an event. Expiry is reported through
/// [`age_events`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EventResolution {
    Completed,
    Ignored,
}

/// Progress of an active event against its building requirement.
pub fn event_progress(state: &CityState, event: &ActiveEvent) -> RequirementProgress {
    let current = event.requirement.count(&state.building_counts());
    requirement_progress(current, event.start_count, event.requirement_count)
}

/// Apply reward or penalty deltas scaled by `factor`.
///
/// Migrant deltas go to the waiting pool; everything else is clamped like
/// any other resource write.
pub fn apply_deltas(state: &mut CityState, deltas: &[ResourceDelta], factor: f64) {
    for delta in deltas {
        let amount = delta.scaled(factor).amount;
        if amount == 0.0 {
            continue;
        }
        let kind = match delta.key {
            DeltaKey::Migrants => {
                state.migrants = (state.migrants + amount).max(0.0);
                continue;
            }
            DeltaKey::Money => ResourceKind::Money,
            DeltaKey::Energy => ResourceKind::Energy,
            DeltaKey::Happiness => ResourceKind::Happiness,
            DeltaKey::Pollution => ResourceKind::Pollution,
            DeltaKey::Recycling => ResourceKind::Recycling,
        };
        state.update_resource(kind, amount);
    }
}

/// Count down every active event; expire the ones that ran out of time.
/// Returns the ids of expired events.
pub fn age_events(state: &mut CityState, config: &GameConfig, outbox: &mut Outbox) -> Vec<EventId> {
    let mut expired = Vec::new();
    for event in &mut state.active_events {
        event.days_left -= 1;
    }

    let (done, alive): (Vec<ActiveEvent>, Vec<ActiveEvent>) = std::mem::take(&mut state.active_events)
        .into_iter()
        .partition(|e| e.days_left <= 0);
    state.active_events = alive;

    for event in done {
        apply_deltas(state, &event.penalty, config.expiry_penalty_factor);
        outbox.error(format!(
            "⏰ Event failed: {}. Increased penalty applied.",
            event.title
        ));
        log::info!("Day {}: event {} ({}) expired", state.day, event.id, event.template_id);
        expired.push(event.id);
    }
    expired
}

/// Maybe spawn a new event for today.
///
/// Eligible once the week's quota has room and the game is past its first
/// few days; then a spawn roll, then the minimum gap since the last event.
/// The weekly counter resets on the first day of each week.
pub fn try_generate_event(
    state: &mut CityState,
    config: &GameConfig,
    rng: &mut dyn RandomSource,
    outbox: &mut Outbox,
) -> Option<EventId> {
    let mut spawned = None;

    if state.events_this_week >= config.max_events_per_week {
        return None;
    }

    if state.day > config.event_min_day
        && rng.next_f64() < config.event_spawn_chance
        && state.day.saturating_sub(state.last_event_day) > config.event_min_gap_days
    {
        let id = spawn_event(state, rng.next_f64(), outbox);
        state.events_this_week += 1;
        state.last_event_day = state.day;
        spawned = Some(id);
    }

    if state.day % 7 == 1 {
        state.events_this_week = 0;
    }

    spawned
}

/// Create an event from the template picked by `roll`.
pub fn spawn_event(state: &mut CityState, roll: f64, outbox: &mut Outbox) -> EventId {
    let template = template_for_roll(roll);
    let start_count = template.requirement.count(&state.building_counts());
    let id = state.next_event_id();
    let event = ActiveEvent::from_template(id, template, start_count);

    outbox.push(
        format!(
            "{} {}\n{}\nTime: {} days",
            template.icon, template.title, template.description, event.days_left
        ),
        false,
        EVENT_DURATION_MS,
    );
    log::info!(
        "Day {}: event {} ({}) spawned, {} days to build {}",
        state.day,
        id,
        template.id,
        template.days_to_complete,
        template.requirement_count
    );

    state.active_events.push(event);
    id
}

fn take_event(state: &mut CityState, id: EventId) -> Result<ActiveEvent, CommandError> {
    let idx = state
        .active_events
        .iter()
        .position(|e| e.id == id)
        .ok_or(CommandError::UnknownEvent(id))?;
    Ok(state.active_events.remove(idx))
}

/// Claim an event's reward. Only allowed once its requirement is met.
pub fn complete_event(
    state: &mut CityState,
    id: EventId,
    outbox: &mut Outbox,
) -> Result<EventResolution, CommandError> {
    let event = state.event(id).ok_or(CommandError::UnknownEvent(id))?;
    if !event_progress(state, event).met {
        return Err(CommandError::RequirementNotMet(id));
    }

    let event = take_event(state, id)?;
    apply_deltas(state, &event.reward, 1.0);

    let migrants = ecopolis_logic::events::delta_amount(&event.reward, DeltaKey::Migrants);
    if migrants > 0.0 {
        outbox.info(format!("{} migrants arrived in the city!", migrants));
    }
    outbox.info(format!("✅ Event completed: {}! Reward received.", event.title));
    log::info!("Day {}: event {} completed", state.day, id);
    Ok(EventResolution::Completed)
}

/// Dismiss an event and take its penalty.
pub fn ignore_event(
    state: &mut CityState,
    id: EventId,
    outbox: &mut Outbox,
) -> Result<EventResolution, CommandError> {
    let event = take_event(state, id)?;
    apply_deltas(state, &event.penalty, 1.0);
    outbox.error(format!("❌ Event ignored: {}. Penalty applied.", event.title));
    log::info!("Day {}: event {} ignored", state.day, id);
    Ok(EventResolution::Ignored)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::ScriptedRng;
    use ecopolis_logic::buildings::BuildingType;
    use ecopolis_logic::events::template;

    fn setup() -> (CityState, GameConfig, Outbox) {
        let config = GameConfig::default();
        let mut state = CityState::new(&config);
        state.add_building(BuildingType::House, 2, 3);
        state.add_building(BuildingType::Solar, 5, 2);
        (state, config, Outbox::new())
    }

    fn push_event(state: &mut CityState, template_id: &str) -> EventId {
        let id = state.next_event_id();
        let t = template(template_id).unwrap();
        let start = t.requirement.count(&state.building_counts());
        state.active_events.push(ActiveEvent::from_template(id, t, start));
        id
    }

    #[test]
    fn test_no_spawn_in_first_days() {
        let (mut state, config, mut outbox) = setup();
        state.day = 3;
        let mut rng = ScriptedRng::constant(0.0);
        assert_eq!(try_generate_event(&mut state, &config, &mut rng, &mut outbox), None);
        assert_eq!(rng.draws(), 0);
    }

    #[test]
    fn test_spawn_when_eligible() {
        let (mut state, config, mut outbox) = setup();
        state.day = 4;
        // Spawn roll, then template roll (0.2 → no_park)
        let mut rng = ScriptedRng::new(vec![0.1, 0.2]);
        let id = try_generate_event(&mut state, &config, &mut rng, &mut outbox).unwrap();
        let event = state.event(id).unwrap();
        assert_eq!(event.template_id, "no_park");
        assert_eq!(event.days_left, 3);
        assert_eq!(event.start_count, 0);
        assert_eq!(state.events_this_week, 1);
        assert_eq!(state.last_event_day, 4);
        assert_eq!(outbox.drain()[0].duration_ms, EVENT_DURATION_MS);
    }

    #[test]
    fn test_spawn_respects_gap_and_weekly_cap() {
        let (mut state, config, mut outbox) = setup();
        let mut rng = ScriptedRng::constant(0.0);
        state.day = 5;
        state.last_event_day = 3;
        assert_eq!(try_generate_event(&mut state, &config, &mut rng, &mut outbox), None);

        state.day = 6;
        state.last_event_day = 3;
        state.events_this_week = 2;
        assert_eq!(try_generate_event(&mut state, &config, &mut rng, &mut outbox), None);
    }

    #[test]
    fn test_weekly_counter_resets_on_first_weekday() {
        let (mut state, config, mut outbox) = setup();
        let mut rng = ScriptedRng::constant(0.9);
        state.day = 8;
        state.events_this_week = 1;
        try_generate_event(&mut state, &config, &mut rng, &mut outbox);
        assert_eq!(state.events_this_week, 0);
    }

    #[test]
    fn test_start_count_snapshots_matching_buildings() {
        let (mut state, _, _) = setup();
        state.add_building(BuildingType::Park, 0, 0);
        state.add_building(BuildingType::Recycle, 1, 0);
        let id = push_event(&mut state, "pollution_complaint");
        assert_eq!(state.event(id).unwrap().start_count, 2);
    }

    #[test]
    fn test_complete_requires_new_building() {
        let (mut state, _, mut outbox) = setup();
        let id = push_event(&mut state, "no_park");
        assert_eq!(
            complete_event(&mut state, id, &mut outbox),
            Err(CommandError::RequirementNotMet(id))
        );

        state.add_building(BuildingType::Park, 0, 0);
        let money = state.money;
        assert_eq!(complete_event(&mut state, id, &mut outbox), Ok(EventResolution::Completed));
        assert_eq!(state.money, money + 300.0);
        assert_eq!(state.happiness, 75.0);
        assert!(state.active_events.is_empty());
    }

    #[test]
    fn test_completion_reward_adds_migrants() {
        let (mut state, _, mut outbox) = setup();
        let id = push_event(&mut state, "population_boom");
        for col in 0..3 {
            state.add_building(BuildingType::House, col, 0);
        }
        complete_event(&mut state, id, &mut outbox).unwrap();
        assert_eq!(state.migrants, 150.0);
        assert_eq!(state.population, 100.0);
    }

    #[test]
    fn test_ignore_applies_penalty_once() {
        let (mut state, _, mut outbox) = setup();
        let id = push_event(&mut state, "move_out");
        assert_eq!(ignore_event(&mut state, id, &mut outbox), Ok(EventResolution::Ignored));
        assert_eq!(state.money, 9000.0);
        assert_eq!(state.happiness, 45.0);
        assert_eq!(
            ignore_event(&mut state, id, &mut outbox),
            Err(CommandError::UnknownEvent(id))
        );
    }

    #[test]
    fn test_expiry_is_one_and_a_half_times_ignore() {
        let (mut state, config, mut outbox) = setup();
        let id = push_event(&mut state, "move_out");
        state.active_events[0].days_left = 1;
        let expired = age_events(&mut state, &config, &mut outbox);
        assert_eq!(expired, vec![id]);
        assert_eq!(state.money, 8500.0);
        assert_eq!(state.happiness, 37.5);
        assert!(state.active_events.is_empty());
    }

    #[test]
    fn test_aging_counts_down() {
        let (mut state, config, mut outbox) = setup();
        push_event(&mut state, "population_boom");
        for expected in (1..6).rev() {
            age_events(&mut state, &config, &mut outbox);
            assert_eq!(state.active_events[0].days_left, expected);
        }
        age_events(&mut state, &config, &mut outbox);
        assert!(state.active_events.is_empty());
    }
}
