//! City engine - main entry point for running a game

use ecopolis_logic::buildings::BuildingType;
use ecopolis_logic::calendar::week_of;
use ecopolis_logic::config::{validate_config, GameConfig};
use ecopolis_logic::events::RequirementProgress;
use ecopolis_logic::missions::MissionGoal;
use serde::Serialize;

use crate::error::CommandError;
use crate::notify::{Notification, Outbox};
use crate::rng::{RandomSource, SimRng};
use crate::snapshot::CityView;
use crate::state::{BuildingId, CityState, EventId, Mission, Phase};
use crate::systems::{self, EconomyReport, Ending, EventResolution, FinalStats, UpgradeQuote};

/// What happened during one simulated day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TickReport {
    pub day: u32,
    pub week: u32,
    pub expired_events: Vec<EventId>,
    pub economy: EconomyReport,
    pub spawned_event: Option<EventId>,
    pub missions_completed: Vec<MissionGoal>,
    pub ending: Option<Ending>,
}

/// Owns one game: configuration, city state, random source and the
/// notification outbox. Every player command and every tick goes through
/// here.
pub struct CityEngine {
    config: GameConfig,
    state: CityState,
    rng: Box<dyn RandomSource>,
    outbox: Outbox,
}

impl CityEngine {
    /// New game seeded from OS entropy.
    pub fn new(config: GameConfig) -> Self {
        Self::with_rng(config, SimRng::from_entropy())
    }

    /// New game with a reproducible seed.
    pub fn with_seed(config: GameConfig, seed: u64) -> Self {
        Self::with_rng(config, SimRng::from_seed_u64(seed))
    }

    pub fn with_rng(config: GameConfig, rng: impl RandomSource + 'static) -> Self {
        let state = CityState::new(&config);
        Self {
            config,
            state,
            rng: Box::new(rng),
            outbox: Outbox::new(),
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn state(&self) -> &CityState {
        &self.state
    }

    /// Direct state access, for scenario setup and tooling.
    pub fn state_mut(&mut self) -> &mut CityState {
        &mut self.state
    }

    pub fn phase(&self) -> Phase {
        self.state.phase
    }

    // --- Lifecycle ---

    /// Lay out the starting city, create the missions and start the clock.
    /// A configuration that fails validation leaves the game unstarted.
    pub fn start_game(&mut self) -> Result<(), CommandError> {
        if self.state.phase != Phase::NotStarted {
            return self.settle("start_game", Err(CommandError::AlreadyStarted));
        }
        let errors = validate_config(&self.config);
        if !errors.is_empty() {
            return self.settle("start_game", Err(CommandError::InvalidConfig(errors)));
        }

        self.state.buildings.clear();
        self.state.active_events.clear();
        systems::place_starting_buildings(&mut self.state, &self.config);
        self.state.missions = Mission::all();
        systems::calculate_capacities(&mut self.state, &self.config);
        self.state.phase = Phase::Running;

        self.outbox.info("🏙️ Welcome to Ecopolis! Build a sustainable city.");
        log::info!(
            "Game started: {}x{} grid, {} days, ${} in the treasury",
            self.config.grid_cols,
            self.config.grid_rows,
            self.config.max_days,
            self.state.money
        );
        Ok(())
    }

    /// Toggle between running and paused. Returns the new phase.
    pub fn pause_resume(&mut self) -> Result<Phase, CommandError> {
        let result = match self.state.phase {
            Phase::Running => {
                self.state.phase = Phase::Paused;
                self.outbox.info("⏸️ Game paused");
                Ok(Phase::Paused)
            }
            Phase::Paused => {
                self.state.phase = Phase::Running;
                self.outbox.info("▶️ Game resumed");
                Ok(Phase::Running)
            }
            Phase::NotStarted => Err(CommandError::NotRunning),
            Phase::Over => Err(CommandError::GameOver),
        };
        if let Ok(phase) = &result {
            log::info!("Day {}: game {:?}", self.state.day, phase);
        }
        self.settle("pause_resume", result)
    }

    /// Advance the simulation by one day. Does nothing unless the game is
    /// running.
    pub fn advance_day(&mut self) -> Option<TickReport> {
        if !self.state.is_running() {
            return None;
        }

        let state = &mut self.state;
        let config = &self.config;
        let outbox = &mut self.outbox;

        state.day += 1;
        state.week = week_of(state.day);

        systems::tick_cooldowns(state);
        let expired_events = systems::age_events(state, config, outbox);
        let economy = systems::economy_system(state, config, self.rng.as_mut(), outbox);
        let spawned_event = systems::try_generate_event(state, config, self.rng.as_mut(), outbox);
        let missions_completed = systems::check_missions(state, outbox);
        let ending = systems::end_game_system(state, config, outbox);

        log::debug!(
            "Day {}: pop {:.0} (+{} waiting), ${:.0}, energy {:.0}, happiness {:.1}, pollution {:.1}",
            state.day,
            state.population,
            state.migrants,
            state.money,
            state.energy,
            state.happiness,
            state.pollution
        );

        Some(TickReport {
            day: state.day,
            week: state.week,
            expired_events,
            economy,
            spawned_event,
            missions_completed,
            ending,
        })
    }

    // --- Commands ---

    /// Build on a random free cell.
    pub fn build(&mut self, building_type: BuildingType) -> Result<BuildingId, CommandError> {
        let result = self.ensure_can_build().and_then(|_| {
            systems::build(
                &mut self.state,
                &self.config,
                building_type,
                self.rng.as_mut(),
                &mut self.outbox,
            )
        });
        self.settle("build", result)
    }

    pub fn select_building(&mut self, id: BuildingId) -> Result<(), CommandError> {
        let result = self.ensure_started().and_then(|_| {
            let building = self
                .state
                .building(id)
                .ok_or(CommandError::UnknownBuilding(id))?;
            let label = building.label();
            self.state.selected_building = Some(id);
            self.outbox.info(format!("Selected: {}", label));
            Ok(())
        });
        self.settle("select_building", result)
    }

    /// Price the next level of a building without changing anything.
    pub fn quote_upgrade(&mut self, id: BuildingId) -> Result<UpgradeQuote, CommandError> {
        let result = systems::quote_upgrade(&self.state, &self.config, id);
        self.settle("quote_upgrade", result)
    }

    /// Quote the upgrade of the selected building. Refused up front when
    /// the treasury cannot cover it; [`Self::confirm_upgrade`] checks again.
    pub fn upgrade_selected(&mut self) -> Result<UpgradeQuote, CommandError> {
        let result = self.ensure_started().and_then(|_| {
            let id = self.state.selected_building.ok_or(CommandError::NoSelection)?;
            let quote = systems::quote_upgrade(&self.state, &self.config, id)?;
            if self.state.money < quote.cost as f64 {
                return Err(CommandError::InsufficientFunds {
                    needed: quote.cost,
                    available: self.state.money,
                });
            }
            Ok(quote)
        });
        self.settle("upgrade_selected", result)
    }

    /// Pay for and apply a quoted upgrade. Returns the new level.
    pub fn confirm_upgrade(&mut self, quote: &UpgradeQuote) -> Result<u32, CommandError> {
        let result = self
            .ensure_started()
            .and_then(|_| systems::confirm_upgrade(&mut self.state, quote, &mut self.outbox));
        self.settle("confirm_upgrade", result)
    }

    pub fn launch_campaign(&mut self) -> Result<(), CommandError> {
        let result = self.ensure_started().and_then(|_| {
            systems::launch_campaign(&mut self.state, &self.config, &mut self.outbox)
        });
        self.settle("launch_campaign", result)
    }

    pub fn complete_event(&mut self, id: EventId) -> Result<EventResolution, CommandError> {
        let result = self
            .ensure_started()
            .and_then(|_| systems::complete_event(&mut self.state, id, &mut self.outbox));
        self.settle("complete_event", result)
    }

    pub fn ignore_event(&mut self, id: EventId) -> Result<EventResolution, CommandError> {
        let result = self
            .ensure_started()
            .and_then(|_| systems::ignore_event(&mut self.state, id, &mut self.outbox));
        self.settle("ignore_event", result)
    }

    // --- Queries ---

    pub fn event_progress(&self, id: EventId) -> Option<RequirementProgress> {
        self.state
            .event(id)
            .map(|e| systems::event_progress(&self.state, e))
    }

    pub fn snapshot(&self) -> CityView {
        CityView::capture(&self.state, &self.config)
    }

    /// Closing statistics, once the game is over.
    pub fn final_stats(&self) -> Option<FinalStats> {
        self.state
            .is_over()
            .then(|| FinalStats::from_state(&self.state))
    }

    /// Take all notifications queued since the last call.
    pub fn drain_notifications(&mut self) -> Vec<Notification> {
        self.outbox.drain()
    }

    // --- Guards ---

    fn ensure_started(&self) -> Result<(), CommandError> {
        match self.state.phase {
            Phase::NotStarted => Err(CommandError::NotRunning),
            Phase::Over => Err(CommandError::GameOver),
            Phase::Running | Phase::Paused => Ok(()),
        }
    }

    fn ensure_can_build(&self) -> Result<(), CommandError> {
        self.ensure_started()?;
        if self.state.is_paused() {
            return Err(CommandError::Paused);
        }
        Ok(())
    }

    /// Log a rejection and surface it to the player when it should be seen.
    fn settle<T>(
        &mut self,
        command: &str,
        result: Result<T, CommandError>,
    ) -> Result<T, CommandError> {
        if let Err(err) = &result {
            log::warn!("Day {}: {} rejected: {}", self.state.day, command, err);
            if err.is_reported() {
                self.outbox.error(err.to_string());
            }
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::ScriptedRng;
    use ecopolis_logic::config::ConfigError;

    fn engine(values: Vec<f64>) -> CityEngine {
        let mut engine = CityEngine::with_rng(GameConfig::default(), ScriptedRng::new(values));
        engine.start_game().unwrap();
        engine.drain_notifications();
        engine
    }

    #[test]
    fn test_start_game_lays_out_city() {
        let engine = engine(vec![0.9]);
        let state = engine.state();
        assert!(state.is_running());
        assert_eq!(state.buildings.len(), 2);
        assert_eq!(state.missions.len(), 7);
        assert_eq!(state.money, 10_000.0);
        assert_eq!(state.housing_capacity, 100.0);
    }

    #[test]
    fn test_start_twice_is_rejected() {
        let mut engine = engine(vec![0.9]);
        assert_eq!(engine.start_game(), Err(CommandError::AlreadyStarted));
        assert_eq!(engine.drain_notifications().len(), 1);
    }

    #[test]
    fn test_commands_before_start() {
        let mut engine = CityEngine::with_seed(GameConfig::default(), 7);
        assert_eq!(engine.build(BuildingType::House), Err(CommandError::NotRunning));
        assert_eq!(engine.launch_campaign(), Err(CommandError::NotRunning));
        assert!(engine.advance_day().is_none());
        assert_eq!(engine.state().day, 1);
    }

    #[test]
    fn test_pause_freezes_ticks_and_building() {
        let mut engine = engine(vec![0.9]);
        assert_eq!(engine.pause_resume(), Ok(Phase::Paused));
        assert!(engine.advance_day().is_none());
        assert_eq!(engine.state().day, 1);
        assert_eq!(engine.build(BuildingType::Park), Err(CommandError::Paused));

        assert_eq!(engine.pause_resume(), Ok(Phase::Running));
        let report = engine.advance_day().unwrap();
        assert_eq!(report.day, 2);
        assert_eq!(report.week, 1);
    }

    #[test]
    fn test_upgrade_needs_selection() {
        let mut engine = engine(vec![0.9]);
        assert_eq!(engine.upgrade_selected(), Err(CommandError::NoSelection));

        let house = engine.state().buildings[0].id;
        engine.select_building(house).unwrap();
        let quote = engine.upgrade_selected().unwrap();
        assert_eq!(quote.cost, 1500);
        assert_eq!(engine.confirm_upgrade(&quote), Ok(2));
        assert_eq!(engine.state().money, 8500.0);
    }

    #[test]
    fn test_upgrade_selected_refused_without_funds() {
        let mut engine = engine(vec![0.9]);
        let house = engine.state().buildings[0].id;
        engine.select_building(house).unwrap();
        engine.drain_notifications();
        engine.state_mut().money = 1000.0;

        assert_eq!(
            engine.upgrade_selected(),
            Err(CommandError::InsufficientFunds {
                needed: 1500,
                available: 1000.0
            })
        );
        let notes = engine.drain_notifications();
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].message, "Not enough money! Required: $1500");

        // Pricing alone still works
        assert_eq!(engine.quote_upgrade(house).map(|q| q.cost), Ok(1500));
        assert_eq!(engine.state().building(house).unwrap().level, 1);
    }

    #[test]
    fn test_invalid_config_leaves_game_unstarted() {
        let config = GameConfig {
            grid_cols: 0,
            grid_rows: 0,
            ..GameConfig::default()
        };
        let mut engine = CityEngine::with_rng(config, ScriptedRng::constant(0.0));
        match engine.start_game() {
            Err(CommandError::InvalidConfig(errors)) => {
                assert!(errors.contains(&ConfigError::EmptyGrid));
                assert!(errors.contains(&ConfigError::StartingBuildingOutOfGrid { col: 2, row: 3 }));
            }
            other => panic!("expected InvalidConfig, got {:?}", other),
        }
        assert_eq!(engine.phase(), Phase::NotStarted);
        assert!(engine.state().buildings.is_empty());
        assert_eq!(engine.build(BuildingType::Park), Err(CommandError::NotRunning));
        assert!(engine.state().buildings.is_empty());
    }

    #[test]
    fn test_unknown_event_is_silent() {
        let mut engine = engine(vec![0.9]);
        assert_eq!(
            engine.ignore_event(EventId(42)),
            Err(CommandError::UnknownEvent(EventId(42)))
        );
        assert!(engine.drain_notifications().is_empty());
    }

    #[test]
    fn test_rejections_are_notified() {
        let mut engine = engine(vec![0.9]);
        engine.state_mut().money = 100.0;
        assert!(engine.build(BuildingType::Solar).is_err());
        let notes = engine.drain_notifications();
        assert_eq!(notes.len(), 1);
        assert!(notes[0].is_error);
        assert_eq!(notes[0].message, "Not enough money! Required: $4000");
    }

    #[test]
    fn test_game_over_freezes_commands() {
        let mut engine = engine(vec![0.9]);
        engine.state_mut().pollution = 96.0;
        let report = engine.advance_day().unwrap();
        assert_eq!(report.ending, Some(Ending::EnvironmentalCollapse));
        assert_eq!(engine.phase(), Phase::Over);

        assert!(engine.advance_day().is_none());
        assert_eq!(engine.build(BuildingType::Park), Err(CommandError::GameOver));
        assert_eq!(engine.launch_campaign(), Err(CommandError::GameOver));
        assert_eq!(engine.pause_resume(), Err(CommandError::GameOver));
        assert!(engine.final_stats().is_some());
    }
}
