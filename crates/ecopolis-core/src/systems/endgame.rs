//! End-game evaluation - how a term ends, the final score and the closing
//! statistics.

use ecopolis_logic::buildings::BuildingType;
use ecopolis_logic::config::GameConfig;
use ecopolis_logic::scoring::{compute_score, ScoreInputs, ScoreRating};
use serde::Serialize;

use crate::notify::Outbox;
use crate::state::{CityState, Phase};

/// The ways a game can end. Only [`Ending::TermCompleted`] is a success.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Ending {
    TermCompleted,
    EnvironmentalCollapse,
    Uprising,
    Blackout,
    Bankruptcy,
}

impl Ending {
    pub fn is_success(&self) -> bool {
        matches!(self, Ending::TermCompleted)
    }

    pub fn title(&self) -> &'static str {
        match self {
            Ending::TermCompleted => "🎉 Congratulations! You finished your term!",
            Ending::EnvironmentalCollapse => "☠️ Environmental Collapse!",
            Ending::Uprising => "😡 Popular Uprising!",
            Ending::Blackout => "⚡ Total Blackout!",
            Ending::Bankruptcy => "💸 The City Went Bankrupt!",
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            Ending::TermCompleted => "Your term as mayor is over. Here are the results:",
            Ending::EnvironmentalCollapse => {
                "Pollution reached critical levels. The city has become uninhabitable."
            }
            Ending::Uprising => "The citizens are extremely unhappy and forced you out of office.",
            Ending::Blackout => "The city ran out of energy and collapsed.",
            Ending::Bankruptcy => "The city ran out of money and residents.",
        }
    }
}

/// First matching ending for the current state, in priority order.
pub fn evaluate_end(state: &CityState, config: &GameConfig) -> Option<Ending> {
    if state.day >= config.max_days {
        Some(Ending::TermCompleted)
    } else if state.pollution >= 95.0 {
        Some(Ending::EnvironmentalCollapse)
    } else if state.happiness <= 5.0 {
        Some(Ending::Uprising)
    } else if state.energy <= 5.0 {
        Some(Ending::Blackout)
    } else if state.money <= 0.0 && state.population < 100.0 {
        Some(Ending::Bankruptcy)
    } else {
        None
    }
}

/// Score for a city that completed its term.
pub fn final_score(state: &CityState) -> u32 {
    compute_score(&ScoreInputs {
        pollution: state.pollution,
        happiness: state.happiness,
        population: state.population,
        recycling: state.recycling,
        jobs_filled: state.jobs_filled,
        active_events: state.active_events.len(),
    })
}

/// Check for an ending and, if one applies, freeze the game. Returns the
/// ending reached today.
pub fn end_game_system(
    state: &mut CityState,
    config: &GameConfig,
    outbox: &mut Outbox,
) -> Option<Ending> {
    let ending = evaluate_end(state, config)?;

    state.phase = Phase::Over;
    state.ending = Some(ending);
    if ending.is_success() {
        state.score = final_score(state);
        outbox.info(ending.title());
    } else {
        outbox.error(ending.title());
    }
    log::info!(
        "Game over on day {}: {:?} (score {})",
        state.day,
        ending,
        state.score
    );
    Some(ending)
}

/// Closing numbers shown when the game ends.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FinalStats {
    pub ending: Option<Ending>,
    pub title: Option<&'static str>,
    pub message: Option<&'static str>,
    pub score: u32,
    pub rating: Option<ScoreRating>,
    /// Verdict on the score; only a completed term is rated.
    pub rating_message: Option<&'static str>,
    pub days_survived: u32,
    pub money: u64,
    pub population: u64,
    pub happiness: u32,
    pub pollution: u32,
    pub energy: u32,
    pub recycling: u32,
    pub jobs_filled: u64,
    pub jobs_available: u64,
    pub total_buildings: u32,
    pub houses: u32,
    pub factories: u32,
    pub missions_done: usize,
    pub missions_total: usize,
}

impl FinalStats {
    pub fn from_state(state: &CityState) -> Self {
        let counts = state.building_counts();
        let success = state.ending.is_some_and(|e| e.is_success());
        let rating = success.then(|| ScoreRating::from_score(state.score));
        Self {
            ending: state.ending,
            title: state.ending.map(|e| e.title()),
            message: state.ending.map(|e| e.message()),
            score: state.score,
            rating,
            rating_message: rating.map(|r| r.message()),
            days_survived: state.day,
            money: state.money.floor() as u64,
            population: state.population.floor() as u64,
            happiness: state.happiness.floor() as u32,
            pollution: state.pollution.floor() as u32,
            energy: state.energy.floor() as u32,
            recycling: state.recycling.floor() as u32,
            jobs_filled: state.jobs_filled.floor() as u64,
            jobs_available: state.jobs_available.floor() as u64,
            total_buildings: counts.total(),
            houses: counts.get(BuildingType::House),
            factories: counts.get(BuildingType::Factory),
            missions_done: state.missions_done(),
            missions_total: state.missions.len(),
        }
    }
}
