//! City state - the single mutable record the engine advances each day.
//!
//! Nothing outside the engine writes here directly; systems receive
//! `&mut CityState` and keep every resource inside its range through
//! [`CityState::update_resource`].

use ecopolis_logic::buildings::{BuildingType, TypeCounts};
use ecopolis_logic::config::GameConfig;
use ecopolis_logic::events::{EventTemplate, RequirementKind, ResourceDelta};
use ecopolis_logic::missions::{CityMetrics, MissionGoal};
use serde::{Deserialize, Serialize};

use crate::systems::Ending;

/// Opaque building handle, unique within a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BuildingId(pub u32);

/// Opaque event handle, unique within a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EventId(pub u32);

impl std::fmt::Display for BuildingId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl std::fmt::Display for EventId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A building on the grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Building {
    pub id: BuildingId,
    pub building_type: BuildingType,
    pub col: u32,
    pub row: u32,
    /// Starts at 1, raised by upgrades. No cap.
    pub level: u32,
}

impl Building {
    /// Display name with level, e.g. `"Park (lvl 2)"`.
    pub fn label(&self) -> String {
        format!("{} (lvl {})", self.building_type.name(), self.level)
    }
}

/// A live event spawned from a template.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActiveEvent {
    pub id: EventId,
    pub template_id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub requirement: RequirementKind,
    pub requirement_count: u32,
    /// Matching buildings that existed when the event spawned.
    pub start_count: u32,
    pub days_to_complete: u32,
    pub days_left: i32,
    pub reward: Vec<ResourceDelta>,
    pub penalty: Vec<ResourceDelta>,
}

impl ActiveEvent {
    /// Instantiate `template` with a snapshot of the matching-building count.
    pub fn from_template(id: EventId, template: &'static EventTemplate, start_count: u32) -> Self {
        Self {
            id,
            template_id: template.id,
            title: template.title,
            description: template.description,
            requirement: template.requirement,
            requirement_count: template.requirement_count,
            start_count,
            days_to_complete: template.days_to_complete,
            days_left: template.days_to_complete as i32,
            reward: template.reward.to_vec(),
            penalty: template.penalty.to_vec(),
        }
    }
}

/// A mission and whether it has paid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mission {
    pub goal: MissionGoal,
    pub done: bool,
    /// Day the mission completed.
    pub completed_on: Option<u32>,
}

impl Mission {
    pub fn new(goal: MissionGoal) -> Self {
        Self {
            goal,
            done: false,
            completed_on: None,
        }
    }

    /// The full mission list for a new game.
    pub fn all() -> Vec<Mission> {
        MissionGoal::ALL.into_iter().map(Mission::new).collect()
    }
}

/// Lifecycle of a game session. Exactly one holds at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    NotStarted,
    Running,
    Paused,
    Over,
}

/// Resource written through [`CityState::update_resource`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Money,
    Population,
    Energy,
    Happiness,
    Pollution,
    Recycling,
}

impl ResourceKind {
    /// Inclusive bounds the resource is clamped into.
    pub fn bounds(&self) -> (f64, f64) {
        match self {
            ResourceKind::Money | ResourceKind::Population => (0.0, f64::INFINITY),
            ResourceKind::Energy
            | ResourceKind::Happiness
            | ResourceKind::Pollution
            | ResourceKind::Recycling => (0.0, 100.0),
        }
    }
}

/// Mutable simulation state for one game.
#[derive(Debug, Clone)]
pub struct CityState {
    pub day: u32,
    pub week: u32,

    pub money: f64,
    pub population: f64,
    pub energy: f64,
    pub happiness: f64,
    pub pollution: f64,
    pub recycling: f64,

    pub energy_production: f64,
    pub energy_consumption: f64,
    pub housing_capacity: f64,
    pub jobs_available: f64,
    pub jobs_filled: f64,
    pub unemployed: f64,
    /// Newcomers waiting for housing.
    pub migrants: f64,

    /// In construction order.
    pub buildings: Vec<Building>,
    pub active_events: Vec<ActiveEvent>,
    pub missions: Vec<Mission>,
    pub selected_building: Option<BuildingId>,

    pub phase: Phase,
    pub ending: Option<Ending>,
    pub score: u32,

    pub campaign_cooldown: u32,
    pub events_this_week: u32,
    pub last_event_day: u32,
    /// Buildings constructed by the player, per type.
    pub construction_counters: TypeCounts,

    next_building_id: u32,
    next_event_id: u32,
}

impl CityState {
    /// Fresh day-one state with the configured starting resources and no
    /// buildings.
    pub fn new(config: &GameConfig) -> Self {
        let start = &config.start;
        Self {
            day: 1,
            week: 1,
            money: start.money,
            population: start.population,
            energy: start.energy,
            happiness: start.happiness,
            pollution: start.pollution,
            recycling: start.recycling,
            energy_production: 0.0,
            energy_consumption: 0.0,
            housing_capacity: 0.0,
            jobs_available: 0.0,
            jobs_filled: 0.0,
            unemployed: 0.0,
            migrants: 0.0,
            buildings: Vec::new(),
            active_events: Vec::new(),
            missions: Vec::new(),
            selected_building: None,
            phase: Phase::NotStarted,
            ending: None,
            score: 0,
            campaign_cooldown: 0,
            events_this_week: 0,
            last_event_day: 0,
            construction_counters: TypeCounts::default(),
            next_building_id: 1,
            next_event_id: 1,
        }
    }

    /// Add `delta` to a resource and clamp it into its bounds.
    pub fn update_resource(&mut self, kind: ResourceKind, delta: f64) {
        let (min, max) = kind.bounds();
        let slot = match kind {
            ResourceKind::Money => &mut self.money,
            ResourceKind::Population => &mut self.population,
            ResourceKind::Energy => &mut self.energy,
            ResourceKind::Happiness => &mut self.happiness,
            ResourceKind::Pollution => &mut self.pollution,
            ResourceKind::Recycling => &mut self.recycling,
        };
        *slot = (*slot + delta).clamp(min, max);
    }

    pub fn is_running(&self) -> bool {
        self.phase == Phase::Running
    }

    pub fn is_paused(&self) -> bool {
        self.phase == Phase::Paused
    }

    pub fn is_over(&self) -> bool {
        self.phase == Phase::Over
    }

    /// Append a level-1 building. Placement rules are the caller's job.
    pub fn add_building(&mut self, building_type: BuildingType, col: u32, row: u32) -> BuildingId {
        let id = BuildingId(self.next_building_id);
        self.next_building_id += 1;
        self.buildings.push(Building {
            id,
            building_type,
            col,
            row,
            level: 1,
        });
        id
    }

    /// Allocate a fresh event id.
    pub fn next_event_id(&mut self) -> EventId {
        let id = EventId(self.next_event_id);
        self.next_event_id += 1;
        id
    }

    pub fn building(&self, id: BuildingId) -> Option<&Building> {
        self.buildings.iter().find(|b| b.id == id)
    }

    pub fn building_mut(&mut self, id: BuildingId) -> Option<&mut Building> {
        self.buildings.iter_mut().find(|b| b.id == id)
    }

    pub fn event(&self, id: EventId) -> Option<&ActiveEvent> {
        self.active_events.iter().find(|e| e.id == id)
    }

    pub fn is_occupied(&self, col: u32, row: u32) -> bool {
        self.buildings.iter().any(|b| b.col == col && b.row == row)
    }

    /// Current building count per type.
    pub fn building_counts(&self) -> TypeCounts {
        TypeCounts::tally(self.buildings.iter().map(|b| b.building_type))
    }

    /// `(type, level)` pairs for the formula functions.
    pub fn building_levels(&self) -> impl Iterator<Item = (BuildingType, u32)> + '_ {
        self.buildings.iter().map(|b| (b.building_type, b.level))
    }

    /// Numbers the mission goals look at.
    pub fn metrics(&self) -> CityMetrics {
        CityMetrics {
            population: self.population,
            happiness: self.happiness,
            pollution: self.pollution,
            recycling: self.recycling,
            jobs_filled: self.jobs_filled,
            counts: self.building_counts(),
        }
    }

    pub fn missions_done(&self) -> usize {
        self.missions.iter().filter(|m| m.done).count()
    }
}
