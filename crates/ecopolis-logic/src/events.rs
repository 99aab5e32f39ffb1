//! City event catalog.
//!
//! Events are time-boxed requests from residents: build something within a
//! few days and collect a reward, or let it lapse and take a penalty. The
//! catalog here is static; live instances are tracked by the engine.

use serde::{Deserialize, Serialize};

use crate::buildings::{BuildingType, TypeCounts};

/// Which buildings count toward an event's requirement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequirementKind {
    /// Buildings of one type.
    Single(BuildingType),
    /// Recycling centres and parks together.
    RecycleOrPark,
}

impl RequirementKind {
    /// Current number of matching buildings.
    pub fn count(&self, counts: &TypeCounts) -> u32 {
        match self {
            RequirementKind::Single(t) => counts.get(*t),
            RequirementKind::RecycleOrPark => {
                counts.get(BuildingType::Recycle) + counts.get(BuildingType::Park)
            }
        }
    }
}

/// Resource an event reward or penalty can touch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeltaKey {
    Money,
    Energy,
    Happiness,
    Pollution,
    Recycling,
    /// Adds to the pool of migrants waiting for housing.
    Migrants,
}

/// A single resource change.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResourceDelta {
    pub key: DeltaKey,
    pub amount: f64,
}

impl ResourceDelta {
    pub const fn new(key: DeltaKey, amount: f64) -> Self {
        Self { key, amount }
    }

    /// The same change scaled by `factor`.
    pub fn scaled(&self, factor: f64) -> Self {
        Self {
            key: self.key,
            amount: self.amount * factor,
        }
    }
}

/// Amount for `key` in a delta list, or 0.
pub fn delta_amount(deltas: &[ResourceDelta], key: DeltaKey) -> f64 {
    deltas
        .iter()
        .filter(|d| d.key == key)
        .map(|d| d.amount)
        .sum()
}

/// A kind of event that can befall the city.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventTemplate {
    /// Stable identifier.
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
    pub requirement: RequirementKind,
    /// Buildings of the matching kind to construct after the event starts.
    pub requirement_count: u32,
    pub days_to_complete: u32,
    pub reward: &'static [ResourceDelta],
    pub penalty: &'static [ResourceDelta],
}

impl EventTemplate {
    /// Money shown on the "complete" action.
    pub fn reward_money(&self) -> f64 {
        delta_amount(self.reward, DeltaKey::Money)
    }

    /// Money shown on the "ignore" action (as a positive number).
    pub fn penalty_money(&self) -> f64 {
        delta_amount(self.penalty, DeltaKey::Money).abs()
    }
}

use DeltaKey::*;

/// The six event templates.
pub static EVENT_TEMPLATES: [EventTemplate; 6] = [
    EventTemplate {
        id: "move_out",
        title: "Residents Want to Leave",
        description: "Families are thinking of moving away for lack of infrastructure. \
                      Build 2 new houses to keep them!",
        icon: "🏠",
        requirement: RequirementKind::Single(BuildingType::House),
        requirement_count: 2,
        days_to_complete: 5,
        reward: &[ResourceDelta::new(Money, 500.0), ResourceDelta::new(Happiness, 10.0)],
        penalty: &[ResourceDelta::new(Money, -1000.0), ResourceDelta::new(Happiness, -15.0)],
    },
    EventTemplate {
        id: "no_park",
        title: "Park Complaints",
        description: "Residents complain about the lack of green space. \
                      Build a new park to improve quality of life!",
        icon: "🌳",
        requirement: RequirementKind::Single(BuildingType::Park),
        requirement_count: 1,
        days_to_complete: 3,
        reward: &[ResourceDelta::new(Money, 300.0), ResourceDelta::new(Happiness, 15.0)],
        penalty: &[ResourceDelta::new(Money, -500.0), ResourceDelta::new(Happiness, -10.0)],
    },
    EventTemplate {
        id: "pollution_complaint",
        title: "Pollution Complaint",
        description: "Residents are suffering from pollution. \
                      Build a recycling centre or a new park!",
        icon: "⚠️",
        requirement: RequirementKind::RecycleOrPark,
        requirement_count: 1,
        days_to_complete: 4,
        reward: &[ResourceDelta::new(Money, 400.0), ResourceDelta::new(Pollution, -10.0)],
        penalty: &[ResourceDelta::new(Money, -800.0), ResourceDelta::new(Happiness, -20.0)],
    },
    EventTemplate {
        id: "energy_crisis",
        title: "Energy Crisis",
        description: "The city is running short of power. Build a new solar plant!",
        icon: "⚡",
        requirement: RequirementKind::Single(BuildingType::Solar),
        requirement_count: 1,
        days_to_complete: 4,
        reward: &[ResourceDelta::new(Money, 600.0), ResourceDelta::new(Energy, 20.0)],
        penalty: &[ResourceDelta::new(Money, -1200.0), ResourceDelta::new(Energy, -30.0)],
    },
    EventTemplate {
        id: "population_boom",
        title: "Population Boom",
        description: "More people are coming to the city! Build 3 new houses to take them in.",
        icon: "👥",
        requirement: RequirementKind::Single(BuildingType::House),
        requirement_count: 3,
        days_to_complete: 6,
        reward: &[ResourceDelta::new(Money, 800.0), ResourceDelta::new(Migrants, 150.0)],
        penalty: &[ResourceDelta::new(Money, -1500.0), ResourceDelta::new(Happiness, -25.0)],
    },
    EventTemplate {
        id: "job_crisis",
        title: "Jobs Crisis",
        description: "Many residents are out of work. Build a new factory to create jobs!",
        icon: "💼",
        requirement: RequirementKind::Single(BuildingType::Factory),
        requirement_count: 1,
        days_to_complete: 5,
        reward: &[ResourceDelta::new(Money, 700.0), ResourceDelta::new(Happiness, 15.0)],
        penalty: &[ResourceDelta::new(Money, -900.0), ResourceDelta::new(Happiness, -20.0)],
    },
];

/// Look up a template by id.
pub fn template(id: &str) -> Option<&'static EventTemplate> {
    EVENT_TEMPLATES.iter().find(|t| t.id == id)
}

/// Template picked by a uniform roll in [0, 1).
pub fn template_for_roll(roll: f64) -> &'static EventTemplate {
    let idx = (roll * EVENT_TEMPLATES.len() as f64).floor() as usize;
    &EVENT_TEMPLATES[idx.min(EVENT_TEMPLATES.len() - 1)]
}

/// Progress toward an event requirement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequirementProgress {
    /// Matching buildings built since the event started (never negative).
    pub built: u32,
    pub required: u32,
    pub met: bool,
}

/// Progress given the matching-building count now and when the event spawned.
pub fn requirement_progress(current: u32, start_count: u32, required: u32) -> RequirementProgress {
    let built = current.saturating_sub(start_count);
    RequirementProgress {
        built,
        required,
        met: built >= required,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_ids_unique() {
        for (i, a) in EVENT_TEMPLATES.iter().enumerate() {
            for b in EVENT_TEMPLATES.iter().skip(i + 1) {
                assert_ne!(a.id, b.id);
            }
        }
    }

    #[test]
    fn test_recycle_or_park_counts_both() {
        let counts = TypeCounts::tally([
            BuildingType::Park,
            BuildingType::Recycle,
            BuildingType::House,
        ]);
        assert_eq!(RequirementKind::RecycleOrPark.count(&counts), 2);
        assert_eq!(RequirementKind::Single(BuildingType::House).count(&counts), 1);
    }

    #[test]
    fn test_template_for_roll() {
        assert_eq!(template_for_roll(0.0).id, "move_out");
        assert_eq!(template_for_roll(0.2).id, "no_park");
        assert_eq!(template_for_roll(0.99).id, "job_crisis");
        // Out-of-range rolls clamp to the last entry
        assert_eq!(template_for_roll(1.0).id, "job_crisis");
    }

    #[test]
    fn test_requirement_progress() {
        assert_eq!(
            requirement_progress(3, 1, 2),
            RequirementProgress {
                built: 2,
                required: 2,
                met: true
            }
        );
        assert!(!requirement_progress(1, 1, 1).met);
        // Counts never drop below zero even if buildings vanish
        assert_eq!(requirement_progress(0, 2, 1).built, 0);
    }

    #[test]
    fn test_money_labels() {
        let boom = template("population_boom").unwrap();
        assert_eq!(boom.reward_money(), 800.0);
        assert_eq!(boom.penalty_money(), 1500.0);
        assert_eq!(delta_amount(boom.reward, DeltaKey::Migrants), 150.0);
        assert_eq!(delta_amount(boom.reward, DeltaKey::Energy), 0.0);
    }

    #[test]
    fn test_scaled_delta() {
        let d = ResourceDelta::new(DeltaKey::Money, -1000.0).scaled(1.5);
        assert_eq!(d.amount, -1500.0);
        assert_eq!(d.key, DeltaKey::Money);
    }
}
