//! Mission goals - one-shot achievements with a cash reward.
//!
//! Missions are checked independently every day against a [`CityMetrics`]
//! snapshot. Completion bookkeeping (the `done` flag, paying the reward
//! once) belongs to the engine.

use serde::{Deserialize, Serialize};

use crate::buildings::{BuildingType, TypeCounts};
use crate::scoring::employment_rate;

/// Read-only view of the numbers mission goals look at.
#[derive(Debug, Clone, Copy, Default)]
pub struct CityMetrics {
    pub population: f64,
    pub happiness: f64,
    pub pollution: f64,
    pub recycling: f64,
    pub jobs_filled: f64,
    pub counts: TypeCounts,
}

/// The seven mission goals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissionGoal {
    CleanAir,
    HappyCity,
    GreenSpaces,
    RecyclingDrive,
    GrowingCity,
    FirstIndustry,
    FullEmployment,
}

impl MissionGoal {
    /// All goals in display order.
    pub const ALL: [MissionGoal; 7] = [
        MissionGoal::CleanAir,
        MissionGoal::HappyCity,
        MissionGoal::GreenSpaces,
        MissionGoal::RecyclingDrive,
        MissionGoal::GrowingCity,
        MissionGoal::FirstIndustry,
        MissionGoal::FullEmployment,
    ];

    /// Numeric id (1-based, display order).
    pub fn id(&self) -> u32 {
        *self as u32 + 1
    }

    pub fn text(&self) -> &'static str {
        match self {
            MissionGoal::CleanAir => "Reduce pollution below 20%",
            MissionGoal::HappyCity => "Reach 75% happiness",
            MissionGoal::GreenSpaces => "Have 3 parks in the city",
            MissionGoal::RecyclingDrive => "Reach 40% recycling",
            MissionGoal::GrowingCity => "Grow the population above 500",
            MissionGoal::FirstIndustry => "Build a factory to create jobs",
            MissionGoal::FullEmployment => "Employ 50% of the population",
        }
    }

    /// Cash paid once on completion.
    pub fn reward(&self) -> u64 {
        match self {
            MissionGoal::CleanAir => 3000,
            MissionGoal::HappyCity => 2500,
            MissionGoal::GreenSpaces => 4000,
            MissionGoal::RecyclingDrive => 3500,
            MissionGoal::GrowingCity => 5000,
            MissionGoal::FirstIndustry => 4000,
            MissionGoal::FullEmployment => 6000,
        }
    }

    /// Whether the goal holds for `m`.
    pub fn is_met(&self, m: &CityMetrics) -> bool {
        match self {
            MissionGoal::CleanAir => m.pollution < 20.0,
            MissionGoal::HappyCity => m.happiness >= 75.0,
            MissionGoal::GreenSpaces => m.counts.get(BuildingType::Park) >= 3,
            MissionGoal::RecyclingDrive => m.recycling >= 40.0,
            MissionGoal::GrowingCity => m.population >= 500.0,
            MissionGoal::FirstIndustry => m.counts.get(BuildingType::Factory) >= 1,
            MissionGoal::FullEmployment => employment_rate(m.jobs_filled, m.population) >= 0.5,
        }
    }

    /// Progress suffix such as `"(2/3)"`, for goals that have one.
    pub fn progress_text(&self, m: &CityMetrics) -> Option<String> {
        match self {
            MissionGoal::GreenSpaces => {
                Some(format!("({}/3)", m.counts.get(BuildingType::Park)))
            }
            MissionGoal::GrowingCity => Some(format!("({}/500)", m.population.floor() as u64)),
            MissionGoal::FirstIndustry => {
                Some(format!("({}/1)", m.counts.get(BuildingType::Factory)))
            }
            MissionGoal::FullEmployment => Some(format!(
                "({:.1}%/50%)",
                employment_rate(m.jobs_filled, m.population) * 100.0
            )),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_sequential() {
        let ids: Vec<u32> = MissionGoal::ALL.iter().map(|g| g.id()).collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5, 6, 7]);
    }

    #[test]
    fn test_clean_air_threshold() {
        let mut m = CityMetrics {
            pollution: 19.9,
            ..Default::default()
        };
        assert!(MissionGoal::CleanAir.is_met(&m));
        m.pollution = 20.0;
        assert!(!MissionGoal::CleanAir.is_met(&m));
    }

    #[test]
    fn test_building_goals() {
        let m = CityMetrics {
            counts: TypeCounts::tally([
                BuildingType::Park,
                BuildingType::Park,
                BuildingType::Factory,
            ]),
            ..Default::default()
        };
        assert!(!MissionGoal::GreenSpaces.is_met(&m));
        assert!(MissionGoal::FirstIndustry.is_met(&m));
        assert_eq!(MissionGoal::GreenSpaces.progress_text(&m).as_deref(), Some("(2/3)"));
    }

    #[test]
    fn test_employment_goal_guards_empty_city() {
        let m = CityMetrics::default();
        assert!(!MissionGoal::FullEmployment.is_met(&m));
        let m = CityMetrics {
            population: 200.0,
            jobs_filled: 100.0,
            ..Default::default()
        };
        assert!(MissionGoal::FullEmployment.is_met(&m));
        assert_eq!(
            MissionGoal::FullEmployment.progress_text(&m).as_deref(),
            Some("(50.0%/50%)")
        );
    }

    #[test]
    fn test_total_rewards() {
        let total: u64 = MissionGoal::ALL.iter().map(|g| g.reward()).sum();
        assert_eq!(total, 28_000);
    }

    #[test]
    fn test_no_progress_for_threshold_goals() {
        assert!(MissionGoal::HappyCity
            .progress_text(&CityMetrics::default())
            .is_none());
    }
}
