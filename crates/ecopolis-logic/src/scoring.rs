//! End-of-term scoring.
//!
//! A mayor who survives the full term gets a score that weighs the
//! environment, happiness, size and employment of the city, plus a small
//! bonus for events still in play on the last day.

use serde::{Deserialize, Serialize};

/// Fraction of residents with a job, or 0 for an empty city.
pub fn employment_rate(jobs_filled: f64, population: f64) -> f64 {
    if population > 0.0 {
        jobs_filled / population
    } else {
        0.0
    }
}

/// Final city numbers used for the score.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScoreInputs {
    pub pollution: f64,
    pub happiness: f64,
    pub population: f64,
    pub recycling: f64,
    pub jobs_filled: f64,
    pub active_events: usize,
}

/// Weighted final score, floored. Typically 0–100, up to 120 with the
/// event bonus.
pub fn compute_score(inputs: &ScoreInputs) -> u32 {
    let pollution_score = (100.0 - inputs.pollution).max(0.0);
    let population_score = (inputs.population / 10.0).min(100.0);
    let employment_score = employment_rate(inputs.jobs_filled, inputs.population) * 100.0;
    let events_score = (inputs.active_events as f64 * 5.0).min(20.0);

    let total = pollution_score * 0.2
        + inputs.happiness * 0.2
        + population_score * 0.2
        + inputs.recycling * 0.15
        + employment_score * 0.15
        + events_score;

    total.floor().max(0.0) as u32
}

/// Verdict attached to a final score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreRating {
    Excellent,
    Good,
    NeedsImprovement,
}

impl ScoreRating {
    pub fn from_score(score: u32) -> Self {
        if score >= 80 {
            ScoreRating::Excellent
        } else if score >= 60 {
            ScoreRating::Good
        } else {
            ScoreRating::NeedsImprovement
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            ScoreRating::Excellent => "Excellent work! Your city is a model of sustainability!",
            ScoreRating::Good => "Good work! Your city is on the right track.",
            ScoreRating::NeedsImprovement => "There is room to improve environmental management.",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_score() {
        // 0.2*90 + 0.2*80 + 0.2*80 + 0.15*50 + 0.15*60 = 66.5
        let inputs = ScoreInputs {
            pollution: 10.0,
            happiness: 80.0,
            population: 800.0,
            recycling: 50.0,
            jobs_filled: 480.0,
            active_events: 0,
        };
        assert_eq!(compute_score(&inputs), 66);
    }

    #[test]
    fn test_event_bonus_caps_at_twenty() {
        let base = ScoreInputs::default();
        let with_two = ScoreInputs {
            active_events: 2,
            ..base
        };
        let with_nine = ScoreInputs {
            active_events: 9,
            ..base
        };
        assert_eq!(compute_score(&with_two) - compute_score(&base), 10);
        assert_eq!(compute_score(&with_nine) - compute_score(&base), 20);
    }

    #[test]
    fn test_population_score_caps() {
        let big = ScoreInputs {
            population: 50_000.0,
            pollution: 100.0,
            ..Default::default()
        };
        assert_eq!(compute_score(&big), 20);
    }

    #[test]
    fn test_employment_rate_guard() {
        assert_eq!(employment_rate(10.0, 0.0), 0.0);
        assert_eq!(employment_rate(50.0, 100.0), 0.5);
    }

    #[test]
    fn test_rating_tiers() {
        assert_eq!(ScoreRating::from_score(95), ScoreRating::Excellent);
        assert_eq!(ScoreRating::from_score(80), ScoreRating::Excellent);
        assert_eq!(ScoreRating::from_score(60), ScoreRating::Good);
        assert_eq!(ScoreRating::from_score(59), ScoreRating::NeedsImprovement);
    }
}
