//! Calendar helpers - weeks, weekday labels, tax countdown and the
//! environment status line.

use serde::{Deserialize, Serialize};

/// Week number (1-based) containing `day`.
pub fn week_of(day: u32) -> u32 {
    day.div_ceil(7).max(1)
}

const WEEKDAY_LABELS: [&str; 7] = [
    "Workday",
    "Workday",
    "Workday",
    "Almost the weekend",
    "Friday!",
    "Weekend",
    "Sunday rest",
];

/// Label for the day of the week (day 7, 14, … is the seventh day).
pub fn day_of_week_label(day: u32) -> &'static str {
    let weekday = match day % 7 {
        0 => 7,
        d => d,
    };
    WEEKDAY_LABELS[(weekday - 1) as usize]
}

/// Days until the next tax collection; 0 means today.
pub fn days_until_tax(day: u32, interval: u32) -> u32 {
    if interval == 0 {
        return 0;
    }
    match day % interval {
        0 => 0,
        r => interval - r,
    }
}

/// Coarse environmental verdict from the pollution level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnvironmentStatus {
    Sustainable,
    Moderate,
    Polluted,
}

impl EnvironmentStatus {
    pub fn from_pollution(pollution: f64) -> Self {
        if pollution < 20.0 {
            EnvironmentStatus::Sustainable
        } else if pollution < 50.0 {
            EnvironmentStatus::Moderate
        } else {
            EnvironmentStatus::Polluted
        }
    }
}
