//! Command rejections.
//!
//! Player commands never panic and never leave the city half-updated: a
//! command either applies in full or returns one of these.

use ecopolis_logic::buildings::BuildingType;
use ecopolis_logic::config::ConfigError;

use crate::state::{BuildingId, EventId};

/// Why a player command was refused.
#[derive(Debug, Clone, PartialEq)]
pub enum CommandError {
    /// The game has not been started.
    NotRunning,
    /// The game is paused.
    Paused,
    /// The game has ended; the city is frozen.
    GameOver,
    /// The game was already started.
    AlreadyStarted,
    /// The session configuration cannot produce a playable city.
    InvalidConfig(Vec<ConfigError>),
    InsufficientFunds { needed: u64, available: f64 },
    /// No free cell found within the placement attempt budget.
    NoFreeCell { building_type: BuildingType },
    /// An upgrade was requested with nothing selected.
    NoSelection,
    UnknownBuilding(BuildingId),
    /// The building changed since the upgrade was quoted.
    StaleQuote(BuildingId),
    CampaignCooldown { days_left: u32 },
    UnknownEvent(EventId),
    /// The event's building requirement is not met yet.
    RequirementNotMet(EventId),
}

impl std::fmt::Display for CommandError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CommandError::NotRunning => write!(f, "The game is not running"),
            CommandError::Paused => write!(f, "The game is paused"),
            CommandError::GameOver => write!(f, "The game is over"),
            CommandError::AlreadyStarted => write!(f, "The game has already started"),
            CommandError::InvalidConfig(errors) => {
                let reasons: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
                write!(f, "Invalid configuration: {}", reasons.join("; "))
            }
            CommandError::InsufficientFunds { needed, .. } => {
                write!(f, "Not enough money! Required: ${}", needed)
            }
            CommandError::NoFreeCell { building_type } => {
                write!(f, "No space available to build a {}!", building_type.name())
            }
            CommandError::NoSelection => write!(f, "Select a building to upgrade!"),
            CommandError::UnknownBuilding(id) => write!(f, "No building {}", id),
            CommandError::StaleQuote(id) => {
                write!(f, "Building {} changed since the upgrade was quoted", id)
            }
            CommandError::CampaignCooldown { days_left } => write!(
                f,
                "Campaigns need a cooldown. Wait {} more day(s).",
                days_left
            ),
            CommandError::UnknownEvent(id) => write!(f, "No active event {}", id),
            CommandError::RequirementNotMet(id) => {
                write!(f, "Event {} requirement is not met yet", id)
            }
        }
    }
}

impl std::error::Error for CommandError {}

impl CommandError {
    /// Whether the player should see this rejection as a toast. Unknown
    /// events are dropped silently.
    pub fn is_reported(&self) -> bool {
        !matches!(self, CommandError::UnknownEvent(_))
    }
}
