//! Ecopolis Core - City Simulation Engine
//!
//! The stateful half of Ecopolis: a city that advances one day per tick,
//! a command surface for the mayor, and a read model for whoever draws it.
//! Formulas and catalogs live in `ecopolis-logic`.
//!
//! # Architecture
//!
//! - **State**: one [`state::CityState`] per game, owned by the engine
//! - **Systems**: free functions that take `&mut CityState` and run one
//!   stage of the day (economy, events, missions, end-game)
//! - **Engine**: [`engine::CityEngine`] sequences the systems each tick and
//!   validates player commands
//! - **Driver**: [`driver::GameLoop`] ticks the engine on a fixed interval
//!   from a background thread
//!
//! # Example
//!
//! ```rust,no_run
//! use ecopolis_core::prelude::*;
//!
//! let mut engine = CityEngine::with_seed(GameConfig::default(), 42);
//! engine.start_game().unwrap();
//! engine.build(BuildingType::Park).unwrap();
//!
//! while let Some(report) = engine.advance_day() {
//!     if report.ending.is_some() {
//!         break;
//!     }
//! }
//! println!("{}", engine.snapshot().to_json().unwrap());
//! ```

pub mod driver;
pub mod engine;
pub mod error;
pub mod notify;
pub mod rng;
pub mod snapshot;
pub mod state;
pub mod systems;

/// Commonly used types for convenient importing
pub mod prelude {
    pub use crate::driver::GameLoop;
    pub use crate::engine::{CityEngine, TickReport};
    pub use crate::error::CommandError;
    pub use crate::notify::Notification;
    pub use crate::rng::{RandomSource, ScriptedRng, SimRng};
    pub use crate::snapshot::CityView;
    pub use crate::state::{BuildingId, CityState, EventId, Phase, ResourceKind};
    pub use crate::systems::{Ending, FinalStats, UpgradeQuote};
    pub use ecopolis_logic::buildings::BuildingType;
    pub use ecopolis_logic::config::GameConfig;
}
