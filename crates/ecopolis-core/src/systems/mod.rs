//! Systems - logic that operates on the city state

mod campaign;
mod economy;
mod endgame;
mod events;
mod missions;
mod placement;

pub use campaign::*;
pub use economy::*;
pub use endgame::*;
pub use events::*;
pub use missions::*;
pub use placement::*;
