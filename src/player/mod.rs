//! Player module - the rolling ball, its vitals and the kick guard.

mod components;
mod movement;
mod pickups;
mod plugin;
mod vitals;

pub use components::*;
pub use movement::spawn_player;
pub use plugin::PlayerPlugin;
pub use pickups::OXY_CAN_HEAL;
pub use vitals::{DamageKind, PlayerVitals, KICK_DEATH_DELAY, MAX_BOOSTS};
