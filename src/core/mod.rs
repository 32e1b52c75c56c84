//! Core game module - states, events, time scaling and round outcome.
//!
//! This module provides the foundation that all other game systems build upon.

mod events;
mod outcome;
mod plugin;
mod states;
mod time;

pub use events::*;
pub use outcome::{GameOutcome, GAME_OVER_TIME_SCALE};
pub use plugin::CorePlugin;
pub use states::*;
pub use time::{TimeDilation, BASE_FIXED_STEP};
