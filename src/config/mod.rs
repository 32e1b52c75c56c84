//! Config module - difficulty presets and shared data loading helpers.

mod difficulty;
mod error;
pub mod loader;
mod plugin;

pub use difficulty::{
    resolve_difficulty, CurrentDifficulty, Difficulty, DifficultyRegistry, DifficultySettings,
};
pub use error::DataLoadError;
pub use plugin::ConfigPlugin;
