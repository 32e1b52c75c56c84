//! Config plugin - loads difficulty presets and resolves the active one.

use bevy::prelude::*;

use super::difficulty::{
    load_difficulty_presets, resolve_difficulty, CurrentDifficulty, Difficulty, DifficultyRegistry,
};
use crate::core::GameState;

/// Config plugin - must be added before any plugin reading the difficulty.
pub struct ConfigPlugin;

impl Plugin for ConfigPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<Difficulty>()
            .init_resource::<DifficultyRegistry>()
            .init_resource::<CurrentDifficulty>()
            .add_systems(Startup, load_difficulty_presets)
            // Resolved before anything else runs on entering the round
            .add_systems(OnEnter(GameState::InGame), resolve_difficulty);
    }
}
