//! Game state definitions that control the overall flow of the game.
//!
//! States determine which systems run at any given time. Enemy AI and the
//! day clock only tick while a round is running and unpaused.

use bevy::prelude::*;

/// Main game states - controls overall game flow.
///
/// - Start in `Loading` while data files are read
/// - `InGame` for the round itself
/// - `GameOver` once the round is won or lost
#[derive(States, Debug, Clone, Copy, Eq, PartialEq, Hash, Default)]
pub enum GameState {
    /// Initial state - loading data files
    #[default]
    Loading,
    /// Active round
    InGame,
    /// Sun has set or the player was kicked out
    GameOver,
}

/// Sub-states for a round - only active when GameState::InGame.
///
/// Pausing lives here so that leaving the pause menu does not re-run the
/// round setup hooked on entering `InGame`.
#[derive(SubStates, Debug, Clone, Copy, Eq, PartialEq, Hash, Default)]
#[source(GameState = GameState::InGame)]
pub enum PlayState {
    /// Normal gameplay
    #[default]
    Running,
    /// Pause menu is open, virtual time is stopped
    Paused,
}
