//! Core plugin that sets up game states, events, and fundamental systems.

use bevy::prelude::*;

use super::events::*;
use super::outcome::{reset_round, resolve_round_over, sunset_wins, GameOutcome};
use super::states::*;
use super::time::*;

/// Core plugin - must be added first as other plugins depend on it.
///
/// This plugin sets up:
/// - Game states (Loading, InGame, GameOver) and the pause sub-state
/// - Global events (PlayerDeathSequence, Sunset, RoundOverEvent)
/// - Time dilation and round outcome resolution
pub struct CorePlugin;

impl Plugin for CorePlugin {
    fn build(&self, app: &mut App) {
        app
            // Initialize game states
            .init_state::<GameState>()
            .add_sub_state::<PlayState>()

            // Round-wide resources
            .init_resource::<TimeDilation>()
            .init_resource::<GameOutcome>()

            // Register global events
            .add_event::<PlayerDeathSequence>()
            .add_event::<Sunset>()
            .add_event::<RoundOverEvent>()

            // Data files are read during Startup, so the round can begin right away
            .add_systems(OnEnter(GameState::Loading), start_round)
            .add_systems(OnEnter(GameState::InGame), reset_round)

            // Pause/unpause with Escape key
            .add_systems(Update, handle_pause_input.run_if(in_state(GameState::InGame)))
            .add_systems(OnEnter(PlayState::Paused), pause_virtual_time)
            .add_systems(OnExit(PlayState::Paused), resume_virtual_time)

            // Restart from the game-over screen
            .add_systems(Update, restart_input.run_if(in_state(GameState::GameOver)))

            .add_systems(
                Update,
                (sunset_wins, resolve_round_over)
                    .chain()
                    .run_if(in_state(GameState::InGame)),
            )
            .add_systems(Last, apply_time_dilation);
    }
}

/// Leave `Loading` as soon as startup loading is done.
fn start_round(mut next_state: ResMut<NextState<GameState>>) {
    next_state.set(GameState::InGame);
}

/// Press R on the game-over screen to play again.
fn restart_input(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut next_state: ResMut<NextState<GameState>>,
) {
    if keyboard.just_pressed(KeyCode::KeyR) {
        next_state.set(GameState::InGame);
    }
}
