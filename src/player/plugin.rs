//! Player plugin - spawning, movement and vitals.

use bevy::prelude::*;

use super::movement;
use super::pickups::collect_pickups;
use super::vitals::tick_player_vitals;
use crate::config::resolve_difficulty;
use crate::core::{GameState, PlayState};
use crate::world::setup_level;

/// Player plugin - handles player spawning, movement, and vitals.
pub struct PlayerPlugin;

impl Plugin for PlayerPlugin {
    fn build(&self, app: &mut App) {
        // Set up movement systems
        movement::setup_movement_systems(app);

        app.add_systems(
            OnEnter(GameState::InGame),
            movement::spawn_player
                .after(resolve_difficulty)
                .after(setup_level),
        )
        .add_systems(
            Update,
            (collect_pickups, tick_player_vitals).run_if(in_state(PlayState::Running)),
        );
    }
}
