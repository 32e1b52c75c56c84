//! World plugin - level loading, the sun clock and round cleanup.

use bevy::prelude::*;

use crate::config::resolve_difficulty;
use crate::core::{GameState, PlayState};

use super::builder::{build_level_from_data, PlayerStart, RoundEntity, Waypoints};
use super::data::{load_level_definitions, CurrentLevel, LevelRegistry};
use super::sun::{advance_sun, start_sun_clock, SunClock};

/// World plugin - handles level loading and world setup.
pub struct WorldPlugin;

impl Plugin for WorldPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<LevelRegistry>()
            .init_resource::<CurrentLevel>()
            .init_resource::<Waypoints>()
            .init_resource::<PlayerStart>()
            .init_resource::<SunClock>()
            .add_systems(Startup, load_level_definitions)
            .add_systems(
                OnEnter(GameState::InGame),
                (setup_level, start_sun_clock.after(resolve_difficulty)),
            )
            .add_systems(Update, advance_sun.run_if(in_state(PlayState::Running)))
            // The world stays visible behind the game-over screen
            .add_systems(OnExit(GameState::GameOver), cleanup_round);
    }
}

/// Set up the level from data.
pub fn setup_level(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    level_registry: Res<LevelRegistry>,
    current_level: Res<CurrentLevel>,
) {
    let Some(level) = level_registry.get(&current_level.name) else {
        error!("Level '{}' not found in registry!", current_level.name);
        return;
    };

    info!("Building level: {}", level.name);

    build_level_from_data(&mut commands, &mut meshes, &mut materials, level);
}

/// Despawn everything spawned for the round that just ended.
fn cleanup_round(mut commands: Commands, round_query: Query<Entity, With<RoundEntity>>) {
    for entity in round_query.iter() {
        commands.entity(entity).despawn_recursive();
    }
}
