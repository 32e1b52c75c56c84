//! Enemy plugin - registers all enemy systems.

use bevy::prelude::*;

use super::ai;
use super::animation;
use super::data::{load_enemy_definitions, EnemyRegistry};
use super::navigation::steer_agents;
use crate::config::resolve_difficulty;
use crate::core::{GameState, PlayState};
use crate::world::setup_level;

/// Enemy plugin - handles enemy spawning, AI and animations.
pub struct EnemyPlugin;

impl Plugin for EnemyPlugin {
    fn build(&self, app: &mut App) {
        app
            .init_resource::<EnemyRegistry>()
            .init_resource::<ai::EnemySpawner>()
            .add_systems(Startup, load_enemy_definitions)
            // Spawner needs the waypoints and the resolved difficulty
            .add_systems(
                OnEnter(GameState::InGame),
                ai::start_enemy_spawner
                    .after(setup_level)
                    .after(resolve_difficulty),
            )
            // AI systems run during gameplay
            .add_systems(
                Update,
                (ai::run_enemy_spawner, ai::enemy_ai_tick, steer_agents)
                    .chain()
                    .run_if(in_state(PlayState::Running)),
            )
            // Still runs on the game-over frame so the death broadcast is not missed
            .add_systems(
                Update,
                ai::disable_enemies_on_death
                    .before(ai::enemy_ai_tick)
                    .run_if(in_round),
            )
            // Animation systems run after AI systems
            .add_systems(
                Update,
                (
                    animation::setup_enemy_animations,
                    animation::sync_animation_state,
                    animation::play_animations,
                )
                    .chain()
                    .after(ai::enemy_ai_tick)
                    .run_if(in_round),
            );
    }
}

fn in_round(state: Option<Res<State<GameState>>>) -> bool {
    state.is_some_and(|state| *state.get() != GameState::Loading)
}
