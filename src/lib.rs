//! Sundown Chase - a third-person stealth chase in Bevy.
//!
//! Roll through a town full of townsfolk until the sun sets. Anyone who
//! spots you long enough gives chase, and getting caught earns a
//! slow-motion kick.
//!
//! # Architecture
//!
//! The game is organized into plugins, each handling a specific aspect:
//!
//! - **Config**: Difficulty presets, RON loading helpers
//! - **Core**: Game states, global events, time dilation, round outcome
//! - **Player**: Rolling ball movement, kick guard, health
//! - **Enemies**: Perception, state machine, patrols, kicks, spawning
//! - **World**: Level data, obstacles, the sun clock
//! - **Presentation**: Camera, audio, visual effects
//! - **UI**: HUD, pause and game-over screens

pub mod config;
pub mod core;
pub mod enemies;
pub mod player;
pub mod presentation;
pub mod ui;
pub mod world;

use bevy::prelude::*;

/// Main game plugin that adds all sub-plugins.
pub struct SundownPlugin;

impl Plugin for SundownPlugin {
    fn build(&self, app: &mut App) {
        app
            // Core systems (must be first)
            .add_plugins(core::CorePlugin)

            // Difficulty presets
            .add_plugins(config::ConfigPlugin)

            // World systems
            .add_plugins(world::WorldPlugin)

            // Player systems
            .add_plugins(player::PlayerPlugin)

            // Enemy systems
            .add_plugins(enemies::EnemyPlugin)

            // Camera, audio and effects
            .add_plugins(presentation::PresentationPlugin)

            // UI systems
            .add_plugins(ui::UiPlugin);
    }
}
