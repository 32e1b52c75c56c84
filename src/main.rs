//! Sundown Chase - Entry Point
//!
//! Usage: `sundown-chase [easy|normal|hard]`
//!
//! Controls:
//! - WASD: Roll
//! - Mouse: Orbit camera
//! - Shift: Sprint
//! - Space: Jump
//! - Escape: Pause/Unpause
//! - R: Play again after the round ends

use bevy::prelude::*;
use bevy_kira_audio::AudioPlugin;
use bevy_rapier3d::prelude::*;

use sundown_chase::config::Difficulty;

fn main() {
    let mut app = App::new();

    app
        // Bevy default plugins
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Sundown Chase".to_string(),
                resolution: (1280.0, 720.0).into(),
                ..default()
            }),
            ..default()
        }))

        // Physics
        .add_plugins(RapierPhysicsPlugin::<NoUserData>::default())

        // Audio
        .add_plugins(AudioPlugin)

        // Our game plugin
        .add_plugins(sundown_chase::SundownPlugin);

    // Optional difficulty argument; init_resource in the plugin keeps an inserted value
    if let Some(arg) = std::env::args().nth(1) {
        match arg.parse::<Difficulty>() {
            Ok(difficulty) => {
                info!("Difficulty: {}", difficulty);
                app.insert_resource(difficulty);
            }
            Err(e) => warn!("{}, playing on normal", e),
        }
    }

    app.run();
}
