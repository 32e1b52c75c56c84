//! Presentation plugin - wires cue consumers into the frame.

use bevy::prelude::*;
use bevy::transform::TransformSystem;
use bevy_kira_audio::prelude::*;
use bevy_rapier3d::prelude::PhysicsSet;

use super::audio::*;
use super::camera::*;
use super::effects::*;
use super::events::PresentationCue;
use crate::core::{GameState, PlayState};

/// Camera, sound and VFX. Gameplay talks to it through [`PresentationCue`]
/// events and the [`BackgroundMusic`] resource.
pub struct PresentationPlugin;

impl Plugin for PresentationPlugin {
    fn build(&self, app: &mut App) {
        app
            .add_event::<PresentationCue>()
            .add_audio_channel::<MusicChannel>()
            .add_audio_channel::<StingerChannel>()
            .add_audio_channel::<BounceChannel>()
            .init_resource::<BackgroundMusic>()
            .init_resource::<CameraConfig>()
            .init_resource::<ScreenShake>()
            .add_systems(Startup, (spawn_camera, load_sounds, setup_trail_assets))
            .add_systems(OnEnter(GameState::InGame), reset_camera)
            .add_systems(
                Update,
                orbit_camera.run_if(in_state(PlayState::Running)),
            )
            .add_systems(
                Update,
                (
                    apply_camera_cues,
                    play_audio_cues,
                    start_kick_trail,
                    emit_kick_trail,
                    fade_trail_puffs,
                ),
            )
            .add_systems(
                PostUpdate,
                (
                    sync_background_music,
                    follow_player
                        .after(PhysicsSet::Writeback)
                        .before(TransformSystem::TransformPropagate),
                ),
            );
    }
}
