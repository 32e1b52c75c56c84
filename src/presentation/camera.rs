//! Third-person follow camera with a cinematic kick angle and screen shake.

use bevy::input::mouse::MouseMotion;
use bevy::prelude::*;
use rand::Rng;

use super::events::PresentationCue;
use crate::player::Player;

/// How the rig frames the player.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum CameraMode {
    #[default]
    Follow,
    /// Low side angle used during a kick.
    Cinematic,
}

/// Orbit camera around the player, steered by the mouse.
#[derive(Component, Debug, Clone)]
pub struct CameraRig {
    /// Horizontal angle in radians
    pub yaw: f32,
    /// Vertical angle in radians, negative looks down
    pub pitch: f32,
    pub distance: f32,
    pub mode: CameraMode,
}

impl Default for CameraRig {
    fn default() -> Self {
        Self {
            yaw: 0.0,
            pitch: -0.35,
            distance: 7.0,
            mode: CameraMode::Follow,
        }
    }
}

impl CameraRig {
    /// Camera forward and right flattened onto the ground plane.
    pub fn ground_axes(&self) -> (Vec3, Vec3) {
        let rotation = Quat::from_rotation_y(self.yaw);
        (rotation * Vec3::NEG_Z, rotation * Vec3::X)
    }

    /// Where the camera sits relative to the player.
    pub fn offset(&self) -> Vec3 {
        match self.mode {
            CameraMode::Follow => {
                Quat::from_euler(EulerRot::YXZ, self.yaw, self.pitch, 0.0) * Vec3::Z * self.distance
            }
            CameraMode::Cinematic => {
                let (forward, right) = self.ground_axes();
                right * 3.0 + forward * 1.5 + Vec3::Y * 0.6
            }
        }
    }
}

/// Mouse sensitivity for the orbit camera.
#[derive(Resource)]
pub struct CameraConfig {
    pub mouse_sensitivity: f32,
    pub invert_y: bool,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            mouse_sensitivity: 1.5,
            invert_y: false,
        }
    }
}

/// Decaying random camera offset.
#[derive(Resource, Default)]
pub struct ScreenShake {
    pub intensity: f32,
    pub duration: f32,
    pub timer: f32,
}

impl ScreenShake {
    pub fn shake(&mut self, intensity: f32, duration: f32) {
        // Only override if new shake is stronger
        if intensity > self.intensity || self.timer <= 0.0 {
            self.intensity = intensity;
            self.duration = duration;
            self.timer = duration;
        }
    }

    pub fn update<R: Rng + ?Sized>(&mut self, delta: f32, rng: &mut R) -> Vec3 {
        if self.timer <= 0.0 {
            return Vec3::ZERO;
        }

        self.timer = (self.timer - delta).max(0.0);
        let current_intensity = self.intensity * self.timer / self.duration;

        let x = rng.gen_range(-1.0..=1.0) * current_intensity;
        let y = rng.gen_range(-1.0..=1.0) * current_intensity;
        Vec3::new(x, y, 0.0)
    }
}

pub fn spawn_camera(mut commands: Commands) {
    commands.spawn((
        Camera3d::default(),
        CameraRig::default(),
        Transform::from_xyz(0.0, 4.0, 8.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));
}

/// Handle mouse movement for orbiting the camera.
pub fn orbit_camera(
    mut mouse_motion: EventReader<MouseMotion>,
    config: Res<CameraConfig>,
    mut rigs: Query<&mut CameraRig>,
) {
    // Accumulate mouse movement
    let delta: Vec2 = mouse_motion.read().map(|event| event.delta).sum();
    if delta == Vec2::ZERO {
        return;
    }

    let sensitivity = config.mouse_sensitivity * 0.001;
    let y_invert = if config.invert_y { -1.0 } else { 1.0 };

    for mut rig in rigs.iter_mut() {
        rig.yaw -= delta.x * sensitivity;
        rig.pitch = (rig.pitch - delta.y * sensitivity * y_invert).clamp(-1.2, 0.3);
    }
}

/// React to cinematic and shake requests.
pub fn apply_camera_cues(
    mut cues: EventReader<PresentationCue>,
    mut shake: ResMut<ScreenShake>,
    mut rigs: Query<&mut CameraRig>,
) {
    for cue in cues.read() {
        match *cue {
            PresentationCue::Cinematic(show) => {
                let mode = if show {
                    CameraMode::Cinematic
                } else {
                    CameraMode::Follow
                };
                for mut rig in rigs.iter_mut() {
                    rig.mode = mode;
                }
            }
            PresentationCue::ScreenShake => shake.shake(0.6, 0.5),
            _ => {}
        }
    }
}

/// Place the camera around the player. Runs on wall-clock time so slow
/// motion does not drag the shake out.
pub fn follow_player(
    time: Res<Time<Real>>,
    mut shake: ResMut<ScreenShake>,
    players: Query<&Transform, (With<Player>, Without<CameraRig>)>,
    mut cameras: Query<(&CameraRig, &mut Transform)>,
) {
    let Ok(player) = players.get_single() else {
        return;
    };
    let jitter = shake.update(time.delta_secs(), &mut rand::thread_rng());

    for (rig, mut transform) in cameras.iter_mut() {
        let target = player.translation;
        *transform = Transform::from_translation(target + rig.offset()).looking_at(target, Vec3::Y);
        let jitter = transform.rotation * jitter;
        transform.translation += jitter;
    }
}

/// Put the camera back into follow mode for a new round.
pub fn reset_camera(mut shake: ResMut<ScreenShake>, mut rigs: Query<&mut CameraRig>) {
    *shake = ScreenShake::default();
    for mut rig in rigs.iter_mut() {
        rig.mode = CameraMode::Follow;
    }
}
