//! Kick trail behind the launched player ball.

use bevy::prelude::*;

use super::events::PresentationCue;
use crate::player::Player;

/// Seconds the trail keeps emitting after a kick lands.
pub const KICK_TRAIL_DURATION: f32 = 3.0;

const PUFF_INTERVAL: f32 = 0.04;
const PUFF_LIFETIME: f32 = 0.6;

/// Emits puffs behind the player while active.
#[derive(Component)]
pub struct KickTrail {
    pub emit: Timer,
    pub puff: Timer,
}

impl Default for KickTrail {
    fn default() -> Self {
        Self {
            emit: Timer::from_seconds(KICK_TRAIL_DURATION, TimerMode::Once),
            puff: Timer::from_seconds(PUFF_INTERVAL, TimerMode::Repeating),
        }
    }
}

/// A single shrinking trail puff.
#[derive(Component)]
pub struct TrailPuff(pub Timer);

/// Shared mesh and material for trail puffs.
#[derive(Resource)]
pub struct TrailAssets {
    mesh: Handle<Mesh>,
    material: Handle<StandardMaterial>,
}

pub fn setup_trail_assets(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    commands.insert_resource(TrailAssets {
        mesh: meshes.add(Sphere::new(0.25)),
        material: materials.add(StandardMaterial {
            base_color: Color::srgba(1.0, 0.85, 0.4, 0.6),
            emissive: LinearRgba::rgb(2.0, 1.2, 0.3),
            alpha_mode: AlphaMode::Blend,
            unlit: true,
            ..default()
        }),
    });
}

/// Start (or restart) the trail when a kick lands.
pub fn start_kick_trail(
    mut commands: Commands,
    mut cues: EventReader<PresentationCue>,
    players: Query<Entity, With<Player>>,
) {
    if !cues.read().any(|cue| *cue == PresentationCue::KickHitFx) {
        return;
    }
    for player in players.iter() {
        commands.entity(player).insert(KickTrail::default());
    }
}

pub fn emit_kick_trail(
    mut commands: Commands,
    time: Res<Time>,
    assets: Res<TrailAssets>,
    mut players: Query<(Entity, &Transform, &mut KickTrail)>,
) {
    for (entity, transform, mut trail) in players.iter_mut() {
        trail.emit.tick(time.delta());
        if trail.emit.finished() {
            commands.entity(entity).remove::<KickTrail>();
            continue;
        }

        trail.puff.tick(time.delta());
        for _ in 0..trail.puff.times_finished_this_tick() {
            commands.spawn((
                TrailPuff(Timer::from_seconds(PUFF_LIFETIME, TimerMode::Once)),
                Mesh3d(assets.mesh.clone()),
                MeshMaterial3d(assets.material.clone()),
                Transform::from_translation(transform.translation),
            ));
        }
    }
}

pub fn fade_trail_puffs(
    mut commands: Commands,
    time: Res<Time>,
    mut puffs: Query<(Entity, &mut TrailPuff, &mut Transform)>,
) {
    for (entity, mut puff, mut transform) in puffs.iter_mut() {
        puff.0.tick(time.delta());
        if puff.0.finished() {
            commands.entity(entity).despawn_recursive();
            continue;
        }
        transform.scale = Vec3::splat(1.0 - puff.0.fraction());
    }
}
