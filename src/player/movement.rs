//! Rolling-ball player movement.

use bevy::prelude::*;
use bevy::window::{CursorGrabMode, PrimaryWindow};
use bevy_rapier3d::prelude::*;

use super::components::*;
use super::vitals::PlayerVitals;
use crate::config::CurrentDifficulty;
use crate::core::{GameState, PlayState};
use crate::presentation::CameraRig;
use crate::world::{actor_collision_groups, PlayerStart, RoundEntity};

/// Set up player movement systems.
pub fn setup_movement_systems(app: &mut App) {
    app
        .init_resource::<PlayerConfig>()
        .add_systems(OnEnter(GameState::InGame), grab_cursor)
        .add_systems(OnExit(GameState::InGame), release_cursor)
        .add_systems(OnEnter(PlayState::Paused), release_cursor)
        .add_systems(OnExit(PlayState::Paused), grab_cursor)
        .add_systems(
            Update,
            (ground_check, jump_player, start_boost, tick_boost, tick_kick_guard)
                .chain()
                .run_if(in_state(PlayState::Running)),
        )
        .add_systems(
            FixedUpdate,
            roll_player.run_if(in_state(PlayState::Running)),
        );
}

/// Grab and hide cursor when entering gameplay.
fn grab_cursor(mut window_query: Query<&mut Window, With<PrimaryWindow>>) {
    if let Ok(mut window) = window_query.get_single_mut() {
        window.cursor_options.grab_mode = CursorGrabMode::Locked;
        window.cursor_options.visible = false;
    }
}

/// Release cursor when leaving gameplay.
fn release_cursor(mut window_query: Query<&mut Window, With<PrimaryWindow>>) {
    if let Ok(mut window) = window_query.get_single_mut() {
        window.cursor_options.grab_mode = CursorGrabMode::None;
        window.cursor_options.visible = true;
    }
}

/// WASD input as a camera-relative direction on the ground plane.
fn input_direction(keyboard: &ButtonInput<KeyCode>, forward: Vec3, right: Vec3) -> Vec3 {
    let mut input = Vec2::ZERO;
    if keyboard.pressed(KeyCode::KeyW) {
        input.y += 1.0;
    }
    if keyboard.pressed(KeyCode::KeyS) {
        input.y -= 1.0;
    }
    if keyboard.pressed(KeyCode::KeyA) {
        input.x -= 1.0;
    }
    if keyboard.pressed(KeyCode::KeyD) {
        input.x += 1.0;
    }

    // Normalize to prevent faster diagonal movement
    let input = input.normalize_or_zero();
    right * input.x + forward * input.y
}

/// Steer the ball toward the input velocity.
///
/// Each step closes a fraction of the gap between current and target
/// horizontal velocity, so the ball keeps rolling momentum.
pub fn roll_player(
    keyboard: Res<ButtonInput<KeyCode>>,
    time: Res<Time>,
    config: Res<PlayerConfig>,
    rigs: Query<&CameraRig>,
    mut player_query: Query<(&PlayerControl, &Boost, &mut Velocity), With<Player>>,
) {
    let Ok((control, boost, mut velocity)) = player_query.get_single_mut() else {
        return;
    };
    if !control.accepts_input() {
        return;
    }

    let (forward, right) = rigs
        .get_single()
        .map(CameraRig::ground_axes)
        .unwrap_or((Vec3::NEG_Z, Vec3::X));

    let speed = target_speed(&config, boost.is_active(), keyboard.pressed(KeyCode::ShiftLeft));

    let target = input_direction(&keyboard, forward, right) * speed;
    let current = Vec3::new(velocity.linvel.x, 0.0, velocity.linvel.z);
    velocity.linvel += (target - current) * time.delta_secs();
}

/// Boost beats sprint, sprint beats walking.
fn target_speed(config: &PlayerConfig, boosting: bool, sprinting: bool) -> f32 {
    if boosting {
        config.boost_speed
    } else if sprinting {
        config.sprint_speed
    } else {
        config.move_speed
    }
}

/// Ground check using a short raycast below the ball.
pub fn ground_check(
    config: Res<PlayerConfig>,
    rapier_context: Query<&RapierContext>,
    mut player_query: Query<(Entity, &Transform, &mut MovementState), With<Player>>,
) {
    let Ok((player_entity, transform, mut movement_state)) = player_query.get_single_mut() else {
        return;
    };
    let Ok(context) = rapier_context.get_single() else {
        return;
    };

    movement_state.is_grounded = context
        .cast_ray(
            transform.translation,
            Vec3::NEG_Y,
            config.radius + config.ground_check_distance,
            true,
            QueryFilter::default()
                .exclude_collider(player_entity)
                .exclude_sensors(),
        )
        .is_some();
}

/// Jump with Space while grounded.
pub fn jump_player(
    keyboard: Res<ButtonInput<KeyCode>>,
    config: Res<PlayerConfig>,
    mut player_query: Query<(&MovementState, &PlayerControl, &mut ExternalImpulse), With<Player>>,
) {
    if !keyboard.just_pressed(KeyCode::Space) {
        return;
    }
    let Ok((movement_state, control, mut impulse)) = player_query.get_single_mut() else {
        return;
    };

    if movement_state.is_grounded && control.accepts_input() {
        impulse.impulse += Vec3::Y * config.jump_impulse;
    }
}

/// Spend a boost charge with E.
fn start_boost(
    keyboard: Res<ButtonInput<KeyCode>>,
    config: Res<PlayerConfig>,
    mut player_query: Query<(&PlayerControl, &PlayerVitals, &mut Boost), With<Player>>,
) {
    if !keyboard.just_pressed(KeyCode::KeyE) {
        return;
    }
    let Ok((control, vitals, mut boost)) = player_query.get_single_mut() else {
        return;
    };

    if control.accepts_input() && vitals.boosts() > 0 && boost.start(config.boost_duration) {
        debug!("Boost started, {} charges held", vitals.boosts());
    }
}

/// End a running boost and use up its charge.
fn tick_boost(time: Res<Time>, mut player_query: Query<(&mut Boost, &mut PlayerVitals), With<Player>>) {
    for (mut boost, mut vitals) in player_query.iter_mut() {
        if boost.tick(time.delta_secs()) {
            vitals.remove_boost();
        }
    }
}

fn tick_kick_guard(time: Res<Time>, mut guards: Query<&mut KickGuard, With<Player>>) {
    for mut guard in guards.iter_mut() {
        guard.tick(time.delta_secs());
    }
}

/// Spawn the player ball at the level's start position.
pub fn spawn_player(
    mut commands: Commands,
    config: Res<PlayerConfig>,
    start: Res<PlayerStart>,
    difficulty: Res<CurrentDifficulty>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let position = start.0;

    commands.spawn((
        Player,
        PlayerControl::default(),
        KickGuard::default(),
        Boost::default(),
        MovementState::default(),
        PlayerVitals::with_difficulty(difficulty.settings()),
        RoundEntity,
        Name::new("Player"),
        // Visuals
        Mesh3d(meshes.add(Sphere::new(config.radius))),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color: Color::srgb(0.95, 0.55, 0.15),
            perceptual_roughness: 0.6,
            ..default()
        })),
        Transform::from_translation(position),
        // Rapier physics components
        (
            RigidBody::Dynamic,
            Collider::ball(config.radius),
            actor_collision_groups(),
            ColliderMassProperties::Mass(1.0),
            Damping {
                linear_damping: 0.2,
                angular_damping: 0.5,
            },
            Velocity::default(),
            ExternalImpulse::default(),
            ActiveEvents::COLLISION_EVENTS,
        ),
    ));

    info!("Spawned player at {:?}", position);
}
