//! Level construction from data definitions.

use bevy::prelude::*;
use bevy_rapier3d::prelude::*;

use super::data::{LevelDefinition, ObstacleDef, PickupDef, PickupKind};
use super::materials::MaterialRegistry;
use super::sun::{Sun, SUN_ILLUMINANCE};

/// Collision group of the player and enemy bodies.
pub const ACTOR_GROUP: Group = Group::GROUP_1;

/// Collision group of geometry that blocks enemy sight.
pub const OBSTACLE_GROUP: Group = Group::GROUP_2;

/// Collision group of pickup sensors.
pub const PICKUP_GROUP: Group = Group::GROUP_3;

/// Groups for the player and enemy bodies: they collide with everything
/// but never count as sight blockers.
pub fn actor_collision_groups() -> CollisionGroups {
    CollisionGroups::new(ACTOR_GROUP, Group::ALL)
}

/// Thickness of the ground slab below y = 0.
const GROUND_THICKNESS: f32 = 0.5;

/// Marker for everything that belongs to one round and is despawned after it.
#[derive(Component)]
pub struct RoundEntity;

/// Marker for obstacle boxes.
#[derive(Component)]
pub struct Obstacle;

/// A collectible lying in the level.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pickup(pub PickupKind);

/// Waypoint pool of the current level.
#[derive(Resource, Default, Debug, Clone)]
pub struct Waypoints(pub Vec<Vec3>);

/// Where the player ball is spawned.
#[derive(Resource, Debug, Clone, Copy)]
pub struct PlayerStart(pub Vec3);

impl Default for PlayerStart {
    fn default() -> Self {
        Self(Vec3::Y)
    }
}

/// Build a level from a level definition.
pub fn build_level_from_data(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
    level: &LevelDefinition,
) {
    let mat_registry = MaterialRegistry::new(materials);

    setup_environment(commands, level);
    spawn_ground(commands, meshes, &mat_registry, level.ground_size);

    for obstacle in &level.obstacles {
        spawn_obstacle(commands, meshes, &mat_registry, obstacle);
    }

    for pickup in &level.pickups {
        spawn_pickup(commands, meshes, materials, pickup);
    }

    commands.insert_resource(Waypoints(level.waypoints()));
    commands.insert_resource(PlayerStart(level.player_start()));
}

/// Set up global ambient light and the sun.
fn setup_environment(commands: &mut Commands, level: &LevelDefinition) {
    let (r, g, b) = level.ambient.color;
    commands.insert_resource(AmbientLight {
        color: Color::srgb(r, g, b),
        brightness: level.ambient.brightness,
    });

    // Afternoon sun, lowered by the sun clock as the day ends
    commands.spawn((
        Sun,
        DirectionalLight {
            color: Color::srgb(1.0, 0.92, 0.78),
            illuminance: SUN_ILLUMINANCE,
            shadows_enabled: true,
            ..default()
        },
        Transform::default(),
        RoundEntity,
    ));
}

fn spawn_ground(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    mat_registry: &MaterialRegistry,
    (width, depth): (f32, f32),
) {
    commands.spawn((
        Name::new("Ground"),
        Mesh3d(meshes.add(Cuboid::new(width, GROUND_THICKNESS, depth))),
        MeshMaterial3d(mat_registry.ground.clone()),
        Transform::from_xyz(0.0, -GROUND_THICKNESS / 2.0, 0.0),
        RigidBody::Fixed,
        Collider::cuboid(width / 2.0, GROUND_THICKNESS / 2.0, depth / 2.0),
        RoundEntity,
    ));
}

fn spawn_obstacle(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    mat_registry: &MaterialRegistry,
    obstacle: &ObstacleDef,
) {
    let (width, height, depth) = obstacle.size;
    let (x, z) = obstacle.position;

    commands.spawn((
        Obstacle,
        Mesh3d(meshes.add(Cuboid::new(width, height, depth))),
        MeshMaterial3d(mat_registry.get(&obstacle.material)),
        Transform::from_xyz(x, height / 2.0, z)
            .with_rotation(Quat::from_rotation_y(obstacle.yaw.to_radians())),
        RigidBody::Fixed,
        Collider::cuboid(width / 2.0, height / 2.0, depth / 2.0),
        CollisionGroups::new(OBSTACLE_GROUP, Group::ALL),
        RoundEntity,
    ));
}

fn spawn_pickup(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
    pickup: &PickupDef,
) {
    let (mesh, color) = match pickup.kind {
        PickupKind::OxyCan => (meshes.add(Cylinder::new(0.2, 0.5)), Color::srgb(0.3, 0.75, 0.95)),
        PickupKind::Toolbox => (meshes.add(Cuboid::new(0.6, 0.3, 0.35)), Color::srgb(0.85, 0.2, 0.15)),
    };
    let (x, z) = pickup.position;

    commands.spawn((
        Pickup(pickup.kind),
        Name::new(format!("{:?}", pickup.kind)),
        Mesh3d(mesh),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color: color,
            emissive: LinearRgba::from(color) * 0.3,
            ..default()
        })),
        Transform::from_xyz(x, 0.5, z),
        Collider::ball(0.6),
        Sensor,
        CollisionGroups::new(PICKUP_GROUP, ACTOR_GROUP),
        RoundEntity,
    ));
}
