//! ECS glue for the enemy brain: service adapters and per-frame systems.

use std::collections::HashSet;

use bevy::prelude::*;
use bevy_rapier3d::prelude::*;
use bevy_rapier3d::rapier::geometry::CollisionEventFlags;

use super::animation::NeedsAnimationSetup;
use super::components::{Enemy, EnemyAnimator, EnemyType};
use super::controller::{AgentPose, EnemyController};
use super::data::{ColliderConfig, EnemyRegistry};
use super::navigation::NavAgent;
use super::services::{
    AnimFlag, AudioCue, EnemyServices, Navigator, ObstacleQuery, PlayerWorld, Presentation,
};
use super::spawning::{SpawnOrder, SpawnPlan, Spawner};
use crate::config::CurrentDifficulty;
use crate::core::{PlayerDeathSequence, TimeDilation};
use crate::player::{DamageKind, KickGuard, Player, PlayerControl, PlayerVitals};
use crate::presentation::{BackgroundMusic, PresentationCue};
use crate::world::{actor_collision_groups, RoundEntity, Waypoints, OBSTACLE_GROUP};

/// Routes presentation calls of one enemy into its animator and the cue stream.
struct EnemyPresenter<'a, 'c, 'm> {
    animator: &'a mut EnemyAnimator,
    cues: &'a mut EventWriter<'c, PresentationCue>,
    music: &'a mut ResMut<'m, BackgroundMusic>,
}

impl Presentation for EnemyPresenter<'_, '_, '_> {
    fn set_anim_flag(&mut self, flag: AnimFlag, value: bool) {
        match flag {
            AnimFlag::Running => self.animator.running = value,
            AnimFlag::Inspecting => self.animator.inspecting = value,
        }
    }

    fn set_locomotion_speed(&mut self, speed: f32) {
        self.animator.locomotion_speed = speed;
    }

    fn trigger_kick(&mut self) {
        self.animator.kick_requested = true;
    }

    fn show_cinematic_camera(&mut self, show: bool) {
        self.cues.send(PresentationCue::Cinematic(show));
    }

    fn screen_shake(&mut self) {
        self.cues.send(PresentationCue::ScreenShake);
    }

    fn play_cue(&mut self, cue: AudioCue) {
        self.cues.send(PresentationCue::Audio(cue));
    }

    fn set_background_music(&mut self, playing: bool) {
        self.music.set_if_neq(BackgroundMusic { playing });
    }

    fn play_kick_hit_fx(&mut self) {
        self.cues.send(PresentationCue::KickHitFx);
    }
}

/// Mutable view of the player entity for one frame.
struct PlayerParts<'w> {
    position: Vec3,
    control: Mut<'w, PlayerControl>,
    guard: Mut<'w, KickGuard>,
    vitals: Mut<'w, PlayerVitals>,
    velocity: Mut<'w, Velocity>,
    impulse: Mut<'w, ExternalImpulse>,
}

/// [`PlayerWorld`] over the player components and the time dilation.
struct PlayerHandle<'w> {
    player: Option<PlayerParts<'w>>,
    dilation: ResMut<'w, TimeDilation>,
}

impl PlayerWorld for PlayerHandle<'_> {
    fn player_position(&self) -> Option<Vec3> {
        self.player.as_ref().map(|player| player.position)
    }

    fn freeze_player(&mut self, frozen: bool) {
        let Some(player) = self.player.as_mut() else {
            return;
        };
        player.control.frozen = frozen;
        if frozen {
            *player.velocity = Velocity::zero();
        }
    }

    fn was_recently_kicked(&self) -> bool {
        self.player
            .as_ref()
            .is_some_and(|player| player.guard.is_active())
    }

    fn mark_recently_kicked(&mut self) {
        if let Some(player) = self.player.as_mut() {
            player.guard.mark();
        }
    }

    fn apply_kick_force(&mut self, impulse: Vec3, torque: Vec3) {
        if let Some(player) = self.player.as_mut() {
            player.impulse.impulse += impulse;
            player.impulse.torque_impulse += torque;
        }
    }

    fn report_kick_damage(&mut self) {
        if let Some(player) = self.player.as_mut() {
            player.vitals.take_damage(DamageKind::Kick);
        }
    }

    fn set_time_scale(&mut self, scale: f32, fixed_step: f32) {
        self.dilation.set_if_neq(TimeDilation { scale, fixed_step });
    }
}

/// Sight occlusion against colliders in [`OBSTACLE_GROUP`].
///
/// Player and enemy bodies sit in the actor group, so neither the target
/// nor the looking enemy's own capsule blocks the ray.
struct RapierObstacles<'a> {
    context: Option<&'a RapierContext>,
}

impl ObstacleQuery for RapierObstacles<'_> {
    fn blocks(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> bool {
        let Some(context) = self.context else {
            return false;
        };
        let filter = QueryFilter::default()
            .groups(CollisionGroups::new(Group::ALL, OBSTACLE_GROUP))
            .exclude_sensors();
        context
            .cast_ray(origin, direction, max_distance, true, filter)
            .is_some()
    }
}

/// Run every enemy brain for this frame.
///
/// Enemies the player bumped into since the last frame are alerted first.
#[allow(clippy::too_many_arguments)]
pub fn enemy_ai_tick(
    time: Res<Time>,
    real_time: Res<Time<Real>>,
    rapier_context: Query<&RapierContext>,
    mut collisions: EventReader<CollisionEvent>,
    mut cues: EventWriter<PresentationCue>,
    mut music: ResMut<BackgroundMusic>,
    dilation: ResMut<TimeDilation>,
    mut players: Query<
        (
            Entity,
            &Transform,
            &mut PlayerControl,
            &mut KickGuard,
            &mut PlayerVitals,
            &mut Velocity,
            &mut ExternalImpulse,
        ),
        (With<Player>, Without<Enemy>),
    >,
    mut enemies: Query<
        (Entity, &Transform, &mut EnemyController, &mut NavAgent, &mut EnemyAnimator),
        (With<Enemy>, Without<Player>),
    >,
) {
    let player = players.get_single_mut().ok();
    let player_entity = player.as_ref().map(|parts| parts.0);

    let alerted = bumped_enemies(&mut collisions, player_entity, &mut cues);

    let mut world = PlayerHandle {
        player: player.map(|(_, transform, control, guard, vitals, velocity, impulse)| PlayerParts {
            position: transform.translation,
            control,
            guard,
            vitals,
            velocity,
            impulse,
        }),
        dilation,
    };
    let obstacles = RapierObstacles {
        context: rapier_context.get_single().ok(),
    };

    let delta = time.delta_secs();
    let real_delta = real_time.delta_secs();

    for (entity, transform, mut controller, mut agent, mut animator) in enemies.iter_mut() {
        agent.sync_position(transform.translation);
        let pose = AgentPose::from_transform(transform);

        let mut presenter = EnemyPresenter {
            animator: &mut *animator,
            cues: &mut cues,
            music: &mut music,
        };
        let mut services = EnemyServices {
            nav: &mut *agent,
            presentation: &mut presenter,
            world: &mut world,
            obstacles: &obstacles,
        };

        if alerted.contains(&entity) {
            controller.alert(&mut services);
        }
        controller.tick(delta, real_delta, &pose, &mut services);
    }
}

/// Enemies that started touching the player; every solid player contact bounces.
fn bumped_enemies(
    collisions: &mut EventReader<CollisionEvent>,
    player: Option<Entity>,
    cues: &mut EventWriter<PresentationCue>,
) -> HashSet<Entity> {
    let mut bumped = HashSet::new();
    let Some(player) = player else {
        collisions.clear();
        return bumped;
    };

    for event in collisions.read() {
        let CollisionEvent::Started(a, b, flags) = event else {
            continue;
        };
        if flags.contains(CollisionEventFlags::SENSOR) {
            continue;
        }
        let other = if *a == player {
            *b
        } else if *b == player {
            *a
        } else {
            continue;
        };

        cues.send(PresentationCue::Bounce);
        bumped.insert(other);
    }
    bumped
}

/// Permanently stop every enemy once the player's death sequence starts.
pub fn disable_enemies_on_death(
    mut deaths: EventReader<PlayerDeathSequence>,
    mut enemies: Query<&mut EnemyController>,
) {
    if deaths.read().count() == 0 {
        return;
    }
    for mut controller in enemies.iter_mut() {
        controller.disable();
    }
}

/// Batched spawner for the current round. `None` when misconfigured.
#[derive(Resource, Default)]
pub struct EnemySpawner {
    spawner: Option<Spawner>,
    /// Enemy type per roster index.
    types: Vec<String>,
}

impl EnemySpawner {
    pub fn is_running(&self) -> bool {
        self.spawner.as_ref().is_some_and(|spawner| !spawner.is_finished())
    }
}

/// Set up the spawner from the level waypoints and the enemy roster.
pub fn start_enemy_spawner(
    mut commands: Commands,
    waypoints: Res<Waypoints>,
    registry: Res<EnemyRegistry>,
    difficulty: Res<CurrentDifficulty>,
) {
    let (types, archetypes): (Vec<String>, Vec<_>) = registry.roster().into_iter().unzip();

    let mut plan = SpawnPlan::default();
    if let Some(settings) = difficulty.settings() {
        plan.total_enemies = settings.total_enemies;
    }

    let spawner = match Spawner::new(waypoints.0.clone(), archetypes, plan) {
        Ok(spawner) => {
            info!("Enemy spawner ready with {} enemy types", types.len());
            Some(spawner)
        }
        Err(e) => {
            error!("Enemy spawner disabled: {}", e);
            None
        }
    };

    commands.insert_resource(EnemySpawner { spawner, types });
}

/// Spawn the next batch once its pause is over.
pub fn run_enemy_spawner(
    mut commands: Commands,
    time: Res<Time>,
    asset_server: Res<AssetServer>,
    registry: Res<EnemyRegistry>,
    difficulty: Res<CurrentDifficulty>,
    mut spawner: ResMut<EnemySpawner>,
) {
    let EnemySpawner { spawner, types } = &mut *spawner;
    let Some(spawner) = spawner.as_mut() else {
        return;
    };

    for order in spawner.tick(time.delta_secs(), &mut rand::thread_rng()) {
        let Some(enemy_type) = types.get(order.roster_index) else {
            continue;
        };
        spawn_enemy(&mut commands, &asset_server, &registry, &difficulty, enemy_type, order);
    }
}

fn spawn_enemy(
    commands: &mut Commands,
    asset_server: &AssetServer,
    registry: &EnemyRegistry,
    difficulty: &CurrentDifficulty,
    enemy_type: &str,
    order: SpawnOrder,
) {
    let Some(definition) = registry.get(enemy_type) else {
        warn!("Unknown enemy type: {}", enemy_type);
        return;
    };

    let stats = definition.stats.clone().with_difficulty(difficulty.settings());
    let collider = definition.collider.clone().unwrap_or_default();

    let mut agent = NavAgent::new(order.position, stats.walk_speed);
    agent.set_avoidance_priority(order.avoidance_priority);

    let mut controller = EnemyController::new(
        definition.gender,
        definition.archetype,
        stats,
        order.position,
    );
    if let Some(route) = order.route {
        controller.assign_route(route, &mut agent);
    }

    commands
        .spawn((
            Enemy,
            EnemyType(enemy_type.to_string()),
            Name::new(definition.name.clone()),
            controller,
            agent,
            EnemyAnimator::default(),
            NeedsAnimationSetup,
            RoundEntity,
            Transform::from_translation(order.position),
            Visibility::default(),
            RigidBody::KinematicPositionBased,
            body_collider(&collider),
            actor_collision_groups(),
        ))
        .with_children(|parent| {
            // Models face +Z, the agent faces -Z
            parent.spawn((
                SceneRoot(asset_server.load(definition.model_path.clone())),
                Transform::from_scale(Vec3::splat(definition.scale))
                    .with_rotation(Quat::from_rotation_y(std::f32::consts::PI)),
            ));
        });
}

/// Capsule standing on the entity origin.
fn body_collider(config: &ColliderConfig) -> Collider {
    let center = Vec3::Y * (config.half_height + config.radius);
    Collider::compound(vec![(
        center,
        Quat::IDENTITY,
        Collider::capsule_y(config.half_height, config.radius),
    )])
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use bevy::time::TimeUpdateStrategy;

    use super::*;
    use crate::enemies::components::{EnemyArchetype, EnemyGender, EnemyState, EnemyStats};
    use crate::world::Obstacle;

    const PLAYER_AT: Vec3 = Vec3::new(0.0, 0.5, -5.0);
    const EYE: Vec3 = Vec3::new(0.0, 1.5, 0.0);

    fn physics_app() -> App {
        let mut app = App::new();
        app.add_plugins((
            MinimalPlugins,
            TransformPlugin,
            HierarchyPlugin,
            AssetPlugin::default(),
            bevy::scene::ScenePlugin,
        ))
        .init_asset::<Mesh>()
        .add_plugins(RapierPhysicsPlugin::<NoUserData>::default())
        .insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_millis(200)))
        .add_event::<PresentationCue>()
        .init_resource::<BackgroundMusic>()
        .init_resource::<TimeDilation>();
        app
    }

    fn spawn_player(app: &mut App) -> Entity {
        app.world_mut()
            .spawn((
                Player,
                PlayerControl::default(),
                KickGuard::default(),
                PlayerVitals::default(),
                Transform::from_translation(PLAYER_AT),
                RigidBody::Dynamic,
                GravityScale(0.0),
                Collider::ball(0.5),
                actor_collision_groups(),
                ActiveEvents::COLLISION_EVENTS,
                Velocity::default(),
                ExternalImpulse::default(),
            ))
            .id()
    }

    /// Standing guard at the origin, looking down -Z at the player.
    fn spawn_guard(app: &mut App) -> Entity {
        app.world_mut()
            .spawn((
                Enemy,
                EnemyController::new(
                    EnemyGender::Male,
                    EnemyArchetype::StandingDuty,
                    EnemyStats::default(),
                    Vec3::ZERO,
                ),
                NavAgent::new(Vec3::ZERO, 3.0),
                EnemyAnimator::default(),
                Transform::default(),
                RigidBody::KinematicPositionBased,
                body_collider(&ColliderConfig::default()),
                actor_collision_groups(),
            ))
            .id()
    }

    fn spawn_wall(app: &mut App) {
        app.world_mut().spawn((
            Obstacle,
            Transform::from_xyz(0.0, 1.5, -2.5),
            RigidBody::Fixed,
            Collider::cuboid(2.0, 1.5, 0.25),
            CollisionGroups::new(OBSTACLE_GROUP, Group::ALL),
        ));
    }

    fn sight_blocked(app: &mut App) -> bool {
        let world = app.world_mut();
        let mut contexts = world.query::<&RapierContext>();
        let context = contexts.single(world);
        let to_player = PLAYER_AT - EYE;
        RapierObstacles {
            context: Some(context),
        }
        .blocks(EYE, to_player.normalize(), to_player.length())
    }

    fn state_of(app: &App, enemy: Entity) -> EnemyState {
        app.world()
            .get::<EnemyController>(enemy)
            .map(|controller| controller.state())
            .unwrap_or_default()
    }

    /// Update index (from 1) at which the guard first reaches Chasing.
    fn frames_until_chasing(app: &mut App, enemy: Entity, frames: usize) -> Option<usize> {
        (1..=frames).find(|_| {
            app.update();
            state_of(app, enemy) == EnemyState::Chasing
        })
    }

    #[test]
    fn actors_do_not_block_sight() {
        let mut app = physics_app();
        spawn_player(&mut app);
        spawn_guard(&mut app);
        app.update();
        app.update();

        assert!(!sight_blocked(&mut app));
    }

    #[test]
    fn obstacle_blocks_sight() {
        let mut app = physics_app();
        spawn_player(&mut app);
        spawn_guard(&mut app);
        spawn_wall(&mut app);
        app.update();
        app.update();

        assert!(sight_blocked(&mut app));
    }

    #[test]
    fn guard_chases_after_detection_time() {
        let mut app = physics_app();
        app.add_systems(Update, enemy_ai_tick);
        spawn_player(&mut app);
        let guard = spawn_guard(&mut app);

        // First update has zero delta, then 0.2 s per frame.
        let frame = frames_until_chasing(&mut app, guard, 20);
        let frame = frame.unwrap_or(usize::MAX);
        assert!(frame > 6, "chased after only {frame} frames");
        assert!(frame <= 20, "never chased within 20 frames");
    }

    #[test]
    fn hidden_player_is_never_chased() {
        let mut app = physics_app();
        app.add_systems(Update, enemy_ai_tick);
        spawn_player(&mut app);
        spawn_wall(&mut app);
        let guard = spawn_guard(&mut app);

        assert_eq!(frames_until_chasing(&mut app, guard, 25), None);
        assert_eq!(state_of(&app, guard), EnemyState::Idle);
    }
}
