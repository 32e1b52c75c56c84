//! Enemy animation systems.

use bevy::animation::{graph::AnimationNodeIndex, AnimationClip, AnimationPlayer, RepeatAnimation};
use bevy::prelude::*;

use super::attack::AttackStage;
use super::components::{Enemy, EnemyAnimator, EnemyType};
use super::controller::EnemyController;
use super::data::{AnimationConfig, EnemyRegistry};

/// Visual animation state derived from the animator flags.
#[derive(Component, Default, Clone, Copy, PartialEq, Eq, Debug)]
pub enum AnimationState {
    #[default]
    Idle,
    Walking,
    Running,
    Inspecting,
    Kicking,
}

impl AnimationState {
    /// Pick the clip for the current flags. The kick wins over everything.
    pub fn from_flags(animator: &EnemyAnimator, kicking: bool, walk_threshold: f32) -> Self {
        if kicking {
            AnimationState::Kicking
        } else if animator.inspecting {
            AnimationState::Inspecting
        } else if animator.running {
            AnimationState::Running
        } else if animator.locomotion_speed > walk_threshold {
            AnimationState::Walking
        } else {
            AnimationState::Idle
        }
    }
}

/// Stores animation graph handle and node indices for an enemy.
#[derive(Component)]
pub struct EnemyAnimations {
    pub graph: Handle<AnimationGraph>,
    pub idle: AnimationNodeIndex,
    pub walk: AnimationNodeIndex,
    pub run: AnimationNodeIndex,
    pub inspect: AnimationNodeIndex,
    pub kick: AnimationNodeIndex,
    pub walk_threshold: f32,
}

/// Links an enemy entity to its child AnimationPlayer entity.
#[derive(Component)]
pub struct AnimationLink(pub Entity);

/// Marker for enemies awaiting AnimationPlayer discovery.
#[derive(Component)]
pub struct NeedsAnimationSetup;

/// Finds AnimationPlayer in scene hierarchy and builds AnimationGraph.
pub fn setup_enemy_animations(
    mut commands: Commands,
    asset_server: Res<AssetServer>,
    registry: Res<EnemyRegistry>,
    mut graphs: ResMut<Assets<AnimationGraph>>,
    enemy_query: Query<(Entity, &EnemyType, &Children), (With<NeedsAnimationSetup>, With<Enemy>)>,
    children_query: Query<&Children>,
    mut animation_player_query: Query<(Entity, &mut AnimationPlayer)>,
) {
    for (enemy_entity, enemy_type, children) in enemy_query.iter() {
        // Find the AnimationPlayer in the hierarchy
        let Some(player_entity) =
            find_animation_player_entity(children, &children_query, &animation_player_query)
        else {
            continue;
        };

        let Some(definition) = registry.get(&enemy_type.0) else {
            warn!("No definition found for enemy type: {}", enemy_type.0);
            commands.entity(enemy_entity).remove::<NeedsAnimationSetup>();
            continue;
        };

        let Some(ref anim_config) = definition.animations else {
            // No animations configured, just remove the marker
            commands.entity(enemy_entity).remove::<NeedsAnimationSetup>();
            continue;
        };

        let model_base = definition.model_path.replace("#Scene0", "");
        let (graph, animations) = build_animation_graph(&asset_server, &model_base, anim_config);
        let graph_handle = graphs.add(graph);

        commands
            .entity(player_entity)
            .insert(AnimationGraphHandle(graph_handle.clone()));

        let idle_node = animations.idle;

        commands
            .entity(enemy_entity)
            .remove::<NeedsAnimationSetup>()
            .insert((
                AnimationLink(player_entity),
                EnemyAnimations {
                    graph: graph_handle,
                    ..animations
                },
                AnimationState::Idle,
            ));

        // Start idle right away so the first frame is not a T-pose
        if let Ok((_, mut player)) = animation_player_query.get_mut(player_entity) {
            player.stop_all();
            player.start(idle_node).set_repeat(RepeatAnimation::Forever);
        }

        debug!("Animation setup complete for enemy: {}", definition.name);
    }
}

/// Recursively search for AnimationPlayer entity in hierarchy.
fn find_animation_player_entity(
    children: &Children,
    children_query: &Query<&Children>,
    animation_player_query: &Query<(Entity, &mut AnimationPlayer)>,
) -> Option<Entity> {
    for &child in children.iter() {
        if animation_player_query.get(child).is_ok() {
            return Some(child);
        }

        if let Ok(grandchildren) = children_query.get(child) {
            if let Some(found) =
                find_animation_player_entity(grandchildren, children_query, animation_player_query)
            {
                return Some(found);
            }
        }
    }
    None
}

/// Build animation graph from config. The returned graph handle is a placeholder.
fn build_animation_graph(
    asset_server: &AssetServer,
    model_base: &str,
    config: &AnimationConfig,
) -> (AnimationGraph, EnemyAnimations) {
    let mut graph = AnimationGraph::new();
    let root = graph.root;

    let mut add = |index: u32| {
        let clip: Handle<AnimationClip> =
            asset_server.load(format!("{}#Animation{}", model_base, index));
        graph.add_clip(clip, 1.0, root)
    };

    let indices = &config.indices;
    let idle = add(indices.idle);
    let walk = add(indices.walk);
    let run = add(indices.run);
    let inspect = add(indices.inspect.unwrap_or(indices.idle));
    let kick = add(indices.kick);

    (
        graph,
        EnemyAnimations {
            graph: Handle::default(),
            idle,
            walk,
            run,
            inspect,
            kick,
            walk_threshold: config.walk_threshold,
        },
    )
}

/// Maps animator flags and the kick stage to AnimationState.
pub fn sync_animation_state(
    mut query: Query<
        (&mut EnemyAnimator, &EnemyController, &EnemyAnimations, &mut AnimationState),
        With<Enemy>,
    >,
) {
    for (mut animator, controller, animations, mut anim_state) in query.iter_mut() {
        let kicking = std::mem::take(&mut animator.kick_requested)
            || matches!(
                controller.attack_stage(),
                AttackStage::WindUp | AttackStage::Impact
            );

        let new_state = AnimationState::from_flags(&animator, kicking, animations.walk_threshold);
        anim_state.set_if_neq(new_state);
    }
}

/// Applies AnimationState changes to AnimationPlayer.
pub fn play_animations(
    query: Query<(&AnimationState, &AnimationLink, &EnemyAnimations), Changed<AnimationState>>,
    mut animation_players: Query<&mut AnimationPlayer>,
) {
    for (anim_state, link, animations) in query.iter() {
        let Ok(mut player) = animation_players.get_mut(link.0) else {
            continue;
        };

        let (node, is_looping) = match anim_state {
            AnimationState::Idle => (animations.idle, true),
            AnimationState::Walking => (animations.walk, true),
            AnimationState::Running => (animations.run, true),
            AnimationState::Inspecting => (animations.inspect, true),
            AnimationState::Kicking => (animations.kick, false),
        };

        player.stop_all();
        let anim = player.start(node);

        if is_looping {
            anim.set_repeat(RepeatAnimation::Forever);
        } else {
            anim.set_repeat(RepeatAnimation::Never);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_pick_the_clip() {
        let mut animator = EnemyAnimator::default();
        assert_eq!(AnimationState::from_flags(&animator, false, 0.1), AnimationState::Idle);

        animator.locomotion_speed = 2.0;
        assert_eq!(AnimationState::from_flags(&animator, false, 0.1), AnimationState::Walking);

        animator.running = true;
        assert_eq!(AnimationState::from_flags(&animator, false, 0.1), AnimationState::Running);

        animator.inspecting = true;
        assert_eq!(AnimationState::from_flags(&animator, false, 0.1), AnimationState::Inspecting);

        assert_eq!(AnimationState::from_flags(&animator, true, 0.1), AnimationState::Kicking);
    }
}
