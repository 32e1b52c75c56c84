//! Straight-line steering agent standing in for a navmesh.
//!
//! Agents walk directly toward their destination and push away from
//! neighbours that outrank them. Lower priority values outrank higher ones,
//! so later spawns step aside for earlier ones.

use bevy::prelude::*;

use super::services::Navigator;

/// Agents closer than this push each other apart.
pub const SEPARATION_RADIUS: f32 = 1.2;

const SEPARATION_STRENGTH: f32 = 2.5;

/// Minimum speed at which the agent turns to face its heading.
const TURN_SPEED_THRESHOLD: f32 = 0.05;

/// Per-enemy movement state driven through [`Navigator`].
#[derive(Component, Debug, Clone)]
pub struct NavAgent {
    position: Vec3,
    destination: Option<Vec3>,
    speed: f32,
    stopping_distance: f32,
    paused: bool,
    avoidance_priority: u32,
    velocity: Vec3,
}

impl NavAgent {
    pub fn new(position: Vec3, speed: f32) -> Self {
        Self {
            position,
            destination: None,
            speed,
            stopping_distance: 0.5,
            paused: false,
            avoidance_priority: 50,
            velocity: Vec3::ZERO,
        }
    }

    pub fn destination(&self) -> Option<Vec3> {
        self.destination
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn avoidance_priority(&self) -> u32 {
        self.avoidance_priority
    }

    pub fn velocity(&self) -> Vec3 {
        self.velocity
    }

    /// Record where the agent is before the AI reads distances.
    pub fn sync_position(&mut self, position: Vec3) {
        self.position = position;
    }

    /// Velocity toward the destination, ignoring neighbours.
    pub fn desired_velocity(&self) -> Vec3 {
        if self.paused {
            return Vec3::ZERO;
        }
        let Some(destination) = self.destination else {
            return Vec3::ZERO;
        };

        let to_target = flat(destination - self.position);
        if to_target.length() <= self.stopping_distance {
            return Vec3::ZERO;
        }
        to_target.normalize_or_zero() * self.speed
    }
}

impl Navigator for NavAgent {
    fn request_destination(&mut self, position: Vec3) {
        self.destination = Some(position);
    }

    fn remaining_distance(&self) -> f32 {
        self.destination
            .map(|destination| flat(destination - self.position).length())
            .unwrap_or(0.0)
    }

    fn stopping_distance(&self) -> f32 {
        self.stopping_distance
    }

    fn is_path_pending(&self) -> bool {
        // Straight-line paths resolve immediately
        false
    }

    fn velocity_magnitude(&self) -> f32 {
        self.velocity.length()
    }

    fn set_speed(&mut self, speed: f32) {
        self.speed = speed.max(0.0);
    }

    fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
        if paused {
            self.velocity = Vec3::ZERO;
        }
    }

    fn set_avoidance_priority(&mut self, priority: u32) {
        self.avoidance_priority = priority;
    }
}

fn flat(v: Vec3) -> Vec3 {
    Vec3::new(v.x, 0.0, v.z)
}

/// Push away from neighbours that outrank `priority`.
pub fn separation(position: Vec3, priority: u32, neighbours: &[(Entity, Vec3, u32)], me: Entity) -> Vec3 {
    neighbours
        .iter()
        .filter(|(entity, _, other)| *entity != me && *other <= priority)
        .filter_map(|(_, other_position, _)| {
            let away = flat(position - *other_position);
            let distance = away.length();
            (distance > f32::EPSILON && distance < SEPARATION_RADIUS)
                .then(|| away / distance * (SEPARATION_RADIUS - distance) / SEPARATION_RADIUS)
        })
        .sum::<Vec3>()
        * SEPARATION_STRENGTH
}

/// Move every agent for this frame and turn it toward its heading.
pub fn steer_agents(time: Res<Time>, mut agents: Query<(Entity, &mut Transform, &mut NavAgent)>) {
    let delta = time.delta_secs();
    if delta <= 0.0 {
        return;
    }

    let neighbours: Vec<(Entity, Vec3, u32)> = agents
        .iter()
        .map(|(entity, transform, agent)| (entity, transform.translation, agent.avoidance_priority))
        .collect();

    for (entity, mut transform, mut agent) in agents.iter_mut() {
        let desired = agent.desired_velocity();
        let mut velocity = desired;
        if !agent.paused {
            velocity += separation(transform.translation, agent.avoidance_priority, &neighbours, entity);
        }
        if agent.speed > 0.0 {
            velocity = velocity.clamp_length_max(agent.speed);
        }

        transform.translation += velocity * delta;
        agent.velocity = velocity;
        agent.position = transform.translation;

        if desired.length() > TURN_SPEED_THRESHOLD {
            transform.look_to(desired, Vec3::Y);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remaining_distance_ignores_height() {
        let mut agent = NavAgent::new(Vec3::ZERO, 3.0);
        assert_eq!(agent.remaining_distance(), 0.0);

        agent.request_destination(Vec3::new(3.0, 5.0, 4.0));
        assert!((agent.remaining_distance() - 5.0).abs() < 1e-5);
    }

    #[test]
    fn paused_or_arrived_agent_stands_still() {
        let mut agent = NavAgent::new(Vec3::ZERO, 3.0);
        agent.request_destination(Vec3::new(0.0, 0.0, 0.4));
        assert_eq!(agent.desired_velocity(), Vec3::ZERO);

        agent.request_destination(Vec3::new(0.0, 0.0, 10.0));
        assert!((agent.desired_velocity() - Vec3::Z * 3.0).length() < 1e-5);

        agent.set_paused(true);
        assert_eq!(agent.desired_velocity(), Vec3::ZERO);
    }

    #[test]
    fn only_outranking_neighbours_push() {
        let mut world = World::new();
        let me = world.spawn_empty().id();
        let senior = world.spawn_empty().id();
        let junior = world.spawn_empty().id();

        let neighbours = [
            (me, Vec3::ZERO, 5),
            (senior, Vec3::new(0.5, 0.0, 0.0), 1),
            (junior, Vec3::new(0.0, 0.0, 0.5), 9),
        ];

        let push = separation(Vec3::ZERO, 5, &neighbours, me);
        assert!(push.x < 0.0);
        assert_eq!(push.z, 0.0);
    }

    #[test]
    fn agents_walk_toward_destination() {
        let mut app = App::new();
        app.init_resource::<Time>().add_systems(Update, steer_agents);

        let mut agent = NavAgent::new(Vec3::ZERO, 2.0);
        agent.request_destination(Vec3::new(10.0, 0.0, 0.0));
        let entity = app.world_mut().spawn((Transform::default(), agent)).id();

        app.world_mut()
            .resource_mut::<Time>()
            .advance_by(std::time::Duration::from_millis(500));
        app.update();

        let transform = app.world().get::<Transform>(entity).unwrap();
        assert!((transform.translation.x - 1.0).abs() < 1e-4);
        assert!(transform.forward().as_vec3().abs_diff_eq(Vec3::X, 1e-4));
        let agent = app.world().get::<NavAgent>(entity).unwrap();
        assert!((agent.velocity_magnitude() - 2.0).abs() < 1e-4);
    }
}
