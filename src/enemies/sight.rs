//! Sight cone visibility test.

use bevy::prelude::*;

use super::services::ObstacleQuery;

/// Where an enemy looks from and which way it faces.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObserverPose {
    /// Eye position, the origin of the sight ray.
    pub eye: Vec3,
    /// Facing direction of the body (need not be normalized).
    pub forward: Vec3,
}

/// Radius + cone + occlusion check. Stateless, evaluated every tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SightSensor {
    pub view_radius: f32,
    /// Full cone angle in degrees.
    pub view_angle: f32,
}

impl SightSensor {
    pub fn new(view_radius: f32, view_angle: f32) -> Self {
        Self {
            view_radius,
            view_angle,
        }
    }

    /// Whether `target` can be seen from `observer`.
    pub fn is_visible(
        &self,
        observer: &ObserverPose,
        target: Vec3,
        obstacles: &dyn ObstacleQuery,
    ) -> bool {
        let to_target = target - observer.eye;
        let distance = to_target.length();

        if distance > self.view_radius {
            return false;
        }

        // Target sits on the eye, nothing can be in between
        if distance <= f32::EPSILON {
            return true;
        }

        let direction = to_target / distance;
        let forward = observer.forward.normalize_or_zero();
        if forward == Vec3::ZERO {
            return false;
        }

        let angle = forward.angle_between(direction).to_degrees();
        if angle > self.view_angle / 2.0 {
            return false;
        }

        !obstacles.blocks(observer.eye, direction, distance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enemies::services::fakes::Wall;
    use crate::enemies::services::fakes::NoObstacles;

    fn observer_at_origin() -> ObserverPose {
        ObserverPose {
            eye: Vec3::ZERO,
            forward: Vec3::Z,
        }
    }

    fn sensor() -> SightSensor {
        SightSensor::new(10.0, 90.0)
    }

    #[test]
    fn sees_player_straight_ahead() {
        assert!(sensor().is_visible(&observer_at_origin(), Vec3::new(0.0, 0.0, 5.0), &NoObstacles));
    }

    #[test]
    fn player_beyond_radius_is_hidden() {
        assert!(!sensor().is_visible(&observer_at_origin(), Vec3::new(0.0, 0.0, 15.0), &NoObstacles));
    }

    #[test]
    fn player_outside_cone_is_hidden() {
        let angle = 60f32.to_radians();
        let target = Vec3::new(angle.sin(), 0.0, angle.cos()) * 5.0;
        assert!(!sensor().is_visible(&observer_at_origin(), target, &NoObstacles));
    }

    #[test]
    fn player_inside_cone_edge_is_seen() {
        let angle = 40f32.to_radians();
        let target = Vec3::new(angle.sin(), 0.0, angle.cos()) * 5.0;
        assert!(sensor().is_visible(&observer_at_origin(), target, &NoObstacles));
    }

    #[test]
    fn obstacle_blocks_sight() {
        let target = Vec3::new(0.0, 0.0, 5.0);
        assert!(!sensor().is_visible(&observer_at_origin(), target, &Wall { blocked: true }));
        assert!(sensor().is_visible(&observer_at_origin(), target, &Wall { blocked: false }));
    }

    #[test]
    fn unnormalized_forward_is_accepted() {
        let observer = ObserverPose {
            eye: Vec3::ZERO,
            forward: Vec3::Z * 3.0,
        };
        assert!(sensor().is_visible(&observer, Vec3::new(0.0, 0.0, 5.0), &NoObstacles));
    }

    #[test]
    fn player_behind_is_hidden() {
        assert!(!sensor().is_visible(&observer_at_origin(), Vec3::new(0.0, 0.0, -3.0), &NoObstacles));
    }
}
