//! Enemy-related components and shared enemy types.

use bevy::prelude::*;
use serde::Deserialize;

use crate::config::DifficultySettings;

/// Marker component for all enemies.
#[derive(Component)]
pub struct Enemy;

/// Enemy type identifier (matches RON file name).
#[derive(Component, Clone)]
pub struct EnemyType(pub String);

/// Voice used for the "player spotted" cue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
pub enum EnemyGender {
    #[default]
    Male,
    Female,
}

/// Default behavior of an enemy when it is not chasing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
pub enum EnemyArchetype {
    /// Guards a single post and returns to it after a chase.
    StandingDuty,
    /// Walks a route of waypoints.
    #[default]
    Patrollable,
}

impl EnemyArchetype {
    /// State the enemy starts in and falls back to after losing the player.
    pub fn resting_state(self) -> EnemyState {
        match self {
            EnemyArchetype::StandingDuty => EnemyState::Idle,
            EnemyArchetype::Patrollable => EnemyState::Patrol,
        }
    }
}

/// AI state machine for enemy behavior.
#[derive(Default, PartialEq, Eq, Clone, Copy, Debug)]
pub enum EnemyState {
    /// Standing at its post (standing duty only), still watching for the player.
    Idle,
    /// Walking the patrol route.
    #[default]
    Patrol,
    /// Pursuing the player.
    Chasing,
}

/// Tunable enemy parameters, loaded from RON data files.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct EnemyStats {
    pub view_radius: f32,
    /// Full cone angle in degrees.
    pub view_angle: f32,
    /// Eye offset above the enemy origin, used as the sight ray origin.
    pub eye_height: f32,
    pub detection_time: f32,
    pub walk_speed: f32,
    pub chase_speed: f32,
    pub attack_range: f32,
    pub lose_player_time: f32,
    pub inspection_time: f32,
    pub wait_at_waypoint: f32,
}

impl Default for EnemyStats {
    fn default() -> Self {
        Self {
            view_radius: 10.0,
            view_angle: 90.0,
            eye_height: 1.5,
            detection_time: 2.0,
            walk_speed: 3.0,
            chase_speed: 5.0,
            attack_range: 6.5,
            lose_player_time: 3.0,
            inspection_time: 3.0,
            wait_at_waypoint: 2.0,
        }
    }
}

impl EnemyStats {
    /// Override the difficulty-dependent fields.
    pub fn with_difficulty(mut self, settings: Option<&DifficultySettings>) -> Self {
        if let Some(settings) = settings {
            self.view_radius = settings.view_radius;
            self.detection_time = settings.detection_time;
            self.lose_player_time = settings.lose_player_time;
            self.chase_speed = settings.enemy_chase_speed;
        }
        self
    }
}

/// Animation flags written by the AI and read by the animation systems.
#[derive(Component, Default, Debug, Clone, PartialEq)]
pub struct EnemyAnimator {
    pub running: bool,
    pub inspecting: bool,
    /// Set when a kick starts, consumed by the animation system.
    pub kick_requested: bool,
    /// Current navigation speed, drives idle vs walk.
    pub locomotion_speed: f32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standing_duty_never_rests_in_patrol() {
        assert_eq!(EnemyArchetype::StandingDuty.resting_state(), EnemyState::Idle);
        assert_eq!(EnemyArchetype::Patrollable.resting_state(), EnemyState::Patrol);
    }

    #[test]
    fn difficulty_overrides_only_its_fields() {
        let settings = DifficultySettings {
            view_radius: 14.0,
            detection_time: 1.0,
            lose_player_time: 5.0,
            enemy_chase_speed: 7.5,
            ..DifficultySettings::default()
        };

        let stats = EnemyStats::default().with_difficulty(Some(&settings));
        assert_eq!(stats.view_radius, 14.0);
        assert_eq!(stats.detection_time, 1.0);
        assert_eq!(stats.lose_player_time, 5.0);
        assert_eq!(stats.chase_speed, 7.5);
        assert_eq!(stats.walk_speed, 3.0);
        assert_eq!(stats.attack_range, 6.5);
    }

    #[test]
    fn missing_difficulty_keeps_defaults() {
        assert_eq!(EnemyStats::default().with_difficulty(None), EnemyStats::default());
    }
}
