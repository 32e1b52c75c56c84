//! Player-related components.

use bevy::prelude::*;

/// Seconds after a kick during which no other enemy may kick.
pub const KICK_COOLDOWN: f32 = 3.0;

/// Marker component for the player entity.
#[derive(Component)]
pub struct Player;

/// Whether input may move the ball.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayerControl {
    /// Cleared for good once the round is over.
    pub enabled: bool,
    /// Set while a kick sequence holds the player in place.
    pub frozen: bool,
}

impl Default for PlayerControl {
    fn default() -> Self {
        Self {
            enabled: true,
            frozen: false,
        }
    }
}

impl PlayerControl {
    pub fn accepts_input(&self) -> bool {
        self.enabled && !self.frozen
    }
}

/// Shared "recently kicked" flag, so several chasing enemies land one kick.
#[derive(Component, Debug, Clone, PartialEq)]
pub struct KickGuard {
    recently_kicked: bool,
    cooldown: f32,
    remaining: f32,
}

impl Default for KickGuard {
    fn default() -> Self {
        Self::new(KICK_COOLDOWN)
    }
}

impl KickGuard {
    pub fn new(cooldown: f32) -> Self {
        Self {
            recently_kicked: false,
            cooldown,
            remaining: cooldown,
        }
    }

    pub fn is_active(&self) -> bool {
        self.recently_kicked
    }

    pub fn mark(&mut self) {
        self.recently_kicked = true;
    }

    /// Count the cooldown down; the flag clears once it runs out.
    pub fn tick(&mut self, delta: f32) {
        if !self.recently_kicked {
            return;
        }

        self.remaining -= delta;
        if self.remaining <= 0.0 {
            self.recently_kicked = false;
            self.remaining = self.cooldown;
        }
    }
}

/// Running speed boost; spends one charge when it runs out.
#[derive(Component, Debug, Clone, Default, PartialEq)]
pub struct Boost {
    remaining: Option<f32>,
}

impl Boost {
    pub fn is_active(&self) -> bool {
        self.remaining.is_some()
    }

    /// Start a boost. Returns false while one is already running.
    pub fn start(&mut self, duration: f32) -> bool {
        if self.is_active() {
            return false;
        }
        self.remaining = Some(duration);
        true
    }

    /// Count the boost down; returns true on the tick it ends.
    pub fn tick(&mut self, delta: f32) -> bool {
        let Some(remaining) = self.remaining.as_mut() else {
            return false;
        };
        *remaining -= delta;
        if *remaining <= 0.0 {
            self.remaining = None;
            return true;
        }
        false
    }
}

/// Tracks player movement state for physics.
#[derive(Component, Default)]
pub struct MovementState {
    pub is_grounded: bool,
}

/// Configuration for the rolling-ball controller.
#[derive(Resource)]
pub struct PlayerConfig {
    /// Ball radius in meters
    pub radius: f32,
    /// Walking speed in units per second
    pub move_speed: f32,
    /// Speed while Shift is held
    pub sprint_speed: f32,
    /// Speed while a boost runs
    pub boost_speed: f32,
    /// Seconds a boost lasts
    pub boost_duration: f32,
    /// Upward impulse of a jump
    pub jump_impulse: f32,
    /// Ray length below the ball surface that still counts as ground
    pub ground_check_distance: f32,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            radius: 0.5,
            move_speed: 6.0,
            sprint_speed: 10.0,
            boost_speed: 20.0,
            boost_duration: 3.0,
            jump_impulse: 10.0,
            ground_check_distance: 0.1,
        }
    }
}
