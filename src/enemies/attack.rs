//! Slow-motion kick sequence.
//!
//! The kick is a short cinematic: the player is frozen, time slows down, the
//! camera cuts to a cinematic angle, and after the foot connects the player is
//! launched. Stage timers run on wall-clock time so slow motion does not
//! stretch the sequence.

use bevy::prelude::*;

use super::services::{AudioCue, PlayerWorld, Presentation};
use crate::core::BASE_FIXED_STEP;

/// Stages of a kick.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum AttackStage {
    #[default]
    Idle,
    /// Foot swinging toward the player.
    WindUp,
    /// Impact sound played, waiting for foot contact.
    Impact,
    /// Player released; short grace before another kick is allowed.
    Recovery,
}

/// Durations and forces of the kick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AttackTiming {
    pub wind_up: f32,
    pub impact: f32,
    pub recovery: f32,
    pub time_scale: f32,
    pub kick_force: f32,
    pub upward_bias: f32,
    pub torque: f32,
}

impl Default for AttackTiming {
    fn default() -> Self {
        Self {
            wind_up: 2.2,
            impact: 0.6,
            recovery: 0.3,
            time_scale: 0.15,
            kick_force: 60.0,
            upward_bias: 0.5,
            torque: 0.05,
        }
    }
}

/// Attacker placement at the moment of impact.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AttackerPose {
    pub position: Vec3,
    pub right: Vec3,
}

/// Runs at most one kick at a time.
#[derive(Debug, Clone, Default)]
pub struct AttackSequencer {
    stage: AttackStage,
    remaining: f32,
    timing: AttackTiming,
}

impl AttackSequencer {
    pub fn new(timing: AttackTiming) -> Self {
        Self {
            stage: AttackStage::Idle,
            remaining: 0.0,
            timing,
        }
    }

    pub fn stage(&self) -> AttackStage {
        self.stage
    }

    pub fn is_active(&self) -> bool {
        self.stage != AttackStage::Idle
    }

    /// Start a kick. Ignored while one is already running.
    ///
    /// Returns whether a new sequence was started.
    pub fn trigger(
        &mut self,
        presentation: &mut dyn Presentation,
        world: &mut dyn PlayerWorld,
    ) -> bool {
        if self.is_active() {
            return false;
        }

        world.report_kick_damage();

        world.freeze_player(true);
        presentation.show_cinematic_camera(true);

        let scale = self.timing.time_scale;
        world.set_time_scale(scale, BASE_FIXED_STEP * scale);

        presentation.trigger_kick();

        self.enter(AttackStage::WindUp, self.timing.wind_up);
        true
    }

    /// Advance the running stage by `real_delta` seconds of wall-clock time.
    pub fn tick(
        &mut self,
        real_delta: f32,
        attacker: &AttackerPose,
        presentation: &mut dyn Presentation,
        world: &mut dyn PlayerWorld,
    ) {
        if !self.is_active() {
            return;
        }

        self.remaining -= real_delta;
        if self.remaining > 0.0 {
            return;
        }

        match self.stage {
            AttackStage::Idle => {}
            AttackStage::WindUp => {
                presentation.play_cue(AudioCue::KickImpact);
                self.enter(AttackStage::Impact, self.timing.impact);
            }
            AttackStage::Impact => {
                self.land_kick(attacker, presentation, world);
                self.enter(AttackStage::Recovery, self.timing.recovery);
            }
            AttackStage::Recovery => {
                self.enter(AttackStage::Idle, 0.0);
            }
        }
    }

    fn land_kick(
        &self,
        attacker: &AttackerPose,
        presentation: &mut dyn Presentation,
        world: &mut dyn PlayerWorld,
    ) {
        presentation.screen_shake();

        if let Some(player) = world.player_position() {
            let direction =
                (player - attacker.position).normalize_or_zero() + Vec3::Y * self.timing.upward_bias;
            world.apply_kick_force(
                direction * self.timing.kick_force,
                attacker.right * self.timing.torque,
            );
        }

        presentation.play_kick_hit_fx();

        world.set_time_scale(1.0, BASE_FIXED_STEP);
        presentation.show_cinematic_camera(false);
        presentation.set_background_music(true);
        world.freeze_player(false);
    }

    fn enter(&mut self, stage: AttackStage, duration: f32) {
        debug!("Kick stage {:?} -> {:?}", self.stage, stage);
        self.stage = stage;
        self.remaining = duration;
    }
}
