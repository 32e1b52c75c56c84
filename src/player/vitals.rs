//! Player health, kick count and death conditions.

use bevy::prelude::*;

use super::components::Player;
use crate::config::DifficultySettings;
use crate::core::{Outcome, PlayerDeathSequence, RoundOverEvent};

/// Delay between the fatal kick and the death sequence, so the kick plays out.
pub const KICK_DEATH_DELAY: f32 = 3.0;

/// Boost charges the player can carry at once.
pub const MAX_BOOSTS: u32 = 3;

/// Source of damage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DamageKind {
    Kick,
    /// Periodic drain, independent of the sun.
    Time,
}

/// Health and kick budget of the player.
#[derive(Component, Debug, Clone)]
pub struct PlayerVitals {
    max_health: f32,
    health: f32,
    kicks: u32,
    kicks_to_die: u32,
    damage_per_kick: f32,
    time_damage: f32,
    time_damage_interval: f32,
    time_damage_timer: f32,
    death_delay: Option<f32>,
    game_over: bool,
    boosts: u32,
    max_boosts: u32,
}

impl Default for PlayerVitals {
    fn default() -> Self {
        Self {
            max_health: 100.0,
            health: 100.0,
            kicks: 0,
            kicks_to_die: 3,
            damage_per_kick: 10.0,
            time_damage: 5.0,
            time_damage_interval: 10.0,
            time_damage_timer: 0.0,
            death_delay: None,
            game_over: false,
            boosts: 0,
            max_boosts: MAX_BOOSTS,
        }
    }
}

impl PlayerVitals {
    /// Default vitals with the kick budget of the active preset, if any.
    pub fn with_difficulty(settings: Option<&DifficultySettings>) -> Self {
        let mut vitals = Self::default();
        if let Some(settings) = settings {
            vitals.kicks_to_die = settings.kicks_to_die.clamp(1, 5);
        }
        vitals
    }

    pub fn health(&self) -> f32 {
        self.health
    }

    pub fn max_health(&self) -> f32 {
        self.max_health
    }

    pub fn kicks(&self) -> u32 {
        self.kicks
    }

    pub fn kicks_to_die(&self) -> u32 {
        self.kicks_to_die
    }

    /// Fraction of the kick budget left, 1.0 when never kicked.
    pub fn kicks_left_fraction(&self) -> f32 {
        self.kicks_to_die.saturating_sub(self.kicks) as f32 / self.kicks_to_die as f32
    }

    pub fn is_dead(&self) -> bool {
        self.game_over
    }

    pub fn take_damage(&mut self, kind: DamageKind) {
        if self.game_over {
            return;
        }

        match kind {
            DamageKind::Kick => {
                self.kicks += 1;
                self.health -= self.damage_per_kick;
            }
            DamageKind::Time => self.health -= self.time_damage,
        }
        self.health = self.health.max(0.0);

        debug!("Player damaged ({:?}): health {} kicks {}", kind, self.health, self.kicks);
    }

    /// Restore health up to the maximum. Returns false when already full.
    pub fn heal(&mut self, amount: f32) -> bool {
        if self.health >= self.max_health {
            return false;
        }
        self.health = (self.health + amount).min(self.max_health);
        true
    }

    pub fn boosts(&self) -> u32 {
        self.boosts
    }

    /// Store one more boost charge. Returns false when already carrying the maximum.
    pub fn add_boost(&mut self) -> bool {
        if self.boosts >= self.max_boosts {
            return false;
        }
        self.boosts += 1;
        true
    }

    /// Use up one boost charge.
    pub fn remove_boost(&mut self) {
        self.boosts = self.boosts.saturating_sub(1);
    }

    /// Advance the periodic drain and the death conditions.
    ///
    /// Returns true on the tick the death sequence should start.
    pub fn tick(&mut self, delta: f32) -> bool {
        if let Some(remaining) = self.death_delay.as_mut() {
            *remaining -= delta;
            if *remaining <= 0.0 {
                self.death_delay = None;
                return true;
            }
            return false;
        }

        if self.game_over {
            return false;
        }

        if self.time_damage_interval > 0.0 {
            self.time_damage_timer += delta;
            while self.time_damage_timer >= self.time_damage_interval {
                self.time_damage_timer -= self.time_damage_interval;
                self.take_damage(DamageKind::Time);
            }
        }

        if self.kicks >= self.kicks_to_die {
            self.game_over = true;
            self.death_delay = Some(KICK_DEATH_DELAY);
            false
        } else if self.health <= 0.0 {
            self.game_over = true;
            true
        } else {
            false
        }
    }
}

/// Drain health over time and start the death sequence when the player dies.
pub fn tick_player_vitals(
    time: Res<Time>,
    mut players: Query<&mut PlayerVitals, With<Player>>,
    mut deaths: EventWriter<PlayerDeathSequence>,
    mut round_over: EventWriter<RoundOverEvent>,
) {
    for mut vitals in players.iter_mut() {
        if vitals.tick(time.delta_secs()) {
            info!("Player died after {} kicks", vitals.kicks());
            round_over.send(RoundOverEvent(Outcome::Lost));
            deaths.send(PlayerDeathSequence);
        }
    }
}
