//! Simulation time scaling (slow motion, game-over crawl, pause).

use bevy::prelude::*;

use super::states::PlayState;

/// Physics step used at normal speed.
pub const BASE_FIXED_STEP: f32 = 0.02;

/// Requested speed of virtual time and the matching fixed step.
#[derive(Resource, Debug, Clone, Copy, PartialEq)]
pub struct TimeDilation {
    pub scale: f32,
    pub fixed_step: f32,
}

impl Default for TimeDilation {
    fn default() -> Self {
        Self::normal()
    }
}

impl TimeDilation {
    pub fn normal() -> Self {
        Self {
            scale: 1.0,
            fixed_step: BASE_FIXED_STEP,
        }
    }

    /// Scale time, keeping the physics step proportional.
    pub fn scaled(scale: f32) -> Self {
        Self {
            scale,
            fixed_step: BASE_FIXED_STEP * scale,
        }
    }
}

/// Push [`TimeDilation`] changes into Bevy's virtual and fixed clocks.
pub fn apply_time_dilation(
    dilation: Res<TimeDilation>,
    mut virtual_time: ResMut<Time<Virtual>>,
    mut fixed_time: ResMut<Time<Fixed>>,
) {
    if !dilation.is_changed() {
        return;
    }

    virtual_time.set_relative_speed(dilation.scale.max(0.0));
    if dilation.fixed_step > 0.0 {
        fixed_time.set_timestep_seconds(dilation.fixed_step as f64);
    }
}

/// Stop virtual time while the pause menu is open.
pub fn pause_virtual_time(mut virtual_time: ResMut<Time<Virtual>>) {
    virtual_time.pause();
}

pub fn resume_virtual_time(mut virtual_time: ResMut<Time<Virtual>>) {
    virtual_time.unpause();
}

/// Handle Escape key to pause/unpause the round.
pub fn handle_pause_input(
    keyboard: Res<ButtonInput<KeyCode>>,
    current_state: Res<State<PlayState>>,
    mut next_state: ResMut<NextState<PlayState>>,
) {
    if keyboard.just_pressed(KeyCode::Escape) {
        match current_state.get() {
            PlayState::Running => next_state.set(PlayState::Paused),
            PlayState::Paused => next_state.set(PlayState::Running),
        }
    }
}
