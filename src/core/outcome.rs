//! Win/lose resolution for a round.

use bevy::prelude::*;

use super::events::{Outcome, RoundOverEvent, Sunset};
use super::states::GameState;
use super::time::TimeDilation;
use crate::player::PlayerControl;
use crate::presentation::{BackgroundMusic, PresentationCue};

/// Time scale while the game-over screen is shown.
pub const GAME_OVER_TIME_SCALE: f32 = 0.05;

/// Result of the current round. The first outcome recorded sticks.
#[derive(Resource, Default, Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameOutcome(Option<Outcome>);

impl GameOutcome {
    pub fn get(&self) -> Option<Outcome> {
        self.0
    }

    /// Record `outcome` unless the round already ended.
    ///
    /// Returns whether this call ended the round.
    pub fn record(&mut self, outcome: Outcome) -> bool {
        if self.0.is_some() {
            return false;
        }
        self.0 = Some(outcome);
        true
    }

    pub fn reset(&mut self) {
        self.0 = None;
    }
}

/// End the round on the first win or lose request.
#[allow(clippy::too_many_arguments)]
pub fn resolve_round_over(
    mut requests: EventReader<RoundOverEvent>,
    mut outcome: ResMut<GameOutcome>,
    mut next_state: ResMut<NextState<GameState>>,
    mut dilation: ResMut<TimeDilation>,
    mut music: ResMut<BackgroundMusic>,
    mut cues: EventWriter<PresentationCue>,
    mut players: Query<&mut PlayerControl>,
) {
    for RoundOverEvent(result) in requests.read() {
        if !outcome.record(*result) {
            continue;
        }

        info!("Round over: {:?}", result);

        music.playing = false;
        cues.send(PresentationCue::RoundOver(*result));
        for mut control in players.iter_mut() {
            control.enabled = false;
        }
        *dilation = TimeDilation::scaled(GAME_OVER_TIME_SCALE);
        next_state.set(GameState::GameOver);
    }
}

/// Surviving until sunset wins the round.
pub fn sunset_wins(mut sunsets: EventReader<Sunset>, mut round_over: EventWriter<RoundOverEvent>) {
    if sunsets.read().count() > 0 {
        round_over.send(RoundOverEvent(Outcome::Won));
    }
}

/// Clear round-wide state at the start of a round.
pub fn reset_round(
    mut outcome: ResMut<GameOutcome>,
    mut dilation: ResMut<TimeDilation>,
    mut music: ResMut<BackgroundMusic>,
) {
    outcome.reset();
    *dilation = TimeDilation::normal();
    music.playing = true;
}
