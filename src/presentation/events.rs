//! Presentation requests raised by gameplay code.

use bevy::prelude::*;

use crate::core::Outcome;
use crate::enemies::AudioCue;

/// A camera, audio or VFX request. Consumed once per frame.
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub enum PresentationCue {
    /// Switch between the cinematic kick camera and the follow camera.
    Cinematic(bool),
    ScreenShake,
    Audio(AudioCue),
    /// The player ball hit something.
    Bounce,
    KickHitFx,
    RoundOver(Outcome),
}
