//! Presentation module - camera, audio and effects driven by gameplay cues.

mod audio;
mod camera;
mod effects;
mod events;
mod plugin;

pub use audio::BackgroundMusic;
pub use camera::{CameraMode, CameraRig, ScreenShake};
pub use events::PresentationCue;
pub use plugin::PresentationPlugin;
