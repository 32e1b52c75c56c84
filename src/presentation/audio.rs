//! Background music and one-shot sound effects through kira.

use bevy::prelude::*;
use bevy_kira_audio::prelude::*;
use rand::seq::SliceRandom;

use super::events::PresentationCue;
use crate::core::Outcome;
use crate::enemies::{AudioCue, EnemyGender};

/// Channel for the looping background track.
#[derive(Resource)]
pub struct MusicChannel;

/// Channel for voice and impact stingers; one at a time.
#[derive(Resource)]
pub struct StingerChannel;

/// Channel for the ball bounce.
#[derive(Resource)]
pub struct BounceChannel;

/// Whether background music should be playing.
///
/// Gameplay only flips this flag; [`sync_background_music`] starts or stops
/// the track when it changes.
#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackgroundMusic {
    pub playing: bool,
}

impl Default for BackgroundMusic {
    fn default() -> Self {
        Self { playing: true }
    }
}

/// Loaded sound handles.
#[derive(Resource, Default)]
pub struct SoundLibrary {
    pub music: Vec<Handle<AudioSource>>,
    pub spotted_male: Handle<AudioSource>,
    pub spotted_female: Handle<AudioSource>,
    pub slow_motion: Handle<AudioSource>,
    pub kick_impact: Handle<AudioSource>,
    pub bounce: Handle<AudioSource>,
    pub win: Handle<AudioSource>,
    pub lose: Handle<AudioSource>,
}

pub fn load_sounds(mut commands: Commands, asset_server: Res<AssetServer>) {
    commands.insert_resource(SoundLibrary {
        music: vec![
            asset_server.load("audio/music/afternoon.ogg"),
            asset_server.load("audio/music/dusk.ogg"),
        ],
        spotted_male: asset_server.load("audio/sfx/spotted_male.ogg"),
        spotted_female: asset_server.load("audio/sfx/spotted_female.ogg"),
        slow_motion: asset_server.load("audio/sfx/slow_motion.ogg"),
        kick_impact: asset_server.load("audio/sfx/kick_impact.ogg"),
        bounce: asset_server.load("audio/sfx/bounce.wav"),
        win: asset_server.load("audio/sfx/win.ogg"),
        lose: asset_server.load("audio/sfx/lose.ogg"),
    });
}

/// Start or stop the background track when [`BackgroundMusic`] changes.
pub fn sync_background_music(
    music: Res<BackgroundMusic>,
    library: Res<SoundLibrary>,
    channel: Res<AudioChannel<MusicChannel>>,
) {
    if !music.is_changed() {
        return;
    }

    if music.playing {
        if channel.is_playing_sound() {
            return;
        }
        let Some(track) = library.music.choose(&mut rand::thread_rng()) else {
            warn!("No background music loaded");
            return;
        };
        channel.play(track.clone()).looped();
    } else {
        channel.stop();
    }
}

/// Play the sound for each audio cue.
pub fn play_audio_cues(
    mut cues: EventReader<PresentationCue>,
    library: Res<SoundLibrary>,
    stingers: Res<AudioChannel<StingerChannel>>,
    bounces: Res<AudioChannel<BounceChannel>>,
) {
    for cue in cues.read() {
        match *cue {
            PresentationCue::Audio(AudioCue::PlayerSpotted(gender)) => {
                // Several guards spotting at once should not stack voices
                if stingers.is_playing_sound() {
                    continue;
                }
                let voice = match gender {
                    EnemyGender::Male => &library.spotted_male,
                    EnemyGender::Female => &library.spotted_female,
                };
                stingers.play(voice.clone());
            }
            PresentationCue::Audio(AudioCue::SlowMotion) => {
                stingers.stop();
                stingers.play(library.slow_motion.clone());
            }
            PresentationCue::Audio(AudioCue::KickImpact) => {
                stingers.play(library.kick_impact.clone());
            }
            PresentationCue::Bounce => {
                bounces.play(library.bounce.clone());
            }
            PresentationCue::RoundOver(outcome) => {
                let sting = match outcome {
                    Outcome::Won => &library.win,
                    Outcome::Lost => &library.lose,
                };
                stingers.play(sting.clone());
            }
            _ => {}
        }
    }
}
