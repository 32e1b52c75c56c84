//! Difficulty presets loaded from `assets/data/difficulty/*.ron`.
//!
//! A preset overrides a handful of values that are otherwise taken from the
//! enemy, player and world defaults. The active preset is resolved once when
//! a round starts; when it is missing every consumer keeps its own defaults.

use bevy::prelude::*;
use serde::Deserialize;
use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use super::error::DataLoadError;
use super::loader::{read_ron, ron_files_in};

/// Directory holding one RON file per difficulty level.
pub const DIFFICULTY_DIR: &str = "assets/data/difficulty";

/// Selectable difficulty level.
#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Difficulty {
    Easy,
    #[default]
    Normal,
    Hard,
}

impl Difficulty {
    /// File stem of the preset for this level.
    pub fn file_stem(self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Normal => "normal",
            Difficulty::Hard => "hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.file_stem())
    }
}

impl FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "normal" => Ok(Difficulty::Normal),
            "hard" => Ok(Difficulty::Hard),
            other => Err(format!("unknown difficulty '{other}'")),
        }
    }
}

/// Values a difficulty preset overrides.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DifficultySettings {
    pub view_radius: f32,
    pub detection_time: f32,
    pub lose_player_time: f32,
    /// Length of the day in seconds; surviving it wins the round.
    pub day_duration: f32,
    pub enemy_chase_speed: f32,
    /// Kicks the player survives, 1 to 5.
    pub kicks_to_die: u32,
    pub total_enemies: usize,
}

impl Default for DifficultySettings {
    fn default() -> Self {
        Self {
            view_radius: 10.0,
            detection_time: 2.0,
            lose_player_time: 3.0,
            day_duration: 300.0,
            enemy_chase_speed: 5.0,
            kicks_to_die: 3,
            total_enemies: 100,
        }
    }
}

impl DifficultySettings {
    /// Reject values the game cannot run with and clamp the kick count.
    pub fn validated(mut self, path: &Path) -> Result<Self, DataLoadError> {
        let positive = [
            ("view_radius", self.view_radius),
            ("detection_time", self.detection_time),
            ("day_duration", self.day_duration),
            ("enemy_chase_speed", self.enemy_chase_speed),
        ];
        for (field, value) in positive {
            if !(value > 0.0) {
                return Err(DataLoadError::InvalidValue {
                    path: path.display().to_string(),
                    field,
                    details: format!("expected a positive number, got {value}"),
                });
            }
        }
        if self.lose_player_time < 0.0 {
            return Err(DataLoadError::InvalidValue {
                path: path.display().to_string(),
                field: "lose_player_time",
                details: format!("expected zero or more, got {}", self.lose_player_time),
            });
        }

        self.kicks_to_die = self.kicks_to_die.clamp(1, 5);
        Ok(self)
    }
}

/// All presets that loaded successfully, keyed by level.
#[derive(Resource, Default)]
pub struct DifficultyRegistry {
    pub presets: HashMap<Difficulty, DifficultySettings>,
}

impl DifficultyRegistry {
    pub fn get(&self, difficulty: Difficulty) -> Option<&DifficultySettings> {
        self.presets.get(&difficulty)
    }
}

/// The preset in effect for the current round, if it could be resolved.
#[derive(Resource, Default, Debug, Clone)]
pub struct CurrentDifficulty(pub Option<DifficultySettings>);

impl CurrentDifficulty {
    pub fn settings(&self) -> Option<&DifficultySettings> {
        self.0.as_ref()
    }
}

/// Load every preset from [`DIFFICULTY_DIR`].
pub fn load_difficulty_presets(mut registry: ResMut<DifficultyRegistry>) {
    let dir = Path::new(DIFFICULTY_DIR);

    let files = match ron_files_in(dir) {
        Ok(files) => files,
        Err(e) => {
            warn!("Difficulty presets unavailable: {}", e);
            return;
        }
    };

    for (stem, path) in files {
        let Ok(difficulty) = stem.parse::<Difficulty>() else {
            warn!("Ignoring unknown difficulty preset {:?}", path);
            continue;
        };

        match read_ron::<DifficultySettings>(&path).and_then(|s| s.validated(&path)) {
            Ok(settings) => {
                info!("Loaded difficulty preset: {}", difficulty);
                registry.presets.insert(difficulty, settings);
            }
            Err(e) => error!("Failed to load difficulty preset: {}", e),
        }
    }
}

/// Pick the preset for the selected level, once per round.
pub fn resolve_difficulty(
    difficulty: Res<Difficulty>,
    registry: Res<DifficultyRegistry>,
    mut current: ResMut<CurrentDifficulty>,
) {
    current.0 = registry.get(*difficulty).cloned();

    if current.0.is_none() {
        warn!(
            "No '{}' difficulty preset loaded, using built-in defaults",
            *difficulty
        );
    }
}
